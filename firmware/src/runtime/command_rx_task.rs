//! Byte intake from the command link.
//!
//! One byte per receive completion is pushed to the bounded command FIFO
//! with drop-on-overflow; interpretation happens in the interpreter task.

use embassy_stm32::usart::BufferedUartRx;
use embedded_io_async::Read;

use crate::pipeline::PipelineContext;

#[embassy_executor::task]
pub async fn run(pipeline: &'static PipelineContext, mut link_rx: BufferedUartRx<'static>) -> ! {
    let mut byte = [0u8; 1];
    loop {
        match link_rx.read(&mut byte).await {
            Ok(count) if count > 0 => {
                if !pipeline.submit_command_byte(byte[0]) {
                    defmt::warn!("command rx: FIFO full, dropped byte {=u8:x}", byte[0]);
                }
            }
            Ok(_) => {}
            Err(_) => {
                defmt::warn!("command rx: link read error");
            }
        }
    }
}
