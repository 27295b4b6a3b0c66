//! Record formatting and paced transmission on the output link.
//!
//! Consumes forwarded measurements, computes the per-channel delta, renders
//! the fixed-layout ASCII record, and writes it one byte at a time. Each
//! byte is flushed before the next is written, so progress is paced on the
//! link's transmit-complete interrupt and a single-byte hardware buffer can
//! never overrun.

use embassy_stm32::usart::BufferedUartTx;
use embedded_io_async::Write;

use sampler_core::report::{DeltaTracker, format_record};

use crate::pipeline::PipelineContext;

#[embassy_executor::task]
pub async fn run(pipeline: &'static PipelineContext, mut link_tx: BufferedUartTx<'static>) -> ! {
    let output = pipeline.output.receiver();
    let mut tracker = DeltaTracker::new();

    loop {
        let measurement = output.receive().await;
        let delta = tracker.advance(&measurement);
        let record = format_record(measurement.channel, delta);

        for byte in &record {
            if link_tx.write(&[*byte]).await.is_err() {
                defmt::warn!("output: link write error");
                break;
            }
            if link_tx.flush().await.is_err() {
                defmt::warn!("output: link flush error");
                break;
            }
        }
    }
}
