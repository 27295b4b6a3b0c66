//! Maps command bytes to selection signals.
//!
//! Blocking dequeue from the command FIFO; recognized bytes raise the
//! corresponding wake flag and nothing else. Selection state itself is
//! mutated only by the coordinator, so this task never touches shared state
//! beyond the wake bus.

use sampler_core::selection::interpret_command;

use crate::pipeline::PipelineContext;

#[embassy_executor::task]
pub async fn run(pipeline: &'static PipelineContext) -> ! {
    let commands = pipeline.commands.receiver();
    loop {
        let byte = commands.receive().await;
        match interpret_command(byte) {
            Some(event) => pipeline.wake.raise(event),
            // Unrecognized bytes are silently ignored per the link protocol.
            None => defmt::debug!("interpreter: ignoring byte {=u8:x}", byte),
        }
    }
}
