//! Central dispatch task around [`sampler_core::coordinator::Coordinator`].
//!
//! Blocks on the wake bus, then lets the portable coordinator logic apply
//! selection transitions and route the pending measurement pair. The status
//! LED toggles once per cycle that forwarded at least one measurement; the
//! indicator is best-effort and nothing here depends on it.

use embassy_stm32::gpio::Output;

use sampler_core::coordinator::Coordinator;

use crate::pipeline::{HandoffSource, OutputForwarder, PipelineContext};

#[embassy_executor::task]
pub async fn run(pipeline: &'static PipelineContext, mut status_led: Output<'static>) -> ! {
    let mut coordinator = Coordinator::new();
    let mut source = HandoffSource::new(pipeline.handoff.receiver());
    let mut sink = OutputForwarder::new(pipeline.output.sender());

    loop {
        let flags = pipeline.wake.wait().await;
        let report = coordinator.handle_wake(flags, &mut source, &mut sink);

        if let Some(state) = report.selection_applied {
            defmt::debug!("coordinator: selection -> {}", defmt::Debug2Format(&state));
        }
        if report.dropped > 0 {
            defmt::warn!("coordinator: output full, dropped {} forward(s)", report.dropped);
        }
        if report.forwarded > 0 {
            status_led.toggle();
        }
    }
}
