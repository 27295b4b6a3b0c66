//! Periodic conversion trigger and completion ingest.
//!
//! Every trigger period the task starts one two-channel conversion cycle,
//! first channel then second, and hands the completed pair to the pipeline
//! through the non-blocking ingest path. The conversion-complete interrupt
//! itself is owned by the HAL; by the time `read` resolves, the hardware
//! start condition has been cleared and the next period may re-fire.

use embassy_stm32 as hal;
use embassy_stm32::Peri;
use embassy_stm32::adc::{Adc, SampleTime};
use embassy_time::{Duration, Ticker};

use crate::pipeline::PipelineContext;

/// Fixed trigger period for conversion cycles.
const TRIGGER_PERIOD: Duration = Duration::from_millis(1_000);

embassy_stm32::bind_interrupts!(struct AdcIrqs {
    ADC1_COMP => embassy_stm32::adc::InterruptHandler<hal::peripherals::ADC1>;
});

#[embassy_executor::task]
pub async fn run(
    pipeline: &'static PipelineContext,
    adc: Peri<'static, hal::peripherals::ADC1>,
    mut first_pin: Peri<'static, hal::peripherals::PA0>,
    mut second_pin: Peri<'static, hal::peripherals::PA1>,
) -> ! {
    let mut adc = Adc::new(adc, AdcIrqs);
    adc.set_sample_time(SampleTime::CYCLES79_5);

    let mut ticker = Ticker::every(TRIGGER_PERIOD);
    loop {
        ticker.next().await;

        let raw_first = adc.read(&mut first_pin).await;
        let raw_second = adc.read(&mut second_pin).await;

        let dropped = pipeline.ingest_conversion(raw_first, raw_second);
        if dropped > 0 {
            defmt::warn!("sampler: handoff full, dropped {} measurement(s)", dropped);
        }
    }
}
