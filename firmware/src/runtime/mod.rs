use cortex_m::interrupt;
use cortex_m::register::primask;
use critical_section::{self, RawRestoreState};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_stm32 as hal;
use embassy_stm32::gpio::{Level, Output, Speed};
use embassy_stm32::usart::{BufferedUart, Config as UartConfig, DataBits, Parity, StopBits};
use static_cell::StaticCell;

use crate::pipeline::PipelineContext;

mod command_rx_task;
mod coordinator_task;
mod interpreter_task;
mod output_task;
mod sampler_task;

critical_section::set_impl!(InterruptCriticalSection);

struct InterruptCriticalSection;

unsafe impl critical_section::Impl for InterruptCriticalSection {
    unsafe fn acquire() -> RawRestoreState {
        let primask = primask::read();
        interrupt::disable();
        primask.is_active()
    }

    unsafe fn release(restore_state: RawRestoreState) {
        if restore_state {
            unsafe {
                interrupt::enable();
            }
        }
    }
}

/// Fixed baud rate for the command/report link.
const LINK_BAUD: u32 = 9_600;

const LINK_BUFFER_SIZE: usize = 16;

pub(super) static PIPELINE: PipelineContext = PipelineContext::new();

static LINK_TX_BUFFER: StaticCell<[u8; LINK_BUFFER_SIZE]> = StaticCell::new();
static LINK_RX_BUFFER: StaticCell<[u8; LINK_BUFFER_SIZE]> = StaticCell::new();

embassy_stm32::bind_interrupts!(struct LinkIrqs {
    USART3_4_5_6_LPUART1 => embassy_stm32::usart::BufferedInterruptHandler<hal::peripherals::USART5>;
});

#[embassy_executor::main]
pub async fn main(spawner: Spawner) {
    let config = hal::Config::default();
    let hal::Peripherals {
        PA0,
        PA1,
        PA5,
        PB0,
        PB1,
        ADC1,
        USART5,
        ..
    } = hal::init(config);

    let mut link_config = UartConfig::default();
    link_config.baudrate = LINK_BAUD;
    link_config.data_bits = DataBits::DataBits8;
    link_config.stop_bits = StopBits::STOP1;
    link_config.parity = Parity::ParityNone;

    let link = BufferedUart::new(
        USART5,
        PB1,
        PB0,
        LINK_TX_BUFFER.init([0; LINK_BUFFER_SIZE]),
        LINK_RX_BUFFER.init([0; LINK_BUFFER_SIZE]),
        LinkIrqs,
        link_config,
    )
    .expect("failed to initialize link UART");
    let (link_tx, link_rx) = link.split();

    let status_led = Output::new(PA5, Level::Low, Speed::Low);

    spawner
        .spawn(sampler_task::run(&PIPELINE, ADC1, PA0, PA1))
        .expect("failed to spawn sampler task");
    spawner
        .spawn(command_rx_task::run(&PIPELINE, link_rx))
        .expect("failed to spawn command rx task");
    spawner
        .spawn(interpreter_task::run(&PIPELINE))
        .expect("failed to spawn interpreter task");
    spawner
        .spawn(coordinator_task::run(&PIPELINE, status_led))
        .expect("failed to spawn coordinator task");
    spawner
        .spawn(output_task::run(&PIPELINE, link_tx))
        .expect("failed to spawn output task");

    core::future::pending::<()>().await;
}
