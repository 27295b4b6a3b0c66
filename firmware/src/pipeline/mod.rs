#![allow(dead_code)]

//! Bounded queues and the wake bus shared by the sampler tasks.
//!
//! This module defines the one [`PipelineContext`] instance every task and
//! interrupt-side producer receives at spawn time. All cross-context
//! communication goes through these primitives: three bounded channels with
//! non-blocking producer sides, plus a coalescing wake-flag bus built from an
//! atomic flag byte and an embassy signal.

use embassy_sync::channel::{Channel, Receiver, Sender};
use embassy_sync::signal::Signal;
use portable_atomic::{AtomicU8, Ordering};

use sampler_core::coordinator::{ForwardError, MeasurementSink, MeasurementSource};
use sampler_core::measurement::{Channel as SampleChannel, Measurement};
use sampler_core::wake::{WakeEvent, WakeFlags};

#[cfg(not(target_os = "none"))]
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
#[cfg(target_os = "none")]
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

#[cfg(target_os = "none")]
type PipelineMutex = CriticalSectionRawMutex;
#[cfg(not(target_os = "none"))]
type PipelineMutex = NoopRawMutex;

/// Depth for each bounded pipeline queue.
pub const QUEUE_DEPTH: usize = 10;

/// Queue carrying measurement pairs from the conversion ingest to the coordinator.
pub type HandoffQueue = Channel<PipelineMutex, Measurement, QUEUE_DEPTH>;

/// Queue carrying raw command bytes from the link to the interpreter.
pub type CommandQueue = Channel<PipelineMutex, u8, QUEUE_DEPTH>;

/// Queue carrying selected measurements from the coordinator to the output stage.
pub type OutputQueue = Channel<PipelineMutex, Measurement, QUEUE_DEPTH>;

/// Receiver handle for the handoff queue.
pub type HandoffReceiver<'a> = Receiver<'a, PipelineMutex, Measurement, QUEUE_DEPTH>;

/// Receiver handle for the command queue.
pub type CommandReceiver<'a> = Receiver<'a, PipelineMutex, u8, QUEUE_DEPTH>;

/// Sender handle for the output queue.
pub type OutputSender<'a> = Sender<'a, PipelineMutex, Measurement, QUEUE_DEPTH>;

/// Receiver handle for the output queue.
pub type OutputReceiver<'a> = Receiver<'a, PipelineMutex, Measurement, QUEUE_DEPTH>;

/// Coalescing wake-flag bus the coordinator blocks on.
///
/// Producers OR their event bit into the atomic byte and pulse the signal;
/// the consumer atomically swaps the byte to zero on wakeup. Raises between
/// wakeups coalesce into one pending snapshot, matching the at-least-one
/// wakeup guarantee the coordinator relies on.
pub struct WakeBus {
    flags: AtomicU8,
    signal: Signal<PipelineMutex, ()>,
}

impl WakeBus {
    /// Creates an empty wake bus.
    pub const fn new() -> Self {
        Self {
            flags: AtomicU8::new(0),
            signal: Signal::new(),
        }
    }

    /// Marks `event` pending and wakes the coordinator. Never blocks.
    pub fn raise(&self, event: WakeEvent) {
        self.flags.fetch_or(event.mask(), Ordering::Relaxed);
        self.signal.signal(());
    }

    /// Blocks until at least one event is pending, then consumes the whole
    /// pending set atomically.
    pub async fn wait(&self) -> WakeFlags {
        loop {
            self.signal.wait().await;
            let flags = WakeFlags::from_bits(self.flags.swap(0, Ordering::Relaxed));
            // A raise landing between the signal and the swap leaves the
            // signal set with nothing pending; skip the spurious wakeup.
            if !flags.is_empty() {
                return flags;
            }
        }
    }
}

impl Default for WakeBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Process-wide singleton bundling every pipeline primitive.
///
/// Constructed once in static storage and passed by reference to each task
/// at registration time; nothing reaches these queues through ambient
/// lookup.
pub struct PipelineContext {
    pub handoff: HandoffQueue,
    pub commands: CommandQueue,
    pub output: OutputQueue,
    pub wake: WakeBus,
}

impl PipelineContext {
    /// Creates a context with empty queues and no pending wake events.
    pub const fn new() -> Self {
        Self {
            handoff: HandoffQueue::new(),
            commands: CommandQueue::new(),
            output: OutputQueue::new(),
            wake: WakeBus::new(),
        }
    }

    /// Ingests one completed conversion cycle.
    ///
    /// Applies the sample shift, enqueues both measurements in channel order
    /// with drop-on-full, then raises `DataReady` exactly once so the
    /// coordinator observes a fully populated pair or, after an overflow
    /// drop, a partial pair without corruption. Never blocks or allocates;
    /// returns the number of measurements that were dropped.
    pub fn ingest_conversion(&self, raw_first: u16, raw_second: u16) -> usize {
        let mut dropped = 0;
        for measurement in [
            Measurement::from_raw(SampleChannel::First, raw_first),
            Measurement::from_raw(SampleChannel::Second, raw_second),
        ] {
            if self.handoff.try_send(measurement).is_err() {
                dropped += 1;
            }
        }
        self.wake.raise(WakeEvent::DataReady);
        dropped
    }

    /// Accepts one byte from the input link, dropping on overflow.
    ///
    /// No interpretation happens here; the interpreter task maps the byte to
    /// a selection signal in task context.
    pub fn submit_command_byte(&self, byte: u8) -> bool {
        self.commands.try_send(byte).is_ok()
    }
}

impl Default for PipelineContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Adapts the handoff receiver to the coordinator's source trait.
pub struct HandoffSource<'a> {
    receiver: HandoffReceiver<'a>,
}

impl<'a> HandoffSource<'a> {
    pub fn new(receiver: HandoffReceiver<'a>) -> Self {
        Self { receiver }
    }
}

impl MeasurementSource for HandoffSource<'_> {
    fn try_dequeue(&mut self) -> Option<Measurement> {
        self.receiver.try_receive().ok()
    }
}

/// Adapts the output sender to the coordinator's sink trait.
pub struct OutputForwarder<'a> {
    sender: OutputSender<'a>,
}

impl<'a> OutputForwarder<'a> {
    pub fn new(sender: OutputSender<'a>) -> Self {
        Self { sender }
    }
}

impl MeasurementSink for OutputForwarder<'_> {
    fn try_forward(&mut self, measurement: Measurement) -> Result<(), ForwardError> {
        self.sender
            .try_send(measurement)
            .map_err(|_| ForwardError::QueueFull)
    }
}
