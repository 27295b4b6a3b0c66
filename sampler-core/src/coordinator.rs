//! Central dispatch state machine for the sampling pipeline.
//!
//! The coordinator owns the [`SelectionState`] and is the single consumer of
//! the wake-flag set. Each wake cycle applies pending selection signals
//! before any measurement is evaluated, so a selection change takes effect
//! starting with the very next forwarded pair. The queue transports are
//! abstracted behind traits so the same logic runs against embassy channels
//! on the MCU and plain collections in host tests.

use crate::measurement::Measurement;
use crate::selection::{SelectionState, resolve_selection};
use crate::wake::{WakeEvent, WakeFlags};

/// Error surfaced when a forwarded measurement cannot be accepted.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ForwardError {
    /// Output queue has reached its maximum capacity.
    QueueFull,
}

/// Consumer side of the interrupt-to-task handoff channel.
pub trait MeasurementSource {
    /// Attempts to dequeue one measurement without blocking.
    ///
    /// Returns `None` when the channel is currently empty, which the
    /// coordinator treats as a dropped conversion rather than an error.
    fn try_dequeue(&mut self) -> Option<Measurement>;
}

/// Producer side of the queue feeding the output stage.
pub trait MeasurementSink {
    /// Attempts to forward one measurement without blocking.
    fn try_forward(&mut self, measurement: Measurement) -> Result<(), ForwardError>;
}

/// Bookkeeping for one wake cycle, used for logging and tests.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct CycleReport {
    /// New selection state, when a selection signal was applied this cycle.
    pub selection_applied: Option<SelectionState>,
    /// Measurements handed to the output queue.
    pub forwarded: u8,
    /// Measurements withheld by the current selection policy.
    pub withheld: u8,
    /// Forwards rejected because the output queue was full.
    pub dropped: u8,
}

/// Event-driven dispatcher owning the channel-selection policy.
///
/// Exclusive ownership of the state by this one consumer removes any need
/// for locking around it; producers communicate only through the wake flags
/// and the bounded queues.
#[derive(Debug, Default)]
pub struct Coordinator {
    state: SelectionState,
}

impl Coordinator {
    /// Creates a coordinator in the initial `None` state.
    pub const fn new() -> Self {
        Self {
            state: SelectionState::None,
        }
    }

    /// Returns the currently active selection policy.
    pub const fn state(&self) -> SelectionState {
        self.state
    }

    /// Processes one consumed wake-flag snapshot.
    ///
    /// Selection signals are applied first; if `DataReady` is also pending,
    /// up to one measurement per channel is drained from `source` and
    /// forwarded through `sink` when the (possibly just-updated) state admits
    /// its channel. A missing measurement or a full output queue degrades
    /// silently; nothing in this path can halt the pipeline.
    pub fn handle_wake<S, K>(&mut self, flags: WakeFlags, source: &mut S, sink: &mut K) -> CycleReport
    where
        S: MeasurementSource,
        K: MeasurementSink,
    {
        let mut report = CycleReport::default();

        if let Some(next) = resolve_selection(flags) {
            self.state = next;
            report.selection_applied = Some(next);
        }

        if flags.contains(WakeEvent::DataReady) {
            // One trigger cycle enqueues at most a First/Second pair, in that
            // order. Drain up to two entries and let each measurement's own
            // channel tag drive the policy check, so a partial pair after an
            // overflow drop is still handled correctly.
            for _ in 0..2 {
                let Some(measurement) = source.try_dequeue() else {
                    break;
                };

                if !self.state.forwards(measurement.channel) {
                    report.withheld += 1;
                    continue;
                }

                match sink.try_forward(measurement) {
                    Ok(()) => report.forwarded += 1,
                    Err(ForwardError::QueueFull) => report.dropped += 1,
                }
            }
        }

        report
    }
}
