//! Host-side rendition of the sampling pipeline.
//!
//! Drives the portable coordination logic with plain collections in place of
//! the firmware's embassy channels: injected raw conversion pairs walk the
//! same ingest, dispatch, delta, and formatting code the MCU runs, and the
//! session echoes the exact bytes the firmware would put on the link.

use std::collections::VecDeque;

use sampler_core::coordinator::{Coordinator, ForwardError, MeasurementSink, MeasurementSource};
use sampler_core::measurement::{Channel, Measurement};
use sampler_core::report::{DeltaTracker, format_record};
use sampler_core::selection::interpret_command;
use sampler_core::wake::{WakeEvent, WakeFlags};

/// Queue depth matching the firmware pipeline.
const QUEUE_DEPTH: usize = 10;

#[derive(Default)]
struct BoundedQueue {
    entries: VecDeque<Measurement>,
}

impl BoundedQueue {
    fn try_push(&mut self, measurement: Measurement) -> bool {
        if self.entries.len() >= QUEUE_DEPTH {
            return false;
        }
        self.entries.push_back(measurement);
        true
    }
}

impl MeasurementSource for BoundedQueue {
    fn try_dequeue(&mut self) -> Option<Measurement> {
        self.entries.pop_front()
    }
}

impl MeasurementSink for BoundedQueue {
    fn try_forward(&mut self, measurement: Measurement) -> Result<(), ForwardError> {
        if self.try_push(measurement) {
            Ok(())
        } else {
            Err(ForwardError::QueueFull)
        }
    }
}

/// Interactive pipeline session.
#[derive(Default)]
pub struct Session {
    handoff: BoundedQueue,
    output: BoundedQueue,
    pending: WakeFlags,
    coordinator: Coordinator,
    tracker: DeltaTracker,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles one input line and returns the lines to print.
    pub fn handle_command(&mut self, input: &str) -> Vec<String> {
        let mut parts = input.split_whitespace();
        let Some(verb) = parts.next() else {
            return Vec::new();
        };

        match verb {
            "help" => help_text(),
            "state" => self.describe_state(),
            "sample" => match parse_sample_args(parts) {
                Ok((raw_first, raw_second)) => self.run_cycle(raw_first, raw_second),
                Err(message) => vec![message],
            },
            byte if byte.len() == 1 => self.send_byte(byte.as_bytes()[0]),
            _ => vec![format!("Unknown command `{input}`. Type `help` for usage.")],
        }
    }

    /// Feeds one command byte through the interpreter path.
    fn send_byte(&mut self, byte: u8) -> Vec<String> {
        match interpret_command(byte) {
            Some(event) => {
                self.pending = self.pending.with(event);
                self.pump();
                vec![format!("Selection is now {:?}.", self.coordinator.state())]
            }
            // The link contract: anything outside '1'..'4' is dropped quietly.
            None => vec![format!("Byte {:?} ignored by the interpreter.", byte as char)],
        }
    }

    /// Runs one full trigger cycle with the given raw conversion results.
    fn run_cycle(&mut self, raw_first: u16, raw_second: u16) -> Vec<String> {
        let mut dropped = 0;
        for measurement in [
            Measurement::from_raw(Channel::First, raw_first),
            Measurement::from_raw(Channel::Second, raw_second),
        ] {
            if !self.handoff.try_push(measurement) {
                dropped += 1;
            }
        }
        self.pending = self.pending.with(WakeEvent::DataReady);
        self.pump();

        let mut responses = Vec::new();
        if dropped > 0 {
            responses.push(format!("Handoff overflow: dropped {dropped} measurement(s)."));
        }
        responses.extend(self.drain_link());
        if responses.is_empty() {
            responses.push("No record emitted (selection withholds both channels).".to_string());
        }
        responses
    }

    fn pump(&mut self) {
        let flags = std::mem::take(&mut self.pending);
        if flags.is_empty() {
            return;
        }
        self.coordinator
            .handle_wake(flags, &mut self.handoff, &mut self.output);
    }

    /// Formats everything the output task would transmit.
    fn drain_link(&mut self) -> Vec<String> {
        let mut lines = Vec::new();
        while let Some(measurement) = self.output.try_dequeue() {
            let delta = self.tracker.advance(&measurement);
            let record = format_record(measurement.channel, delta);
            let text: String = record
                .iter()
                .map(|&byte| match byte {
                    b'\n' => String::from("\\n"),
                    b'\r' => String::from("\\r"),
                    other => (other as char).to_string(),
                })
                .collect();
            lines.push(format!("tx> {text}"));
        }
        lines
    }

    fn describe_state(&self) -> Vec<String> {
        vec![
            format!("Selection: {:?}", self.coordinator.state()),
            format!(
                "Previous values: first={} second={}",
                self.tracker.previous(Channel::First),
                self.tracker.previous(Channel::Second)
            ),
        ]
    }
}

fn parse_sample_args<'a>(mut parts: impl Iterator<Item = &'a str>) -> Result<(u16, u16), String> {
    let usage = String::from("Usage: sample <raw-first> <raw-second> (raw 12-bit values)");
    let first = parts.next().ok_or_else(|| usage.clone())?;
    let second = parts.next().ok_or_else(|| usage.clone())?;
    if parts.next().is_some() {
        return Err(usage);
    }

    let raw_first: u16 = first.parse().map_err(|_| usage.clone())?;
    let raw_second: u16 = second.parse().map_err(|_| usage)?;
    Ok((raw_first, raw_second))
}

fn help_text() -> Vec<String> {
    vec![
        "Commands:".to_string(),
        "  1 | 2 | 3 | 4          send a selection byte ('4' stops output)".to_string(),
        "  sample <raw1> <raw2>   run one trigger cycle with raw conversions".to_string(),
        "  state                  show selection state and previous values".to_string(),
        "  exit | quit            leave the emulator".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_match_firmware_format() {
        let mut session = Session::new();
        session.handle_command("3");

        let responses = session.handle_command("sample 824 640");
        assert_eq!(responses, vec!["tx> 1: 103\\n\\r", "tx> 2: 080\\n\\r"]);
    }

    #[test]
    fn stop_command_suppresses_output() {
        let mut session = Session::new();
        session.handle_command("3");
        session.handle_command("sample 824 640");
        session.handle_command("4");

        let responses = session.handle_command("sample 900 700");
        assert_eq!(
            responses,
            vec!["No record emitted (selection withholds both channels)."]
        );
    }

    #[test]
    fn unknown_bytes_are_reported_but_harmless() {
        let mut session = Session::new();
        session.handle_command("3");
        session.handle_command("x");

        let responses = session.handle_command("sample 80 80");
        assert_eq!(responses.len(), 2);
    }
}
