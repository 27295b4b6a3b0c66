//! Delta tracking and ASCII record formatting for the output stage.
//!
//! Each record reports the signed difference between a measurement and the
//! previous value seen on the same channel, rendered into the fixed layout
//! `<channel>: [-]<3 digits>\n\r` (for example `1: -007\n\r`). The decimal
//! field is three digits wide; a delta whose magnitude exceeds 999 saturates
//! to 999 with its sign preserved, rather than truncating as the field width
//! would otherwise force.

use heapless::Vec;

use crate::measurement::{Channel, Measurement};

/// Longest possible record: channel digit, ": ", sign, three digits, "\n\r".
pub const MAX_RECORD_LEN: usize = 9;

/// Largest delta magnitude representable in the three-digit field.
pub const DELTA_SATURATION: u16 = 999;

/// Serialized output record, ready for byte-by-byte transmission.
pub type RecordBytes = Vec<u8, MAX_RECORD_LEN>;

/// Per-channel previous-value store feeding delta computation.
///
/// Owned exclusively by the output stage; both channels start at zero, so
/// the first record on a channel reports the measurement itself.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct DeltaTracker {
    previous: [u16; 2],
}

impl DeltaTracker {
    /// Creates a tracker with both previous values at zero.
    pub const fn new() -> Self {
        Self { previous: [0; 2] }
    }

    /// Returns the last reported value for `channel`.
    pub const fn previous(&self, channel: Channel) -> u16 {
        self.previous[channel.as_index()]
    }

    /// Computes the signed delta for `measurement` and records its value as
    /// the new previous value for that channel.
    pub fn advance(&mut self, measurement: &Measurement) -> i32 {
        let slot = &mut self.previous[measurement.channel.as_index()];
        let delta = i32::from(measurement.value) - i32::from(*slot);
        *slot = measurement.value;
        delta
    }
}

/// Renders one record for `channel` carrying the given signed delta.
pub fn format_record(channel: Channel, delta: i32) -> RecordBytes {
    let mut bytes = RecordBytes::new();

    let magnitude = delta.unsigned_abs().min(u32::from(DELTA_SATURATION)) as u16;
    let hundreds = magnitude / 100;
    let tens = magnitude / 10 % 10;
    let ones = magnitude % 10;

    // Capacity covers the longest layout, so these pushes cannot fail.
    let _ = bytes.push(channel.digit());
    let _ = bytes.push(b':');
    let _ = bytes.push(b' ');
    if delta < 0 {
        let _ = bytes.push(b'-');
    }
    let _ = bytes.push(b'0' + hundreds as u8);
    let _ = bytes.push(b'0' + tens as u8);
    let _ = bytes.push(b'0' + ones as u8);
    let _ = bytes.push(b'\n');
    let _ = bytes.push(b'\r');

    bytes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measurement::Measurement;

    #[test]
    fn positive_delta_is_zero_padded() {
        let mut tracker = DeltaTracker::new();
        tracker.advance(&Measurement::new(Channel::First, 100));

        let delta = tracker.advance(&Measurement::new(Channel::First, 130));
        assert_eq!(delta, 30);
        assert_eq!(format_record(Channel::First, delta).as_slice(), b"1: 030\n\r");
    }

    #[test]
    fn negative_delta_carries_sign() {
        let mut tracker = DeltaTracker::new();
        tracker.advance(&Measurement::new(Channel::Second, 100));

        let delta = tracker.advance(&Measurement::new(Channel::Second, 85));
        assert_eq!(delta, -15);
        assert_eq!(format_record(Channel::Second, delta).as_slice(), b"2: -015\n\r");
    }

    #[test]
    fn first_record_reports_value_itself() {
        let mut tracker = DeltaTracker::new();
        let delta = tracker.advance(&Measurement::new(Channel::First, 103));
        assert_eq!(delta, 103);
        assert_eq!(format_record(Channel::First, delta).as_slice(), b"1: 103\n\r");
    }

    #[test]
    fn channels_track_independently() {
        let mut tracker = DeltaTracker::new();
        tracker.advance(&Measurement::new(Channel::First, 200));
        tracker.advance(&Measurement::new(Channel::Second, 50));

        assert_eq!(tracker.previous(Channel::First), 200);
        assert_eq!(tracker.previous(Channel::Second), 50);

        let delta = tracker.advance(&Measurement::new(Channel::Second, 60));
        assert_eq!(delta, 10);
        assert_eq!(tracker.previous(Channel::First), 200);
    }

    #[test]
    fn zero_delta_renders_all_zeros() {
        assert_eq!(format_record(Channel::First, 0).as_slice(), b"1: 000\n\r");
    }

    #[test]
    fn oversized_magnitude_saturates() {
        assert_eq!(format_record(Channel::First, 1000).as_slice(), b"1: 999\n\r");
        assert_eq!(format_record(Channel::Second, -4095).as_slice(), b"2: -999\n\r");
    }

    #[test]
    fn record_never_exceeds_capacity() {
        assert_eq!(format_record(Channel::Second, -999).len(), MAX_RECORD_LEN);
        assert_eq!(format_record(Channel::First, 999).len(), MAX_RECORD_LEN - 1);
    }
}
