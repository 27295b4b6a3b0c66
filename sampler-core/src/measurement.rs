//! Measurement model shared by firmware and host targets.
//!
//! A trigger cycle converts the two analog inputs back to back and yields one
//! [`Measurement`] per channel. Raw conversions arrive with 12 bits of
//! resolution; only the upper 9 bits are kept for reporting, matching the
//! three-digit decimal field on the output link.

/// Number of low-order raw bits discarded when a conversion is ingested.
pub const SAMPLE_SHIFT: u32 = 3;

/// Significant bits retained in a [`Measurement`] value.
pub const SAMPLE_BITS: u32 = 9;

/// Largest value a measurement can carry after the shift.
pub const SAMPLE_MAX: u16 = (1 << SAMPLE_BITS) - 1;

/// Identifies one of the two fixed sampling channels.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Channel {
    First,
    Second,
}

impl Channel {
    /// Deterministic index for per-channel storage such as delta tracking.
    pub const fn as_index(self) -> usize {
        match self {
            Channel::First => 0,
            Channel::Second => 1,
        }
    }

    /// ASCII digit used for this channel in output records.
    pub const fn digit(self) -> u8 {
        match self {
            Channel::First => b'1',
            Channel::Second => b'2',
        }
    }
}

/// One converted sample, immutable after creation.
///
/// Ownership moves through the handoff channel to the coordinator and, when
/// the selection policy admits the channel, onward to the output stage.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Measurement {
    pub channel: Channel,
    pub value: u16,
}

impl Measurement {
    /// Constructs a measurement from an already-shifted value.
    pub const fn new(channel: Channel, value: u16) -> Self {
        Self { channel, value }
    }

    /// Ingests a raw conversion result, keeping the upper [`SAMPLE_BITS`] bits.
    pub const fn from_raw(channel: Channel, raw: u16) -> Self {
        Self {
            channel,
            value: raw >> SAMPLE_SHIFT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_raw_discards_low_bits() {
        let m = Measurement::from_raw(Channel::First, 824);
        assert_eq!(m.value, 103);

        let m = Measurement::from_raw(Channel::Second, 640);
        assert_eq!(m.value, 80);
    }

    #[test]
    fn full_scale_raw_fits_nine_bits() {
        let m = Measurement::from_raw(Channel::First, 0x0FFF);
        assert_eq!(m.value, SAMPLE_MAX);
    }

    #[test]
    fn channel_digits_match_wire_format() {
        assert_eq!(Channel::First.digit(), b'1');
        assert_eq!(Channel::Second.digit(), b'2');
    }
}
