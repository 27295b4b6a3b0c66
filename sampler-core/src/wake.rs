//! Coalescing wake-flag set consumed by the coordinator.
//!
//! Producers (the conversion ingest path and the command interpreter) each
//! set an independent flag; the coordinator waits on the logical OR of the
//! whole set and consumes every pending flag atomically. Flags raised between
//! wait cycles coalesce: the coordinator is guaranteed at least one pending
//! wakeup, never one wakeup per raise.

/// Individual events that can wake the coordinator.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum WakeEvent {
    /// A conversion cycle finished and the handoff channel was populated.
    DataReady,
    /// Command `'1'`: forward only the first channel.
    SelectFirst,
    /// Command `'2'`: forward only the second channel.
    SelectSecond,
    /// Command `'3'`: forward both channels.
    SelectBoth,
    /// Command `'4'`: forward nothing.
    StopSending,
}

impl WakeEvent {
    /// Bit assigned to this event within a [`WakeFlags`] set.
    pub const fn mask(self) -> u8 {
        match self {
            WakeEvent::DataReady => 1 << 0,
            WakeEvent::SelectFirst => 1 << 1,
            WakeEvent::SelectSecond => 1 << 2,
            WakeEvent::SelectBoth => 1 << 3,
            WakeEvent::StopSending => 1 << 4,
        }
    }
}

/// Snapshot of pending wake events, taken atomically at wakeup.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct WakeFlags {
    bits: u8,
}

impl WakeFlags {
    /// Mask covering every defined event bit.
    pub const ALL: u8 = WakeEvent::DataReady.mask()
        | WakeEvent::SelectFirst.mask()
        | WakeEvent::SelectSecond.mask()
        | WakeEvent::SelectBoth.mask()
        | WakeEvent::StopSending.mask();

    /// Creates an empty flag set.
    pub const fn empty() -> Self {
        Self { bits: 0 }
    }

    /// Reconstructs a flag set from raw bits, discarding undefined bits.
    pub const fn from_bits(bits: u8) -> Self {
        Self {
            bits: bits & Self::ALL,
        }
    }

    /// Returns the raw bit representation.
    pub const fn bits(self) -> u8 {
        self.bits
    }

    /// Returns `true` when no event is pending.
    pub const fn is_empty(self) -> bool {
        self.bits == 0
    }

    /// Returns `true` when the given event is pending.
    pub const fn contains(self, event: WakeEvent) -> bool {
        self.bits & event.mask() != 0
    }

    /// Returns a copy with the given event marked pending.
    #[must_use]
    pub const fn with(self, event: WakeEvent) -> Self {
        Self {
            bits: self.bits | event.mask(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_are_distinct() {
        let events = [
            WakeEvent::DataReady,
            WakeEvent::SelectFirst,
            WakeEvent::SelectSecond,
            WakeEvent::SelectBoth,
            WakeEvent::StopSending,
        ];

        let mut seen = 0u8;
        for event in events {
            assert_eq!(seen & event.mask(), 0);
            seen |= event.mask();
        }
        assert_eq!(seen, WakeFlags::ALL);
    }

    #[test]
    fn coalesced_flags_report_every_event() {
        let flags = WakeFlags::empty()
            .with(WakeEvent::DataReady)
            .with(WakeEvent::SelectBoth);

        assert!(flags.contains(WakeEvent::DataReady));
        assert!(flags.contains(WakeEvent::SelectBoth));
        assert!(!flags.contains(WakeEvent::StopSending));
    }

    #[test]
    fn from_bits_drops_undefined_bits() {
        let flags = WakeFlags::from_bits(0xFF);
        assert_eq!(flags.bits(), WakeFlags::ALL);
    }
}
