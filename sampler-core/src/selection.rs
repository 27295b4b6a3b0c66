//! Channel selection policy and command interpretation.
//!
//! The selection state decides which channels the coordinator forwards to the
//! output stage. It is owned exclusively by the coordinator; command input
//! only raises wake flags, and the coordinator folds those flags into a new
//! state through [`resolve_selection`]. Keeping the resolution a pure
//! function over the flag set avoids the races an if-chain mutating shared
//! state would invite under flag coalescing.

use crate::measurement::Channel;
use crate::wake::{WakeEvent, WakeFlags};

/// Currently active channel-forwarding policy.
///
/// Level-set, not edge-triggered: the state persists across trigger cycles
/// until a new selection command overwrites it.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum SelectionState {
    /// Initial state; nothing is forwarded.
    #[default]
    None,
    First,
    Second,
    Both,
}

impl SelectionState {
    /// Returns `true` when measurements from `channel` should be forwarded.
    pub const fn forwards(self, channel: Channel) -> bool {
        match self {
            SelectionState::None => false,
            SelectionState::First => matches!(channel, Channel::First),
            SelectionState::Second => matches!(channel, Channel::Second),
            SelectionState::Both => true,
        }
    }
}

/// Folds pending selection signals into the next selection state.
///
/// Returns `None` when no selection signal is pending, leaving the current
/// state untouched. Each input byte maps to exactly one signal, so in
/// practice at most one flag is set per wake cycle; when coalescing stacks
/// several, the priority StopSending > SelectBoth > SelectSecond >
/// SelectFirst picks the winner deterministically.
pub const fn resolve_selection(flags: WakeFlags) -> Option<SelectionState> {
    if flags.contains(WakeEvent::StopSending) {
        Some(SelectionState::None)
    } else if flags.contains(WakeEvent::SelectBoth) {
        Some(SelectionState::Both)
    } else if flags.contains(WakeEvent::SelectSecond) {
        Some(SelectionState::Second)
    } else if flags.contains(WakeEvent::SelectFirst) {
        Some(SelectionState::First)
    } else {
        None
    }
}

/// Maps one input-link byte to the wake event it raises.
///
/// Unrecognized bytes are ignored without error, per the input protocol.
pub const fn interpret_command(byte: u8) -> Option<WakeEvent> {
    match byte {
        b'1' => Some(WakeEvent::SelectFirst),
        b'2' => Some(WakeEvent::SelectSecond),
        b'3' => Some(WakeEvent::SelectBoth),
        b'4' => Some(WakeEvent::StopSending),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_forwards_nothing() {
        let state = SelectionState::default();
        assert!(!state.forwards(Channel::First));
        assert!(!state.forwards(Channel::Second));
    }

    #[test]
    fn each_command_byte_maps_to_one_signal() {
        assert_eq!(interpret_command(b'1'), Some(WakeEvent::SelectFirst));
        assert_eq!(interpret_command(b'2'), Some(WakeEvent::SelectSecond));
        assert_eq!(interpret_command(b'3'), Some(WakeEvent::SelectBoth));
        assert_eq!(interpret_command(b'4'), Some(WakeEvent::StopSending));
    }

    #[test]
    fn unrecognized_bytes_are_ignored() {
        assert_eq!(interpret_command(b'0'), None);
        assert_eq!(interpret_command(b'5'), None);
        assert_eq!(interpret_command(b'\n'), None);
        assert_eq!(interpret_command(0xFF), None);
    }

    #[test]
    fn resolution_leaves_state_alone_without_signals() {
        let flags = WakeFlags::empty().with(WakeEvent::DataReady);
        assert_eq!(resolve_selection(flags), None);
    }

    #[test]
    fn stop_wins_over_every_selection() {
        let flags = WakeFlags::empty()
            .with(WakeEvent::SelectFirst)
            .with(WakeEvent::SelectSecond)
            .with(WakeEvent::SelectBoth)
            .with(WakeEvent::StopSending);
        assert_eq!(resolve_selection(flags), Some(SelectionState::None));
    }

    #[test]
    fn both_wins_over_single_channel_selections() {
        let flags = WakeFlags::empty()
            .with(WakeEvent::SelectFirst)
            .with(WakeEvent::SelectBoth);
        assert_eq!(resolve_selection(flags), Some(SelectionState::Both));

        let flags = WakeFlags::empty()
            .with(WakeEvent::SelectSecond)
            .with(WakeEvent::SelectBoth);
        assert_eq!(resolve_selection(flags), Some(SelectionState::Both));
    }

    #[test]
    fn second_wins_over_first() {
        let flags = WakeFlags::empty()
            .with(WakeEvent::SelectFirst)
            .with(WakeEvent::SelectSecond);
        assert_eq!(resolve_selection(flags), Some(SelectionState::Second));
    }

    #[test]
    fn single_signals_resolve_directly() {
        for (event, expected) in [
            (WakeEvent::SelectFirst, SelectionState::First),
            (WakeEvent::SelectSecond, SelectionState::Second),
            (WakeEvent::SelectBoth, SelectionState::Both),
            (WakeEvent::StopSending, SelectionState::None),
        ] {
            let flags = WakeFlags::empty().with(event);
            assert_eq!(resolve_selection(flags), Some(expected));
        }
    }
}
