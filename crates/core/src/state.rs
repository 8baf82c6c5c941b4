//! Desired and applied animation of every strip.

use heapless::Vec;

use crate::{
    types::{CommandByte, Selector, StripIndex},
    Config, Error, Result, MAX_STRIPS,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct StripSlot {
    desired: CommandByte,
    // `None` means the strip state is unknown and the desired command must be pushed.
    applied: Option<CommandByte>,
}

impl StripSlot {
    fn is_pending(&self) -> bool {
        self.applied != Some(self.desired)
    }
}

/// Per-strip bookkeeping of what the operator wants and what the bus has already received.
///
/// Every configured strip always has both entries, the storage is allocated once for the
/// whole session.
#[derive(Debug, Clone)]
pub struct AnimationState {
    slots: Vec<StripSlot, MAX_STRIPS>,
    clear_selector: Selector,
}

impl AnimationState {
    /// Creates a state in the cleared configuration, so the first sync pushes a clear command
    /// to every strip.
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;

        let mut slots = Vec::new();
        for strip in config.strips() {
            let slot = StripSlot {
                desired: CommandByte::encode(strip, config.clear())?,
                applied: None,
            };
            slots.push(slot).map_err(|_| Error::InvalidConfig)?;
        }

        Ok(Self {
            slots,
            clear_selector: config.clear(),
        })
    }

    pub fn strip_count(&self) -> usize {
        self.slots.len()
    }

    fn slot(&self, strip: StripIndex) -> Result<&StripSlot> {
        self.slots
            .get(strip.as_usize())
            .ok_or(Error::StripOutOfRange)
    }

    fn slot_mut(&mut self, strip: StripIndex) -> Result<&mut StripSlot> {
        self.slots
            .get_mut(strip.as_usize())
            .ok_or(Error::StripOutOfRange)
    }

    /// Sets the desired animation of the strip, the applied side stays untouched.
    pub fn set_desired(&mut self, strip: StripIndex, selector: Selector) -> Result<()> {
        let command = CommandByte::encode(strip, selector)?;
        self.slot_mut(strip)?.desired = command;
        Ok(())
    }

    /// Requests the clear command on every strip and forgets what was applied.
    pub fn clear_all(&mut self) {
        let clear = self.clear_selector;
        for (index, slot) in self.slots.iter_mut().enumerate() {
            // The strip count is bounded by `MAX_STRIPS`, so the index always fits into a nibble.
            slot.desired = CommandByte(((index as u8) << 4) | clear.0);
            slot.applied = None;
        }
    }

    /// Returns strips whose desired command has not been applied yet, in ascending order.
    ///
    /// The iterator borrows the state, a fresh call recomputes the changes.
    pub fn pending_changes(&self) -> impl Iterator<Item = (StripIndex, CommandByte)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_pending())
            .map(|(index, slot)| (StripIndex(index as u8), slot.desired))
    }

    /// Records that the desired command of the strip has been written to the bus.
    pub fn mark_applied(&mut self, strip: StripIndex) -> Result<()> {
        let slot = self.slot_mut(strip)?;
        slot.applied = Some(slot.desired);
        Ok(())
    }

    pub fn desired(&self, strip: StripIndex) -> Result<CommandByte> {
        self.slot(strip).map(|slot| slot.desired)
    }

    /// Returns the last command written for the strip, if it is known.
    pub fn applied(&self, strip: StripIndex) -> Result<Option<CommandByte>> {
        self.slot(strip).map(|slot| slot.applied)
    }

    /// Returns true if there is nothing left to push.
    pub fn is_synced(&self) -> bool {
        self.slots.iter().all(|slot| !slot.is_pending())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending(state: &AnimationState) -> std::vec::Vec<(u8, u8)> {
        state
            .pending_changes()
            .map(|(strip, command)| (strip.0, command.0))
            .collect()
    }

    #[test]
    fn test_new_state_is_cleared() {
        let state = AnimationState::new(&Config::default()).unwrap();

        assert_eq!(state.strip_count(), 4);
        assert_eq!(
            pending(&state),
            [(0, 0x03), (1, 0x13), (2, 0x23), (3, 0x33)]
        );
        assert_eq!(state.applied(StripIndex(0)), Ok(None));
    }

    #[test]
    fn test_set_desired_does_not_touch_applied() {
        let mut state = AnimationState::new(&Config::default()).unwrap();
        for strip in 0..4 {
            state.mark_applied(StripIndex(strip)).unwrap();
        }
        assert!(state.is_synced());

        state.set_desired(StripIndex(1), Selector(2)).unwrap();
        assert_eq!(state.applied(StripIndex(1)), Ok(Some(CommandByte(0x13))));
        assert_eq!(state.desired(StripIndex(1)), Ok(CommandByte(0x12)));
        assert_eq!(pending(&state), [(1, 0x12)]);
    }

    #[test]
    fn test_setting_applied_value_again_is_not_pending() {
        let mut state = AnimationState::new(&Config::default()).unwrap();
        state.set_desired(StripIndex(0), Selector(1)).unwrap();
        state.mark_applied(StripIndex(0)).unwrap();

        state.set_desired(StripIndex(0), Selector(1)).unwrap();
        assert!(pending(&state).iter().all(|(strip, _)| *strip != 0));
    }

    #[test]
    fn test_clear_all_forces_every_strip() {
        let mut state = AnimationState::new(&Config::default()).unwrap();
        for strip in 0..4 {
            state.mark_applied(StripIndex(strip)).unwrap();
        }
        // Already cleared strips must receive the clear command anyway.
        state.clear_all();
        assert_eq!(pending(&state).len(), 4);
        assert!(!state.is_synced());
    }

    #[test]
    fn test_zero_command_is_pushed() {
        // The strip 0 animation 0 command is 0x00, it must be pushed on a fresh state.
        let mut state = AnimationState::new(&Config::default()).unwrap();
        state.set_desired(StripIndex(0), Selector(0)).unwrap();
        assert_eq!(pending(&state)[0], (0, 0x00));
    }

    #[test]
    fn test_out_of_range_strips() {
        let mut state = AnimationState::new(&Config::default()).unwrap();

        assert_eq!(
            state.set_desired(StripIndex(4), Selector(0)),
            Err(Error::StripOutOfRange)
        );
        assert_eq!(
            state.mark_applied(StripIndex(7)),
            Err(Error::StripOutOfRange)
        );
        assert_eq!(
            state.set_desired(StripIndex(0), Selector(16)),
            Err(Error::SelectorOutOfRange)
        );
        assert_eq!(state.desired(StripIndex(4)), Err(Error::StripOutOfRange));
    }
}
