use serde::{Deserialize, Serialize};

use crate::{
    types::{Selector, StripIndex, NIBBLE_MAX},
    Error, Result, MAX_STRIPS,
};

/// Default peripheral address of the strips controller.
pub const DEFAULT_ADDRESS: u8 = 0x41;
/// Number of strips wired to the reference controller.
pub const DEFAULT_STRIP_COUNT: u8 = 4;
/// Number of animations known by the reference controller.
pub const DEFAULT_ANIMATION_COUNT: u8 = 3;

/// Strips synchronization settings, fixed for the whole session.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// The number of strips driven by the peripheral.
    pub strip_count: u8,
    /// The number of animations, selectors `0..animation_count` are valid animations.
    pub animation_count: u8,
    /// Selector that stops animation on a strip, must lie outside of the animations range.
    pub clear_selector: u8,
    /// 7-bit bus address of the peripheral.
    pub address: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            strip_count: DEFAULT_STRIP_COUNT,
            animation_count: DEFAULT_ANIMATION_COUNT,
            clear_selector: DEFAULT_ANIMATION_COUNT,
            address: DEFAULT_ADDRESS,
        }
    }
}

impl Config {
    /// Checks that every value fits into the command byte and the bus addressing.
    pub fn validate(&self) -> Result<()> {
        let strips_ok = self.strip_count >= 1 && self.strip_count as usize <= MAX_STRIPS;
        let animations_ok = self.animation_count >= 1 && self.animation_count <= NIBBLE_MAX;
        let clear_ok =
            self.clear_selector >= self.animation_count && self.clear_selector <= NIBBLE_MAX;

        if strips_ok && animations_ok && clear_ok && self.address <= 0x7F {
            Ok(())
        } else {
            Err(Error::InvalidConfig)
        }
    }

    pub fn clear(&self) -> Selector {
        Selector(self.clear_selector)
    }

    /// Returns true if the selector stands for the clear command rather than an animation.
    pub fn is_clear(&self, selector: Selector) -> bool {
        selector.0 >= self.animation_count
    }

    /// Iterates over every configured strip in ascending order.
    pub fn strips(&self) -> impl Iterator<Item = StripIndex> {
        (0..self.strip_count).map(StripIndex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        config.validate().unwrap();
        assert_eq!(config.clear(), Selector(3));
        assert_eq!(config.address, 0x41);
    }

    #[test]
    fn test_config_rejects_clear_inside_animations() {
        let config = Config {
            clear_selector: 2,
            ..Config::default()
        };
        assert_eq!(config.validate(), Err(Error::InvalidConfig));
    }

    #[test]
    fn test_config_bounds() {
        let too_many_strips = Config {
            strip_count: 17,
            ..Config::default()
        };
        assert_eq!(too_many_strips.validate(), Err(Error::InvalidConfig));

        let no_strips = Config {
            strip_count: 0,
            ..Config::default()
        };
        assert_eq!(no_strips.validate(), Err(Error::InvalidConfig));

        let wide_address = Config {
            address: 0x80,
            ..Config::default()
        };
        assert_eq!(wide_address.validate(), Err(Error::InvalidConfig));

        let full = Config {
            strip_count: 16,
            animation_count: 15,
            clear_selector: 15,
            address: 0x7F,
        };
        full.validate().unwrap();
    }
}
