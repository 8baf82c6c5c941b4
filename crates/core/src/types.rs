use core::{fmt::Display, num::ParseIntError, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Largest value that fits into a command byte nibble.
pub const NIBBLE_MAX: u8 = 0x0F;

/// Physical strip number on the shared bus.
#[derive(
    Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Debug, PartialOrd, Ord, Hash, Default,
)]
pub struct StripIndex(pub u8);

/// Animation pattern code, or the clear value that stops the strip.
#[derive(
    Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Debug, PartialOrd, Ord, Hash, Default,
)]
pub struct Selector(pub u8);

/// Single byte sent over the bus: the strip in the upper nibble, the selector in the lower one.
#[derive(
    Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Debug, PartialOrd, Ord, Hash, Default,
)]
pub struct CommandByte(pub u8);

impl StripIndex {
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl CommandByte {
    /// Packs the strip and the selector into a single byte.
    pub fn encode(strip: StripIndex, selector: Selector) -> Result<Self> {
        if strip.0 > NIBBLE_MAX {
            return Err(Error::StripOutOfRange);
        }
        if selector.0 > NIBBLE_MAX {
            return Err(Error::SelectorOutOfRange);
        }

        Ok(Self((strip.0 << 4) | (selector.0 & NIBBLE_MAX)))
    }

    /// Splits the byte the same way the receiving controller does.
    pub fn decode(self) -> (StripIndex, Selector) {
        (self.strip(), self.selector())
    }

    pub fn strip(self) -> StripIndex {
        StripIndex((self.0 & 0xF0) >> 4)
    }

    pub fn selector(self) -> Selector {
        Selector(self.0 & NIBBLE_MAX)
    }
}

impl From<CommandByte> for u8 {
    fn from(value: CommandByte) -> Self {
        value.0
    }
}

impl From<u8> for StripIndex {
    fn from(inner: u8) -> Self {
        Self(inner)
    }
}

impl From<u8> for Selector {
    fn from(inner: u8) -> Self {
        Self(inner)
    }
}

impl FromStr for StripIndex {
    type Err = ParseIntError;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        u8::from_str(s).map(Self)
    }
}

impl FromStr for Selector {
    type Err = ParseIntError;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        u8::from_str(s).map(Self)
    }
}

impl FromStr for CommandByte {
    type Err = ParseIntError;

    /// Accepts both decimal and `0x`-prefixed hexadecimal notation.
    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        let s = s.trim();
        match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            Some(hex) => u8::from_str_radix(hex, 16).map(Self),
            None => u8::from_str(s).map(Self),
        }
    }
}

impl Display for StripIndex {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.0.fmt(f)
    }
}

impl Display for Selector {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.0.fmt(f)
    }
}

impl Display for CommandByte {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:#04x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode_all_nibbles() {
        for strip in 0..=NIBBLE_MAX {
            for selector in 0..=NIBBLE_MAX {
                let byte = CommandByte::encode(StripIndex(strip), Selector(selector)).unwrap();
                assert_eq!(byte.decode(), (StripIndex(strip), Selector(selector)));
            }
        }
    }

    #[test]
    fn test_encode_reference_bytes() {
        let byte = CommandByte::encode(StripIndex(2), Selector(0)).unwrap();
        assert_eq!(byte, CommandByte(0x20));

        let byte = CommandByte::encode(StripIndex(3), Selector(3)).unwrap();
        assert_eq!(byte, CommandByte(0x33));
    }

    #[test]
    fn test_encode_rejects_wide_values() {
        assert_eq!(
            CommandByte::encode(StripIndex(16), Selector(0)),
            Err(Error::StripOutOfRange)
        );
        assert_eq!(
            CommandByte::encode(StripIndex(0), Selector(16)),
            Err(Error::SelectorOutOfRange)
        );
    }

    #[test]
    fn test_command_byte_from_str() {
        assert_eq!("0x23".parse::<CommandByte>(), Ok(CommandByte(0x23)));
        assert_eq!("0X1f".parse::<CommandByte>(), Ok(CommandByte(0x1F)));
        assert_eq!("35".parse::<CommandByte>(), Ok(CommandByte(35)));
        assert!("0x100".parse::<CommandByte>().is_err());
    }

    #[test]
    fn test_command_byte_display() {
        assert_eq!(CommandByte(0x03).to_string(), "0x03");
        assert_eq!(CommandByte(0x33).to_string(), "0x33");
    }
}
