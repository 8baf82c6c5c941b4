use displaydoc::Display;
use serde::{Deserialize, Serialize};

/// A specialized result type for the strip synchronization.
pub type Result<T> = core::result::Result<T, Error>;

/// Reasons the bus refused a single byte write.
#[derive(Clone, Copy, PartialEq, Eq, Display, Debug, Serialize, Deserialize)]
pub enum BusFault {
    /// The peripheral did not acknowledge its address.
    Unreachable,
    /// Another controller won the bus arbitration.
    ArbitrationLost,
    // `embedded-hal` has no timeout error kind, only adapters with their own bus timeout report it.
    /// The write did not complete in time.
    Timeout,
    /// Unspecified bus error.
    Other,
}

/// Errors that can occur while driving the strips.
#[derive(Clone, Copy, PartialEq, Eq, Display, Debug, Serialize, Deserialize)]
pub enum Error {
    /// The strip index is outside of the configured strips range.
    StripOutOfRange,
    /// The animation selector does not fit into the command byte.
    SelectorOutOfRange,
    /// The configuration is inconsistent.
    InvalidConfig,
    /// Unable to write a command to the bus: {0}
    BusWrite(BusFault),
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            Error::BusWrite(BusFault::Unreachable).to_string(),
            "Unable to write a command to the bus: The peripheral did not acknowledge its address."
        );
        assert_eq!(
            Error::StripOutOfRange.to_string(),
            "The strip index is outside of the configured strips range."
        );
    }
}
