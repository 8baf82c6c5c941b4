//! Strips synchronization loop
//!
//! This crate pushes operator selected animations to the LED strips controller over a shared
//! bus, writing only the strips whose animation has changed.

#![cfg_attr(not(any(feature = "std", test)), no_std)]
// Linter configuration
#![warn(unsafe_code, clippy::pedantic, clippy::use_self)]
// Too many false positives.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::missing_const_for_fn
)]

pub use stripsync_core as core;
use stripsync_core::BusFault;
pub use stripsync_core::{Error as StripSyncError, Result as StripSyncResult};

pub use crate::synchronizer::{Cursor, SyncReport, Synchronizer};

mod synchronizer;
#[cfg(any(test, feature = "std"))]
pub mod test_utils;

/// Classifies an `embedded-hal` bus error.
pub fn bus_fault<E: embedded_hal::i2c::Error>(err: &E) -> BusFault {
    use embedded_hal::i2c::ErrorKind;

    match err.kind() {
        ErrorKind::NoAcknowledge(_) => BusFault::Unreachable,
        ErrorKind::ArbitrationLoss => BusFault::ArbitrationLost,
        _ => BusFault::Other,
    }
}
