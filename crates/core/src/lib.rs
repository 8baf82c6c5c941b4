//! Strips animation state shared between the controller and the synchronization loop.

#![cfg_attr(not(any(feature = "std", test)), no_std)]

pub use crate::{
    config::Config,
    errors::{BusFault, Error, Result},
    events::{ControllerButtons, InputEvent, InputSource},
    state::AnimationState,
    types::{CommandByte, Selector, StripIndex},
};

pub mod config;
pub mod errors;
pub mod events;
pub mod state;
pub mod types;

/// Maximum number of strips addressable by a single command byte.
pub const MAX_STRIPS: usize = 16;
