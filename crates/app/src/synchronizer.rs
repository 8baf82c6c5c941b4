//! Lazy diff-push of the strips animations.

use embedded_hal::i2c::I2c;
use heapless::Vec;
use stripsync_core::{
    AnimationState, BusFault, CommandByte, Config, InputEvent, InputSource, Selector, StripIndex,
    MAX_STRIPS,
};

use crate::{bus_fault, StripSyncError, StripSyncResult};

/// Operator selection used to interpret relative events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    /// Strip affected by the animation advance.
    pub strip: StripIndex,
    /// Current animation of the selected strip, `None` if the strip is clear.
    pub animation: Option<Selector>,
}

/// Outcome of a single sync pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Commands accepted by the bus, in the order they have been written.
    pub written: Vec<CommandByte, MAX_STRIPS>,
    /// Strips that stay pending until the next pass.
    pub failed: Vec<(StripIndex, BusFault), MAX_STRIPS>,
}

impl SyncReport {
    /// Returns true if no write has been attempted.
    pub fn is_idle(&self) -> bool {
        self.written.is_empty() && self.failed.is_empty()
    }
}

/// Translates operator input into the strips state and pushes the changes to the bus.
pub struct Synchronizer<B, S> {
    bus: B,
    input: S,
    config: Config,
    state: AnimationState,
    cursor: Cursor,
}

impl<B, S> Synchronizer<B, S>
where
    B: I2c,
    S: InputSource,
{
    /// Creates a new synchronizer, the first sync pass clears every strip.
    pub fn new(bus: B, input: S, config: Config) -> StripSyncResult<Self> {
        let state = AnimationState::new(&config)?;
        Ok(Self {
            bus,
            input,
            config,
            state,
            cursor: Cursor::default(),
        })
    }

    /// Runs a single control cycle: takes at most one input event and syncs the strips.
    pub fn cycle(&mut self) -> SyncReport {
        if let Some(event) = self.input.next_event() {
            if let Err(err) = self.handle_event(event) {
                log::warn!("Ignored {:?}: {}", event, err);
            }
        }
        self.sync()
    }

    /// Applies an input event to the desired state, nothing is written to the bus.
    pub fn handle_event(&mut self, event: InputEvent) -> StripSyncResult<()> {
        match event {
            InputEvent::AdvanceAnimation => {
                let next = self.cursor.animation.map_or(Selector(0), |Selector(current)| {
                    Selector((current + 1) % self.config.animation_count)
                });
                self.state.set_desired(self.cursor.strip, next)?;
                self.cursor.animation = Some(next);
                log::trace!("Strip {} switched to animation {}", self.cursor.strip, next);
            }

            InputEvent::ClearAll => {
                self.state.clear_all();
                self.cursor = Cursor::default();
                log::info!("Clearing all {} strips", self.state.strip_count());
            }

            InputEvent::SelectStrip(strip) => {
                let selector = self.state.desired(strip)?.selector();
                self.cursor = Cursor {
                    strip,
                    animation: Some(selector).filter(|s| !self.config.is_clear(*s)),
                };
                log::trace!("Selected strip {}", strip);
            }
        }

        Ok(())
    }

    /// Writes every pending strip command to the bus in the ascending strip order.
    ///
    /// A failed write leaves the strip pending, so it will be written again on the next pass.
    pub fn sync(&mut self) -> SyncReport {
        let mut report = SyncReport::default();

        let pending = self.state.pending_changes().collect::<Vec<_, MAX_STRIPS>>();
        for (strip, command) in pending {
            match self.send(strip) {
                Ok(_) => {
                    report.written.push(command).ok();
                }
                Err(StripSyncError::BusWrite(fault)) => {
                    log::warn!("Unable to send {} to strip {}: {}", command, strip, fault);
                    report.failed.push((strip, fault)).ok();
                }
                Err(err) => log::error!("Unable to send {} to strip {}: {}", command, strip, err),
            }
        }

        report
    }

    /// Writes the desired command of a single strip and marks it applied on success.
    ///
    /// The strip is written even if it is not pending.
    pub fn send(&mut self, strip: StripIndex) -> StripSyncResult<CommandByte> {
        let command = self.state.desired(strip)?;
        self.bus
            .write(self.config.address, &[command.0])
            .map_err(|err| StripSyncError::BusWrite(bus_fault(&err)))?;
        self.state.mark_applied(strip)?;

        log::debug!("Sent {} to strip {}", command, strip);
        Ok(command)
    }

    pub fn state(&self) -> &AnimationState {
        &self.state
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    pub fn input_mut(&mut self) -> &mut S {
        &mut self.input
    }

    /// Returns the bus and the input source back to the caller.
    pub fn release(self) -> (B, S) {
        (self.bus, self.input)
    }
}
