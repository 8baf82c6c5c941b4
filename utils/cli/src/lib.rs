use std::{convert::Infallible, num::ParseIntError};

use anyhow::bail;
use embedded_hal::i2c::{ErrorType, I2c, Operation, SevenBitAddress};
use stripsync_core::{CommandByte, Config, InputEvent, InputSource, StripIndex};
use tokio::sync::mpsc::{error::TryRecvError, UnboundedReceiver};

/// Parses a byte written either in decimal or in `0x` hexadecimal notation.
pub fn parse_u8(s: &str) -> Result<u8, ParseIntError> {
    s.parse::<CommandByte>().map(u8::from)
}

/// Parses a single stdin line into an input event.
///
/// Accepted tokens: `a` or `advance`, `c` or `clear`, and a strip number to select it.
/// A blank line yields no event.
pub fn parse_event(line: &str) -> anyhow::Result<Option<InputEvent>> {
    let token = line.trim().to_ascii_lowercase();
    let event = match token.as_str() {
        "" => return Ok(None),
        "a" | "advance" => InputEvent::AdvanceAnimation,
        "c" | "clear" => InputEvent::ClearAll,
        other => match other.parse::<StripIndex>() {
            Ok(strip) => InputEvent::SelectStrip(strip),
            Err(_) => bail!("Unknown command: {other}"),
        },
    };
    Ok(Some(event))
}

/// Human readable meaning of the command byte, as the strips controller understands it.
pub fn describe(command: CommandByte, config: &Config) -> String {
    let (strip, selector) = command.decode();
    if config.is_clear(selector) {
        format!("strip {strip}: clear")
    } else {
        format!("strip {strip}: animation {selector}")
    }
}

/// Bus that only logs the commands instead of sending them to the hardware.
pub struct DryRunBus {
    config: Config,
    writes: usize,
}

impl DryRunBus {
    pub fn new(config: Config) -> Self {
        Self { config, writes: 0 }
    }

    /// Returns the total number of written bytes.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl ErrorType for DryRunBus {
    type Error = Infallible;
}

impl I2c<SevenBitAddress> for DryRunBus {
    fn transaction(
        &mut self,
        address: SevenBitAddress,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        for operation in operations {
            if let Operation::Write(bytes) = operation {
                for byte in bytes.iter() {
                    let command = CommandByte(*byte);
                    log::info!(
                        "[{:#04x}] <- {} ({})",
                        address,
                        command,
                        describe(command, &self.config)
                    );
                    self.writes += 1;
                }
            }
        }
        Ok(())
    }
}

/// Input source fed by the stdin reader task.
pub struct ChannelInput {
    events: UnboundedReceiver<InputEvent>,
    closed: bool,
}

impl ChannelInput {
    pub fn new(events: UnboundedReceiver<InputEvent>) -> Self {
        Self {
            events,
            closed: false,
        }
    }

    /// Returns true once the sender is gone and every queued event has been taken.
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl InputSource for ChannelInput {
    fn next_event(&mut self) -> Option<InputEvent> {
        match self.events.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.closed = true;
                None
            }
        }
    }
}
