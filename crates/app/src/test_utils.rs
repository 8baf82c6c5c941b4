//! Test helpers

use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, Operation, SevenBitAddress};
use heapless::{Deque, Vec};
use stripsync_core::{InputEvent, InputSource};

/// Maximum number of writes kept by the [`RecordingBus`].
pub const RECORDING_CAPACITY: usize = 256;

/// Error reported by the [`RecordingBus`] when a failure has been scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordingBusError(pub ErrorKind);

impl embedded_hal::i2c::Error for RecordingBusError {
    fn kind(&self) -> ErrorKind {
        self.0
    }
}

/// In-memory bus that records every accepted single byte write.
pub struct RecordingBus {
    writes: Vec<(u8, u8), RECORDING_CAPACITY>,
    failures: Deque<ErrorKind, 32>,
}

impl Default for RecordingBus {
    fn default() -> Self {
        Self {
            writes: Vec::new(),
            failures: Deque::new(),
        }
    }
}

impl RecordingBus {
    /// Returns `(address, byte)` pairs of every accepted write.
    pub fn writes(&self) -> &[(u8, u8)] {
        &self.writes
    }

    /// Returns the payload bytes of every accepted write.
    pub fn bytes(&self) -> impl Iterator<Item = u8> + '_ {
        self.writes.iter().map(|(_, byte)| *byte)
    }

    /// Forgets the recorded writes.
    pub fn clear(&mut self) {
        self.writes.clear();
    }

    /// Makes the next write fail with the given error kind.
    ///
    /// Several failures are consumed by the subsequent writes in the scheduling order.
    pub fn fail_next(&mut self, kind: ErrorKind) {
        self.failures
            .push_back(kind)
            .expect("too many scheduled failures");
    }
}

impl ErrorType for RecordingBus {
    type Error = RecordingBusError;
}

impl I2c<SevenBitAddress> for RecordingBus {
    fn transaction(
        &mut self,
        address: SevenBitAddress,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        if let Some(kind) = self.failures.pop_front() {
            return Err(RecordingBusError(kind));
        }

        for operation in operations {
            match operation {
                Operation::Write(bytes) => {
                    for byte in bytes.iter() {
                        self.writes
                            .push((address, *byte))
                            .expect("recording bus is full");
                    }
                }
                Operation::Read(buf) => buf.fill(0),
            }
        }
        Ok(())
    }
}

/// Input source that replays a prepared list of cycles.
pub struct ScriptedInput {
    cycles: Deque<Option<InputEvent>, 64>,
}

impl ScriptedInput {
    pub fn new<I>(events: I) -> Self
    where
        I: IntoIterator<Item = Option<InputEvent>>,
    {
        let mut input = Self {
            cycles: Deque::new(),
        };
        for event in events {
            input.push(event);
        }
        input
    }

    /// Appends a cycle, `None` stands for a cycle without any button pressed.
    pub fn push(&mut self, event: Option<InputEvent>) {
        self.cycles.push_back(event).expect("script is too long");
    }

    pub fn is_empty(&self) -> bool {
        self.cycles.is_empty()
    }
}

impl InputSource for ScriptedInput {
    fn next_event(&mut self) -> Option<InputEvent> {
        self.cycles.pop_front().flatten()
    }
}

#[test]
fn test_recording_bus_failures() {
    let mut bus = RecordingBus::default();

    bus.fail_next(ErrorKind::ArbitrationLoss);
    assert_eq!(
        bus.write(0x41, &[0x10]),
        Err(RecordingBusError(ErrorKind::ArbitrationLoss))
    );

    bus.write(0x41, &[0x11]).unwrap();
    assert_eq!(bus.writes(), &[(0x41, 0x11)]);
}
