//! Committed drawing state and the session clock.

use serde::Serialize;
use tokio::time::Instant;

use crate::draw::{Instruction, TimeStamped};

/// Everything currently committed to the visible surface.
///
/// `instructions` is the log the surface is redrawn from at the start of
/// every coordinator cycle. `timeline` holds the same entries with the time
/// each shape was finished, for replay.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CanvasState {
    /// Committed instructions in draw order (first = bottom layer)
    pub instructions: Vec<Instruction>,
    /// Committed instructions with their completion timestamps
    pub timeline: Vec<TimeStamped<Instruction>>,
}

impl CanvasState {
    /// Creates an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends finished shapes on top of the existing ones.
    pub fn commit(&mut self, entries: Vec<TimeStamped<Instruction>>) {
        for entry in entries {
            self.instructions.push(entry.payload.clone());
            self.timeline.push(entry);
        }
    }

    /// Removes everything, clearing the canvas.
    pub fn clear(&mut self) {
        self.instructions.clear();
        self.timeline.clear();
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

/// Monotonic millisecond clock anchored at session start.
#[derive(Debug, Clone, Copy)]
pub struct SessionClock {
    origin: Instant,
}

impl SessionClock {
    pub fn start() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }

    /// Stamps `payload` with the current time.
    pub fn stamp<T>(&self, payload: T) -> TimeStamped<T> {
        TimeStamped::new(payload, self.now_ms())
    }
}
