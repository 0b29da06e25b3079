//! Timed replay of committed shapes.

use std::time::Duration;

use log::{debug, warn};

use crate::draw::{DrawingSurface, Instruction, RenderContext, TimeStamped};

/// Slowest supported replay speed.
pub const MIN_REPLAY_SPEED: f64 = 0.1;
/// Fastest supported replay speed.
pub const MAX_REPLAY_SPEED: f64 = 100.0;

/// Clamps `speed` to the supported range; NaN plays at recorded speed.
pub fn clamp_speed(speed: f64) -> f64 {
    let clamped = if speed.is_nan() {
        1.0
    } else {
        speed.clamp(MIN_REPLAY_SPEED, MAX_REPLAY_SPEED)
    };
    if clamped != speed {
        warn!("Invalid replay speed {}, using {}", speed, clamped);
    }
    clamped
}

/// Delay before each entry: zero for the first, then the recorded gap to the
/// previous entry divided by `speed` (clamped with [`clamp_speed`]).
pub fn replay_delays<T>(entries: &[TimeStamped<T>], speed: f64) -> Vec<Duration> {
    let speed = clamp_speed(speed);
    let mut previous: Option<u64> = None;
    entries
        .iter()
        .map(|entry| {
            let gap_ms = previous.map_or(0, |prev| entry.timestamp_ms.saturating_sub(prev));
            previous = Some(entry.timestamp_ms);
            let nanos = (gap_ms as f64 * 1_000_000.0 / speed).round();
            Duration::from_nanos(nanos as u64)
        })
        .collect()
}

/// One delayed draw of a replay.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayStep {
    pub delay: Duration,
    pub instruction: Instruction,
}

/// A chained sequence of delayed draws built from a recorded timeline.
#[derive(Debug, Clone, Default)]
pub struct ReplayPlan {
    steps: Vec<ReplayStep>,
}

impl ReplayPlan {
    pub fn new(entries: &[TimeStamped<Instruction>], speed: f64) -> Self {
        let steps = replay_delays(entries, speed)
            .into_iter()
            .zip(entries)
            .map(|(delay, entry)| ReplayStep {
                delay,
                instruction: entry.payload.clone(),
            })
            .collect();
        Self { steps }
    }

    pub fn steps(&self) -> &[ReplayStep] {
        &self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Time from start to the last draw.
    pub fn total_duration(&self) -> Duration {
        self.steps.iter().map(|step| step.delay).sum()
    }

    /// Clears the surface, then performs each step after its delay.
    ///
    /// Dropping the returned future stops the replay between steps.
    pub async fn run<C: RenderContext>(&self, surface: &mut DrawingSurface<C>) {
        debug!(
            "Replaying {} shapes over {:?}",
            self.steps.len(),
            self.total_duration()
        );
        surface.clear();
        for step in &self.steps {
            if !step.delay.is_zero() {
                tokio::time::sleep(step.delay).await;
            }
            surface.interpret(&step.instruction);
        }
    }
}
