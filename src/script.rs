//! Scripted input sessions.
//!
//! A script is a list of timed input events that is replayed into an
//! [`Emitter`] as if a user produced it:
//!
//! ```toml
//! end_ms = 5000
//!
//! [[event]]
//! at_ms = 100
//! kind = "key"
//! key = "1"
//!
//! [[event]]
//! at_ms = 400
//! kind = "click"
//! x = 120.0
//! y = 80.0
//!
//! [[event]]
//! at_ms = 900
//! kind = "button"
//! button = "save"
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use tokio::time::{Instant, sleep_until};

use crate::input::{ButtonId, Emitter, InputEvent, Target};
use crate::input::events::parse_key;

/// A timed sequence of input events.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Script {
    /// Offset at which input closes; defaults to right after the last event
    #[serde(default)]
    pub end_ms: Option<u64>,

    #[serde(default, rename = "event")]
    pub events: Vec<ScriptedEvent>,
}

/// One input event at an offset from the start of the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptedEvent {
    pub at_ms: u64,
    #[serde(flatten)]
    pub action: ScriptAction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScriptAction {
    /// Key release, e.g. `"1"` or `"S"`
    Key { key: String },
    /// Click on the canvas
    Click { x: f64, y: f64 },
    /// Pointer movement over the canvas
    Move { x: f64, y: f64 },
    /// Click on a UI button
    Button { button: ButtonId },
}

impl ScriptAction {
    pub fn to_event(&self) -> Result<InputEvent> {
        Ok(match self {
            ScriptAction::Key { key } => InputEvent::KeyUp {
                key_code: parse_key(key).ok_or_else(|| anyhow!("Unknown key {:?}", key))?,
            },
            ScriptAction::Click { x, y } => InputEvent::Click {
                target: Target::Canvas,
                x: *x,
                y: *y,
            },
            ScriptAction::Move { x, y } => InputEvent::MouseMove {
                target: Target::Canvas,
                x: *x,
                y: *y,
            },
            ScriptAction::Button { button } => InputEvent::button_click(*button),
        })
    }
}

impl Script {
    /// Reads a script, choosing TOML or JSON by file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read script from {}", path.display()))?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let script = if is_json {
            Self::from_json_str(&text)
        } else {
            Self::from_toml_str(&text)
        };
        script.with_context(|| format!("Invalid script {}", path.display()))
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let script: Script = toml::from_str(text).context("Failed to parse TOML script")?;
        script.timeline()?;
        Ok(script)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let script: Script = serde_json::from_str(text).context("Failed to parse JSON script")?;
        script.timeline()?;
        Ok(script)
    }

    /// Events with their offsets, in emission order.
    ///
    /// # Errors
    /// Fails on key names that are not a single letter or digit.
    pub fn timeline(&self) -> Result<Vec<(Duration, InputEvent)>> {
        let mut timeline = self
            .events
            .iter()
            .map(|event| {
                let input = event
                    .action
                    .to_event()
                    .with_context(|| format!("Bad event at {}ms", event.at_ms))?;
                Ok((Duration::from_millis(event.at_ms), input))
            })
            .collect::<Result<Vec<_>>>()?;
        timeline.sort_by_key(|(at, _)| *at);
        Ok(timeline)
    }

    /// Offset at which input closes.
    pub fn end(&self) -> Duration {
        let last = self.events.iter().map(|event| event.at_ms).max().unwrap_or(0);
        Duration::from_millis(self.end_ms.unwrap_or(last).max(last))
    }
}

/// Emits `timeline` into `emitter` on the runtime clock, then closes input at `end`.
///
/// Yields after every event so a session polled alongside can react before
/// the next one, even when offsets coincide.
pub async fn drive(timeline: Vec<(Duration, InputEvent)>, end: Duration, emitter: Emitter) {
    let start = Instant::now();
    info!("Driving {} scripted events", timeline.len());
    tokio::task::yield_now().await;

    for (at, event) in timeline {
        sleep_until(start + at).await;
        let delivered = emitter.emit(event);
        debug!("t+{}ms {:?} delivered: {}", at.as_millis(), event, delivered);
        tokio::task::yield_now().await;
    }

    sleep_until(start + end).await;
    emitter.close();
    info!("Script finished, input closed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::EventType;
    use futures::StreamExt;
    use std::io::Write;

    const SAMPLE: &str = r#"
end_ms = 2000

[[event]]
at_ms = 300
kind = "click"
x = 10.0
y = 20.0

[[event]]
at_ms = 100
kind = "key"
key = "1"

[[event]]
at_ms = 500
kind = "button"
button = "save"
"#;

    #[test]
    fn parses_toml_and_orders_by_offset() {
        let script = Script::from_toml_str(SAMPLE).unwrap();
        let timeline = script.timeline().unwrap();
        assert_eq!(timeline[0], (Duration::from_millis(100), InputEvent::key('1')));
        assert_eq!(
            timeline[1],
            (Duration::from_millis(300), InputEvent::canvas_click(10.0, 20.0))
        );
        assert_eq!(
            timeline[2],
            (Duration::from_millis(500), InputEvent::button_click(ButtonId::Save))
        );
        assert_eq!(script.end(), Duration::from_secs(2));
    }

    #[test]
    fn parses_json_by_extension() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"{{"event": [{{"at_ms": 5, "kind": "move", "x": 1.5, "y": 2.5}}]}}"#
        )
        .unwrap();

        let script = Script::from_path(file.path()).unwrap();
        assert_eq!(script.events[0].action, ScriptAction::Move { x: 1.5, y: 2.5 });
        assert_eq!(script.end(), Duration::from_millis(5));
    }

    #[test]
    fn rejects_unknown_keys() {
        let text = "[[event]]\nat_ms = 0\nkind = \"key\"\nkey = \"Enter\"\n";
        let err = Script::from_toml_str(text).unwrap_err();
        assert!(format!("{:#}", err).contains("Unknown key"));
    }

    #[test]
    fn end_never_precedes_last_event() {
        let script = Script {
            end_ms: Some(10),
            events: vec![ScriptedEvent {
                at_ms: 50,
                action: ScriptAction::Key { key: "x".into() },
            }],
        };
        assert_eq!(script.end(), Duration::from_millis(50));
    }

    #[tokio::test(start_paused = true)]
    async fn drive_emits_on_schedule_then_closes() {
        let emitter = Emitter::new(8);
        let mut keys = emitter.subscribe_document(EventType::KeyUp);
        let timeline = vec![
            (Duration::from_millis(100), InputEvent::key('1')),
            (Duration::from_millis(250), InputEvent::key('x')),
        ];

        let start = Instant::now();
        let driver = tokio::spawn(drive(timeline, Duration::from_millis(400), emitter.clone()));

        assert_eq!(keys.next().await.map(|e| e.value), Some(InputEvent::key('1')));
        assert_eq!(start.elapsed(), Duration::from_millis(100));
        assert_eq!(keys.next().await.map(|e| e.value), Some(InputEvent::key('X')));
        assert_eq!(start.elapsed(), Duration::from_millis(250));

        driver.await.unwrap();
        assert!(emitter.is_closed());
        assert_eq!(start.elapsed(), Duration::from_millis(400));
    }
}
