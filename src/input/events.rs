//! Input event types delivered by the [`Emitter`](super::Emitter).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of event a subscription listens for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    Click,
    MouseMove,
    KeyUp,
}

/// UI affordances outside the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonId {
    DrawCircles,
    DrawMarkers,
    AddPolygon,
    Save,
    Cancel,
}

impl ButtonId {
    pub const ALL: [ButtonId; 5] = [
        ButtonId::DrawCircles,
        ButtonId::DrawMarkers,
        ButtonId::AddPolygon,
        ButtonId::Save,
        ButtonId::Cancel,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ButtonId::DrawCircles => "draw-circles",
            ButtonId::DrawMarkers => "draw-markers",
            ButtonId::AddPolygon => "add-polygon",
            ButtonId::Save => "save",
            ButtonId::Cancel => "cancel",
        }
    }
}

/// Element an event originates from or a subscription is attached to.
///
/// The document is always present; everything else has to be mounted on the
/// emitter before it can be subscribed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Document,
    Canvas,
    Button(ButtonId),
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Document => write!(f, "document"),
            Target::Canvas => write!(f, "canvas"),
            Target::Button(id) => write!(f, "button({})", id.name()),
        }
    }
}

/// A discrete input event.
///
/// Pointer events carry surface-relative coordinates; keyboard events carry
/// the key code (uppercase ASCII for letters and digits).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Click { target: Target, x: f64, y: f64 },
    MouseMove { target: Target, x: f64, y: f64 },
    KeyUp { key_code: u32 },
}

impl InputEvent {
    /// Key release for a letter or digit.
    pub fn key(key: char) -> Self {
        InputEvent::KeyUp {
            key_code: key_code(key),
        }
    }

    pub fn canvas_click(x: f64, y: f64) -> Self {
        InputEvent::Click {
            target: Target::Canvas,
            x,
            y,
        }
    }

    pub fn canvas_move(x: f64, y: f64) -> Self {
        InputEvent::MouseMove {
            target: Target::Canvas,
            x,
            y,
        }
    }

    pub fn button_click(id: ButtonId) -> Self {
        InputEvent::Click {
            target: Target::Button(id),
            x: 0.0,
            y: 0.0,
        }
    }

    pub fn event_type(&self) -> EventType {
        match self {
            InputEvent::Click { .. } => EventType::Click,
            InputEvent::MouseMove { .. } => EventType::MouseMove,
            InputEvent::KeyUp { .. } => EventType::KeyUp,
        }
    }

    /// Element the event was dispatched on. Key events go to the document.
    pub fn target(&self) -> Target {
        match self {
            InputEvent::Click { target, .. } | InputEvent::MouseMove { target, .. } => *target,
            InputEvent::KeyUp { .. } => Target::Document,
        }
    }

    pub fn position(&self) -> Option<(f64, f64)> {
        match self {
            InputEvent::Click { x, y, .. } | InputEvent::MouseMove { x, y, .. } => Some((*x, *y)),
            InputEvent::KeyUp { .. } => None,
        }
    }

    pub fn key_code(&self) -> Option<u32> {
        match self {
            InputEvent::KeyUp { key_code } => Some(*key_code),
            _ => None,
        }
    }
}

/// A value tagged with its position in emission order.
///
/// Every event an [`Emitter`](super::Emitter) delivers carries a sequence
/// number that is strictly increasing across all of its subscriptions, so
/// consumers reading separate queues can still tell which came first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sequenced<T> {
    pub seq: u64,
    pub value: T,
}

impl<T> Sequenced<T> {
    pub fn new(seq: u64, value: T) -> Self {
        Self { seq, value }
    }

    /// Replaces the value, keeping the sequence number.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Sequenced<U> {
        Sequenced {
            seq: self.seq,
            value: f(self.value),
        }
    }
}

/// Key code of a letter or digit key (case-insensitive).
pub fn key_code(key: char) -> u32 {
    key.to_ascii_uppercase() as u32
}

/// Parses a key name such as `"1"`, `"r"` or `"S"` into its key code.
pub fn parse_key(name: &str) -> Option<u32> {
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphanumeric() => Some(key_code(c)),
        _ => None,
    }
}
