//! UI buttons around the drawing surface.

use super::emitter::{Emitter, Subscription};
use super::events::{ButtonId, EventType, Target};
use crate::error::SessionError;

/// Handle to one external button.
#[derive(Clone)]
pub struct Button {
    id: ButtonId,
    emitter: Emitter,
}

impl Button {
    pub fn new(id: ButtonId, emitter: Emitter) -> Self {
        Self { id, emitter }
    }

    pub fn id(&self) -> ButtonId {
        self.id
    }

    fn target(&self) -> Target {
        Target::Button(self.id)
    }

    /// One event per click while the button is enabled.
    pub fn clicks(&self) -> Result<Subscription, SessionError> {
        self.emitter.subscribe(EventType::Click, Some(self.target()))
    }

    pub fn enable(&self) -> Result<(), SessionError> {
        self.emitter.set_enabled(self.target(), true)
    }

    pub fn disable(&self) -> Result<(), SessionError> {
        self.emitter.set_enabled(self.target(), false)
    }

    pub fn is_enabled(&self) -> bool {
        self.emitter.is_enabled(self.target())
    }
}

/// The five buttons of the board: three mode selectors plus Save and Cancel.
#[derive(Clone)]
pub struct Controls {
    pub draw_circles: Button,
    pub draw_markers: Button,
    pub add_polygon: Button,
    pub save: Button,
    pub cancel: Button,
}

impl Controls {
    /// Handles for buttons that are (or will be) mounted on `emitter`.
    pub fn new(emitter: &Emitter) -> Self {
        let button = |id| Button::new(id, emitter.clone());
        Self {
            draw_circles: button(ButtonId::DrawCircles),
            draw_markers: button(ButtonId::DrawMarkers),
            add_polygon: button(ButtonId::AddPolygon),
            save: button(ButtonId::Save),
            cancel: button(ButtonId::Cancel),
        }
    }

    /// Mounts all five buttons on `emitter` and returns their handles.
    pub fn mount(emitter: &Emitter) -> Self {
        for id in ButtonId::ALL {
            emitter.mount(Target::Button(id));
        }
        Self::new(emitter)
    }

    pub fn mode_buttons(&self) -> [&Button; 3] {
        [&self.draw_circles, &self.draw_markers, &self.add_polygon]
    }

    /// Disables mode selection and offers Save/Cancel.
    pub fn enter_tool_menu(&self) -> Result<(), SessionError> {
        for button in self.mode_buttons() {
            button.disable()?;
        }
        self.save.enable()?;
        self.cancel.enable()
    }

    /// Restores mode selection and withdraws Save/Cancel.
    pub fn exit_tool_menu(&self) -> Result<(), SessionError> {
        for button in self.mode_buttons() {
            button.enable()?;
        }
        self.save.disable()?;
        self.cancel.disable()
    }
}
