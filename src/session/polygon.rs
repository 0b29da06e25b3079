//! Interactive polygon builder used by the polygon drawing mode.

use std::pin::pin;

use futures::{FutureExt, StreamExt};
use log::debug;

use super::state::SessionClock;
use crate::draw::{DrawingSurface, Instruction, RenderContext, TimeStamped};
use crate::input::{InputEvent, MenuChoice, Sequenced, Subscription, merge_ordered, take_until};

/// Vertices needed before a click can close the polygon.
pub const MIN_VERTICES: usize = 3;

/// In-progress polygon: committed vertices plus the last closed candidate.
#[derive(Debug, Default)]
pub struct PolygonSession {
    coords: Vec<(f64, f64)>,
    closed: Option<TimeStamped<Instruction>>,
}

impl PolygonSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn coords(&self) -> &[(f64, f64)] {
        &self.coords
    }

    /// Last finalized closed polygon, if at least [`MIN_VERTICES`] were placed.
    pub fn closed(&self) -> Option<&TimeStamped<Instruction>> {
        self.closed.as_ref()
    }

    /// Commits a vertex and redraws `base` plus the polygon so far.
    ///
    /// From the third vertex on, every click replaces the stored closed
    /// candidate with a freshly filled one.
    pub fn add_vertex<C: RenderContext>(
        &mut self,
        surface: &mut DrawingSurface<C>,
        base: &[Instruction],
        clock: &SessionClock,
        point: (f64, f64),
    ) {
        self.coords.push(point);
        surface.redraw(base);
        if self.coords.len() >= MIN_VERTICES {
            let fill = surface.random_fill();
            let polygon = surface.closed_polygon(&self.coords, fill);
            self.closed = Some(clock.stamp(polygon));
        } else {
            surface.polygon_preview(&self.coords, None);
        }
        debug!("Polygon vertex {} at {:?}", self.coords.len(), point);
    }

    /// Redraws `base`, the closed candidate if any, and the open outline
    /// through `candidate`.
    ///
    /// Ignored until the first vertex exists.
    pub fn preview<C: RenderContext>(
        &self,
        surface: &mut DrawingSurface<C>,
        base: &[Instruction],
        candidate: (f64, f64),
    ) {
        if self.coords.is_empty() {
            return;
        }
        surface.redraw(base);
        if let Some(closed) = &self.closed {
            surface.interpret(&closed.payload);
        }
        surface.polygon_preview(&self.coords, Some(candidate));
    }

    /// What the mode yields for the given tool-menu outcome.
    pub fn finish(self, choice: Option<MenuChoice>) -> Option<Vec<TimeStamped<Instruction>>> {
        match (choice, self.closed) {
            (Some(MenuChoice::Save), Some(polygon)) => Some(vec![polygon]),
            _ => None,
        }
    }
}

/// Runs the polygon builder until `choice` resolves.
///
/// Clicks and moves are handled in the order they were emitted, including
/// those still queued when the choice arrives. Both subscriptions live for
/// the whole session and are released on return.
pub async fn draw_polygon<C, F>(
    surface: &mut DrawingSurface<C>,
    base: &[Instruction],
    clock: &SessionClock,
    clicks: Subscription,
    moves: Subscription,
    choice: F,
) -> Option<Vec<TimeStamped<Instruction>>>
where
    C: RenderContext,
    F: Future<Output = Option<Sequenced<MenuChoice>>>,
{
    let choice = choice.shared();
    let mut session = PolygonSession::new();
    {
        let mut inputs = pin!(take_until(choice.clone(), merge_ordered(clicks, moves)));
        while let Some(input) = inputs.next().await {
            match input.value {
                InputEvent::Click { x, y, .. } => session.add_vertex(surface, base, clock, (x, y)),
                InputEvent::MouseMove { x, y, .. } => session.preview(surface, base, (x, y)),
                InputEvent::KeyUp { .. } => {}
            }
        }
    }

    let outcome = choice.await.map(|choice| choice.value);
    session.finish(outcome)
}
