//! Mode state machine driving an interactive drawing session.
//!
//! The [`Coordinator`] loops: redraw the committed log, wait for a main-menu
//! choice, run the chosen mode and commit whatever it yields. All waiting is
//! cooperative; nothing runs in parallel except the background click logger
//! and the explicit races inside each mode.

mod polygon;
mod replay;
mod state;

pub use polygon::{MIN_VERTICES, PolygonSession, draw_polygon};
pub use replay::{
    MAX_REPLAY_SPEED, MIN_REPLAY_SPEED, ReplayPlan, ReplayStep, clamp_speed, replay_delays,
};
pub use state::{CanvasState, SessionClock};

use std::convert::Infallible;
use std::pin::pin;

use futures::future::Either;
use futures::{FutureExt, StreamExt};
use log::{debug, info};
use tokio::sync::watch;

use crate::config::Config;
use crate::draw::{DrawingSurface, Instruction, RenderContext, TimeStamped};
use crate::error::SessionError;
use crate::input::{
    Controls, Emitter, EventType, MenuChoice, Subscription, Target, race, take_until,
    wait_for_main_menu_choice, wait_for_menu_choice, wait_for_replay_exit,
    wait_for_tool_menu_choice,
};

/// Which part of the session currently owns input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    MainMenu,
    DrawCircles,
    DrawMarkers,
    DrawPolygon,
    Clearing,
    Replaying,
}

/// Capabilities the coordinator works against. Each can be swapped in tests.
pub struct SessionDependencies<C> {
    pub surface: DrawingSurface<C>,
    pub emitter: Emitter,
    pub controls: Controls,
}

/// Shapes a click-driven drawing mode produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClickShape {
    Circle,
    Marker,
}

type Drawn = Option<Vec<TimeStamped<Instruction>>>;

pub struct Coordinator<C> {
    surface: DrawingSurface<C>,
    emitter: Emitter,
    controls: Controls,
    state: CanvasState,
    clock: SessionClock,
    replay_speed: f64,
    mode: watch::Sender<Mode>,
    /// Choice that ended a replay, dispatched instead of waiting at the menu.
    pending: Option<MenuChoice>,
}

impl<C: RenderContext> Coordinator<C> {
    pub fn new(deps: SessionDependencies<C>, config: &Config) -> Self {
        Self {
            surface: deps.surface,
            emitter: deps.emitter,
            controls: deps.controls,
            state: CanvasState::new(),
            clock: SessionClock::start(),
            replay_speed: config.replay.speed,
            mode: watch::Sender::new(Mode::MainMenu),
            pending: None,
        }
    }

    pub fn mode(&self) -> Mode {
        *self.mode.borrow()
    }

    /// Receiver that observes every mode transition.
    pub fn subscribe_mode(&self) -> watch::Receiver<Mode> {
        self.mode.subscribe()
    }

    pub fn state(&self) -> &CanvasState {
        &self.state
    }

    pub fn surface(&self) -> &DrawingSurface<C> {
        &self.surface
    }

    pub fn into_parts(self) -> (CanvasState, DrawingSurface<C>) {
        (self.state, self.surface)
    }

    /// Runs the session until input closes.
    ///
    /// # Errors
    /// Returns [`SessionError::EmptyTargetElement`] if the canvas or a
    /// button is missing when a mode needs it.
    pub async fn run(&mut self) -> Result<(), SessionError> {
        self.controls.exit_tool_menu()?;
        let clicks = self
            .emitter
            .subscribe(EventType::Click, Some(Target::Canvas))?;
        info!("Drawing session started");

        let result = tokio::select! {
            biased;
            result = self.run_loop() => result,
            never = log_clicks(clicks) => match never {},
        };
        info!("Drawing session ended with {} shapes", self.state.len());
        result
    }

    async fn run_loop(&mut self) -> Result<(), SessionError> {
        loop {
            self.set_mode(Mode::MainMenu);
            self.surface.redraw(&self.state.instructions);

            let choice = match self.pending.take() {
                Some(choice) => Some(choice),
                None => wait_for_main_menu_choice(&self.emitter, &self.controls)?
                    .await
                    .map(|choice| choice.value),
            };
            let Some(choice) = choice else {
                debug!("Input closed at main menu");
                return Ok(());
            };

            if let Some(entries) = self.dispatch(choice).await? {
                debug!("Committing {} shapes", entries.len());
                self.state.commit(entries);
            }
        }
    }

    async fn dispatch(&mut self, choice: MenuChoice) -> Result<Drawn, SessionError> {
        match choice {
            MenuChoice::Circles => {
                self.set_mode(Mode::DrawCircles);
                self.controls.enter_tool_menu()?;
                let drawn = self.draw_shapes(ClickShape::Circle).await;
                self.controls.exit_tool_menu()?;
                drawn
            }
            MenuChoice::Markers => {
                self.set_mode(Mode::DrawMarkers);
                self.controls.enter_tool_menu()?;
                let drawn = self.draw_shapes(ClickShape::Marker).await;
                self.controls.exit_tool_menu()?;
                drawn
            }
            MenuChoice::Polygon => {
                self.set_mode(Mode::DrawPolygon);
                self.controls.enter_tool_menu()?;
                let drawn = self.draw_polygon().await;
                self.controls.exit_tool_menu()?;
                drawn
            }
            MenuChoice::Cancel => {
                self.set_mode(Mode::Clearing);
                self.state.clear();
                Ok(None)
            }
            MenuChoice::Replay => {
                self.set_mode(Mode::Replaying);
                self.pending = self.replay().await?;
                Ok(None)
            }
            MenuChoice::Save => Ok(None),
        }
    }

    /// Draws one shape per canvas click until Save or Cancel.
    async fn draw_shapes(&mut self, shape: ClickShape) -> Result<Drawn, SessionError> {
        let clicks = self
            .emitter
            .subscribe(EventType::Click, Some(Target::Canvas))?;
        let choice = wait_for_tool_menu_choice(&self.emitter, &self.controls)?.shared();

        let mut drawn = Vec::new();
        {
            let mut positions = pin!(take_until(choice.clone(), clicks));
            while let Some(event) = positions.next().await {
                let Some((x, y)) = event.value.position() else {
                    continue;
                };
                let instruction = match shape {
                    ClickShape::Circle => self.surface.random_circle(x, y).0,
                    ClickShape::Marker => self.surface.marker(x, y),
                };
                debug!("Drew {:?} at ({}, {})", shape, x, y);
                drawn.push(self.clock.stamp(instruction));
            }
        }

        let choice = choice.await.map(|choice| choice.value);
        info!("{:?} mode finished with {:?} after {} shapes", shape, choice, drawn.len());
        Ok(match choice {
            Some(MenuChoice::Save) => Some(drawn),
            _ => None,
        })
    }

    async fn draw_polygon(&mut self) -> Result<Drawn, SessionError> {
        let clicks = self
            .emitter
            .subscribe(EventType::Click, Some(Target::Canvas))?;
        let moves = self
            .emitter
            .subscribe(EventType::MouseMove, Some(Target::Canvas))?;
        let choice = wait_for_tool_menu_choice(&self.emitter, &self.controls)?;

        let drawn = draw_polygon(
            &mut self.surface,
            &self.state.instructions,
            &self.clock,
            clicks,
            moves,
            choice,
        )
        .await;
        info!("Polygon mode finished, closed polygon kept: {}", drawn.is_some());
        Ok(drawn)
    }

    /// Replays the committed timeline until a mode key or button ends it.
    ///
    /// `R` restarts an in-flight replay or starts another once it finished.
    /// Returns the choice that ended the replay, or `None` if input closed.
    async fn replay(&mut self) -> Result<Option<MenuChoice>, SessionError> {
        let plan = ReplayPlan::new(&self.state.timeline, self.replay_speed);
        let mut exit = pin!(wait_for_replay_exit(&self.emitter, &self.controls)?);

        loop {
            info!("Replaying {} shapes", plan.steps().len());
            let restart = wait_for_menu_choice(&self.emitter, &[MenuChoice::Replay]);
            match race(exit.as_mut(), race(restart, plan.run(&mut self.surface))).await {
                Either::Left(choice) => return Ok(choice.map(|choice| choice.value)),
                Either::Right(Either::Left(Some(_))) => {
                    debug!("Replay restarted");
                    continue;
                }
                Either::Right(Either::Left(None)) => return Ok(None),
                Either::Right(Either::Right(())) => {}
            }

            let again = wait_for_menu_choice(&self.emitter, &[MenuChoice::Replay]);
            match race(exit.as_mut(), again).await {
                Either::Left(choice) => return Ok(choice.map(|choice| choice.value)),
                Either::Right(Some(_)) => continue,
                Either::Right(None) => return Ok(None),
            }
        }
    }

    fn set_mode(&self, mode: Mode) {
        let previous = self.mode.send_replace(mode);
        if previous != mode {
            info!("Mode {:?} -> {:?}", previous, mode);
        }
    }
}

/// Logs every canvas click for as long as the session runs.
async fn log_clicks(mut clicks: Subscription) -> Infallible {
    while let Some(event) = clicks.next().await {
        debug!("Canvas click #{} at {:?}", event.seq, event.value.position());
    }
    futures::future::pending().await
}
