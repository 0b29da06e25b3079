//! Main menu and tool menu choice waiters.
//!
//! A choice can arrive from the keyboard or from a button; both paths resolve
//! to the same [`MenuChoice`], so downstream dispatch cannot tell them apart.

use futures::StreamExt;
use futures::stream::LocalBoxStream;
use log::debug;

use super::combinators::merge_all_ordered;
use super::controls::{Button, Controls};
use super::emitter::{Emitter, key_presses, wait_for_key_press};
use super::events::{ButtonId, Sequenced, key_code};
use crate::error::SessionError;

/// Normalized menu choice token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuChoice {
    /// `1`: draw circles
    Circles,
    /// `2`: draw markers
    Markers,
    /// `3`: draw a polygon
    Polygon,
    /// `R`: replay the committed drawing
    Replay,
    /// `X`: clear at the main menu, discard in the tool menu
    Cancel,
    /// `S`: commit (tool menu only)
    Save,
}

impl MenuChoice {
    /// Choices offered by the main menu.
    pub const MAIN: [MenuChoice; 5] = [
        MenuChoice::Circles,
        MenuChoice::Markers,
        MenuChoice::Polygon,
        MenuChoice::Replay,
        MenuChoice::Cancel,
    ];

    /// Choices offered while a drawing mode is active.
    pub const TOOL: [MenuChoice; 2] = [MenuChoice::Save, MenuChoice::Cancel];

    /// Choices that end a replay and are dispatched next.
    pub const REPLAY_EXIT: [MenuChoice; 4] = [
        MenuChoice::Circles,
        MenuChoice::Markers,
        MenuChoice::Polygon,
        MenuChoice::Cancel,
    ];

    pub fn token(self) -> char {
        match self {
            MenuChoice::Circles => '1',
            MenuChoice::Markers => '2',
            MenuChoice::Polygon => '3',
            MenuChoice::Replay => 'R',
            MenuChoice::Cancel => 'X',
            MenuChoice::Save => 'S',
        }
    }

    pub fn key_code(self) -> u32 {
        key_code(self.token())
    }

    pub fn from_token(token: char) -> Option<Self> {
        match token.to_ascii_uppercase() {
            '1' => Some(MenuChoice::Circles),
            '2' => Some(MenuChoice::Markers),
            '3' => Some(MenuChoice::Polygon),
            'R' => Some(MenuChoice::Replay),
            'X' => Some(MenuChoice::Cancel),
            'S' => Some(MenuChoice::Save),
            _ => None,
        }
    }

    /// Maps a key code back to its choice.
    pub fn from_key_code(code: u32) -> Option<Self> {
        char::from_u32(code).and_then(Self::from_token)
    }

    /// Button offering the same choice, if any.
    pub fn button(self) -> Option<ButtonId> {
        match self {
            MenuChoice::Circles => Some(ButtonId::DrawCircles),
            MenuChoice::Markers => Some(ButtonId::DrawMarkers),
            MenuChoice::Polygon => Some(ButtonId::AddPolygon),
            MenuChoice::Save => Some(ButtonId::Save),
            MenuChoice::Cancel => Some(ButtonId::Cancel),
            MenuChoice::Replay => None,
        }
    }
}

/// Resolves with the first key press among `choices`, or `None` once input ends.
pub fn wait_for_menu_choice(
    emitter: &Emitter,
    choices: &[MenuChoice],
) -> impl Future<Output = Option<Sequenced<MenuChoice>>> + 'static + use<> {
    let codes: Vec<u32> = choices.iter().map(|choice| choice.key_code()).collect();
    let key = wait_for_key_press(emitter, &codes);
    async move {
        key.await
            .and_then(|key| MenuChoice::from_key_code(key.value).map(|choice| key.map(|_| choice)))
    }
}

/// Waits for one of `keys`, or a click on one of `buttons`.
///
/// Every subscription is taken before this returns. When several inputs are
/// already queued the earliest emitted one decides. Resolves to `None` once
/// input ends.
fn wait_for_choice(
    emitter: &Emitter,
    keys: &[MenuChoice],
    buttons: &[(&Button, MenuChoice)],
) -> Result<impl Future<Output = Option<Sequenced<MenuChoice>>> + 'static + use<>, SessionError> {
    let codes: Vec<u32> = keys.iter().map(|choice| choice.key_code()).collect();
    let mut sources: Vec<LocalBoxStream<'static, Sequenced<MenuChoice>>> = vec![
        key_presses(emitter, &codes)
            .filter_map(|key| {
                let choice = MenuChoice::from_key_code(key.value).map(|choice| key.map(|_| choice));
                futures::future::ready(choice)
            })
            .boxed_local(),
    ];
    for &(button, choice) in buttons {
        let clicks = button.clicks()?;
        sources.push(clicks.map(move |click| click.map(|_| choice)).boxed_local());
    }

    let mut choices = merge_all_ordered(sources);
    Ok(async move {
        let choice = choices.next().await;
        debug!("Menu choice: {:?}", choice.map(|choice| choice.value));
        choice
    })
}

/// Waits for `1`, `2`, `3`, `R` or `X`, or a click on one of the mode buttons.
///
/// All subscriptions are taken before this returns and released when the
/// returned future completes or is dropped.
pub fn wait_for_main_menu_choice(
    emitter: &Emitter,
    controls: &Controls,
) -> Result<impl Future<Output = Option<Sequenced<MenuChoice>>> + 'static + use<>, SessionError> {
    wait_for_choice(emitter, &MenuChoice::MAIN, &mode_buttons(controls))
}

/// Waits for `S` or `X`, or a click on Save or Cancel.
pub fn wait_for_tool_menu_choice(
    emitter: &Emitter,
    controls: &Controls,
) -> Result<impl Future<Output = Option<Sequenced<MenuChoice>>> + 'static + use<>, SessionError> {
    wait_for_choice(
        emitter,
        &MenuChoice::TOOL,
        &[
            (&controls.save, MenuChoice::Save),
            (&controls.cancel, MenuChoice::Cancel),
        ],
    )
}

/// Waits for a mode key (`1`, `2`, `3`, `X`) or a mode button while a replay runs.
pub fn wait_for_replay_exit(
    emitter: &Emitter,
    controls: &Controls,
) -> Result<impl Future<Output = Option<Sequenced<MenuChoice>>> + 'static + use<>, SessionError> {
    wait_for_choice(emitter, &MenuChoice::REPLAY_EXIT, &mode_buttons(controls))
}

fn mode_buttons(controls: &Controls) -> [(&Button, MenuChoice); 3] {
    [
        (&controls.draw_circles, MenuChoice::Circles),
        (&controls.draw_markers, MenuChoice::Markers),
        (&controls.add_polygon, MenuChoice::Polygon),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::events::{InputEvent, Target};

    fn mounted() -> (Emitter, Controls) {
        let emitter = Emitter::new(8);
        emitter.mount(Target::Canvas);
        let controls = Controls::mount(&emitter);
        (emitter, controls)
    }

    async fn value(
        choice: impl Future<Output = Option<Sequenced<MenuChoice>>>,
    ) -> Option<MenuChoice> {
        choice.await.map(|choice| choice.value)
    }

    #[test]
    fn tokens_round_trip_through_key_codes() {
        for choice in MenuChoice::MAIN.iter().chain(MenuChoice::TOOL.iter()) {
            assert_eq!(MenuChoice::from_key_code(choice.key_code()), Some(*choice));
        }
        assert_eq!(MenuChoice::from_token('r'), Some(MenuChoice::Replay));
        assert_eq!(MenuChoice::from_token('q'), None);
    }

    #[tokio::test]
    async fn keyboard_and_button_yield_same_main_choice() {
        let (emitter, controls) = mounted();

        let by_key = wait_for_main_menu_choice(&emitter, &controls).unwrap();
        emitter.emit(InputEvent::key('1'));
        let by_key = value(by_key).await;

        let by_button = wait_for_main_menu_choice(&emitter, &controls).unwrap();
        emitter.emit(InputEvent::button_click(ButtonId::DrawCircles));
        let by_button = value(by_button).await;

        assert_eq!(by_key, Some(MenuChoice::Circles));
        assert_eq!(by_key, by_button);
    }

    #[tokio::test]
    async fn keyboard_and_button_yield_same_tool_choice() {
        let (emitter, controls) = mounted();
        controls.enter_tool_menu().unwrap();

        let by_key = wait_for_tool_menu_choice(&emitter, &controls).unwrap();
        emitter.emit(InputEvent::key('s'));
        let by_key = value(by_key).await;

        let by_button = wait_for_tool_menu_choice(&emitter, &controls).unwrap();
        emitter.emit(InputEvent::button_click(ButtonId::Save));
        let by_button = value(by_button).await;

        assert_eq!(by_key, Some(MenuChoice::Save));
        assert_eq!(by_key, by_button);
    }

    #[tokio::test]
    async fn tool_menu_ignores_main_menu_keys() {
        let (emitter, controls) = mounted();
        controls.enter_tool_menu().unwrap();

        let choice = wait_for_tool_menu_choice(&emitter, &controls).unwrap();
        emitter.emit(InputEvent::key('1'));
        emitter.emit(InputEvent::key('r'));
        emitter.emit(InputEvent::button_click(ButtonId::Cancel));
        assert_eq!(value(choice).await, Some(MenuChoice::Cancel));
    }

    #[tokio::test]
    async fn earliest_queued_input_wins() {
        let (emitter, controls) = mounted();
        controls.enter_tool_menu().unwrap();

        let choice = wait_for_tool_menu_choice(&emitter, &controls).unwrap();
        emitter.emit(InputEvent::button_click(ButtonId::Cancel));
        emitter.emit(InputEvent::key('s'));
        let choice = choice.await.unwrap();
        assert_eq!(choice.value, MenuChoice::Cancel);
        assert_eq!(choice.seq, 1);
    }

    #[tokio::test]
    async fn mode_buttons_end_a_replay() {
        let (emitter, controls) = mounted();
        let exit = wait_for_replay_exit(&emitter, &controls).unwrap();
        emitter.emit(InputEvent::key('r'));
        emitter.emit(InputEvent::button_click(ButtonId::AddPolygon));
        assert_eq!(value(exit).await, Some(MenuChoice::Polygon));
    }

    #[tokio::test]
    async fn waiters_outlive_their_arguments() {
        let (emitter, controls) = mounted();
        let (by_key, by_menu) = {
            let choices = vec![MenuChoice::Replay];
            let local = emitter.clone();
            let by_key = wait_for_menu_choice(&local, &choices);
            let by_menu = wait_for_main_menu_choice(&local, &controls.clone()).unwrap();
            (by_key, by_menu)
        };
        emitter.emit(InputEvent::key('r'));
        assert_eq!(value(by_key).await, Some(MenuChoice::Replay));
        assert_eq!(value(by_menu).await, Some(MenuChoice::Replay));
    }

    #[tokio::test]
    async fn waiters_release_all_subscriptions() {
        let (emitter, controls) = mounted();
        let choice = wait_for_main_menu_choice(&emitter, &controls).unwrap();
        assert_eq!(emitter.listener_count(), 4);
        emitter.emit(InputEvent::key('3'));
        assert_eq!(value(choice).await, Some(MenuChoice::Polygon));
        assert_eq!(emitter.listener_count(), 0);
    }

    #[tokio::test]
    async fn closed_input_resolves_to_none() {
        let (emitter, controls) = mounted();
        let choice = wait_for_main_menu_choice(&emitter, &controls).unwrap();
        emitter.close();
        assert_eq!(choice.await, None);
    }
}
