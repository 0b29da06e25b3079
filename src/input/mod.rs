//! Input events, subscriptions and menu choices.
//!
//! This module turns discrete host events (clicks, pointer moves, key
//! releases, button clicks) into cancellable asynchronous sequences and the
//! menu choices the session coordinator dispatches on.

pub mod combinators;
pub mod controls;
pub mod emitter;
pub mod events;
pub mod menu;

// Re-export commonly used types at module level
pub use combinators::{Ordered, merge_all_ordered, merge_ordered, race, take_until};
pub use controls::{Button, Controls};
pub use emitter::{Emitter, Subscription, key_presses, wait_for_key_press};
pub use events::{ButtonId, EventType, InputEvent, Sequenced, Target};
pub use menu::{
    MenuChoice, wait_for_main_menu_choice, wait_for_menu_choice, wait_for_replay_exit,
    wait_for_tool_menu_choice,
};
