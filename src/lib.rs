//! Interactive drawing board with timed replay.
//!
//! The board records every drawing operation as an [`draw::Instruction`],
//! lets the user draw circles, markers and polygons through a small menu
//! state machine ([`session::Coordinator`]), and can replay the committed
//! drawing at a configurable speed.

pub mod config;
pub mod draw;
pub mod error;
pub mod input;
pub mod script;
pub mod session;

pub use config::Config;
pub use error::SessionError;
