//! Error types shared by the input and session layers.

use thiserror::Error;

/// Failures that end an interactive session.
///
/// Instructions are only ever produced by the drawing surface itself, so the
/// only recoverable-looking failure is a missing element that an operation
/// needs at the moment it runs (the canvas or one of the buttons).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Target element is not mounted: {0}")]
    EmptyTargetElement(String),
}
