use crate::view::ViewId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, NavError>;

/// Errors surfaced by navigation operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavError {
    /// The view could not be resolved to a constructible page.
    #[error("invalid view: {0}")]
    InvalidView(String),

    #[error("index {index} is out of bounds for a stack of {len} views")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("no view with id {0}")]
    UnknownView(ViewId),

    /// An overlay was presented a second time.
    #[error("view {0} has already been presented")]
    AlreadyPresented(ViewId),

    /// The stack was dropped before the operation could run.
    #[error("navigation stack has been destroyed")]
    Destroyed,

    #[error("config: {0}")]
    Config(String),
}
