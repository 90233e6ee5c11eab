//! The scrollable-content collaborator interface.
//!
//! Pages own their scrollable content; view controllers only keep a reference so that other
//! parts of the application (e.g. tab bars scrolling to the top on re-selection) can reach it.

use core::fmt;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

/// A snapshot of content measurements, in points.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ContentDimensions {
    pub content_height: f64,
    pub content_top: f64,
    pub content_bottom: f64,
    pub content_width: f64,
    pub content_left: f64,
    pub content_right: f64,
    pub scroll_height: f64,
    pub scroll_top: f64,
    pub scroll_width: f64,
    pub scroll_left: f64,
}

/// Scrollable content.
pub trait Scrollable: fmt::Debug + Send {
    /// Scrolls to the top over the given duration.
    fn scroll_to_top(&mut self, duration: Duration);

    /// Scrolls to the bottom over the given duration.
    fn scroll_to_bottom(&mut self, duration: Duration);

    /// Re-reads measurements after the content or its viewport changed size.
    fn resize(&mut self);

    fn content_dimensions(&self) -> ContentDimensions;
}

/// Shared reference to scrollable content.
pub type ContentRef = Arc<Mutex<dyn Scrollable>>;
