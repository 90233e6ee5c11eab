//! Mobile-style navigation for application shells.
//!
//! This crate puts an application context around the navigation core: an [`App`] owning the page
//! registry, the configuration and the overlay portal, [`alert`]s presented on that portal,
//! [`Tabs`] holding one stack per tab and the [`Content`] scroll model pages hand to their view
//! controllers. Everything from `navstack-core` is re-exported.

pub mod alert;
mod app;
mod content;
mod rect;
mod tabs;

pub use alert::{Alert, AlertButton, AlertController, AlertHandle, AlertOptions, ButtonOutcome};
pub use app::App;
pub use content::Content;
pub use navstack_core::*;
pub use navstack_core::impl_page;
pub use rect::Rect;
pub use tabs::{Tab, Tabs};
