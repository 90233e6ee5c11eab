//! Navigation core.
//!
//! # Conceptual overview
//! Navstack manages the navigation of a mobile-style application shell: stacks of pages that
//! slide in on top of each other, overlays presented above everything else, and the lifecycle
//! notifications pages receive while all of that happens. It doesn’t render anything itself.
//!
//! ## Pages and view controllers
//! A page is whatever component the application wants to show full-screen. Pages are registered
//! by name in a [`Registry`] and constructed when pushed. Each page on a stack is wrapped in a
//! [`ViewController`], which owns it along with its id, the params it was pushed with, its
//! lifecycle state and some navigation bar state like the back button text.
//!
//! ## Navigation stacks
//! A [`NavController`] owns an ordered stack of view controllers; index 0 is the root and the
//! last one is the active view. Stack mutations (push, pop, insert, remove, set root, set pages)
//! are run as transitions between the old and the new top view. Only one transition runs at a
//! time; anything requested in the meantime is queued and applied in request order once the
//! running transition settles. Each operation returns a [`Completion`] that fires when it has
//! settled.
//!
//! Pages usually can’t borrow the stack they are on, so they navigate through a [`NavHandle`]
//! instead. Handle operations go into the same queue.
//!
//! ## Lifecycle
//! For a single transition, hooks always fire in this order:
//!
//! 1. `will_leave` on the leaving view
//! 2. `will_enter` on the entering view
//! 3. (the animation runs)
//! 4. `did_enter` on the entering view
//! 5. `did_leave` on the leaving view
//! 6. `will_unload`, `did_unload`, `on_destroy` on the leaving view, if it was removed
//!
//! Views that are removed without ever being on top only receive step 6. A hook that fails is
//! logged and skipped.
//!
//! ## Renderers
//! To get views on screen, a stack talks to a [`Renderer`]: it mounts views before they first
//! enter, runs the animation for each transition, and unmounts views once they are destroyed.
//! Renderers report the end of an animation through a [`TransitionDone`] token, possibly from
//! another thread; the stack picks that up in [`NavController::poll`].

mod backend;
mod completion;
mod config;
mod content;
mod error;
mod nav_controller;
mod registry;
#[macro_use]
mod view;
mod view_controller;

pub use backend::{Direction, Headless, Renderer, Transition, TransitionDone, TransitionId};
pub use completion::{Completion, Settled};
pub use config::Config;
pub use content::{ContentDimensions, ContentRef, Scrollable};
pub use error::{NavError, Result};
pub use nav_controller::{NavController, NavEvent, NavHandle, NavOptions, StackKind};
pub use registry::Registry;
pub use view::{Blank, Hook, HookResult, LifecycleState, Page, PageContext, Params, ViewId};
pub use view_controller::{panic_message, ViewController};
