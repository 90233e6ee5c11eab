//! Traits for renderers.

use crate::view::ViewId;
use crate::view_controller::ViewController;
use core::convert::Infallible;
use core::fmt;
use crossbeam::channel::Sender;
use std::time::Duration;

/// Direction of a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// A new view is shown on top, e.g. when pushing.
    Forward,
    /// The view beneath is revealed, e.g. when popping.
    Back,
}

/// Identifies a transition on one stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TransitionId(pub(crate) u64);

/// An animated handoff between two views at the top of a stack.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub id: TransitionId,
    /// The new top view, if the top changed to an existing view.
    pub entering: Option<ViewId>,
    /// The previous top view.
    pub leaving: Option<ViewId>,
    pub direction: Direction,
    /// If false, the renderer should swap views without animating.
    pub animate: bool,
    pub duration: Duration,
}

/// Token handed to the renderer for each transition.
///
/// The transition settles once this is finished, which may happen on another thread.
/// Dropping the token also finishes the transition, so a transition always runs to completion.
#[derive(Debug)]
pub struct TransitionDone {
    id: TransitionId,
    sender: Option<Sender<TransitionId>>,
}

impl TransitionDone {
    pub(crate) fn new(id: TransitionId, sender: Sender<TransitionId>) -> TransitionDone {
        TransitionDone {
            id,
            sender: Some(sender),
        }
    }

    pub fn id(&self) -> TransitionId {
        self.id
    }

    /// Marks the animation as finished.
    pub fn finish(mut self) {
        self.send();
    }

    fn send(&mut self) {
        if let Some(sender) = self.sender.take() {
            // the stack may be gone already
            let _ = sender.send(self.id);
        }
    }
}

impl Drop for TransitionDone {
    fn drop(&mut self) {
        self.send();
    }
}

/// A renderer capable of showing the views of a navigation stack.
///
/// Renderer failures are logged by the stack and never abort a transition.
pub trait Renderer {
    /// Error type.
    type Error: fmt::Display;

    /// Mounts a view before it enters for the first time.
    fn mount(&mut self, view: &ViewController) -> Result<(), Self::Error>;

    /// Unmounts a view after it has been removed from the stack.
    fn unmount(&mut self, view: &ViewController) -> Result<(), Self::Error>;

    /// Runs a transition and finishes `done` when it completes.
    ///
    /// Finishes immediately by default.
    fn animate(&mut self, transition: &Transition, done: TransitionDone) {
        let _ = transition;
        done.finish();
    }
}

/// A renderer that renders nothing and finishes every transition immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct Headless;

impl Renderer for Headless {
    type Error = Infallible;

    fn mount(&mut self, view: &ViewController) -> Result<(), Infallible> {
        log::trace!("mount {} ({})", view.name(), view.id());
        Ok(())
    }

    fn unmount(&mut self, view: &ViewController) -> Result<(), Infallible> {
        log::trace!("unmount {} ({})", view.name(), view.id());
        Ok(())
    }
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    type Error = R::Error;

    fn mount(&mut self, view: &ViewController) -> Result<(), Self::Error> {
        (**self).mount(view)
    }

    fn unmount(&mut self, view: &ViewController) -> Result<(), Self::Error> {
        (**self).unmount(view)
    }

    fn animate(&mut self, transition: &Transition, done: TransitionDone) {
        (**self).animate(transition, done)
    }
}
