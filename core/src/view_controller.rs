use crate::completion::{Completion, Settled};
use crate::content::ContentRef;
use crate::nav_controller::NavHandle;
use crate::view::{Hook, LifecycleState, Page, Params, ViewId};
use core::any::Any;
use core::fmt;
use std::panic::{self, AssertUnwindSafe};

/// One entry of a navigation stack: a hosted page plus its identity, params and lifecycle state.
///
/// View controllers are not `Clone`; a view controller is owned by at most one stack, and moving
/// it onto a stack transfers ownership.
pub struct ViewController {
    id: ViewId,
    name: String,
    page: Box<dyn Page>,
    params: Params,
    state: LifecycleState,
    back_button_text: Option<String>,
    show_back_button: bool,
    content: Option<ContentRef>,
    /// The stack this view is on.
    owner: Option<NavHandle>,
    pub(crate) mounted: bool,
}

impl ViewController {
    /// Creates a detached view controller.
    pub fn new(id: ViewId, name: impl Into<String>, page: Box<dyn Page>, params: Params) -> Self {
        ViewController {
            id,
            name: name.into(),
            page,
            params,
            state: LifecycleState::Created,
            back_button_text: None,
            show_back_button: true,
            content: None,
            owner: None,
            mounted: false,
        }
    }

    pub fn id(&self) -> ViewId {
        self.id
    }

    /// The registry name of the hosted page.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn page(&self) -> &dyn Page {
        &*self.page
    }

    pub fn page_mut(&mut self) -> &mut dyn Page {
        &mut *self.page
    }

    /// Downcasts the hosted page.
    pub fn page_as<T: Any>(&self) -> Option<&T> {
        self.page.as_any().downcast_ref()
    }

    /// Downcasts the hosted page.
    pub fn page_as_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.page.as_any_mut().downcast_mut()
    }

    /// Back button text; empty until the view is put on a stack.
    pub fn back_button_text(&self) -> &str {
        self.back_button_text.as_deref().unwrap_or("")
    }

    /// Changes the back button text. Takes effect on the next render.
    pub fn set_back_button_text(&mut self, text: impl Into<String>) {
        self.back_button_text = Some(text.into());
    }

    pub fn is_back_button_shown(&self) -> bool {
        self.show_back_button
    }

    /// Toggles back button visibility, independent of its text.
    pub fn show_back_button(&mut self, show: bool) {
        self.show_back_button = show;
    }

    pub fn content(&self) -> Option<&ContentRef> {
        self.content.as_ref()
    }

    /// Sets the view’s scrollable content. Can only be set once.
    ///
    /// Returns false if content had already been set.
    pub fn set_content(&mut self, content: ContentRef) -> bool {
        if self.content.is_some() {
            log::warn!("view {} ({}) already has content", self.name, self.id);
            return false;
        }
        self.content = Some(content);
        true
    }

    /// Returns true if the view is on a stack.
    pub fn is_attached(&self) -> bool {
        self.owner.is_some()
    }

    /// Requests removal of this view from its stack through the same pipeline as a pop.
    ///
    /// Does nothing if the view is not on a stack or is not at the top of it by the time the
    /// request runs.
    pub fn dismiss(&self) -> Completion {
        match &self.owner {
            Some(owner) => owner.dismiss(self.id),
            None => Completion::ready(Ok(Settled::Unchanged)),
        }
    }

    pub(crate) fn attach(&mut self, owner: NavHandle, default_back_text: &str) {
        self.owner = Some(owner);
        if self.back_button_text.is_none() {
            self.back_button_text = Some(default_back_text.to_string());
        }
    }

    pub(crate) fn detach(&mut self) {
        self.owner = None;
    }

    /// Runs a lifecycle hook, catching and logging failures.
    pub(crate) fn fire(&mut self, hook: Hook) {
        self.state = hook.state();
        let page = &mut *self.page;
        match panic::catch_unwind(AssertUnwindSafe(|| hook.call(page))) {
            Ok(Ok(())) => (),
            Ok(Err(err)) => log::error!("{} of {} ({}) failed: {:#}", hook, self.name, self.id, err),
            Err(payload) => log::error!(
                "{} of {} ({}) panicked: {}",
                hook,
                self.name,
                self.id,
                panic_message(&*payload)
            ),
        }
        if hook == Hook::DidEnter {
            self.state = LifecycleState::Active;
        }
    }
}

impl fmt::Debug for ViewController {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ViewController")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("state", &self.state)
            .field("params", &self.params)
            .field("page", &self.page)
            .finish()
    }
}

/// Extracts the message of a caught panic.
pub fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "(no message)"
    }
}
