//! Alerts.
//!
//! An alert is a small modal page presented on the application’s overlay portal. Create one
//! through an [`AlertController`] (see [`App::alert_controller`](crate::App::alert_controller)),
//! present it, and route button clicks through [`App::click_alert_button`](crate::App).

use navstack_core::{
    impl_page, panic_message, Completion, HookResult, NavError, NavHandle, NavOptions, Params,
    Result, Settled, ViewController, ViewId,
};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

/// Registry-style name of alert views on the portal.
pub const ALERT_VIEW: &str = "alert";

/// Role given to a dismissal by the backdrop or the hardware back button.
pub const BACKDROP_ROLE: &str = "backdrop";

/// What an alert should do after a button handler ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonOutcome {
    /// Dismiss the alert (the default).
    Dismiss,
    /// Keep the alert on screen.
    Stay,
}

impl From<bool> for ButtonOutcome {
    fn from(dismiss: bool) -> Self {
        if dismiss {
            ButtonOutcome::Dismiss
        } else {
            ButtonOutcome::Stay
        }
    }
}

impl From<()> for ButtonOutcome {
    fn from(_: ()) -> Self {
        ButtonOutcome::Dismiss
    }
}

pub type ButtonHandler = Box<dyn FnMut(&AlertHandle) -> ButtonOutcome + Send>;
pub type DismissHandler = Box<dyn FnOnce(Option<&str>) + Send>;

/// An alert button.
pub struct AlertButton {
    text: String,
    role: Option<String>,
    handler: Option<ButtonHandler>,
}

impl AlertButton {
    pub fn new(text: impl Into<String>) -> AlertButton {
        AlertButton {
            text: text.into(),
            role: None,
            handler: None,
        }
    }

    /// Sets the button role (e.g. `cancel`), which is passed to the dismiss callback.
    pub fn with_role(mut self, role: impl Into<String>) -> AlertButton {
        self.role = Some(role.into());
        self
    }

    /// Sets the click handler.
    ///
    /// Returning `false` keeps the alert open; returning `true` or nothing dismisses it.
    pub fn with_handler<F, O>(mut self, mut handler: F) -> AlertButton
    where
        F: FnMut(&AlertHandle) -> O + Send + 'static,
        O: Into<ButtonOutcome>,
    {
        self.handler = Some(Box::new(move |alert| handler(alert).into()));
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn role(&self) -> Option<&str> {
        self.role.as_deref()
    }
}

impl From<&str> for AlertButton {
    fn from(text: &str) -> Self {
        AlertButton::new(text)
    }
}

impl fmt::Debug for AlertButton {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("AlertButton")
            .field("text", &self.text)
            .field("role", &self.role)
            .field("handler", &self.handler.is_some())
            .finish()
    }
}

/// Alert contents and behavior.
pub struct AlertOptions {
    pub title: Option<String>,
    pub sub_title: Option<String>,
    pub message: Option<String>,
    pub buttons: Vec<AlertButton>,
    /// Whether tapping the backdrop (or the hardware back button) dismisses the alert.
    pub enable_backdrop_dismiss: bool,
    /// Called once the alert is gone, with the role of the button that dismissed it.
    pub on_dismiss: Option<DismissHandler>,
}

impl Default for AlertOptions {
    fn default() -> Self {
        AlertOptions {
            title: None,
            sub_title: None,
            message: None,
            buttons: Vec::new(),
            enable_backdrop_dismiss: true,
            on_dismiss: None,
        }
    }
}

impl AlertOptions {
    pub fn new() -> AlertOptions {
        AlertOptions::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn sub_title(mut self, sub_title: impl Into<String>) -> Self {
        self.sub_title = Some(sub_title.into());
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Appends a button.
    pub fn button(mut self, button: impl Into<AlertButton>) -> Self {
        self.buttons.push(button.into());
        self
    }

    pub fn backdrop_dismiss(mut self, enabled: bool) -> Self {
        self.enable_backdrop_dismiss = enabled;
        self
    }

    pub fn on_dismiss<F>(mut self, handler: F) -> Self
    where
        F: FnOnce(Option<&str>) + Send + 'static,
    {
        self.on_dismiss = Some(Box::new(handler));
        self
    }
}

impl fmt::Debug for AlertOptions {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("AlertOptions")
            .field("title", &self.title)
            .field("sub_title", &self.sub_title)
            .field("message", &self.message)
            .field("buttons", &self.buttons)
            .field("enable_backdrop_dismiss", &self.enable_backdrop_dismiss)
            .finish()
    }
}

/// A handle to a presented alert, given to button handlers.
#[derive(Debug, Clone)]
pub struct AlertHandle {
    id: ViewId,
    portal: NavHandle,
}

impl AlertHandle {
    pub(crate) fn new(id: ViewId, portal: NavHandle) -> AlertHandle {
        AlertHandle { id, portal }
    }

    pub fn id(&self) -> ViewId {
        self.id
    }

    /// Dismisses the alert. Does nothing if it is already gone.
    pub fn dismiss(&self) -> Completion {
        self.portal.dismiss(self.id)
    }
}

/// The page presented on the portal for an alert.
pub struct AlertPage {
    title: Option<String>,
    sub_title: Option<String>,
    message: Option<String>,
    buttons: Vec<AlertButton>,
    enable_backdrop_dismiss: bool,
    on_dismiss: Option<DismissHandler>,
    /// Role of whatever dismissed the alert.
    role: Option<String>,
    dismissing: bool,
}

impl AlertPage {
    fn new(options: AlertOptions) -> AlertPage {
        AlertPage {
            title: options.title,
            sub_title: options.sub_title,
            message: options.message,
            buttons: options.buttons,
            enable_backdrop_dismiss: options.enable_backdrop_dismiss,
            on_dismiss: options.on_dismiss,
            role: None,
            dismissing: false,
        }
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn sub_title(&self) -> Option<&str> {
        self.sub_title.as_deref()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn buttons(&self) -> &[AlertButton] {
        &self.buttons
    }

    pub fn is_backdrop_dismiss_enabled(&self) -> bool {
        self.enable_backdrop_dismiss
    }

    /// Returns true once a dismissal has been requested by a button or the backdrop.
    pub fn is_dismissing(&self) -> bool {
        self.dismissing
    }

    /// Runs a button’s handler and dismisses the alert unless the handler says otherwise.
    ///
    /// Returns the dismissal’s completion, if the alert is being dismissed.
    pub(crate) fn click(&mut self, index: usize, alert: &AlertHandle) -> Result<Option<Completion>> {
        let len = self.buttons.len();
        let button = self
            .buttons
            .get_mut(index)
            .ok_or(NavError::IndexOutOfBounds { index, len })?;
        if self.dismissing {
            log::debug!("alert {} is already being dismissed", alert.id());
            return Ok(None);
        }

        let role = button.role.clone();
        let outcome = match &mut button.handler {
            Some(handler) => match panic::catch_unwind(AssertUnwindSafe(|| handler(alert))) {
                Ok(outcome) => outcome,
                Err(payload) => {
                    log::error!(
                        "handler of alert button `{}` panicked: {}",
                        button.text,
                        panic_message(&*payload)
                    );
                    ButtonOutcome::Dismiss
                }
            },
            None => ButtonOutcome::Dismiss,
        };

        match outcome {
            ButtonOutcome::Stay => Ok(None),
            ButtonOutcome::Dismiss => Ok(Some(self.dismiss_with(role, alert))),
        }
    }

    /// Dismisses the alert with the backdrop role, if enabled.
    pub(crate) fn tap_backdrop(&mut self, alert: &AlertHandle) -> Option<Completion> {
        if !self.enable_backdrop_dismiss || self.dismissing {
            return None;
        }
        Some(self.dismiss_with(Some(BACKDROP_ROLE.into()), alert))
    }

    fn dismiss_with(&mut self, role: Option<String>, alert: &AlertHandle) -> Completion {
        self.role = role;
        self.dismissing = true;
        alert.dismiss()
    }
}

impl_page! {
    AlertPage;
    // a dismissal requested while covered by another overlay never removed the alert
    fn will_enter(&mut self) -> HookResult {
        if self.dismissing {
            log::debug!("alert was not dismissed while covered; accepting input again");
            self.dismissing = false;
            self.role = None;
        }
        Ok(())
    }
    fn did_unload(&mut self) -> HookResult {
        if let Some(on_dismiss) = self.on_dismiss.take() {
            on_dismiss(self.role.as_deref());
        }
        Ok(())
    }
}

impl fmt::Debug for AlertPage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("AlertPage")
            .field("title", &self.title)
            .field("buttons", &self.buttons)
            .field("role", &self.role)
            .field("dismissing", &self.dismissing)
            .finish()
    }
}

/// Creates alerts for an application’s overlay portal.
#[derive(Debug, Clone)]
pub struct AlertController {
    portal: NavHandle,
}

impl AlertController {
    pub(crate) fn new(portal: NavHandle) -> AlertController {
        AlertController { portal }
    }

    /// Builds an alert without presenting it.
    pub fn create(&self, options: AlertOptions) -> Alert {
        let id = ViewId::new();
        let page = AlertPage::new(options);
        Alert {
            handle: AlertHandle::new(id, self.portal.clone()),
            view: Some(ViewController::new(
                id,
                ALERT_VIEW,
                Box::new(page),
                Params::new(),
            )),
        }
    }
}

/// An alert that may or may not have been presented yet.
#[derive(Debug)]
pub struct Alert {
    handle: AlertHandle,
    /// The view controller, until it is handed to the portal.
    view: Option<ViewController>,
}

impl Alert {
    pub fn id(&self) -> ViewId {
        self.handle.id
    }

    pub fn handle(&self) -> AlertHandle {
        self.handle.clone()
    }

    pub fn is_presented(&self) -> bool {
        self.view.is_none()
    }

    /// Queues the alert on the portal. It appears on the next poll of the application.
    ///
    /// Fails if the alert was already presented.
    pub fn present(&mut self, opts: NavOptions) -> Result<Completion> {
        match self.view.take() {
            Some(view) => Ok(self.handle.portal.push_view(view, opts)),
            None => Err(NavError::AlreadyPresented(self.id())),
        }
    }

    /// Dismisses the alert. Idempotent; an alert that was never presented settles unchanged.
    pub fn dismiss(&self) -> Completion {
        if self.view.is_some() {
            return Completion::ready(Ok(Settled::Unchanged));
        }
        self.handle.dismiss()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn button_outcomes() {
        assert_eq!(ButtonOutcome::from(false), ButtonOutcome::Stay);
        assert_eq!(ButtonOutcome::from(true), ButtonOutcome::Dismiss);
        assert_eq!(ButtonOutcome::from(()), ButtonOutcome::Dismiss);
    }

    #[test]
    fn options_builder() {
        let options = AlertOptions::new()
            .title("Delete?")
            .message("This cannot be undone.")
            .button(AlertButton::new("Cancel").with_role("cancel"))
            .button("Delete");
        assert_eq!(options.title.as_deref(), Some("Delete?"));
        assert_eq!(options.sub_title, None);
        assert_eq!(options.buttons.len(), 2);
        assert_eq!(options.buttons[0].role(), Some("cancel"));
        assert_eq!(options.buttons[1].text(), "Delete");
        assert!(options.enable_backdrop_dismiss);
    }
}
