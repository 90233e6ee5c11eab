use crate::alert::{AlertController, AlertHandle, AlertPage};
use navstack_core::{
    Completion, Config, Headless, NavController, NavError, NavOptions, Params, Registry, Renderer,
    Result, ViewController, ViewId,
};
use std::sync::Arc;

/// The application context.
///
/// Owns the page registry, the configuration and the overlay portal. Navigation outlets are
/// created through it so they share the same registry and configuration.
pub struct App<R: Renderer = Headless> {
    registry: Arc<Registry>,
    config: Config,
    portal: NavController<R>,
}

impl App<Headless> {
    /// Creates an application whose portal isn’t rendered anywhere.
    pub fn headless(registry: Registry, config: Config) -> App<Headless> {
        App::new(registry, config, Headless)
    }
}

impl<R: Renderer> App<R> {
    /// Creates a new application context; `renderer` renders the overlay portal.
    pub fn new(registry: Registry, config: Config, renderer: R) -> App<R> {
        let registry = Arc::new(registry);
        let portal = NavController::portal(Arc::clone(&registry), config.clone(), renderer);
        App {
            registry,
            config,
            portal,
        }
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The overlay portal.
    pub fn portal(&self) -> &NavController<R> {
        &self.portal
    }

    pub fn portal_mut(&mut self) -> &mut NavController<R> {
        &mut self.portal
    }

    /// Creates a navigation outlet with the given root view.
    pub fn create_nav<N: Renderer>(
        &self,
        root: &str,
        params: Params,
        renderer: N,
    ) -> Result<NavController<N>> {
        NavController::with_root(
            Arc::clone(&self.registry),
            self.config.clone(),
            renderer,
            root,
            params,
        )
    }

    pub fn alert_controller(&self) -> AlertController {
        AlertController::new(self.portal.handle())
    }

    fn alert_mut(&mut self, id: ViewId) -> Result<(&mut AlertPage, AlertHandle)> {
        let handle = AlertHandle::new(id, self.portal.handle());
        let page = self
            .portal
            .find_mut(id)
            .and_then(ViewController::page_as_mut::<AlertPage>)
            .ok_or(NavError::UnknownView(id))?;
        Ok((page, handle))
    }

    /// Clicks a button of a presented alert.
    ///
    /// Returns the completion of the resulting dismissal, if the alert is being dismissed.
    pub fn click_alert_button(&mut self, id: ViewId, index: usize) -> Result<Option<Completion>> {
        let (page, handle) = self.alert_mut(id)?;
        let completion = page.click(index, &handle)?;
        self.portal.poll();
        Ok(completion)
    }

    /// Taps the backdrop behind a presented alert.
    pub fn tap_alert_backdrop(&mut self, id: ViewId) -> Result<Option<Completion>> {
        let (page, handle) = self.alert_mut(id)?;
        let completion = page.tap_backdrop(&handle);
        self.portal.poll();
        Ok(completion)
    }

    /// Handles the hardware back button.
    ///
    /// The top overlay, if any, gets the event first; otherwise `nav` goes back if it can.
    /// Returns true if anything was dismissed or popped.
    pub fn handle_back_button<N: Renderer>(&mut self, nav: &mut NavController<N>) -> bool {
        if self.config.back_button_dismisses_overlay {
            if let Some(top) = self.portal.active().map(ViewController::id) {
                let is_alert = self
                    .portal
                    .active()
                    .map_or(false, |view| view.page_as::<AlertPage>().is_some());
                let dismissed = if is_alert {
                    matches!(self.tap_alert_backdrop(top), Ok(Some(_)))
                } else {
                    self.portal.dismiss(top);
                    true
                };
                log::debug!("back button went to overlay {} (dismissed: {})", top, dismissed);
                return dismissed;
            }
        }
        if nav.can_go_back() {
            nav.pop(NavOptions::default());
            true
        } else {
            false
        }
    }

    /// Processes pending overlay operations. Returns true if anything happened.
    pub fn poll(&mut self) -> bool {
        self.portal.poll()
    }
}
