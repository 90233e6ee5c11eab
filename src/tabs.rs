//! Tabs.

use navstack_core::{Headless, Hook, NavController, NavError, Renderer, Result};

/// One tab: a title and its own navigation outlet.
#[derive(Debug)]
pub struct Tab<R: Renderer = Headless> {
    title: String,
    nav: NavController<R>,
}

impl<R: Renderer> Tab<R> {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn nav(&self) -> &NavController<R> {
        &self.nav
    }

    pub fn nav_mut(&mut self) -> &mut NavController<R> {
        &mut self.nav
    }
}

/// A set of tabs, each with its own navigation stack, of which one is visible.
///
/// Switching tabs doesn’t touch any stack; the active views of the two tabs just leave and
/// enter through their lifecycle hooks.
#[derive(Debug)]
pub struct Tabs<R: Renderer = Headless> {
    tabs: Vec<Tab<R>>,
    selected: Option<usize>,
}

impl<R: Renderer> Default for Tabs<R> {
    fn default() -> Self {
        Tabs {
            tabs: Vec::new(),
            selected: None,
        }
    }
}

impl<R: Renderer> Tabs<R> {
    pub fn new() -> Tabs<R> {
        Tabs::default()
    }

    /// Adds a tab and returns its index.
    ///
    /// The first tab is selected; the active views of later ones are sent away until selected.
    pub fn add(&mut self, title: impl Into<String>, mut nav: NavController<R>) -> usize {
        let index = self.tabs.len();
        if self.selected.is_none() {
            self.selected = Some(index);
        } else {
            nav.fire_active(Hook::WillLeave);
            nav.fire_active(Hook::DidLeave);
        }
        self.tabs.push(Tab {
            title: title.into(),
            nav,
        });
        index
    }

    /// Switches to another tab.
    pub fn select(&mut self, index: usize) -> Result<()> {
        let len = self.tabs.len();
        if index >= len {
            return Err(NavError::IndexOutOfBounds { index, len });
        }
        let previous = self.selected;
        if previous == Some(index) {
            return Ok(());
        }
        log::debug!("select tab {} (was {:?})", index, previous);

        if let Some(previous) = previous {
            self.tabs[previous].nav.fire_active(Hook::WillLeave);
        }
        self.tabs[index].nav.fire_active(Hook::WillEnter);
        self.selected = Some(index);
        self.tabs[index].nav.fire_active(Hook::DidEnter);
        if let Some(previous) = previous {
            self.tabs[previous].nav.fire_active(Hook::DidLeave);
        }
        Ok(())
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_tab(&self) -> Option<&Tab<R>> {
        self.selected.and_then(|index| self.tabs.get(index))
    }

    pub fn selected_tab_mut(&mut self) -> Option<&mut Tab<R>> {
        match self.selected {
            Some(index) => self.tabs.get_mut(index),
            None => None,
        }
    }

    pub fn get(&self, index: usize) -> Option<&Tab<R>> {
        self.tabs.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Tab<R>> {
        self.tabs.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    /// Polls every tab’s stack. Returns true if anything happened.
    pub fn poll(&mut self) -> bool {
        let mut progressed = false;
        for tab in &mut self.tabs {
            progressed |= tab.nav.poll();
        }
        progressed
    }
}
