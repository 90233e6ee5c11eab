//! Page registry.

use crate::error::{NavError, Result};
use crate::view::{Page, PageContext};
use core::fmt;
use std::collections::HashMap;
use std::sync::Arc;

type Constructor = dyn Fn(&PageContext) -> anyhow::Result<Box<dyn Page>> + Send + Sync;

/// Maps view names to page constructors.
///
/// Navigation operations refer to pages by name; a name that isn’t registered (or whose
/// constructor fails) is an invalid view.
#[derive(Default)]
pub struct Registry {
    constructors: HashMap<String, Arc<Constructor>>,
}

impl Registry {
    pub fn new() -> Registry {
        Registry::default()
    }

    /// Registers a page constructor, replacing any existing one with the same name.
    pub fn register<P, F>(&mut self, name: impl Into<String>, constructor: F) -> &mut Self
    where
        P: Page,
        F: Fn(&PageContext) -> anyhow::Result<P> + Send + Sync + 'static,
    {
        let name = name.into();
        if self.constructors.contains_key(&name) {
            log::warn!("replacing page constructor for `{}`", name);
        }
        self.constructors.insert(
            name,
            Arc::new(move |context: &PageContext| {
                constructor(context).map(|page| Box::new(page) as Box<dyn Page>)
            }),
        );
        self
    }

    /// Registers a page that is constructed with `Default`.
    pub fn register_default<P: Page + Default>(&mut self, name: impl Into<String>) -> &mut Self {
        self.register(name, |_| Ok(P::default()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    /// Returns all registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.constructors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Constructs a page.
    pub fn build(&self, name: &str, context: &PageContext) -> Result<Box<dyn Page>> {
        let constructor = self
            .constructors
            .get(name)
            .ok_or_else(|| NavError::InvalidView(format!("no page registered as `{}`", name)))?;
        constructor(context)
            .map_err(|err| NavError::InvalidView(format!("could not construct `{}`: {:#}", name, err)))
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Registry").field("names", &self.names()).finish()
    }
}
