use crate::nav_controller::NavHandle;
use core::any::Any;
use core::fmt;
use std::collections::BTreeMap;
use uuid::Uuid;

/// A unique identifier for a view on a navigation stack.
///
/// (this is just a UUID)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ViewId(Uuid);

impl ViewId {
    pub fn new() -> ViewId {
        ViewId(Uuid::new_v4())
    }
}

impl Default for ViewId {
    fn default() -> Self {
        ViewId::new()
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // the first group is plenty for log lines
        let simple = self.0.simple().to_string();
        write!(f, "{}", &simple[..8])
    }
}

/// Parameters passed to a page when it is pushed.
///
/// Read-only to the page; the navigation stack never looks inside.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(BTreeMap<String, String>);

impl Params {
    pub fn new() -> Params {
        Params::default()
    }

    /// Returns these params with an additional entry.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Params {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> std::iter::FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Params(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Result of a lifecycle hook.
///
/// Errors are logged by the navigation stack and otherwise ignored.
pub type HookResult = anyhow::Result<()>;

/// Implements the `Page` trait for a given struct.
///
/// Syntax:
///
/// ```text
/// impl_page! {
///     StructName;
///     (lifecycle hooks go here, using normal rust syntax)
/// }
/// ```
#[macro_export]
macro_rules! impl_page {
    (
        $(#[$attr:meta])*
        $struct:ty;
        $($extra:tt)*
    ) => {
        $(#[$attr])*
        impl $crate::Page for $struct {
            fn as_any(&self) -> &dyn ::core::any::Any {
                self
            }
            fn as_any_mut(&mut self) -> &mut dyn ::core::any::Any {
                self
            }
            $($extra)*
        }
    };
}

/// Pages are the components hosted by a navigation stack, one per view controller.
///
/// All lifecycle hooks are optional. For any single transition they are called in a fixed order:
/// `will_leave` (leaving page), `will_enter` (entering page), then after the animation
/// `did_enter`, `did_leave`, and then `will_unload`, `did_unload` and `on_destroy` if the
/// leaving page is being removed from the stack.
///
/// A hook that returns an error or panics is logged and skipped; the transition continues.
///
/// This trait should probably be implemented using the [`impl_page`] macro.
pub trait Page: Any + fmt::Debug + Send {
    /// For downcasting.
    fn as_any(&self) -> &dyn Any;

    /// For downcasting.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Called right before the page becomes the active page.
    fn will_enter(&mut self) -> HookResult {
        Ok(())
    }

    /// Called once the page has fully entered.
    fn did_enter(&mut self) -> HookResult {
        Ok(())
    }

    /// Called right before the page stops being the active page.
    fn will_leave(&mut self) -> HookResult {
        Ok(())
    }

    /// Called once the page has fully left.
    fn did_leave(&mut self) -> HookResult {
        Ok(())
    }

    /// Called before the page is removed from its stack.
    fn will_unload(&mut self) -> HookResult {
        Ok(())
    }

    /// Called after the page was removed from its stack.
    fn did_unload(&mut self) -> HookResult {
        Ok(())
    }

    /// Called right before the page is dropped.
    fn on_destroy(&mut self) -> HookResult {
        Ok(())
    }
}

/// Construction context for a page.
#[derive(Debug, Clone)]
pub struct PageContext {
    /// The id of the view controller that will host the page.
    pub id: ViewId,
    /// The params the page was pushed with.
    pub params: Params,
    /// A handle to the stack that requested the page.
    pub nav: NavHandle,
}

/// Lifecycle states of a view controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    Created,
    WillEnter,
    DidEnter,
    /// Top-most and fully entered.
    Active,
    WillLeave,
    DidLeave,
    WillUnload,
    DidUnload,
    Destroyed,
}

/// Lifecycle hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hook {
    WillEnter,
    DidEnter,
    WillLeave,
    DidLeave,
    WillUnload,
    DidUnload,
    Destroy,
}

impl Hook {
    /// The state a view controller is in while this hook runs.
    pub fn state(self) -> LifecycleState {
        match self {
            Hook::WillEnter => LifecycleState::WillEnter,
            Hook::DidEnter => LifecycleState::DidEnter,
            Hook::WillLeave => LifecycleState::WillLeave,
            Hook::DidLeave => LifecycleState::DidLeave,
            Hook::WillUnload => LifecycleState::WillUnload,
            Hook::DidUnload => LifecycleState::DidUnload,
            Hook::Destroy => LifecycleState::Destroyed,
        }
    }

    pub(crate) fn call(self, page: &mut dyn Page) -> HookResult {
        match self {
            Hook::WillEnter => page.will_enter(),
            Hook::DidEnter => page.did_enter(),
            Hook::WillLeave => page.will_leave(),
            Hook::DidLeave => page.did_leave(),
            Hook::WillUnload => page.will_unload(),
            Hook::DidUnload => page.did_unload(),
            Hook::Destroy => page.on_destroy(),
        }
    }
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Hook::WillEnter => "will_enter",
            Hook::DidEnter => "did_enter",
            Hook::WillLeave => "will_leave",
            Hook::DidLeave => "did_leave",
            Hook::WillUnload => "will_unload",
            Hook::DidUnload => "did_unload",
            Hook::Destroy => "on_destroy",
        };
        f.write_str(name)
    }
}

/// An empty page that does absolutely nothing.
#[derive(Debug, Default)]
pub struct Blank;

impl_page! { Blank; }

#[test]
fn test_params() {
    let params = Params::new().with("id", "7").with("mode", "edit");
    assert_eq!(params.get("id"), Some("7"));
    assert_eq!(params.get("missing"), None);
    assert_eq!(params.len(), 2);

    let collected: Params = vec![("mode", "edit"), ("id", "7")].into_iter().collect();
    assert_eq!(collected, params, "params should not depend on insertion order");
}

#[test]
fn test_view_ids_are_unique() {
    let a = ViewId::new();
    let b = ViewId::new();
    assert_ne!(a, b);
    assert_eq!(a.to_string().len(), 8);
}
