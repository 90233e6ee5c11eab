//! Navigation stacks.

use crate::backend::{Direction, Headless, Renderer, Transition, TransitionDone, TransitionId};
use crate::completion::{self, Completion, Resolver, Settled};
use crate::config::Config;
use crate::error::{NavError, Result};
use crate::registry::Registry;
use crate::view::{Hook, LifecycleState, PageContext, Params, ViewId};
use crate::view_controller::ViewController;
use crossbeam::channel::{self, Receiver, Sender};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use std::{fmt, mem};

/// Per-operation options. Unset fields fall back to the stack’s [`Config`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NavOptions {
    pub animate: Option<bool>,
    pub direction: Option<Direction>,
    pub duration: Option<Duration>,
}

impl NavOptions {
    /// Options for an operation that should not animate.
    pub fn instant() -> NavOptions {
        NavOptions {
            animate: Some(false),
            ..NavOptions::default()
        }
    }
}

/// Whether a stack must always keep a root view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackKind {
    /// A page outlet; pop and remove never take away the last view.
    Outlet,
    /// The overlay portal; may become empty.
    Portal,
}

/// A lifecycle notification emitted by a stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavEvent {
    pub hook: Hook,
    pub view: ViewId,
}

enum Op {
    /// Inserts a view; `None` means on top.
    Insert(Option<usize>, ViewController),
    Pop,
    PopToRoot,
    Remove { start: usize, count: usize },
    /// Replaces the whole stack.
    SetPages(Vec<ViewController>),
    Dismiss(ViewId),
}

impl fmt::Debug for Op {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Op::Insert(index, view) => write!(f, "Insert({:?}, {})", index, view.name()),
            Op::Pop => write!(f, "Pop"),
            Op::PopToRoot => write!(f, "PopToRoot"),
            Op::Remove { start, count } => write!(f, "Remove({}, {})", start, count),
            Op::SetPages(views) => {
                let names: Vec<_> = views.iter().map(ViewController::name).collect();
                write!(f, "SetPages({:?})", names)
            }
            Op::Dismiss(id) => write!(f, "Dismiss({})", id),
        }
    }
}

struct Command {
    op: Op,
    opts: NavOptions,
    resolver: Resolver,
}

/// A cloneable handle that queues operations on a stack.
///
/// Operations sent through a handle are applied in the same FIFO order as operations called on
/// the [`NavController`] itself, the next time the controller is polled. Handles are what pages
/// and overlay button handlers use to navigate.
#[derive(Clone)]
pub struct NavHandle {
    commands: Sender<Command>,
    registry: Arc<Registry>,
}

impl NavHandle {
    /// Resolves a registered view into a detached view controller.
    pub fn build(&self, name: &str, params: Params) -> Result<ViewController> {
        let id = ViewId::new();
        let context = PageContext {
            id,
            params: params.clone(),
            nav: self.clone(),
        };
        let page = self.registry.build(name, &context)?;
        Ok(ViewController::new(id, name, page, params))
    }

    fn send(&self, op: Op, opts: NavOptions) -> Completion {
        let (resolver, completion) = Completion::new();
        if let Err(channel::SendError(command)) = self.commands.send(Command {
            op,
            opts,
            resolver,
        }) {
            completion::resolve(&command.resolver, Err(NavError::Destroyed));
        }
        completion
    }

    /// Pushes a new view on top of the stack.
    pub fn push(&self, view: &str, params: Params, opts: NavOptions) -> Result<Completion> {
        let view = self.build(view, params)?;
        Ok(self.push_view(view, opts))
    }

    /// Pushes an existing view controller on top of the stack.
    pub fn push_view(&self, view: ViewController, opts: NavOptions) -> Completion {
        self.send(Op::Insert(None, view), opts)
    }

    /// Pops the top view. Does nothing if only the root remains.
    pub fn pop(&self, opts: NavOptions) -> Completion {
        self.send(Op::Pop, opts)
    }

    /// Pops all views above the root in a single transition.
    pub fn pop_to_root(&self, opts: NavOptions) -> Completion {
        self.send(Op::PopToRoot, opts)
    }

    /// Inserts a view at `index`, clamped to the stack length.
    ///
    /// Only transitions if the view ends up on top.
    pub fn insert(
        &self,
        index: usize,
        view: &str,
        params: Params,
        opts: NavOptions,
    ) -> Result<Completion> {
        let view = self.build(view, params)?;
        Ok(self.send(Op::Insert(Some(index), view), opts))
    }

    /// Removes `count` views starting at `start`.
    ///
    /// Transitions if the active view is removed.
    pub fn remove(&self, start: usize, count: usize, opts: NavOptions) -> Completion {
        self.send(Op::Remove { start, count }, opts)
    }

    /// Replaces the stack with a single root view.
    pub fn set_root(&self, view: &str, params: Params, opts: NavOptions) -> Result<Completion> {
        let view = self.build(view, params)?;
        Ok(self.send(Op::SetPages(vec![view]), opts))
    }

    /// Replaces the stack; only the last page enters visibly.
    pub fn set_pages<'a, I>(&self, pages: I, opts: NavOptions) -> Result<Completion>
    where
        I: IntoIterator<Item = (&'a str, Params)>,
    {
        let views = pages
            .into_iter()
            .map(|(view, params)| self.build(view, params))
            .collect::<Result<Vec<_>>>()?;
        if views.is_empty() {
            return Err(NavError::InvalidView("no pages given".into()));
        }
        Ok(self.send(Op::SetPages(views), opts))
    }

    /// Removes the view with the given id if it is on top.
    pub fn dismiss(&self, id: ViewId) -> Completion {
        self.send(Op::Dismiss(id), NavOptions::default())
    }
}

impl fmt::Debug for NavHandle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "NavHandle({} queued)", self.commands.len())
    }
}

/// The transition currently running.
struct InFlight {
    transition: Transition,
    /// The leaving view if it was taken off the stack.
    removed_leaving: Option<ViewController>,
    /// Other views taken off the stack by the operation; unloaded once the transition settles.
    unload: Vec<ViewController>,
    resolver: Resolver,
}

/// A navigation stack for one outlet.
///
/// Stack mutations are queued and executed one at a time, in request order: an operation
/// requested while a transition is running waits for it to settle, and then sees the stack as
/// left by every earlier operation. Nothing happens outside of [`NavController::poll`], which
/// every operation method calls once after queueing.
pub struct NavController<R: Renderer = Headless> {
    kind: StackKind,
    views: Vec<ViewController>,
    renderer: R,
    config: Config,
    handle: NavHandle,
    commands: Receiver<Command>,
    queue: VecDeque<Command>,
    in_flight: Option<InFlight>,
    transitions_send: Sender<TransitionId>,
    transitions: Receiver<TransitionId>,
    next_transition: u64,
    subscribers: Vec<Sender<NavEvent>>,
}

impl<R: Renderer> NavController<R> {
    fn with_kind(kind: StackKind, registry: Arc<Registry>, config: Config, renderer: R) -> Self {
        let (commands_send, commands) = channel::unbounded();
        let (transitions_send, transitions) = channel::unbounded();
        NavController {
            kind,
            views: Vec::new(),
            renderer,
            config,
            handle: NavHandle {
                commands: commands_send,
                registry,
            },
            commands,
            queue: VecDeque::new(),
            in_flight: None,
            transitions_send,
            transitions,
            next_transition: 0,
            subscribers: Vec::new(),
        }
    }

    /// Creates an outlet without a root view.
    pub fn new(registry: Arc<Registry>, config: Config, renderer: R) -> Self {
        Self::with_kind(StackKind::Outlet, registry, config, renderer)
    }

    /// Creates an outlet and sets its root view without animating.
    pub fn with_root(
        registry: Arc<Registry>,
        config: Config,
        renderer: R,
        root: &str,
        params: Params,
    ) -> Result<Self> {
        let mut nav = Self::new(registry, config, renderer);
        nav.set_root(root, params, NavOptions::instant())?;
        Ok(nav)
    }

    /// Creates an overlay portal.
    pub fn portal(registry: Arc<Registry>, config: Config, renderer: R) -> Self {
        Self::with_kind(StackKind::Portal, registry, config, renderer)
    }

    pub fn kind(&self) -> StackKind {
        self.kind
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Returns a handle for queueing operations from elsewhere.
    pub fn handle(&self) -> NavHandle {
        self.handle.clone()
    }

    /// Subscribes to lifecycle events of this stack.
    pub fn subscribe(&mut self) -> Receiver<NavEvent> {
        let (send, recv) = channel::unbounded();
        self.subscribers.push(send);
        recv
    }

    pub fn push(&mut self, view: &str, params: Params, opts: NavOptions) -> Result<Completion> {
        let completion = self.handle.push(view, params, opts)?;
        self.poll();
        Ok(completion)
    }

    pub fn push_view(&mut self, view: ViewController, opts: NavOptions) -> Completion {
        let completion = self.handle.push_view(view, opts);
        self.poll();
        completion
    }

    pub fn pop(&mut self, opts: NavOptions) -> Completion {
        let completion = self.handle.pop(opts);
        self.poll();
        completion
    }

    pub fn pop_to_root(&mut self, opts: NavOptions) -> Completion {
        let completion = self.handle.pop_to_root(opts);
        self.poll();
        completion
    }

    pub fn insert(
        &mut self,
        index: usize,
        view: &str,
        params: Params,
        opts: NavOptions,
    ) -> Result<Completion> {
        let completion = self.handle.insert(index, view, params, opts)?;
        self.poll();
        Ok(completion)
    }

    pub fn remove(&mut self, start: usize, count: usize, opts: NavOptions) -> Completion {
        let completion = self.handle.remove(start, count, opts);
        self.poll();
        completion
    }

    pub fn set_root(&mut self, view: &str, params: Params, opts: NavOptions) -> Result<Completion> {
        let completion = self.handle.set_root(view, params, opts)?;
        self.poll();
        Ok(completion)
    }

    pub fn set_pages<'a, I>(&mut self, pages: I, opts: NavOptions) -> Result<Completion>
    where
        I: IntoIterator<Item = (&'a str, Params)>,
    {
        let completion = self.handle.set_pages(pages, opts)?;
        self.poll();
        Ok(completion)
    }

    pub fn dismiss(&mut self, id: ViewId) -> Completion {
        let completion = self.handle.dismiss(id);
        self.poll();
        completion
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// Returns true while a transition is running.
    pub fn is_transitioning(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Returns true if operations are waiting for the current transition.
    pub fn has_pending(&self) -> bool {
        !self.queue.is_empty() || !self.commands.is_empty()
    }

    pub fn views(&self) -> impl Iterator<Item = &ViewController> {
        self.views.iter()
    }

    /// The top view.
    pub fn active(&self) -> Option<&ViewController> {
        self.views.last()
    }

    pub fn active_mut(&mut self) -> Option<&mut ViewController> {
        self.views.last_mut()
    }

    /// The view right beneath the top.
    pub fn previous(&self) -> Option<&ViewController> {
        self.views.len().checked_sub(2).map(|i| &self.views[i])
    }

    pub fn first(&self) -> Option<&ViewController> {
        self.views.first()
    }

    pub fn last(&self) -> Option<&ViewController> {
        self.views.last()
    }

    pub fn get(&self, index: usize) -> Option<&ViewController> {
        self.views.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut ViewController> {
        self.views.get_mut(index)
    }

    pub fn index_of(&self, id: ViewId) -> Option<usize> {
        self.views.iter().position(|view| view.id() == id)
    }

    pub fn find(&self, id: ViewId) -> Option<&ViewController> {
        self.views.iter().find(|view| view.id() == id)
    }

    pub fn find_mut(&mut self, id: ViewId) -> Option<&mut ViewController> {
        self.views.iter_mut().find(|view| view.id() == id)
    }

    /// Returns true if popping would reveal another view.
    pub fn can_go_back(&self) -> bool {
        self.views.len() > 1
    }

    /// Returns true if the view should display a back button.
    pub fn back_button_visible(&self, id: ViewId) -> bool {
        match self.index_of(id) {
            Some(index) => index > 0 && self.views[index].is_back_button_shown(),
            None => false,
        }
    }

    /// Runs a lifecycle hook on the active view.
    ///
    /// For containers that show and hide whole stacks, such as tabs.
    pub fn fire_active(&mut self, hook: Hook) {
        if let Some(id) = self.active().map(ViewController::id) {
            self.fire(id, hook);
        }
    }

    /// Processes queued operations and finished transitions.
    ///
    /// Returns true if anything happened.
    pub fn poll(&mut self) -> bool {
        let mut progressed = false;
        loop {
            let mut step = false;
            while let Ok(command) = self.commands.try_recv() {
                log::debug!("queue {:?}", command.op);
                self.queue.push_back(command);
                step = true;
            }
            while let Ok(id) = self.transitions.try_recv() {
                self.settle(id);
                step = true;
            }
            if self.in_flight.is_none() {
                if let Some(command) = self.queue.pop_front() {
                    self.execute(command);
                    step = true;
                }
            }
            if !step {
                break progressed;
            }
            progressed = true;
        }
    }

    fn emit(&mut self, event: NavEvent) {
        self.subscribers.retain(|send| send.send(event).is_ok());
    }

    /// Fires a hook on a view on the stack or on the view leaving it.
    fn fire(&mut self, id: ViewId, hook: Hook) {
        let view = match self.views.iter_mut().find(|view| view.id() == id) {
            Some(view) => Some(view),
            None => self
                .in_flight
                .as_mut()
                .and_then(|flight| flight.removed_leaving.as_mut())
                .filter(|view| view.id() == id),
        };
        if let Some(view) = view {
            view.fire(hook);
            self.emit(NavEvent { hook, view: id });
        }
    }

    /// Takes a view controller off the stack for good.
    fn unload(&mut self, mut view: ViewController) {
        for hook in [Hook::WillUnload, Hook::DidUnload, Hook::Destroy] {
            view.fire(hook);
            self.emit(NavEvent {
                hook,
                view: view.id(),
            });
        }
        if view.mounted {
            if let Err(err) = self.renderer.unmount(&view) {
                log::warn!("could not unmount {} ({}): {}", view.name(), view.id(), err);
            }
            view.mounted = false;
        }
        view.detach();
    }

    fn attach(&self, view: &mut ViewController) {
        view.attach(self.handle.clone(), &self.config.back_button_text);
    }

    /// Applies an operation to the stack and returns the views it took off.
    fn apply(&mut self, op: Op) -> Result<(Vec<ViewController>, Direction)> {
        let min_len = match self.kind {
            StackKind::Outlet => 1,
            StackKind::Portal => 0,
        };
        match op {
            Op::Insert(index, mut view) => {
                let index = index.unwrap_or(self.views.len()).min(self.views.len());
                self.attach(&mut view);
                self.views.insert(index, view);
                Ok((Vec::new(), Direction::Forward))
            }
            Op::Pop => {
                if self.views.len() <= min_len {
                    return Ok((Vec::new(), Direction::Back));
                }
                Ok((self.views.pop().into_iter().collect(), Direction::Back))
            }
            Op::PopToRoot => {
                let removed = if self.views.len() > 1 {
                    self.views.split_off(1)
                } else {
                    Vec::new()
                };
                Ok((removed, Direction::Back))
            }
            Op::Remove { start, count } => {
                let len = self.views.len();
                if start >= len {
                    return Err(NavError::IndexOutOfBounds { index: start, len });
                }
                let end = start.saturating_add(count).min(len);
                let remaining = len - (end - start);
                // an outlet keeps its root
                let start = start + min_len.saturating_sub(remaining);
                Ok((self.views.drain(start..end).collect(), Direction::Back))
            }
            Op::SetPages(mut views) => {
                for view in &mut views {
                    self.attach(view);
                }
                Ok((mem::replace(&mut self.views, views), Direction::Forward))
            }
            Op::Dismiss(id) => {
                let is_top = self.views.last().map(ViewController::id) == Some(id);
                if !is_top || self.views.len() <= min_len {
                    return Ok((Vec::new(), Direction::Back));
                }
                Ok((self.views.pop().into_iter().collect(), Direction::Back))
            }
        }
    }

    fn execute(&mut self, command: Command) {
        let Command { op, opts, resolver } = command;
        log::debug!("run {:?}", op);

        let old_top = self.views.last().map(ViewController::id);
        let (mut removed, direction) = match self.apply(op) {
            Ok(applied) => applied,
            Err(err) => {
                log::warn!("navigation failed: {}", err);
                completion::resolve(&resolver, Err(err));
                return;
            }
        };
        let new_top = self.views.last().map(ViewController::id);

        if old_top == new_top {
            // a silent edit; nothing visible changes
            for view in removed {
                self.unload(view);
            }
            completion::resolve(&resolver, Ok(Settled::Unchanged));
            return;
        }

        let removed_leaving = old_top
            .and_then(|id| removed.iter().position(|view| view.id() == id))
            .map(|index| removed.remove(index));

        let transition = Transition {
            id: TransitionId(self.next_transition),
            entering: new_top,
            leaving: old_top,
            direction: opts.direction.unwrap_or(direction),
            animate: opts.animate.unwrap_or(self.config.animate),
            duration: opts
                .duration
                .unwrap_or_else(|| self.config.transition_duration()),
        };
        self.next_transition += 1;

        if let Some(entering) = new_top.and_then(|id| self.views.iter_mut().find(|v| v.id() == id)) {
            if !entering.mounted {
                if let Err(err) = self.renderer.mount(entering) {
                    log::warn!("could not mount {} ({}): {}", entering.name(), entering.id(), err);
                }
                entering.mounted = true;
            }
        }

        self.in_flight = Some(InFlight {
            transition: transition.clone(),
            removed_leaving,
            unload: removed,
            resolver,
        });

        if let Some(leaving) = old_top {
            self.fire(leaving, Hook::WillLeave);
        }
        if let Some(entering) = new_top {
            self.fire(entering, Hook::WillEnter);
        }

        log::debug!(
            "transition {:?} {:?} -> {:?} ({:?})",
            transition.id,
            transition.leaving,
            transition.entering,
            transition.direction
        );
        let done = TransitionDone::new(transition.id, self.transitions_send.clone());
        self.renderer.animate(&transition, done);
    }

    /// Finishes the running transition.
    fn settle(&mut self, id: TransitionId) {
        let (entering, leaving) = match &self.in_flight {
            Some(flight) if flight.transition.id == id => {
                (flight.transition.entering, flight.transition.leaving)
            }
            _ => {
                log::debug!("ignoring stale transition {:?}", id);
                return;
            }
        };
        if let Some(entering) = entering {
            self.fire(entering, Hook::DidEnter);
        }
        if let Some(leaving) = leaving {
            self.fire(leaving, Hook::DidLeave);
        }

        if let Some(flight) = self.in_flight.take() {
            if let Some(view) = flight.removed_leaving {
                self.unload(view);
            }
            for view in flight.unload {
                self.unload(view);
            }
            completion::resolve(&flight.resolver, Ok(Settled::Transitioned));
        }
    }
}

impl<R: Renderer> fmt::Debug for NavController<R> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("NavController")
            .field("kind", &self.kind)
            .field("views", &self.views)
            .field("transitioning", &self.is_transitioning())
            .field("queued", &self.queue.len())
            .finish()
    }
}

impl<R: Renderer> Drop for NavController<R> {
    fn drop(&mut self) {
        if let Some(id) = self.in_flight.as_ref().map(|flight| flight.transition.id) {
            self.settle(id);
        }
        while let Ok(command) = self.commands.try_recv() {
            self.queue.push_back(command);
        }
        for command in self.queue.drain(..) {
            completion::resolve(&command.resolver, Err(NavError::Destroyed));
        }
        while let Some(view) = self.views.last() {
            let id = view.id();
            // covered views have already left; set_pages intermediates never entered
            if !matches!(view.state(), LifecycleState::Created | LifecycleState::DidLeave) {
                self.fire(id, Hook::WillLeave);
                self.fire(id, Hook::DidLeave);
            }
            if let Some(view) = self.views.pop() {
                self.unload(view);
            }
        }
    }
}
