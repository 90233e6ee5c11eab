//! Completion signals for navigation operations.

use crate::error::{NavError, Result};
use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::time::Duration;

/// How an operation settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Settled {
    /// The top of the stack changed and a transition ran.
    Transitioned,
    /// The stack was edited without changing its top, or the operation was a no-op.
    Unchanged,
}

pub(crate) type Resolver = Sender<Result<Settled>>;

/// Fires once a queued navigation operation has settled.
///
/// The stack only makes progress inside `NavController::poll`, so on a single thread this should
/// be checked with [`Completion::try_settled`] after polling.
#[derive(Debug)]
pub struct Completion {
    recv: Receiver<Result<Settled>>,
    settled: Option<Result<Settled>>,
}

impl Completion {
    pub(crate) fn new() -> (Resolver, Completion) {
        let (send, recv) = channel::bounded(1);
        (
            send,
            Completion {
                recv,
                settled: None,
            },
        )
    }

    /// Creates an already settled completion.
    pub fn ready(result: Result<Settled>) -> Completion {
        let (send, mut completion) = Completion::new();
        drop(send);
        completion.settled = Some(result);
        completion
    }

    /// Returns the outcome if the operation has settled.
    pub fn try_settled(&mut self) -> Option<Result<Settled>> {
        if self.settled.is_none() {
            match self.recv.try_recv() {
                Ok(result) => self.settled = Some(result),
                Err(TryRecvError::Empty) => (),
                // resolvers are always resolved before being dropped, except when the stack dies
                Err(TryRecvError::Disconnected) => self.settled = Some(Err(NavError::Destroyed)),
            }
        }
        self.settled.clone()
    }

    pub fn is_settled(&mut self) -> bool {
        self.try_settled().is_some()
    }

    /// Blocks until the operation settles.
    ///
    /// Only useful when the stack is polled from another thread.
    pub fn wait(mut self) -> Result<Settled> {
        if let Some(result) = self.settled.take() {
            return result;
        }
        self.recv.recv().unwrap_or(Err(NavError::Destroyed))
    }

    /// Blocks until the operation settles or the timeout elapses.
    pub fn wait_timeout(&mut self, timeout: Duration) -> Option<Result<Settled>> {
        if self.settled.is_none() {
            match self.recv.recv_timeout(timeout) {
                Ok(result) => self.settled = Some(result),
                Err(RecvTimeoutError::Timeout) => (),
                Err(RecvTimeoutError::Disconnected) => self.settled = Some(Err(NavError::Destroyed)),
            }
        }
        self.settled.clone()
    }
}

pub(crate) fn resolve(resolver: &Resolver, result: Result<Settled>) {
    // nobody listening is fine
    let _ = resolver.try_send(result);
}

#[test]
fn test_completion_settles_once() {
    let (resolver, mut completion) = Completion::new();
    assert_eq!(completion.try_settled(), None);
    resolve(&resolver, Ok(Settled::Transitioned));
    resolve(&resolver, Ok(Settled::Unchanged));
    assert_eq!(completion.try_settled(), Some(Ok(Settled::Transitioned)));
    assert_eq!(completion.try_settled(), Some(Ok(Settled::Transitioned)));
}

#[test]
fn test_dropped_resolver_means_destroyed() {
    let (resolver, mut completion) = Completion::new();
    drop(resolver);
    assert_eq!(completion.try_settled(), Some(Err(NavError::Destroyed)));
    assert_eq!(Completion::ready(Ok(Settled::Unchanged)).wait(), Ok(Settled::Unchanged));
}
