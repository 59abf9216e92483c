//! Delivery of commit and rejection notifications.
//!
//! A machine has at most one sink, chosen at construction:
//!
//! - a push-style [`Delegate`], whose callbacks run on a dispatcher task
//!   spawned on a host-supplied runtime handle, or
//! - pull-style [`Notifications`] lanes, one for commits and one for
//!   rejections, that the host drains at its own pace.
//!
//! Either way the machine only enqueues. Observer code never runs on the
//! calling task and never while the machine's lock is held, so a callback
//! that re-enters the machine cannot deadlock it. Enqueueing happens before
//! the lock is released, which keeps each lane in commit order.

use super::outcome::{Outcome, Rejection};
use crate::core::{Event, State, Transition};
use futures::stream::{self, BoxStream, StreamExt};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};
use uuid::Uuid;

/// Push-style observer of a machine.
///
/// Both callbacks default to doing nothing, so implementors override only
/// what they care about. Callbacks for one machine are invoked sequentially,
/// in the order outcomes were decided.
///
/// # Example
///
/// ```rust
/// use lockstep::core::Transition;
/// use lockstep::machine::Delegate;
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// #[derive(Default)]
/// struct CountChanges(AtomicUsize);
///
/// impl Delegate<&'static str, &'static str> for CountChanges {
///     fn on_state_changed(&self, _transition: &Transition<&'static str, &'static str>) {
///         self.0.fetch_add(1, Ordering::SeqCst);
///     }
/// }
/// ```
pub trait Delegate<S: State, E: Event>: Send + Sync + 'static {
    /// Called once per committed transition.
    fn on_state_changed(&self, _transition: &Transition<S, E>) {}

    /// Called once per rejected event with the state it was rejected in.
    fn on_event_rejected(&self, _state: &S, _event: &E) {}
}

impl<S: State, E: Event, D: Delegate<S, E> + ?Sized> Delegate<S, E> for Arc<D> {
    fn on_state_changed(&self, transition: &Transition<S, E>) {
        (**self).on_state_changed(transition);
    }

    fn on_event_rejected(&self, state: &S, event: &E) {
        (**self).on_event_rejected(state, event);
    }
}

/// Pull-style receiving end of a machine's two notification lanes.
///
/// Lanes are unbounded; a host that never drains them simply never observes
/// the notifications. Dropping a lane does not affect the machine.
pub struct Notifications<S, E> {
    committed: UnboundedReceiver<Transition<S, E>>,
    rejected: UnboundedReceiver<Rejection<S, E>>,
}

impl<S: State, E: Event> Notifications<S, E> {
    /// Wait for the next committed transition.
    ///
    /// Returns `None` once the machine is dropped and the lane is drained.
    pub async fn next_committed(&mut self) -> Option<Transition<S, E>> {
        self.committed.recv().await
    }

    /// Wait for the next rejected event.
    pub async fn next_rejected(&mut self) -> Option<Rejection<S, E>> {
        self.rejected.recv().await
    }

    pub fn try_next_committed(&mut self) -> Option<Transition<S, E>> {
        self.committed.try_recv().ok()
    }

    pub fn try_next_rejected(&mut self) -> Option<Rejection<S, E>> {
        self.rejected.try_recv().ok()
    }

    /// Split into independent `Stream`s, one per lane.
    pub fn into_streams(
        self,
    ) -> (
        BoxStream<'static, Transition<S, E>>,
        BoxStream<'static, Rejection<S, E>>,
    ) {
        (lane_stream(self.committed), lane_stream(self.rejected))
    }
}

fn lane_stream<T: Send + 'static>(receiver: UnboundedReceiver<T>) -> BoxStream<'static, T> {
    stream::unfold(receiver, |mut receiver| async move {
        receiver.recv().await.map(|item| (item, receiver))
    })
    .boxed()
}

pub(crate) enum Notification<S, E> {
    StateChanged(Transition<S, E>),
    EventRejected(Rejection<S, E>),
}

/// Sending side held by the machine.
pub(crate) enum Sink<S, E> {
    Silent,
    Lanes {
        committed: Lane<Transition<S, E>>,
        rejected: Lane<Rejection<S, E>>,
    },
    Delegate(UnboundedSender<Notification<S, E>>),
}

pub(crate) struct Lane<T> {
    name: &'static str,
    sender: UnboundedSender<T>,
    closed: AtomicBool,
}

impl<T> Lane<T> {
    fn new(name: &'static str, sender: UnboundedSender<T>) -> Self {
        Self {
            name,
            sender,
            closed: AtomicBool::new(false),
        }
    }

    fn send(&self, machine: Uuid, item: T) {
        if self.sender.send(item).is_err() && !self.closed.swap(true, Ordering::Relaxed) {
            warn!(machine = %machine, lane = self.name, "notification lane receiver dropped");
        }
    }
}

impl<S: State, E: Event> Sink<S, E> {
    /// Create the lane pair and the sink that feeds it.
    pub(crate) fn lanes() -> (Self, Notifications<S, E>) {
        let (committed_tx, committed_rx) = mpsc::unbounded_channel();
        let (rejected_tx, rejected_rx) = mpsc::unbounded_channel();
        let sink = Self::Lanes {
            committed: Lane::new("committed", committed_tx),
            rejected: Lane::new("rejected", rejected_tx),
        };
        let notifications = Notifications {
            committed: committed_rx,
            rejected: rejected_rx,
        };
        (sink, notifications)
    }

    /// Spawn the dispatcher task for `delegate` on `handle`.
    ///
    /// The task ends when the machine, and with it the sender, is dropped.
    pub(crate) fn delegate(
        delegate: Arc<dyn Delegate<S, E>>,
        handle: &Handle,
        machine: Uuid,
    ) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<Notification<S, E>>();
        handle.spawn(async move {
            while let Some(notification) = rx.recv().await {
                match notification {
                    Notification::StateChanged(transition) => {
                        delegate.on_state_changed(&transition);
                    }
                    Notification::EventRejected(rejection) => {
                        delegate.on_event_rejected(&rejection.state, &rejection.event);
                    }
                }
            }
            debug!(machine = %machine, "delegate dispatcher stopped");
        });
        Self::Delegate(tx)
    }

    /// Enqueue the notification for `outcome`. Never blocks.
    pub(crate) fn publish(&self, machine: Uuid, outcome: &Outcome<S, E>) {
        match self {
            Self::Silent => {}
            Self::Lanes {
                committed,
                rejected,
            } => match outcome {
                Outcome::Committed(transition) => {
                    committed.send(machine, transition.clone());
                }
                Outcome::Rejected(rejection) => {
                    rejected.send(machine, rejection.clone());
                }
            },
            Self::Delegate(tx) => {
                let notification = match outcome {
                    Outcome::Committed(transition) => {
                        Notification::StateChanged(transition.clone())
                    }
                    Outcome::Rejected(rejection) => {
                        Notification::EventRejected(rejection.clone())
                    }
                };
                if tx.send(notification).is_err() {
                    warn!(machine = %machine, "delegate dispatcher is gone; notification dropped");
                }
            }
        }
    }
}
