//! The serialized, shareable state machine.

use super::notify::Sink;
use super::outcome::{Outcome, Rejection};
use crate::builder::MachineOptions;
use crate::core::{
    AmbiguousTransitionTable, BoundedLog, Event, State, Transition, TransitionQuery,
    TransitionTable,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};
use uuid::Uuid;

/// Everything `process` mutates. Only ever touched under the lock.
struct Core<S, E> {
    state: S,
    log: BoundedLog<Transition<S, E>>,
    processed_events: u64,
    state_changes: u64,
}

struct Inner<S: State, E: Event> {
    id: Uuid,
    label: Option<String>,
    initial: S,
    table: TransitionTable<S, E>,
    core: Mutex<Core<S, E>>,
    sink: Sink<S, E>,
}

/// A concurrency-safe, table-driven state machine.
///
/// `StateMachine` is a cheap handle: clones share one machine. Calls to
/// [`process`](StateMachine::process) from any number of tasks are queued on
/// a fair lock and applied one at a time, each fully committed (state, log
/// and counters) before the next begins. Reads take the same lock and so
/// only ever observe committed state. The transition table and initial
/// state are immutable and are read without locking.
///
/// # Example
///
/// ```rust
/// use lockstep::core::Transition;
/// use lockstep::machine::StateMachine;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let machine = StateMachine::create(
///     "s1",
///     [
///         Transition::new("s1", "e1", "s2"),
///         Transition::new("s2", "e2", "s3"),
///     ],
///     None,
/// )
/// .unwrap();
///
/// assert!(machine.process("e1").await.is_committed());
/// assert!(machine.process("e1").await.is_rejected());
/// assert_eq!(machine.state().await, "s2");
/// assert_eq!(machine.rejected_events_count().await, 1);
/// # }
/// ```
pub struct StateMachine<S: State, E: Event> {
    inner: Arc<Inner<S, E>>,
}

impl<S: State, E: Event> Clone for StateMachine<S, E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: State, E: Event> fmt::Debug for StateMachine<S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("id", &self.inner.id)
            .field("label", &self.inner.label)
            .field("initial", &self.inner.initial)
            .field("transitions", &self.inner.table.len())
            .finish_non_exhaustive()
    }
}

/// Validate a transition set, logging a rejected one.
pub(crate) fn validate_table<S, E, I>(
    transitions: I,
) -> Result<TransitionTable<S, E>, AmbiguousTransitionTable>
where
    S: State,
    E: Event,
    I: IntoIterator<Item = Transition<S, E>>,
{
    TransitionTable::new(transitions).inspect_err(|err| {
        warn!(conflicts = err.conflicts.len(), error = %err, "rejected transition table");
    })
}

impl<S: State, E: Event> StateMachine<S, E> {
    /// Create a machine in `initial` with no notification sink.
    ///
    /// Fails without producing a machine if the transition set maps some
    /// `(from, event)` pair to more than one target. `None` for
    /// `log_capacity` keeps the full history.
    pub fn create<I>(
        initial: S,
        transitions: I,
        log_capacity: Option<NonZeroUsize>,
    ) -> Result<Self, AmbiguousTransitionTable>
    where
        I: IntoIterator<Item = Transition<S, E>>,
    {
        let table = validate_table(transitions)?;
        let options = MachineOptions {
            log_capacity,
            ..MachineOptions::default()
        };
        Ok(Self::assemble(Uuid::new_v4(), initial, table, options, Sink::Silent))
    }

    pub(crate) fn assemble(
        id: Uuid,
        initial: S,
        table: TransitionTable<S, E>,
        options: MachineOptions,
        sink: Sink<S, E>,
    ) -> Self {
        debug!(
            machine = %id,
            label = options.label.as_deref().unwrap_or(""),
            initial = ?initial,
            transitions = table.len(),
            log_capacity = options.log_capacity.map(NonZeroUsize::get),
            "created state machine"
        );

        let core = Core {
            state: initial.clone(),
            log: BoundedLog::new(options.log_capacity),
            processed_events: 0,
            state_changes: 0,
        };

        Self {
            inner: Arc::new(Inner {
                id,
                label: options.label,
                initial,
                table,
                core: Mutex::new(core),
                sink,
            }),
        }
    }

    /// Feed one event to the machine.
    ///
    /// Waits for exclusive access, then either commits the matching
    /// transition or rejects the event. Observers are notified
    /// asynchronously; this call does not wait for them.
    pub async fn process(&self, event: E) -> Outcome<S, E> {
        let mut core = self.inner.core.lock().await;
        self.apply(&mut core, event)
    }

    /// Like [`process`](Self::process), but returns `None` instead of
    /// waiting when another call holds the machine. The event is then not
    /// counted.
    pub fn try_process(&self, event: E) -> Option<Outcome<S, E>> {
        let mut core = self.inner.core.try_lock().ok()?;
        Some(self.apply(&mut core, event))
    }

    fn apply(&self, core: &mut Core<S, E>, event: E) -> Outcome<S, E> {
        core.processed_events += 1;

        let outcome = match self.inner.table.transition(&core.state, &event) {
            Some(transition) => {
                let transition = transition.clone();
                core.state = transition.to().clone();
                core.log.push(transition.clone());
                core.state_changes += 1;
                debug!(machine = %self.inner.id, %transition, "committed transition");
                Outcome::Committed(transition)
            }
            None => {
                debug!(
                    machine = %self.inner.id,
                    state = ?core.state,
                    event = ?event,
                    "rejected event"
                );
                Outcome::Rejected(Rejection {
                    state: core.state.clone(),
                    event,
                })
            }
        };

        self.inner.sink.publish(self.inner.id, &outcome);
        outcome
    }

    async fn lock(&self) -> MutexGuard<'_, Core<S, E>> {
        self.inner.core.lock().await
    }

    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    pub fn label(&self) -> Option<&str> {
        self.inner.label.as_deref()
    }

    pub fn initial_state(&self) -> &S {
        &self.inner.initial
    }

    /// The immutable transition table; readable without waiting.
    pub fn table(&self) -> &TransitionTable<S, E> {
        &self.inner.table
    }

    pub async fn state(&self) -> S {
        self.lock().await.state.clone()
    }

    /// True when a single transition leads from the current state to `to`.
    pub async fn can_transition(&self, to: &S) -> bool {
        let state = self.state().await;
        self.inner.table.can_reach(&state, to)
    }

    pub async fn transitions_from_current(&self) -> HashSet<&Transition<S, E>> {
        let state = self.state().await;
        self.inner.table.transitions_from(&state)
    }

    pub async fn transitions_to_current(&self) -> HashSet<&Transition<S, E>> {
        let state = self.state().await;
        self.inner.table.transitions_to(&state)
    }

    pub async fn events_from_current(&self) -> HashSet<&E> {
        let state = self.state().await;
        self.inner.table.events_from(&state)
    }

    pub async fn events_to_current(&self) -> HashSet<&E> {
        let state = self.state().await;
        self.inner.table.events_to(&state)
    }

    /// True when no transition leaves the current state.
    pub async fn at_ending_state(&self) -> bool {
        let state = self.state().await;
        self.inner.table.is_terminal(&state)
    }

    /// True when the machine is in its initial state and has never moved.
    ///
    /// A machine that left and came back is not "at" its initial state.
    pub async fn at_initial_state(&self) -> bool {
        let core = self.lock().await;
        core.state_changes == 0 && core.state == self.inner.initial
    }

    /// The most recently committed transition still in the log.
    pub async fn entered_with(&self) -> Option<Transition<S, E>> {
        self.lock().await.log.peek_newest().cloned()
    }

    pub async fn processed_events_count(&self) -> u64 {
        self.lock().await.processed_events
    }

    pub async fn state_change_count(&self) -> u64 {
        self.lock().await.state_changes
    }

    /// Processed events that did not change state.
    pub async fn rejected_events_count(&self) -> u64 {
        let core = self.lock().await;
        core.processed_events - core.state_changes
    }

    /// The retained transition log, oldest first.
    pub async fn history(&self) -> Vec<Transition<S, E>> {
        self.lock().await.log.iter().cloned().collect()
    }

    /// Everything mutable, captured under a single lock acquisition.
    pub async fn snapshot(&self) -> Snapshot<S, E> {
        let core = self.lock().await;
        Snapshot {
            machine: self.inner.id,
            state: core.state.clone(),
            initial_state: self.inner.initial.clone(),
            log: core.log.clone(),
            processed_events: core.processed_events,
            state_changes: core.state_changes,
        }
    }
}

/// A consistent view of a machine at one instant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot<S, E> {
    pub machine: Uuid,
    pub state: S,
    pub initial_state: S,
    pub log: BoundedLog<Transition<S, E>>,
    pub processed_events: u64,
    pub state_changes: u64,
}

impl<S: State, E: Event> Snapshot<S, E> {
    pub fn rejected_events(&self) -> u64 {
        self.processed_events - self.state_changes
    }

    pub fn at_initial_state(&self) -> bool {
        self.state_changes == 0 && self.state == self.initial_state
    }

    pub fn entered_with(&self) -> Option<&Transition<S, E>> {
        self.log.peek_newest()
    }
}
