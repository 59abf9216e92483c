//! Builder for constructing state machines.

use crate::builder::error::BuildError;
use crate::builder::options::MachineOptions;
use crate::core::{Event, State, Transition};
use crate::machine::{validate_table, Delegate, Notifications, Sink, StateMachine};
use std::num::NonZeroUsize;
use std::sync::Arc;
use tokio::runtime::Handle;
use uuid::Uuid;

/// Builder for constructing state machines with a fluent API.
///
/// # Example
///
/// ```rust
/// use lockstep::builder::StateMachineBuilder;
/// use std::num::NonZeroUsize;
///
/// let machine = StateMachineBuilder::new()
///     .initial("locked")
///     .transition("locked", "coin", "unlocked")
///     .transition("unlocked", "push", "locked")
///     .log_capacity(NonZeroUsize::new(16).unwrap())
///     .label("turnstile")
///     .build()
///     .unwrap();
///
/// assert_eq!(machine.initial_state(), &"locked");
/// assert_eq!(machine.label(), Some("turnstile"));
/// ```
pub struct StateMachineBuilder<S: State, E: Event> {
    initial: Option<S>,
    transitions: Vec<Transition<S, E>>,
    options: MachineOptions,
    delegate: Option<(Arc<dyn Delegate<S, E>>, Handle)>,
    extra_delegate: bool,
}

impl<S: State, E: Event> StateMachineBuilder<S, E> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            initial: None,
            transitions: Vec::new(),
            options: MachineOptions::default(),
            delegate: None,
            extra_delegate: false,
        }
    }

    /// Set the initial state (required).
    pub fn initial(mut self, state: S) -> Self {
        self.initial = Some(state);
        self
    }

    /// Add a transition from its parts.
    pub fn transition(mut self, from: S, event: E, to: S) -> Self {
        self.transitions.push(Transition::new(from, event, to));
        self
    }

    /// Add a pre-built transition.
    pub fn add_transition(mut self, transition: Transition<S, E>) -> Self {
        self.transitions.push(transition);
        self
    }

    /// Add multiple transitions at once.
    pub fn transitions<I>(mut self, transitions: I) -> Self
    where
        I: IntoIterator<Item = Transition<S, E>>,
    {
        self.transitions.extend(transitions);
        self
    }

    pub fn log_capacity(mut self, capacity: NonZeroUsize) -> Self {
        self.options.log_capacity = Some(capacity);
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.options.label = Some(label.into());
        self
    }

    /// Replace capacity and label with host-loaded settings.
    pub fn options(mut self, options: MachineOptions) -> Self {
        self.options = options;
        self
    }

    /// Notify `delegate` of every outcome, on a task spawned on `handle`.
    ///
    /// A machine takes one sink; setting a second delegate, or combining a
    /// delegate with [`build_with_notifications`](Self::build_with_notifications),
    /// fails the build.
    pub fn delegate<D>(mut self, delegate: D, handle: Handle) -> Self
    where
        D: Delegate<S, E>,
    {
        if self.delegate.is_some() {
            self.extra_delegate = true;
        }
        let delegate: Arc<dyn Delegate<S, E>> = Arc::new(delegate);
        self.delegate = Some((delegate, handle));
        self
    }

    /// Build the machine, validating the transition table.
    pub fn build(self) -> Result<StateMachine<S, E>, BuildError> {
        if self.extra_delegate {
            return Err(BuildError::ConflictingNotificationSinks);
        }
        let initial = self.initial.ok_or(BuildError::MissingInitialState)?;
        let table = validate_table(self.transitions)?;

        let id = Uuid::new_v4();
        let sink = match self.delegate {
            Some((delegate, handle)) => Sink::delegate(delegate, &handle, id),
            None => Sink::Silent,
        };

        Ok(StateMachine::assemble(id, initial, table, self.options, sink))
    }

    /// Build the machine together with its pull-style notification lanes.
    pub fn build_with_notifications(
        self,
    ) -> Result<(StateMachine<S, E>, Notifications<S, E>), BuildError> {
        if self.delegate.is_some() {
            return Err(BuildError::ConflictingNotificationSinks);
        }
        let initial = self.initial.ok_or(BuildError::MissingInitialState)?;
        let table = validate_table(self.transitions)?;

        let (sink, notifications) = Sink::lanes();
        let machine = StateMachine::assemble(Uuid::new_v4(), initial, table, self.options, sink);
        Ok((machine, notifications))
    }
}

impl<S: State, E: Event> Default for StateMachineBuilder<S, E> {
    fn default() -> Self {
        Self::new()
    }
}
