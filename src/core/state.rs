//! Capability traits for the values a machine is generic over.
//!
//! States and events are opaque to the engine. The only things it ever does
//! with them are compare, hash, clone and print them, so both traits are
//! blanket-implemented for every type that supports those operations.

use std::fmt::Debug;
use std::hash::Hash;

/// Trait for state machine states.
///
/// # Required Traits
///
/// - `Clone`: states are copied into transitions, outcomes and snapshots
/// - `Eq` + `Hash`: states key the transition index
/// - `Debug`: states are rendered into errors and log events
/// - `Send` + `Sync` + `'static`: a machine is shared across tasks
///
/// # Example
///
/// ```rust
/// use lockstep::core::State;
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug)]
/// enum Door {
///     Open,
///     Closed,
/// }
///
/// fn assert_state<S: State>(_: &S) {}
/// assert_state(&Door::Open);
/// assert_state(&"any string works too");
/// ```
pub trait State: Clone + Eq + Hash + Debug + Send + Sync + 'static {}

impl<T> State for T where T: Clone + Eq + Hash + Debug + Send + Sync + 'static {}

/// Trait for the stimuli fed into a machine.
///
/// Same capability set as [`State`]; kept as a separate trait so signatures
/// read `Transition<S: State, E: Event>`.
pub trait Event: Clone + Eq + Hash + Debug + Send + Sync + 'static {}

impl<T> Event for T where T: Clone + Eq + Hash + Debug + Send + Sync + 'static {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[derive(Clone, PartialEq, Eq, Hash, Debug)]
    enum TestState {
        Initial,
        Processing,
        Complete,
    }

    fn requires_state<S: State>(state: S) -> S {
        state
    }

    fn requires_event<E: Event>(event: E) -> E {
        event
    }

    #[test]
    fn enums_strings_and_integers_are_states() {
        assert_eq!(requires_state(TestState::Initial), TestState::Initial);
        assert_eq!(requires_state("idle".to_string()), "idle");
        assert_eq!(requires_state(7u32), 7);
    }

    #[test]
    fn the_same_types_are_events() {
        assert_eq!(requires_event("go"), "go");
        assert_eq!(requires_event(TestState::Complete), TestState::Complete);
    }

    #[test]
    fn states_hash_consistently_with_equality() {
        let mut set = HashSet::new();
        set.insert(TestState::Processing);
        set.insert(TestState::Processing.clone());
        set.insert(TestState::Complete);

        assert_eq!(set.len(), 2);
        assert!(set.contains(&TestState::Processing));
    }
}
