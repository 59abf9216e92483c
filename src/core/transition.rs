//! The (from, event, to) triple.

use super::state::{Event, State};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An immutable edge of the machine: receiving `event` while in `from`
/// moves the machine to `to`.
///
/// Equality and hashing cover all three fields jointly. Fields are private
/// so a transition cannot be altered after it is built.
///
/// # Example
///
/// ```rust
/// use lockstep::core::Transition;
///
/// let t = Transition::new("locked", "coin", "unlocked");
/// assert_eq!(t.from(), &"locked");
/// assert_eq!(t.event(), &"coin");
/// assert_eq!(t.to(), &"unlocked");
/// assert_eq!(t.to_string(), "\"locked\" --\"coin\"--> \"unlocked\"");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transition<S, E> {
    from: S,
    event: E,
    to: S,
}

impl<S: State, E: Event> Transition<S, E> {
    pub fn new(from: S, event: E, to: S) -> Self {
        Self { from, event, to }
    }

    /// The state being transitioned from
    pub fn from(&self) -> &S {
        &self.from
    }

    /// The event that fires this transition
    pub fn event(&self) -> &E {
        &self.event
    }

    /// The state being transitioned to
    pub fn to(&self) -> &S {
        &self.to
    }

    /// True when the transition leaves the machine where it was.
    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }

    pub fn into_parts(self) -> (S, E, S) {
        (self.from, self.event, self.to)
    }
}

impl<S: State, E: Event> fmt::Display for Transition<S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} --{:?}--> {:?}", self.from, self.event, self.to)
    }
}

impl<S: State, E: Event> From<(S, E, S)> for Transition<S, E> {
    fn from((from, event, to): (S, E, S)) -> Self {
        Self::new(from, event, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
    enum TestState {
        Start,
        Middle,
        End,
    }

    #[test]
    fn equality_covers_all_three_fields() {
        let a = Transition::new(TestState::Start, "go", TestState::Middle);

        assert_eq!(a, Transition::new(TestState::Start, "go", TestState::Middle));
        assert_ne!(a, Transition::new(TestState::Start, "skip", TestState::Middle));
        assert_ne!(a, Transition::new(TestState::Start, "go", TestState::End));
        assert_ne!(a, Transition::new(TestState::Middle, "go", TestState::Middle));
    }

    #[test]
    fn identical_transitions_collapse_in_a_set() {
        let set: HashSet<_> = [
            Transition::new(TestState::Start, "go", TestState::Middle),
            Transition::new(TestState::Start, "go", TestState::Middle),
            Transition::new(TestState::Middle, "go", TestState::End),
        ]
        .into_iter()
        .collect();

        assert_eq!(set.len(), 2);
    }

    #[test]
    fn display_uses_arrow_notation() {
        let t = Transition::new(TestState::Middle, "finish", TestState::End);
        assert_eq!(t.to_string(), "Middle --\"finish\"--> End");
    }

    #[test]
    fn self_loop_detection() {
        assert!(Transition::new(TestState::End, 1u8, TestState::End).is_self_loop());
        assert!(!Transition::new(TestState::Start, 1u8, TestState::End).is_self_loop());
    }

    #[test]
    fn converts_from_tuple_and_back() {
        let t: Transition<TestState, &str> = (TestState::Start, "go", TestState::End).into();
        assert_eq!(t.into_parts(), (TestState::Start, "go", TestState::End));
    }

    #[test]
    fn transition_serializes_correctly() {
        let t = Transition::new(TestState::Start, "go".to_string(), TestState::Middle);
        let json = serde_json::to_string(&t).unwrap();
        let deserialized: Transition<TestState, String> = serde_json::from_str(&json).unwrap();
        assert_eq!(t, deserialized);
    }
}
