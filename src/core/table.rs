//! The validated set of transitions that defines a machine.
//!
//! Validation happens once, in [`TransitionTable::new`]. After that the
//! table is immutable and every query is a pure function over it, so the
//! table can be shared across threads and read without any locking.

use super::error::{AmbiguousTransitionTable, Conflict};
use super::state::{Event, State};
use super::transition::Transition;
use std::collections::{hash_set, HashMap, HashSet};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Read-only queries over a set of transitions.
///
/// Only [`transition_set`](TransitionQuery::transition_set) is required;
/// everything else has a default body built on it. Implementors with an
/// index (like [`TransitionTable`]) override
/// [`transition`](TransitionQuery::transition).
pub trait TransitionQuery<S: State, E: Event> {
    /// Every transition known to the implementor.
    fn transition_set(&self) -> &HashSet<Transition<S, E>>;

    /// The unique transition for `(from, event)`, if any.
    fn transition(&self, from: &S, event: &E) -> Option<&Transition<S, E>> {
        self.transition_set()
            .iter()
            .find(|t| t.from() == from && t.event() == event)
    }

    /// All transitions originating at `from`.
    fn transitions_from(&self, from: &S) -> HashSet<&Transition<S, E>> {
        self.transition_set()
            .iter()
            .filter(|t| t.from() == from)
            .collect()
    }

    /// All transitions arriving at `to`.
    fn transitions_to(&self, to: &S) -> HashSet<&Transition<S, E>> {
        self.transition_set()
            .iter()
            .filter(|t| t.to() == to)
            .collect()
    }

    /// All transitions directly connecting `from` to `to`.
    fn transitions_between(&self, from: &S, to: &S) -> HashSet<&Transition<S, E>> {
        self.transition_set()
            .iter()
            .filter(|t| t.from() == from && t.to() == to)
            .collect()
    }

    /// Distinct events accepted at `from`.
    fn events_from(&self, from: &S) -> HashSet<&E> {
        self.transitions_from(from)
            .into_iter()
            .map(Transition::event)
            .collect()
    }

    /// Distinct events whose transitions land on `to`.
    fn events_to(&self, to: &S) -> HashSet<&E> {
        self.transitions_to(to)
            .into_iter()
            .map(Transition::event)
            .collect()
    }

    /// True when a single transition leads from `from` to `to`.
    ///
    /// This is direct adjacency, not multi-step reachability.
    fn can_reach(&self, from: &S, to: &S) -> bool {
        self.transition_set()
            .iter()
            .any(|t| t.from() == from && t.to() == to)
    }

    /// True when no transition leaves `state`.
    fn is_terminal(&self, state: &S) -> bool {
        !self.transition_set().iter().any(|t| t.from() == state)
    }

    /// Every state named by any transition, as source or target.
    fn states(&self) -> HashSet<&S> {
        self.transition_set()
            .iter()
            .flat_map(|t| [t.from(), t.to()])
            .collect()
    }
}

/// A deterministic transition table.
///
/// For every `(from, event)` pair there is at most one transition. A set
/// that violates this is rejected by [`TransitionTable::new`].
///
/// # Example
///
/// ```rust
/// use lockstep::core::{Transition, TransitionQuery, TransitionTable};
///
/// let table = TransitionTable::new([
///     Transition::new("s1", "e1", "s2"),
///     Transition::new("s2", "e2", "s3"),
///     Transition::new("s1", "e3", "s3"),
/// ])
/// .unwrap();
///
/// assert_eq!(table.transition(&"s1", &"e1").map(|t| *t.to()), Some("s2"));
/// assert!(table.is_terminal(&"s3"));
///
/// let ambiguous = TransitionTable::new([
///     Transition::new("s1", "e1", "s2"),
///     Transition::new("s1", "e1", "s3"),
/// ]);
/// assert!(ambiguous.is_err());
/// ```
#[derive(Clone, Debug)]
pub struct TransitionTable<S: State, E: Event> {
    transitions: HashSet<Transition<S, E>>,
    index: HashMap<(S, E), Transition<S, E>>,
}

impl<S: State, E: Event> TransitionTable<S, E> {
    /// Validate `transitions` and build the table.
    ///
    /// Identical transitions collapse into one. Two transitions sharing
    /// `(from, event)` but differing in `to` make the table ambiguous; all
    /// such pairs are collected into the returned error.
    pub fn new<I>(transitions: I) -> Result<Self, AmbiguousTransitionTable>
    where
        I: IntoIterator<Item = Transition<S, E>>,
    {
        let transitions: HashSet<Transition<S, E>> = transitions.into_iter().collect();
        check_determinism(&transitions)?;

        let mut index = HashMap::with_capacity(transitions.len());
        for transition in &transitions {
            let key = (transition.from().clone(), transition.event().clone());
            let previous = index.insert(key, transition.clone());
            assert!(
                previous.is_none(),
                "validated transition table indexed two targets for {:?} on {:?}",
                transition.from(),
                transition.event()
            );
        }

        Ok(Self { transitions, index })
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    pub fn contains(&self, transition: &Transition<S, E>) -> bool {
        self.transitions.contains(transition)
    }

    /// Iterate the transitions in unspecified order.
    pub fn iter(&self) -> hash_set::Iter<'_, Transition<S, E>> {
        self.transitions.iter()
    }
}

impl<S: State, E: Event> TransitionQuery<S, E> for TransitionTable<S, E> {
    fn transition_set(&self) -> &HashSet<Transition<S, E>> {
        &self.transitions
    }

    fn transition(&self, from: &S, event: &E) -> Option<&Transition<S, E>> {
        // The index is keyed by owned pairs, so the probe is cloned.
        self.index.get(&(from.clone(), event.clone()))
    }
}

impl<'a, S: State, E: Event> IntoIterator for &'a TransitionTable<S, E> {
    type Item = &'a Transition<S, E>;
    type IntoIter = hash_set::Iter<'a, Transition<S, E>>;

    fn into_iter(self) -> Self::IntoIter {
        self.transitions.iter()
    }
}

/// Group by `(from, event)` and accumulate every group with more than one
/// target.
fn check_determinism<S: State, E: Event>(
    transitions: &HashSet<Transition<S, E>>,
) -> Result<(), AmbiguousTransitionTable> {
    let mut groups: HashMap<(&S, &E), Vec<&S>> = HashMap::new();
    for transition in transitions {
        groups
            .entry((transition.from(), transition.event()))
            .or_default()
            .push(transition.to());
    }

    let checks: Vec<Validation<(), NonEmptyVec<Conflict>>> = groups
        .into_iter()
        .map(|((from, event), targets)| {
            if targets.len() > 1 {
                let mut targets: Vec<String> =
                    targets.iter().map(|s| format!("{s:?}")).collect();
                targets.sort();
                Validation::fail(Conflict {
                    from: format!("{from:?}"),
                    event: format!("{event:?}"),
                    targets,
                })
            } else {
                Validation::success(())
            }
        })
        .collect();

    match Validation::all_vec(checks) {
        Validation::Success(_) => Ok(()),
        Validation::Failure(errors) => {
            let mut conflicts: Vec<Conflict> = errors.iter().cloned().collect();
            conflicts.sort();
            Err(AmbiguousTransitionTable { conflicts })
        }
    }
}
