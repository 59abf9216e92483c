//! Capacity-limited transition history.
//!
//! A machine keeps the transitions it has committed in a [`BoundedLog`].
//! With a capacity set, the log holds the most recent `capacity` entries;
//! without one it grows for the machine's whole lifetime.

use super::state::{Event, State};
use super::transition::Transition;
use serde::{Deserialize, Serialize};
use std::collections::vec_deque::{self, VecDeque};
use std::num::NonZeroUsize;

/// Double-ended, oldest-first log that evicts its oldest entry on overflow.
///
/// # Example
///
/// ```rust
/// use lockstep::core::BoundedLog;
/// use std::num::NonZeroUsize;
///
/// let mut log = BoundedLog::with_capacity(NonZeroUsize::new(2).unwrap());
/// log.push("t1");
/// log.push("t2");
/// log.push("t3");
///
/// assert_eq!(log.len(), 2);
/// assert_eq!(log.peek_oldest(), Some(&"t2"));
/// assert_eq!(log.peek_newest(), Some(&"t3"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "LogRepr<T>", bound(deserialize = "T: Deserialize<'de>"))]
pub struct BoundedLog<T> {
    capacity: Option<NonZeroUsize>,
    entries: VecDeque<T>,
}

// Deserialized input is replayed through `push` so an oversized payload
// cannot break the capacity bound.
#[derive(Deserialize)]
struct LogRepr<T> {
    capacity: Option<NonZeroUsize>,
    entries: Vec<T>,
}

impl<T> From<LogRepr<T>> for BoundedLog<T> {
    fn from(repr: LogRepr<T>) -> Self {
        let mut log = Self::new(repr.capacity);
        for entry in repr.entries {
            log.push(entry);
        }
        log
    }
}

impl<T> Default for BoundedLog<T> {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl<T> BoundedLog<T> {
    /// Create an empty log; `None` means unbounded.
    pub fn new(capacity: Option<NonZeroUsize>) -> Self {
        let entries = match capacity {
            Some(cap) => VecDeque::with_capacity(cap.get()),
            None => VecDeque::new(),
        };
        Self { capacity, entries }
    }

    pub fn with_capacity(capacity: NonZeroUsize) -> Self {
        Self::new(Some(capacity))
    }

    pub fn unbounded() -> Self {
        Self::new(None)
    }

    pub fn capacity(&self) -> Option<NonZeroUsize> {
        self.capacity
    }

    /// Append an entry, evicting the oldest one first if the log is full.
    pub fn push(&mut self, entry: T) {
        if let Some(cap) = self.capacity {
            while self.entries.len() >= cap.get() {
                self.entries.pop_front();
            }
        }
        self.entries.push_back(entry);
    }

    pub fn pop_newest(&mut self) -> Option<T> {
        self.entries.pop_back()
    }

    pub fn pop_oldest(&mut self) -> Option<T> {
        self.entries.pop_front()
    }

    pub fn peek_newest(&self) -> Option<&T> {
        self.entries.back()
    }

    pub fn peek_oldest(&self) -> Option<&T> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries oldest-first.
    pub fn iter(&self) -> vec_deque::Iter<'_, T> {
        self.entries.iter()
    }
}

impl<S: State, E: Event> BoundedLog<Transition<S, E>> {
    /// Get the path of states traversed by the retained transitions.
    ///
    /// Returns the `from` state of the oldest retained transition, then the
    /// `to` state of each transition in order. Empty when the log is empty.
    ///
    /// # Example
    ///
    /// ```rust
    /// use lockstep::core::{BoundedLog, Transition};
    ///
    /// let mut log = BoundedLog::unbounded();
    /// log.push(Transition::new("one", "next", "two"));
    /// log.push(Transition::new("two", "next", "three"));
    ///
    /// assert_eq!(log.path(), vec![&"one", &"two", &"three"]);
    /// ```
    pub fn path(&self) -> Vec<&S> {
        let mut path = Vec::with_capacity(self.entries.len() + 1);
        if let Some(first) = self.entries.front() {
            path.push(first.from());
        }
        for transition in &self.entries {
            path.push(transition.to());
        }
        path
    }
}

impl<'a, T> IntoIterator for &'a BoundedLog<T> {
    type Item = &'a T;
    type IntoIter = vec_deque::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cap(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn new_log_is_empty() {
        let log: BoundedLog<u32> = BoundedLog::unbounded();
        assert!(log.is_empty());
        assert_eq!(log.len(), 0);
        assert!(log.peek_newest().is_none());
        assert!(log.peek_oldest().is_none());
        assert!(log.capacity().is_none());
    }

    #[test]
    fn push_beyond_capacity_evicts_oldest() {
        let mut log = BoundedLog::with_capacity(cap(2));
        log.push("T1");
        log.push("T2");
        log.push("T3");

        assert_eq!(log.len(), 2);
        assert_eq!(log.peek_oldest(), Some(&"T2"));
        assert_eq!(log.peek_newest(), Some(&"T3"));
        assert_eq!(log.iter().copied().collect::<Vec<_>>(), vec!["T2", "T3"]);
    }

    #[test]
    fn capacity_one_keeps_only_newest() {
        let mut log = BoundedLog::with_capacity(cap(1));
        for i in 0..5 {
            log.push(i);
        }
        assert_eq!(log.len(), 1);
        assert_eq!(log.peek_newest(), Some(&4));
    }

    #[test]
    fn unbounded_log_keeps_everything() {
        let mut log = BoundedLog::unbounded();
        for i in 0..1000 {
            log.push(i);
        }
        assert_eq!(log.len(), 1000);
        assert_eq!(log.peek_oldest(), Some(&0));
    }

    #[test]
    fn pops_from_both_ends() {
        let mut log = BoundedLog::unbounded();
        log.push(1);
        log.push(2);
        log.push(3);

        assert_eq!(log.pop_oldest(), Some(1));
        assert_eq!(log.pop_newest(), Some(3));
        assert_eq!(log.pop_newest(), Some(2));
        assert_eq!(log.pop_newest(), None);
        assert_eq!(log.pop_oldest(), None);
        assert!(log.is_empty());
    }

    #[test]
    fn peek_does_not_mutate() {
        let mut log = BoundedLog::unbounded();
        log.push('a');
        let _ = log.peek_newest();
        let _ = log.peek_oldest();
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn path_follows_retained_transitions() {
        let mut log = BoundedLog::with_capacity(cap(2));
        log.push(Transition::new("s1", "e1", "s2"));
        log.push(Transition::new("s2", "e2", "s3"));
        log.push(Transition::new("s3", "e3", "s4"));

        assert_eq!(log.path(), vec![&"s2", &"s3", &"s4"]);
    }

    #[test]
    fn log_serializes_correctly() {
        let mut log = BoundedLog::with_capacity(cap(3));
        log.push(1u32);
        log.push(2);

        let json = serde_json::to_string(&log).unwrap();
        let deserialized: BoundedLog<u32> = serde_json::from_str(&json).unwrap();
        assert_eq!(log, deserialized);
    }

    #[test]
    fn oversized_payload_is_trimmed_on_deserialize() {
        let json = r#"{"capacity":2,"entries":[1,2,3,4]}"#;
        let log: BoundedLog<u32> = serde_json::from_str(json).unwrap();

        assert_eq!(log.len(), 2);
        assert_eq!(log.iter().copied().collect::<Vec<_>>(), vec![3, 4]);
    }
}
