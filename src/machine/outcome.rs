//! What a single `process` call produced.

use crate::core::{Event, State, Transition};
use serde::{Deserialize, Serialize};

/// An event that matched no transition from the state the machine was in.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rejection<S, E> {
    /// State at the moment of rejection (unchanged by it)
    pub state: S,
    /// The event that found no transition
    pub event: E,
}

/// Result of processing one event.
///
/// Rejection is an ordinary outcome, not an error: `process` never fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome<S, E> {
    /// A transition matched and was applied
    Committed(Transition<S, E>),

    /// No transition matched; nothing but the processed-events counter moved
    Rejected(Rejection<S, E>),
}

impl<S: State, E: Event> Outcome<S, E> {
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed(_))
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }

    pub fn transition(&self) -> Option<&Transition<S, E>> {
        match self {
            Self::Committed(transition) => Some(transition),
            Self::Rejected(_) => None,
        }
    }

    pub fn rejection(&self) -> Option<&Rejection<S, E>> {
        match self {
            Self::Committed(_) => None,
            Self::Rejected(rejection) => Some(rejection),
        }
    }

    /// The state the machine was left in by this call.
    pub fn state(&self) -> &S {
        match self {
            Self::Committed(transition) => transition.to(),
            Self::Rejected(rejection) => &rejection.state,
        }
    }

    /// The event that was processed.
    pub fn event(&self) -> &E {
        match self {
            Self::Committed(transition) => transition.event(),
            Self::Rejected(rejection) => &rejection.event,
        }
    }
}
