//! Build errors for the state machine builder.

use crate::core::AmbiguousTransitionTable;
use thiserror::Error;

/// Errors that can occur when building a state machine.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Initial state not specified. Call .initial(state) before .build()")]
    MissingInitialState,

    #[error(transparent)]
    AmbiguousTransitionTable(#[from] AmbiguousTransitionTable),

    #[error("A machine takes one notification sink: a delegate or notification lanes, not both")]
    ConflictingNotificationSinks,
}
