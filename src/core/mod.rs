//! Core state machine types and logic.
//!
//! This module contains the lock-free part of the machine:
//! - State and event capabilities via the `State` and `Event` traits
//! - Immutable `Transition` triples
//! - The validated, deterministic `TransitionTable` and its queries
//! - The capacity-limited `BoundedLog` history
//!
//! Nothing here is mutated after construction except `BoundedLog`, which
//! the machine only touches while holding its lock.

mod error;
mod history;
mod state;
mod table;
mod transition;

pub use error::{AmbiguousTransitionTable, Conflict};
pub use history::BoundedLog;
pub use state::{Event, State};
pub use table::{TransitionQuery, TransitionTable};
pub use transition::Transition;
