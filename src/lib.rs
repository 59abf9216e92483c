//! Lockstep: a concurrency-safe, table-driven finite state machine
//!
//! A host defines states, events and a table of legal
//! `(state, event) -> state` transitions, then feeds events one at a time.
//! The table is validated once, up front: a table that maps any
//! `(state, event)` pair to two different targets is refused, so processing
//! an event is never ambiguous.
//!
//! # Core Concepts
//!
//! - **Transition**: an immutable `(from, event, to)` triple
//! - **TransitionTable**: the deterministic set of transitions, with pure
//!   queries that need no locking
//! - **StateMachine**: a shareable handle that serializes `process` calls
//!   and records committed transitions in a bounded log
//! - **Outcome**: `Committed` or `Rejected`; rejection is not an error
//! - **Notifications**: a push-style `Delegate` or pull-style lanes, always
//!   delivered off the caller's task
//!
//! # Example
//!
//! ```rust
//! use lockstep::builder::StateMachineBuilder;
//! use lockstep::state_enum;
//!
//! state_enum! {
//!     enum Door {
//!         Closed,
//!         Open,
//!         Locked,
//!     }
//! }
//!
//! state_enum! {
//!     enum Action {
//!         Open,
//!         Close,
//!         Lock,
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let door = StateMachineBuilder::new()
//!     .initial(Door::Closed)
//!     .transition(Door::Closed, Action::Open, Door::Open)
//!     .transition(Door::Open, Action::Close, Door::Closed)
//!     .transition(Door::Closed, Action::Lock, Door::Locked)
//!     .build()
//!     .unwrap();
//!
//! door.process(Action::Lock).await;
//! let outcome = door.process(Action::Open).await;
//!
//! assert!(outcome.is_rejected());
//! assert_eq!(door.state().await, Door::Locked);
//! assert!(door.at_ending_state().await);
//! # }
//! ```

pub mod builder;
pub mod core;
pub mod machine;

// Re-export commonly used types
pub use builder::{BuildError, MachineOptions, StateMachineBuilder};
pub use crate::core::{
    AmbiguousTransitionTable, BoundedLog, Event, State, Transition, TransitionQuery,
    TransitionTable,
};
pub use machine::{Delegate, Notifications, Outcome, Rejection, Snapshot, StateMachine};
