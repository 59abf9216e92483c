//! The concurrency boundary around the pure core.
//!
//! # Key Concepts
//!
//! - **StateMachine**: a shareable handle that serializes event processing
//! - **Outcome**: every `process` call either commits or rejects; neither is
//!   an error
//! - **Notifications**: one sink per machine, either a push-style
//!   `Delegate` or pull-style lanes, always delivered off the lock

mod engine;
mod notify;
mod outcome;

pub(crate) use engine::validate_table;
pub(crate) use notify::Sink;

pub use engine::{Snapshot, StateMachine};
pub use notify::{Delegate, Notifications};
pub use outcome::{Outcome, Rejection};
