//! Builder API for ergonomic state machine construction.
//!
//! This module provides the fluent [`StateMachineBuilder`], host-loadable
//! [`MachineOptions`], and the [`state_enum!`](crate::state_enum) macro for
//! declaring state and event types with minimal boilerplate.

pub mod error;
pub mod machine;
pub mod macros;
pub mod options;

pub use error::BuildError;
pub use machine::StateMachineBuilder;
pub use options::MachineOptions;
