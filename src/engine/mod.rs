//! The execution engine.
//!
//! Runs a built machine: enters and exits states, classifies and executes
//! transitions, admits events into the pending-trigger pool and drives the
//! hierarchical dispatch loop.
//!
//! The engine is single-threaded and synchronous. Callbacks receive a
//! [`Context`] instead of the machine itself, so they can never re-enter a
//! pass in flight; events they raise are deferred to a later pass.

mod context;
mod dispatch;
mod error;
mod executor;
mod machine;
mod pool;

pub use context::Context;
pub use error::MachineError;
pub use machine::StateMachine;
