//! Runtime errors of the engine.

use thiserror::Error;

/// Errors returned by [`StateMachine`](crate::engine::StateMachine) lifecycle calls.
///
/// Dispatching an event nothing is waiting for is not an error; it is a
/// silent no-op.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MachineError {
    #[error("State machine '{machine}' is already running. Call .terminate() before .init()")]
    AlreadyInitialized { machine: String },

    #[error("State machine '{machine}' was terminated by a callback during init")]
    TerminatedDuringInit { machine: String },
}
