//! Build errors for state machine, state and transition builders.

use thiserror::Error;

/// Errors that can occur when building a state machine.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Root state not specified. Call .root(state) before .build()")]
    MissingRoot,

    #[error("Transition source state not specified. Call .from(state)")]
    MissingSource,

    #[error("State id 0 is reserved for \"no state\"")]
    ReservedStateId,

    #[error("Invalid state machine configuration: {}", describe(.0))]
    Invalid(Vec<ConfigError>),

    #[error("Invalid machine config: {0}")]
    Config(#[from] serde_json::Error),
}

impl BuildError {
    /// Configuration problems reported by validation, if any.
    pub fn problems(&self) -> &[ConfigError] {
        match self {
            Self::Invalid(errors) => errors,
            _ => &[],
        }
    }
}

fn describe(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// A single problem found while validating the state tree and the
/// transition table. All problems are collected before reporting.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("State '{name}' uses the reserved id 0")]
    ReservedStateId { name: String },

    #[error("State id {id} is declared more than once")]
    DuplicateStateId { id: u16 },

    #[error("Transition #{index} starts from unknown state {state}")]
    UnknownSource { index: usize, state: u16 },

    #[error("Transition #{index} targets unknown state {target}")]
    UnknownTarget { index: usize, target: u16 },

    #[error("Initial transition of state {state} targets unknown state {target}")]
    UnknownInitialTarget { state: u16, target: u16 },

    #[error("Initial transition of state {state} targets {target}, which is not its descendant")]
    InitialNotDescendant { state: u16, target: u16 },

    #[error("Completion transition #{index} from state {state} has no target")]
    CompletionWithoutTarget { index: usize, state: u16 },

    #[error("Transition #{index} from state {state} cannot reach {target} from the state's parent")]
    UnreachableTarget { index: usize, state: u16, target: u16 },
}
