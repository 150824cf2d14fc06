//! Builder for constructing state machines.

use crate::builder::error::BuildError;
use crate::builder::state::StateBuilder;
use crate::builder::transition::TransitionBuilder;
use crate::builder::validate;
use crate::core::{StateTree, Transition};
use crate::engine::StateMachine;
use serde::{Deserialize, Serialize};

/// Per-machine settings.
///
/// Missing fields fall back to their defaults when deserialized:
///
/// ```rust
/// use statechart::builder::MachineConfig;
///
/// let config = MachineConfig::from_json(r#"{ "name": "thermostat" }"#).unwrap();
/// assert_eq!(config.name, "thermostat");
/// assert_eq!(config.history_capacity, 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// Name used in log events and errors.
    pub name: String,
    /// Number of transition records kept; `0` disables history.
    pub history_capacity: usize,
}

impl MachineConfig {
    pub fn from_json(json: &str) -> Result<Self, BuildError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            name: "statechart".to_string(),
            history_capacity: 64,
        }
    }
}

/// Builder for constructing state machines with a fluent API.
///
/// Transitions are kept in insertion order, which is also the order in
/// which sibling candidates are tried at dispatch time.
pub struct StateMachineBuilder<D, P = ()> {
    data: D,
    config: MachineConfig,
    root: Option<StateBuilder<D, P>>,
    transitions: Vec<Transition<D, P>>,
}

impl<D, P> StateMachineBuilder<D, P> {
    /// Create a new builder owning the machine's domain data.
    pub fn new(data: D) -> Self {
        Self {
            data,
            config: MachineConfig::default(),
            root: None,
            transitions: Vec::new(),
        }
    }

    /// Set the root state (required).
    pub fn root(mut self, root: StateBuilder<D, P>) -> Self {
        self.root = Some(root);
        self
    }

    /// Add a transition using a builder.
    /// Returns an error if the builder fails validation.
    pub fn transition(mut self, builder: TransitionBuilder<D, P>) -> Result<Self, BuildError> {
        let transition = builder.build()?;
        self.transitions.push(transition);
        Ok(self)
    }

    /// Add a pre-built transition.
    pub fn add_transition(mut self, transition: Transition<D, P>) -> Self {
        self.transitions.push(transition);
        self
    }

    /// Add multiple transitions at once.
    pub fn transitions(mut self, transitions: Vec<Transition<D, P>>) -> Self {
        self.transitions.extend(transitions);
        self
    }

    pub fn config(mut self, config: MachineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    pub fn history_capacity(mut self, capacity: usize) -> Self {
        self.config.history_capacity = capacity;
        self
    }

    /// Build the state machine.
    ///
    /// Returns [`BuildError::Invalid`] listing every problem found in the
    /// state tree and the transition table.
    pub fn build(self) -> Result<StateMachine<D, P>, BuildError> {
        let root = self.root.ok_or(BuildError::MissingRoot)?;
        validate::into_result(validate::check_states(&root))?;

        let mut nodes = Vec::new();
        root.flatten(None, &mut nodes)?;
        let tree = StateTree::from_nodes(nodes);
        validate::into_result(validate::check_definition(&tree, &self.transitions))?;

        tracing::debug!(
            machine = %self.config.name,
            states = tree.len(),
            transitions = self.transitions.len(),
            "built state machine"
        );
        Ok(StateMachine::new(
            self.config,
            tree,
            self.transitions,
            self.data,
        ))
    }
}
