//! Builder for the state tree.

use crate::builder::error::BuildError;
use crate::core::{Initial, NodeIx, State, StateId, TransitionInfo, Trigger};
use crate::engine::Context;
use std::any::Any;

/// Builder for one state and, recursively, its children.
pub struct StateBuilder<D, P = ()> {
    pub(crate) id: u16,
    pub(crate) name: Option<String>,
    pub(crate) children: Vec<StateBuilder<D, P>>,
    pub(crate) initial: Option<u16>,
    initial_effect: Option<crate::core::Effect<D, P>>,
    entry: Option<crate::core::Action<D, P>>,
    exit: Option<crate::core::Action<D, P>>,
    data: Option<Box<dyn Any + Send + Sync>>,
}

impl<D, P> StateBuilder<D, P> {
    /// Start a state with the given id. `0` is rejected at build time.
    pub fn new(id: impl Into<u16>) -> Self {
        Self {
            id: id.into(),
            name: None,
            children: Vec::new(),
            initial: None,
            initial_effect: None,
            entry: None,
            exit: None,
            data: None,
        }
    }

    /// Set the name used in logs. Defaults to `state-<id>`.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Append a child state.
    pub fn child(mut self, child: StateBuilder<D, P>) -> Self {
        self.children.push(child);
        self
    }

    /// Append several child states.
    pub fn children(mut self, children: impl IntoIterator<Item = StateBuilder<D, P>>) -> Self {
        self.children.extend(children);
        self
    }

    /// Set the default descendant entered when no explicit target is given.
    pub fn initial(mut self, target: impl Into<u16>) -> Self {
        self.initial = Some(target.into());
        self
    }

    /// Like [`initial`](Self::initial), with an effect run before the
    /// descent.
    pub fn initial_with<F>(mut self, target: impl Into<u16>, effect: F) -> Self
    where
        F: Fn(&mut Context<'_, D, P>, &TransitionInfo<'_, P>) + Send + Sync + 'static,
    {
        self.initial = Some(target.into());
        self.initial_effect = Some(Box::new(effect));
        self
    }

    /// Behavior run after the state becomes active.
    pub fn on_entry<F>(mut self, action: F) -> Self
    where
        F: Fn(&mut Context<'_, D, P>, StateId, Option<&Trigger<P>>) + Send + Sync + 'static,
    {
        self.entry = Some(Box::new(action));
        self
    }

    /// Behavior run before the state becomes inactive, after its
    /// descendants have exited.
    pub fn on_exit<F>(mut self, action: F) -> Self
    where
        F: Fn(&mut Context<'_, D, P>, StateId, Option<&Trigger<P>>) + Send + Sync + 'static,
    {
        self.exit = Some(Box::new(action));
        self
    }

    /// Attach opaque domain data, readable through [`State::data`] and
    /// [`Context::state_data`].
    pub fn data<T: Any + Send + Sync>(mut self, data: T) -> Self {
        self.data = Some(Box::new(data));
        self
    }

    /// Append this subtree to `nodes` in pre-order. Returns the index of
    /// this state.
    pub(crate) fn flatten(
        self,
        parent: Option<NodeIx>,
        nodes: &mut Vec<State<D, P>>,
    ) -> Result<NodeIx, BuildError> {
        let ix = nodes.len();
        let id = StateId::new(self.id).ok_or(BuildError::ReservedStateId)?;
        let initial = match self.initial {
            Some(target) => Some(Initial {
                target: StateId::new(target).ok_or(BuildError::ReservedStateId)?,
                effect: self.initial_effect,
            }),
            None => None,
        };
        nodes.push(State {
            id,
            name: self.name.unwrap_or_else(|| format!("state-{id}")),
            parent,
            children: Vec::with_capacity(self.children.len()),
            initial,
            entry: self.entry,
            exit: self.exit,
            data: self.data,
        });
        for child in self.children {
            let child_ix = child.flatten(Some(ix), nodes)?;
            nodes[ix].children.push(child_ix);
        }
        Ok(ix)
    }
}
