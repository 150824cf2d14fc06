//! State definitions.
//!
//! A [`State`] is one node of the machine's state tree. Its shape (children,
//! initial transition, callbacks) is fixed once the machine is built; the
//! `active` flag lives in the running machine, not in the definition.

use super::ids::StateId;
use super::transition::{Effect, Trigger};
use crate::engine::Context;
use std::any::Any;
use std::fmt;

/// Entry or exit behavior of a state.
///
/// Receives the callback context, the id of the state being entered or
/// exited, and the trigger that caused it. The root's entry on `init` and
/// exits caused by `terminate` see `None`; states entered through an
/// initial transition see the completion trigger.
pub type Action<D, P> =
    Box<dyn Fn(&mut Context<'_, D, P>, StateId, Option<&Trigger<P>>) + Send + Sync>;

/// Index of a state in the tree arena.
pub(crate) type NodeIx = usize;

/// A composite state's default child, followed automatically on entry when
/// no explicit target is given.
pub struct Initial<D, P> {
    pub(crate) target: StateId,
    pub(crate) effect: Option<Effect<D, P>>,
}

impl<D, P> Initial<D, P> {
    pub fn target(&self) -> StateId {
        self.target
    }
}

/// A node of the state tree.
pub struct State<D, P> {
    pub(crate) id: StateId,
    pub(crate) name: String,
    pub(crate) parent: Option<NodeIx>,
    pub(crate) children: Vec<NodeIx>,
    pub(crate) initial: Option<Initial<D, P>>,
    pub(crate) entry: Option<Action<D, P>>,
    pub(crate) exit: Option<Action<D, P>>,
    pub(crate) data: Option<Box<dyn Any + Send + Sync>>,
}

impl<D, P> State<D, P> {
    pub fn id(&self) -> StateId {
        self.id
    }

    /// Name used in logs and diagnostics.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// A state with no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn initial(&self) -> Option<&Initial<D, P>> {
        self.initial.as_ref()
    }

    /// Opaque domain data attached to this state, if it has the requested type.
    pub fn data<T: Any>(&self) -> Option<&T> {
        self.data.as_deref().and_then(|data| data.downcast_ref::<T>())
    }
}

impl<D, P> fmt::Debug for State<D, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("children", &self.children.len())
            .field("initial", &self.initial.as_ref().map(|i| i.target))
            .field("entry", &self.entry.is_some())
            .field("exit", &self.exit.is_some())
            .finish()
    }
}
