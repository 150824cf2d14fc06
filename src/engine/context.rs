//! Context provided to guards and callbacks.

use crate::core::{EventId, StateId, StateTree, ROOT};
use crate::engine::machine::Runtime;
use std::any::Any;

/// The machine as seen from inside a guard, effect, entry or exit callback.
///
/// Callbacks may read and write domain data freely. They cannot re-enter
/// the dispatch loop: [`Context::dispatch`] only admits the event into the
/// pending pool, and [`Context::terminate`] only requests termination, which
/// the engine performs once the current pass has unwound.
pub struct Context<'a, D, P> {
    tree: &'a StateTree<D, P>,
    rt: &'a mut Runtime<D, P>,
}

impl<'a, D, P> Context<'a, D, P> {
    pub(crate) fn new(tree: &'a StateTree<D, P>, rt: &'a mut Runtime<D, P>) -> Self {
        Self { tree, rt }
    }

    pub fn data(&self) -> &D {
        &self.rt.data
    }

    pub fn data_mut(&mut self) -> &mut D {
        &mut self.rt.data
    }

    pub fn is_active(&self, id: StateId) -> bool {
        self.tree
            .index_of(id)
            .is_some_and(|ix| self.rt.active[ix])
    }

    /// Innermost active state at this point of the pass.
    pub fn active_state(&self) -> Option<StateId> {
        self.tree
            .active_leaf(ROOT, &self.rt.active)
            .map(|ix| self.tree.id_of(ix))
    }

    /// Opaque data attached to state `id`, if it has type `T`.
    pub fn state_data<T: Any>(&self, id: StateId) -> Option<&T> {
        self.tree.find_by_id(id).and_then(|state| state.data::<T>())
    }

    /// Admit `event` without a payload; it is processed on a later pass.
    /// Returns the number of transition slots admitted; slots still
    /// pending from the dispatch in flight count, and move to the next pass.
    pub fn dispatch(&mut self, event: impl Into<EventId>) -> usize {
        self.rt.admit(event.into(), || None)
    }

    /// Admit `event` with a payload; it is processed on a later pass.
    pub fn dispatch_with(&mut self, event: impl Into<EventId>, payload: P) -> usize
    where
        P: Clone,
    {
        self.rt.admit(event.into(), || Some(payload.clone()))
    }

    /// Exit the whole active configuration once the current pass finishes.
    pub fn terminate(&mut self) {
        tracing::debug!("termination requested from callback");
        self.rt.terminate_requested = true;
    }
}
