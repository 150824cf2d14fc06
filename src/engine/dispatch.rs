//! Hierarchical dispatch loop.
//!
//! A pass starts at the root and descends the active chain; the innermost
//! state gets the first chance to consume work and unconsumed work bubbles
//! up towards the root. At most one transition fires per pass.

use crate::core::{Cause, EventId, NodeIx, TransitionInfo, Trigger};
use crate::engine::executor::{Executor, Route};

impl<'m, D, P> Executor<'m, D, P> {
    /// Process `current` and, first, its active descendants.
    ///
    /// `offer` is the event being dispatched, or `None` for a step that
    /// re-checks pending and completion work. Returns the settled state if a
    /// transition fired at or below `current`.
    pub(crate) fn process(&mut self, current: NodeIx, offer: Option<EventId>) -> Option<NodeIx> {
        if !self.rt.active[current] {
            return None;
        }
        let tree = self.tree;
        if let Some(child) = tree.active_child(current, &self.rt.active) {
            if let Some(settled) = self.process(child, offer) {
                return Some(settled);
            }
        }
        if let Some(settled) = self.resolve_completion(current) {
            return Some(settled);
        }
        self.resolve_pending(current, offer)
    }

    /// Fire the first eligible completion transition out of `current`.
    ///
    /// A candidate is eligible when its target is inactive, or when
    /// `current` lies inside the target's subtree (returning to an active
    /// ancestor); its guard must also hold.
    fn resolve_completion(&mut self, current: NodeIx) -> Option<NodeIx> {
        let tree = self.tree;
        let transitions = self.transitions;
        let id = tree.id_of(current);

        for transition in transitions
            .iter()
            .filter(|transition| transition.source == id && transition.is_completion())
        {
            let Some(target) = transition.target.and_then(|target| tree.index_of(target)) else {
                continue;
            };
            if self.rt.active[target] && !tree.is_descendant_ix(target, current) {
                continue;
            }
            let trigger = Trigger::completion();
            let info = TransitionInfo {
                source: id,
                target: transition.target,
                kind: transition.kind(tree),
                trigger: &trigger,
            };
            if self.evaluate(transition.guard.as_ref(), &info) {
                let route = Route::declared(transition, Cause::Completion);
                return Some(self.execute(current, Some(target), &route, &trigger));
            }
        }
        None
    }

    /// Fire the first pending, guard-satisfied transition out of `current`.
    fn resolve_pending(&mut self, current: NodeIx, offer: Option<EventId>) -> Option<NodeIx> {
        let tree = self.tree;
        let transitions = self.transitions;
        let id = tree.id_of(current);

        for (index, transition) in transitions.iter().enumerate() {
            if transition.source != id
                || transition.is_completion()
                || !self.rt.pool.is_eligible(index, offer)
            {
                continue;
            }
            let trigger = Trigger::new(transition.event, self.rt.pool.take_payload(index));
            let info = TransitionInfo {
                source: id,
                target: transition.target,
                kind: transition.kind(tree),
                trigger: &trigger,
            };
            if !self.evaluate(transition.guard.as_ref(), &info) {
                self.rt.pool.restore_payload(index, trigger.payload);
                continue;
            }
            let target = transition.target.and_then(|target| tree.index_of(target));
            // Cleared before executing so callbacks can raise the event again.
            self.rt.pool.consume(index);
            let route = Route::declared(transition, Cause::Event(transition.event));
            return Some(self.execute(current, target, &route, &trigger));
        }
        None
    }
}
