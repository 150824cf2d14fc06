//! Enter/exit sequencing and transition execution.

use crate::core::{
    Cause, Effect, Guard, NodeIx, StateId, StateTree, Transition, TransitionInfo, TransitionKind,
    TransitionRecord, Trigger,
};
use crate::engine::context::Context;
use crate::engine::machine::Runtime;
use chrono::Utc;

/// The transition being executed: a declared one or a state's initial
/// transition.
pub(crate) struct Route<'m, D, P> {
    pub(crate) source: StateId,
    pub(crate) target: Option<StateId>,
    pub(crate) effect: Option<&'m Effect<D, P>>,
    pub(crate) cause: Cause,
}

impl<'m, D, P> Route<'m, D, P> {
    pub(crate) fn declared(transition: &'m Transition<D, P>, cause: Cause) -> Self {
        Self {
            source: transition.source,
            target: transition.target,
            effect: transition.effect.as_ref(),
            cause,
        }
    }
}

/// Borrowed view of a machine that mutates the active configuration.
///
/// The definition (tree and transitions) is shared; only the runtime is
/// borrowed mutably, so callbacks stored in the definition can be invoked
/// with a [`Context`] over the runtime.
pub(crate) struct Executor<'m, D, P> {
    pub(crate) tree: &'m StateTree<D, P>,
    pub(crate) transitions: &'m [Transition<D, P>],
    pub(crate) rt: &'m mut Runtime<D, P>,
}

impl<'m, D, P> Executor<'m, D, P> {
    pub(crate) fn new(
        tree: &'m StateTree<D, P>,
        transitions: &'m [Transition<D, P>],
        rt: &'m mut Runtime<D, P>,
    ) -> Self {
        Self {
            tree,
            transitions,
            rt,
        }
    }

    fn context(&mut self) -> Context<'_, D, P> {
        Context::new(self.tree, &mut *self.rt)
    }

    /// Exit `state` if active: active descendants first (leaves before
    /// ancestors), then the state's exit callback, then clear its flag.
    /// Returns whether anything was exited.
    pub(crate) fn exit(&mut self, state: NodeIx, trigger: Option<&Trigger<P>>) -> bool {
        if !self.rt.active[state] {
            return false;
        }
        let tree = self.tree;
        for &child in tree.children(state) {
            if self.exit(child, trigger) {
                break;
            }
        }
        let node = tree.node(state);
        if let Some(on_exit) = &node.exit {
            on_exit(&mut self.context(), node.id, trigger);
        }
        self.rt.active[state] = false;
        tracing::trace!(state = %node.name, id = %node.id, "exited state");
        true
    }

    /// Enter `current` (flag first, then entry callback) and descend one
    /// level per call towards `target`. Once the target is reached, or when
    /// no target is given, the state's initial transition is followed.
    /// Returns the innermost state entered.
    pub(crate) fn enter(
        &mut self,
        current: NodeIx,
        target: Option<NodeIx>,
        trigger: Option<&Trigger<P>>,
    ) -> NodeIx {
        let tree = self.tree;
        let node = tree.node(current);
        if !self.rt.active[current] {
            self.rt.active[current] = true;
            tracing::trace!(state = %node.name, id = %node.id, "entered state");
            if let Some(on_entry) = &node.entry {
                on_entry(&mut self.context(), node.id, trigger);
            }
        }

        match target {
            Some(target) if target != current => {
                if tree.is_descendant_ix(current, target) {
                    if let Some(child) = tree.child_towards(current, target) {
                        return self.enter(child, Some(target), trigger);
                    }
                }
                current
            }
            _ => self.complete_entry(current),
        }
    }

    fn complete_entry(&mut self, current: NodeIx) -> NodeIx {
        let tree = self.tree;
        let node = tree.node(current);
        let Some(initial) = node.initial.as_ref() else {
            return current;
        };
        let Some(target) = tree.index_of(initial.target) else {
            return current;
        };
        let route = Route {
            source: node.id,
            target: Some(initial.target),
            effect: initial.effect.as_ref(),
            cause: Cause::Initial,
        };
        self.execute(current, Some(target), &route, &Trigger::completion())
    }

    /// Execute a transition out of `source`.
    ///
    /// Internal transitions only run the effect. All others exit the active
    /// descendants of `source`, or of `target` when it encloses `source`;
    /// self and external transitions also exit `source` and re-enter from
    /// its parent. The effect runs between the
    /// exit and the entry phase. Returns the innermost active state.
    pub(crate) fn execute(
        &mut self,
        source: NodeIx,
        target: Option<NodeIx>,
        route: &Route<'m, D, P>,
        trigger: &Trigger<P>,
    ) -> NodeIx {
        let tree = self.tree;
        let kind = TransitionKind::classify(tree, route.source, route.target);
        tracing::debug!(
            source = %route.source,
            target = ?route.target,
            %kind,
            cause = ?route.cause,
            "executing transition"
        );
        self.rt.history.record(TransitionRecord {
            source: route.source,
            target: route.target,
            kind,
            cause: route.cause,
            pass: self.rt.pass,
            timestamp: Utc::now(),
        });
        let info = TransitionInfo {
            source: route.source,
            target: route.target,
            kind,
            trigger,
        };

        let Some(target) = target else {
            self.run_effect(route, &info);
            return tree.active_leaf(source, &self.rt.active).unwrap_or(source);
        };

        // A local transition to an ancestor leaves everything below it.
        let mut reentry = if tree.is_descendant_ix(target, source) {
            target
        } else {
            source
        };
        for &child in tree.children(reentry) {
            if self.exit(child, Some(trigger)) {
                break;
            }
        }
        if kind.exits_source() {
            self.exit(source, Some(trigger));
            reentry = tree.parent(source).unwrap_or(source);
        }
        self.run_effect(route, &info);
        self.enter(reentry, Some(target), Some(trigger))
    }

    fn run_effect(&mut self, route: &Route<'m, D, P>, info: &TransitionInfo<'_, P>) {
        if let Some(effect) = route.effect {
            effect(&mut self.context(), info);
        }
    }

    /// `true` without a guard, otherwise the guard's verdict.
    pub(crate) fn evaluate(
        &mut self,
        guard: Option<&Guard<D, P>>,
        info: &TransitionInfo<'_, P>,
    ) -> bool {
        match guard {
            None => true,
            Some(guard) => guard.check(&self.context(), info),
        }
    }
}
