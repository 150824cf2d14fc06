//! Transitions, triggers and transition classification.

use super::guard::Guard;
use super::ids::{EventId, StateId};
use super::tree::StateTree;
use crate::engine::Context;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Transition effect, run between the exit and the entry phase.
pub type Effect<D, P> = Box<dyn Fn(&mut Context<'_, D, P>, &TransitionInfo<'_, P>) + Send + Sync>;

/// The event that caused a transition, with its optional payload.
#[derive(Clone, Debug, PartialEq)]
pub struct Trigger<P> {
    pub event: EventId,
    pub payload: Option<P>,
}

impl<P> Trigger<P> {
    pub fn new(event: EventId, payload: Option<P>) -> Self {
        Self { event, payload }
    }

    /// Trigger carried by completion and initial transitions.
    pub fn completion() -> Self {
        Self {
            event: EventId::NONE,
            payload: None,
        }
    }
}

/// How a transition changes the active configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionKind {
    /// No target: only the effect runs.
    Internal,
    /// Source equals target: the source is exited and re-entered.
    SelfTransition,
    /// Target is a descendant or an ancestor of the source: the enclosing
    /// one of the two stays active.
    Local,
    /// Target is outside the source: the source is exited.
    External,
}

impl TransitionKind {
    /// Classify a transition from `source` to `target` within `tree`.
    ///
    /// Unknown ids classify as [`TransitionKind::External`]; built machines
    /// never contain them.
    pub fn classify<D, P>(tree: &StateTree<D, P>, source: StateId, target: Option<StateId>) -> Self {
        match target {
            None => Self::Internal,
            Some(target) if target == source => Self::SelfTransition,
            Some(target)
                if tree.is_descendant(source, target) || tree.is_descendant(target, source) =>
            {
                Self::Local
            }
            Some(_) => Self::External,
        }
    }

    /// Whether the source is exited and re-entry starts at its parent.
    pub fn exits_source(self) -> bool {
        matches!(self, Self::SelfTransition | Self::External)
    }
}

impl fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Internal => "internal",
            Self::SelfTransition => "self",
            Self::Local => "local",
            Self::External => "external",
        };
        f.write_str(name)
    }
}

/// What a guard or effect sees of the transition being taken.
#[derive(Debug)]
pub struct TransitionInfo<'a, P> {
    pub source: StateId,
    pub target: Option<StateId>,
    pub kind: TransitionKind,
    pub trigger: &'a Trigger<P>,
}

/// A declared transition.
///
/// Transitions form one flat, ordered collection per machine; `source`
/// scopes each one to a state. A transition whose `event` is
/// [`EventId::NONE`] is a completion transition.
pub struct Transition<D, P> {
    pub source: StateId,
    pub target: Option<StateId>,
    pub event: EventId,
    pub guard: Option<Guard<D, P>>,
    pub effect: Option<Effect<D, P>>,
}

impl<D, P> Transition<D, P> {
    /// Fireable without external input whenever its guard holds.
    pub fn is_completion(&self) -> bool {
        self.event.is_none()
    }

    pub fn is_internal(&self) -> bool {
        self.target.is_none()
    }

    pub fn kind(&self, tree: &StateTree<D, P>) -> TransitionKind {
        TransitionKind::classify(tree, self.source, self.target)
    }
}

impl<D, P> fmt::Debug for Transition<D, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("source", &self.source)
            .field("target", &self.target)
            .field("event", &self.event)
            .field("guard", &self.guard.is_some())
            .field("effect", &self.effect.is_some())
            .finish()
    }
}
