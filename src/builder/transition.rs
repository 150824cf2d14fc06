//! Builder for constructing transitions.

use crate::builder::error::BuildError;
use crate::core::{EventId, Guard, StateId, Transition, TransitionInfo};
use crate::engine::Context;

/// Builder for constructing transitions with a fluent API.
///
/// A transition without [`on`](Self::on) is a completion transition; one
/// without [`to`](Self::to) is internal.
pub struct TransitionBuilder<D, P = ()> {
    from: Option<u16>,
    to: Option<u16>,
    event: EventId,
    guard: Option<Guard<D, P>>,
    effect: Option<crate::core::Effect<D, P>>,
}

impl<D, P> TransitionBuilder<D, P> {
    pub fn new() -> Self {
        Self {
            from: None,
            to: None,
            event: EventId::NONE,
            guard: None,
            effect: None,
        }
    }

    /// Set the source state (required).
    pub fn from(mut self, state: impl Into<u16>) -> Self {
        self.from = Some(state.into());
        self
    }

    /// Set the target state. Omit for an internal transition.
    pub fn to(mut self, state: impl Into<u16>) -> Self {
        self.to = Some(state.into());
        self
    }

    /// Set the triggering event. Omit for a completion transition.
    pub fn on(mut self, event: impl Into<EventId>) -> Self {
        self.event = event.into();
        self
    }

    /// Add a guard predicate (optional).
    pub fn guard(mut self, guard: Guard<D, P>) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Add a guard using a closure (optional).
    pub fn when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Context<'_, D, P>, &TransitionInfo<'_, P>) -> bool + Send + Sync + 'static,
    {
        self.guard = Some(Guard::new(predicate));
        self
    }

    /// Set the effect run between the exit and the entry phase (optional).
    pub fn effect<F>(mut self, effect: F) -> Self
    where
        F: Fn(&mut Context<'_, D, P>, &TransitionInfo<'_, P>) + Send + Sync + 'static,
    {
        self.effect = Some(Box::new(effect));
        self
    }

    /// Build the transition.
    pub fn build(self) -> Result<Transition<D, P>, BuildError> {
        let source = self.from.ok_or(BuildError::MissingSource)?;
        let source = StateId::new(source).ok_or(BuildError::ReservedStateId)?;
        let target = match self.to {
            Some(raw) => Some(StateId::new(raw).ok_or(BuildError::ReservedStateId)?),
            None => None,
        };

        Ok(Transition {
            source,
            target,
            event: self.event,
            guard: self.guard,
            effect: self.effect,
        })
    }
}

impl<D, P> Default for TransitionBuilder<D, P> {
    fn default() -> Self {
        Self::new()
    }
}
