//! Guard predicates for controlling transitions.
//!
//! Guards are boolean functions that determine whether a candidate
//! transition fires. They see the machine through a read-only
//! [`Context`] and must not have side effects.

use super::transition::TransitionInfo;
use crate::engine::Context;

/// Predicate that determines if a transition can execute.
///
/// A guard is evaluated at most once per candidate transition per
/// processing pass. It may read domain data and the active configuration,
/// never mutate them.
///
/// # Example
///
/// ```rust
/// use statechart::core::Guard;
///
/// struct Room {
///     temperature: f32,
/// }
///
/// let too_cold = Guard::<Room, ()>::new(|ctx, _| ctx.data().temperature < 18.0);
/// ```
pub struct Guard<D, P> {
    predicate: Box<dyn Fn(&Context<'_, D, P>, &TransitionInfo<'_, P>) -> bool + Send + Sync>,
}

impl<D, P> Guard<D, P> {
    /// Create a guard from a pure predicate function.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&Context<'_, D, P>, &TransitionInfo<'_, P>) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Box::new(predicate),
        }
    }

    /// Check if the guard allows the transition.
    pub fn check(&self, ctx: &Context<'_, D, P>, transition: &TransitionInfo<'_, P>) -> bool {
        (self.predicate)(ctx, transition)
    }
}
