//! Builder API for ergonomic state machine construction.
//!
//! This module provides fluent builders for the state tree, the transition
//! table and the machine itself. [`StateMachineBuilder::build`] validates
//! the whole definition and reports every problem it finds at once.

pub mod error;
pub mod machine;
pub mod macros;
pub mod state;
pub mod transition;
mod validate;

pub use error::{BuildError, ConfigError};
pub use machine::{MachineConfig, StateMachineBuilder};
pub use state::StateBuilder;
pub use transition::TransitionBuilder;

use crate::core::{EventId, TransitionInfo};
use crate::engine::Context;

/// Start a transition from `from` to `to` triggered by `event`.
///
/// # Example
///
/// ```
/// use statechart::builder::on_event;
///
/// let transition = on_event::<(), ()>(2u16, 3u16, b'1').build().unwrap();
/// assert!(!transition.is_completion());
/// ```
pub fn on_event<D, P>(
    from: impl Into<u16>,
    to: impl Into<u16>,
    event: impl Into<EventId>,
) -> TransitionBuilder<D, P> {
    TransitionBuilder::new().from(from).to(to).on(event)
}

/// Start a guarded completion transition, taken without any event as soon
/// as `guard` holds.
///
/// # Example
///
/// ```
/// use statechart::builder::completion;
///
/// struct Room {
///     temperature: f32,
///     setpoint: f32,
/// }
///
/// let transition = completion::<Room, (), _>(3u16, 4u16, |ctx, _| {
///     ctx.data().temperature < ctx.data().setpoint
/// })
/// .build()
/// .unwrap();
/// assert!(transition.is_completion());
/// ```
pub fn completion<D, P, F>(from: impl Into<u16>, to: impl Into<u16>, guard: F) -> TransitionBuilder<D, P>
where
    F: Fn(&Context<'_, D, P>, &TransitionInfo<'_, P>) -> bool + Send + Sync + 'static,
{
    TransitionBuilder::new().from(from).to(to).when(guard)
}

/// Start an internal transition: `effect` runs on `event` and the active
/// configuration is left untouched.
pub fn internal<D, P, F>(state: impl Into<u16>, event: impl Into<EventId>, effect: F) -> TransitionBuilder<D, P>
where
    F: Fn(&mut Context<'_, D, P>, &TransitionInfo<'_, P>) + Send + Sync + 'static,
{
    TransitionBuilder::new().from(state).on(event).effect(effect)
}
