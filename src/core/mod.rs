//! Core statechart types.
//!
//! This module contains the static description of a machine and the pure
//! queries over it:
//! - State and event identifiers
//! - The state tree and its read-only queries
//! - Transitions, triggers and guards
//! - Bounded transition history
//!
//! Nothing in this module mutates the active configuration; that is the
//! engine's job.

mod guard;
mod history;
mod ids;
mod state;
mod transition;
mod tree;

pub use guard::Guard;
pub use history::{Cause, TransitionHistory, TransitionRecord};
pub use ids::{EventId, StateId};
pub use state::{Action, Initial, State};
pub use transition::{Effect, Transition, TransitionInfo, TransitionKind, Trigger};
pub use tree::StateTree;

pub(crate) use state::NodeIx;
pub(crate) use tree::ROOT;
