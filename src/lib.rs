//! Statechart: hierarchical state machines with UML statechart semantics
//!
//! A machine is a tree of states with exactly one active path from the root
//! to a leaf. Events are admitted into a per-transition pending pool and
//! processed innermost state first; unconsumed work bubbles up towards the
//! root. At most one transition fires per processing pass.
//!
//! # Core Concepts
//!
//! - **States**: Composite or leaf, with optional entry and exit behaviors
//!   and an initial transition selecting the default child
//! - **Transitions**: Internal, self, local or external, optionally guarded
//!   and with an effect; completion transitions fire without an event
//! - **Context**: What guards and callbacks see of the machine; events they
//!   raise are deferred to a later pass
//! - **History**: A bounded audit trail of fired transitions
//!
//! # Example
//!
//! ```rust
//! use statechart::builder::{completion, StateBuilder, StateMachineBuilder, TransitionBuilder};
//!
//! #[derive(Debug, Default)]
//! struct Kettle {
//!     temperature: u32,
//! }
//!
//! let mut kettle = StateMachineBuilder::<Kettle, ()>::new(Kettle::default())
//!     .name("kettle")
//!     .root(
//!         StateBuilder::new(1u16)
//!             .initial(2u16)
//!             .child(StateBuilder::new(2u16).name("idle"))
//!             .child(StateBuilder::new(3u16).name("boiling"))
//!             .child(StateBuilder::new(4u16).name("done")),
//!     )
//!     .transition(TransitionBuilder::new().from(2u16).to(3u16).on(b'b'))
//!     .unwrap()
//!     .transition(completion::<Kettle, (), _>(3u16, 4u16, |ctx, _| {
//!         ctx.data().temperature >= 100
//!     }))
//!     .unwrap()
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(kettle.init().unwrap().get(), 2);
//! assert_eq!(kettle.dispatch(b'b').map(|id| id.get()), Some(3));
//!
//! kettle.data_mut().temperature = 100;
//! assert_eq!(kettle.step().map(|id| id.get()), Some(4));
//! ```

pub mod builder;
pub mod core;
pub mod engine;

// Re-export commonly used types
pub use builder::{BuildError, StateBuilder, StateMachineBuilder, TransitionBuilder};
pub use core::{EventId, Guard, StateId, TransitionKind, Trigger};
pub use engine::{Context, MachineError, StateMachine};
