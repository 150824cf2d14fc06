//! Identifiers for states and events.
//!
//! State ids are small positive integers. The value `0` is reserved as
//! "no state" and is unrepresentable as a [`StateId`]; absence is modelled
//! with `Option<StateId>` instead.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU16;

/// Identity of a state within one machine.
///
/// # Example
///
/// ```rust
/// use statechart::core::StateId;
///
/// assert!(StateId::new(0).is_none());
/// let id = StateId::new(4).unwrap();
/// assert_eq!(id.get(), 4);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateId(NonZeroU16);

impl StateId {
    /// Create a state id, returning `None` for the reserved value `0`.
    pub const fn new(raw: u16) -> Option<Self> {
        match NonZeroU16::new(raw) {
            Some(id) => Some(Self(id)),
            None => None,
        }
    }

    /// The raw numeric id.
    pub const fn get(self) -> u16 {
        self.0.get()
    }
}

impl fmt::Debug for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StateId({})", self.0)
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<StateId> for u16 {
    fn from(id: StateId) -> Self {
        id.get()
    }
}

impl PartialEq<u16> for StateId {
    fn eq(&self, other: &u16) -> bool {
        self.get() == *other
    }
}

/// Identity of an event.
///
/// [`EventId::NONE`] is the "no event" sentinel carried by completion
/// transitions; it is never admitted into the pending pool.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(u16);

impl EventId {
    /// The completion sentinel.
    pub const NONE: EventId = EventId(0);

    pub const fn new(raw: u16) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u16 {
        self.0
    }

    /// Whether this is the completion sentinel.
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            return f.write_str("EventId(NONE)");
        }
        match u8::try_from(self.0) {
            Ok(byte) if byte.is_ascii_graphic() => write!(f, "EventId({:?})", byte as char),
            _ => write!(f, "EventId({})", self.0),
        }
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u16> for EventId {
    fn from(raw: u16) -> Self {
        Self(raw)
    }
}

impl From<u8> for EventId {
    fn from(raw: u8) -> Self {
        Self(u16::from(raw))
    }
}
