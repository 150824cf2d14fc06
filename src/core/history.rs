//! Transition history tracking.
//!
//! Every transition the engine executes, initial transitions included, is
//! appended to a bounded history. When the history is full the oldest
//! record is evicted.

use super::ids::{EventId, StateId};
use super::transition::TransitionKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Why a transition fired.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cause {
    /// An admitted event was consumed.
    Event(EventId),
    /// A completion transition's guard held.
    Completion,
    /// A composite state's initial transition was followed.
    Initial,
}

/// Record of a single executed transition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub source: StateId,
    pub target: Option<StateId>,
    pub kind: TransitionKind,
    pub cause: Cause,
    /// Processing pass during which the transition ran.
    pub pass: u64,
    pub timestamp: DateTime<Utc>,
}

/// Ordered, bounded history of executed transitions.
///
/// # Example
///
/// ```rust
/// use statechart::core::{Cause, StateId, TransitionHistory, TransitionKind, TransitionRecord};
/// use chrono::Utc;
///
/// let mut history = TransitionHistory::with_capacity(2);
/// for (source, target) in [(2, 3), (3, 4), (4, 3)] {
///     history.record(TransitionRecord {
///         source: StateId::new(source).unwrap(),
///         target: StateId::new(target),
///         kind: TransitionKind::External,
///         cause: Cause::Completion,
///         pass: 1,
///         timestamp: Utc::now(),
///     });
/// }
///
/// assert_eq!(history.len(), 2);
/// assert_eq!(history.get_path(), vec![StateId::new(3).unwrap(), StateId::new(4).unwrap(), StateId::new(3).unwrap()]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransitionHistory {
    capacity: usize,
    records: VecDeque<TransitionRecord>,
}

impl Default for TransitionHistory {
    fn default() -> Self {
        Self::with_capacity(64)
    }
}

impl TransitionHistory {
    /// Create an empty history keeping at most `capacity` records.
    /// A capacity of zero disables recording.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            records: VecDeque::with_capacity(capacity.min(1024)),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append a record, evicting the oldest one when full.
    pub fn record(&mut self, record: TransitionRecord) {
        if self.capacity == 0 {
            return;
        }
        if self.records.len() == self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    /// Records from oldest to newest.
    pub fn records(&self) -> impl Iterator<Item = &TransitionRecord> {
        self.records.iter()
    }

    pub fn last(&self) -> Option<&TransitionRecord> {
        self.records.back()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// States traversed: the first record's source, then each target.
    /// Internal transitions do not move the machine and are skipped.
    pub fn get_path(&self) -> Vec<StateId> {
        let mut path = Vec::new();
        if let Some(first) = self.records.front() {
            path.push(first.source);
        }
        path.extend(self.records.iter().filter_map(|record| record.target));
        path
    }

    /// Time from the oldest to the newest retained record.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.records.front()?, self.records.back()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }
}
