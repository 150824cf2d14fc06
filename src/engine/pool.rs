//! Pending-trigger pool.
//!
//! There is no separate event queue. Every declared transition owns exactly
//! one slot, so the pool's capacity equals the number of transitions and
//! admission is deduplicated by transition identity: a slot that is already
//! pending ignores further admissions of its event.

use crate::core::EventId;

#[derive(Debug)]
pub(crate) struct Slot<P> {
    event: EventId,
    pending: bool,
    payload: Option<P>,
    /// Pass counter value at admission time.
    admitted_in: u64,
    /// Admitted by a callback while a pass was in flight.
    deferred: bool,
}

#[derive(Debug)]
pub(crate) struct TriggerPool<P> {
    slots: Vec<Slot<P>>,
}

impl<P> TriggerPool<P> {
    /// One slot per transition, in declaration order.
    pub(crate) fn new(events: impl IntoIterator<Item = EventId>) -> Self {
        let slots = events
            .into_iter()
            .map(|event| Slot {
                event,
                pending: false,
                payload: None,
                admitted_in: 0,
                deferred: false,
            })
            .collect();
        Self { slots }
    }

    /// Mark every idle slot for `event` as pending. Returns how many slots
    /// were admitted. Completion slots are never admitted.
    ///
    /// A deferred admission also claims slots still pending from the
    /// dispatch in flight: they keep their first payload but move to the
    /// next pass instead of being discarded with the current one.
    pub(crate) fn admit<F>(&mut self, event: EventId, payload: F, pass: u64, deferred: bool) -> usize
    where
        F: Fn() -> Option<P>,
    {
        if event.is_none() {
            return 0;
        }
        let mut admitted = 0;
        for slot in self.slots.iter_mut().filter(|slot| slot.event == event) {
            if !slot.pending {
                slot.pending = true;
                slot.payload = payload();
            } else if !deferred || slot.deferred {
                continue;
            }
            slot.admitted_in = pass;
            slot.deferred = deferred;
            admitted += 1;
        }
        admitted
    }

    /// Whether slot `index` may be consumed by a pass offering `offer`.
    /// A `step` pass (no offer) sees every pending slot; a dispatch pass
    /// sees its own event plus deferred admissions.
    pub(crate) fn is_eligible(&self, index: usize, offer: Option<EventId>) -> bool {
        let slot = &self.slots[index];
        slot.pending && offer.map_or(true, |event| slot.event == event || slot.deferred)
    }

    pub(crate) fn is_pending(&self, index: usize) -> bool {
        self.slots.get(index).is_some_and(|slot| slot.pending)
    }

    pub(crate) fn pending_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.pending).count()
    }

    pub(crate) fn take_payload(&mut self, index: usize) -> Option<P> {
        self.slots[index].payload.take()
    }

    pub(crate) fn restore_payload(&mut self, index: usize, payload: Option<P>) {
        self.slots[index].payload = payload;
    }

    /// Clear a slot after its transition fired.
    pub(crate) fn consume(&mut self, index: usize) {
        let slot = &mut self.slots[index];
        slot.pending = false;
        slot.payload = None;
        slot.deferred = false;
    }

    /// Drop slots that were offered to pass `pass`, were admitted before it
    /// began, and were not consumed. Returns the number discarded.
    pub(crate) fn discard_stale(&mut self, pass: u64, offer: Option<EventId>) -> usize {
        let stale: Vec<usize> = (0..self.slots.len())
            .filter(|&index| self.is_eligible(index, offer) && self.slots[index].admitted_in < pass)
            .collect();
        for &index in &stale {
            tracing::trace!(
                slot = index,
                event = ?self.slots[index].event,
                "discarding unconsumed event"
            );
            self.consume(index);
        }
        stale.len()
    }

    pub(crate) fn clear(&mut self) {
        for index in 0..self.slots.len() {
            self.consume(index);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool() -> TriggerPool<u32> {
        TriggerPool::new([
            EventId::from(b'1'),
            EventId::from(b'2'),
            EventId::from(b'1'),
            EventId::NONE,
        ])
    }

    #[test]
    fn admission_marks_every_matching_slot() {
        let mut pool = pool();
        assert_eq!(pool.admit(EventId::from(b'1'), || Some(7), 0, false), 2);
        assert!(pool.is_pending(0));
        assert!(!pool.is_pending(1));
        assert!(pool.is_pending(2));
        assert_eq!(pool.take_payload(2), Some(7));
    }

    #[test]
    fn pending_slots_are_not_readmitted() {
        let mut pool = pool();
        pool.admit(EventId::from(b'1'), || Some(1), 0, false);
        assert_eq!(pool.admit(EventId::from(b'1'), || Some(2), 0, false), 0);
        assert_eq!(pool.pending_count(), 2);
        assert_eq!(pool.take_payload(0), Some(1));
    }

    #[test]
    fn deferred_admission_carries_pending_slots_to_the_next_pass() {
        let mut pool = pool();
        pool.admit(EventId::from(b'1'), || Some(1), 3, false);

        assert_eq!(pool.admit(EventId::from(b'1'), || Some(2), 4, true), 2);
        assert_eq!(pool.admit(EventId::from(b'1'), || Some(3), 4, true), 0);
        assert_eq!(pool.discard_stale(4, Some(EventId::from(b'1'))), 0);
        assert_eq!(pool.pending_count(), 2);
        assert_eq!(pool.take_payload(0), Some(1));
    }

    #[test]
    fn completion_slots_are_never_admitted() {
        let mut pool = pool();
        assert_eq!(pool.admit(EventId::NONE, || None, 0, false), 0);
        assert_eq!(pool.pending_count(), 0);
    }

    #[test]
    fn dispatch_pass_sees_own_event_and_deferred_slots() {
        let mut pool = pool();
        pool.admit(EventId::from(b'2'), || None, 1, true);
        pool.admit(EventId::from(b'1'), || None, 1, false);

        let offer = Some(EventId::from(b'1'));
        assert!(pool.is_eligible(0, offer));
        assert!(pool.is_eligible(1, offer));
        assert!(pool.is_eligible(1, None));
        assert!(!pool.is_eligible(3, None));
    }

    #[test]
    fn stale_discard_spares_slots_admitted_during_the_pass() {
        let mut pool = pool();
        pool.admit(EventId::from(b'1'), || None, 4, false);
        pool.admit(EventId::from(b'2'), || None, 5, true);

        assert_eq!(pool.discard_stale(5, None), 2);
        assert_eq!(pool.pending_count(), 1);
        assert!(pool.is_pending(1));

        assert_eq!(pool.discard_stale(6, None), 1);
        assert_eq!(pool.pending_count(), 0);
    }

    #[test]
    fn stale_discard_ignores_slots_not_offered() {
        let mut pool = pool();
        pool.admit(EventId::from(b'2'), || None, 0, false);
        assert_eq!(pool.discard_stale(1, Some(EventId::from(b'1'))), 0);
        assert!(pool.is_pending(1));
    }
}
