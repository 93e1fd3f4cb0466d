//! Multi-slot locking with deadlock-free acquire/release ordering.

use std::sync::{RwLockReadGuard, RwLockWriteGuard};

use crate::card::{Card, Slot};

enum SlotHandle<'t> {
    Read(RwLockReadGuard<'t, Option<Card>>),
    Write(RwLockWriteGuard<'t, Option<Card>>),
}

impl SlotHandle<'_> {
    fn get(&self) -> Option<Card> {
        match self {
            Self::Read(guard) => **guard,
            Self::Write(guard) => **guard,
        }
    }

    fn get_mut(&mut self) -> Option<&mut Option<Card>> {
        match self {
            Self::Write(guard) => Some(&mut *guard),
            Self::Read(_) => None,
        }
    }
}

/// A held set of per-slot locks, acquired ascending by slot index.
///
/// Dropping the guard releases every slot descending, satisfying the lock
/// hierarchy spec.md §5 requires to avoid deadlock between two agents
/// racing over overlapping slot sets. Slots are held in sorted, deduplicated
/// order regardless of the order they were requested in.
pub struct SlotGuard<'t> {
    held: Vec<(Slot, SlotHandle<'t>)>,
}

impl<'t> SlotGuard<'t> {
    pub(super) fn acquire(slots_storage: &'t [std::sync::RwLock<Option<Card>>], slots: &[Slot], writer: bool) -> Self {
        let mut ordered: Vec<Slot> = slots.to_vec();
        ordered.sort_unstable();
        ordered.dedup();

        let held = ordered
            .into_iter()
            .map(|slot| {
                let handle = if writer {
                    SlotHandle::Write(slots_storage[slot].write().unwrap_or_else(std::sync::PoisonError::into_inner))
                } else {
                    SlotHandle::Read(slots_storage[slot].read().unwrap_or_else(std::sync::PoisonError::into_inner))
                };
                (slot, handle)
            })
            .collect();

        Self { held }
    }

    /// The card currently held by `slot`, or `None` if empty.
    ///
    /// Panics if `slot` is not held by this guard.
    #[must_use]
    pub fn card(&self, slot: Slot) -> Option<Card> {
        self.find(slot).get()
    }

    /// Mutable access to the card held by `slot`.
    ///
    /// Panics if `slot` is not held by this guard, or if it was acquired as
    /// a reader rather than a writer.
    pub fn card_mut(&mut self, slot: Slot) -> &mut Option<Card> {
        self.find_mut(slot)
            .get_mut()
            .expect("card_mut requires a writer lock on this slot")
    }

    /// Every slot held by this guard, ascending.
    pub fn slots(&self) -> impl Iterator<Item = Slot> + '_ {
        self.held.iter().map(|(slot, _)| *slot)
    }

    fn find(&self, slot: Slot) -> &SlotHandle<'t> {
        self.held
            .iter()
            .find(|(held_slot, _)| *held_slot == slot)
            .map(|(_, handle)| handle)
            .expect("slot not held by this guard")
    }

    fn find_mut(&mut self, slot: Slot) -> &mut SlotHandle<'t> {
        self.held
            .iter_mut()
            .find(|(held_slot, _)| *held_slot == slot)
            .map(|(_, handle)| handle)
            .expect("slot not held by this guard")
    }
}

impl Drop for SlotGuard<'_> {
    fn drop(&mut self) {
        // `held` is sorted ascending by acquisition order; popping from the
        // back releases the highest slot index first.
        while self.held.pop().is_some() {}
    }
}
