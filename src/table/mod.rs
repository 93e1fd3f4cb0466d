//! The shared table: card/slot bijection and per-player tokens.

mod locks;

use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::sync::RwLock as StdRwLock;

use crate::card::{Card, Slot};
use crate::sync::Mutex;
use crate::ui::TableSink;

pub use locks::SlotGuard;

/// Tracks the slot↔card bijection as a pair kept consistent under one lock,
/// so `countCards`/`emptySlots` never observe a half-updated index.
#[derive(Default)]
struct SlotIndex {
    card_to_slot: HashMap<Card, Slot>,
    occupied: HashSet<Slot>,
}

/// The shared grid of card slots and per-player token sets.
///
/// `Table` is the one piece of state every player agent and the dealer
/// touch concurrently. All card-level mutation goes through a
/// [`SlotGuard`] obtained from [`Table::lock_slot`]/[`Table::lock_slots`]/
/// [`Table::lock_all_slots`]; token mutation is independent of slot locks
/// since a token set belongs to exactly one player.
pub struct Table {
    size: usize,
    slots: Vec<StdRwLock<Option<Card>>>,
    index: Mutex<SlotIndex>,
    tokens: Vec<Mutex<HashSet<Slot>>>,
    ready: AtomicBool,
    sink: Arc<dyn TableSink>,
}

impl Table {
    /// Creates an empty table with `size` slots and one token set per
    /// player in `0..num_players`.
    #[must_use]
    pub fn new(size: usize, num_players: usize, sink: Arc<dyn TableSink>) -> Self {
        Self {
            size,
            slots: (0..size).map(|_| StdRwLock::new(None)).collect(),
            index: Mutex::new(SlotIndex::default()),
            tokens: (0..num_players).map(|_| Mutex::new(HashSet::new())).collect(),
            ready: AtomicBool::new(false),
            sink,
        }
    }

    /// Number of slots on the table.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Number of players with a token set on this table.
    #[must_use]
    pub fn num_players(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the table currently accepts key-press-driven token actions.
    ///
    /// The dealer is the sole writer: it clears this before any structural
    /// mutation and sets it once `placeCardsOnTable` completes.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Sets the table-ready gate.
    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::Release);
    }

    /// Acquires a single slot lock, ascending-order trivially satisfied.
    #[must_use]
    pub fn lock_slot(&self, slot: Slot, writer: bool) -> SlotGuard<'_> {
        self.lock_slots(&[slot], writer)
    }

    /// Acquires locks on `slots`, ascending, deduplicated. Release order
    /// (on drop) is descending.
    #[must_use]
    pub fn lock_slots(&self, slots: &[Slot], writer: bool) -> SlotGuard<'_> {
        SlotGuard::acquire(&self.slots, slots, writer)
    }

    /// Acquires locks on every slot on the table.
    #[must_use]
    pub fn lock_all_slots(&self, writer: bool) -> SlotGuard<'_> {
        let all: Vec<Slot> = (0..self.size).collect();
        self.lock_slots(&all, writer)
    }

    /// Places `card` on `slot`.
    ///
    /// Requires the caller to hold a writer lock on `slot` via `guard`, and
    /// that `slot` is currently empty and `card` is not already placed
    /// elsewhere; violating either is a caller contract error and is
    /// undefined, per spec.md §7.
    pub fn place_card(&self, guard: &mut SlotGuard<'_>, card: Card, slot: Slot) {
        *guard.card_mut(slot) = Some(card);
        let mut index = self.index.lock();
        index.card_to_slot.insert(card, slot);
        index.occupied.insert(slot);
        drop(index);
        self.sink.place_card(card, slot);
    }

    /// Removes the card on `slot`, clearing every token on it.
    ///
    /// Requires the caller to hold a writer lock on `slot` via `guard`. A
    /// no-op if the slot is already empty.
    pub fn remove_card(&self, guard: &mut SlotGuard<'_>, slot: Slot) -> Option<Card> {
        let card = guard.card_mut(slot).take()?;

        let mut index = self.index.lock();
        index.card_to_slot.remove(&card);
        index.occupied.remove(&slot);
        drop(index);

        let mut any_token_removed = false;
        for player_tokens in &self.tokens {
            if player_tokens.lock().remove(&slot) {
                any_token_removed = true;
            }
        }

        self.sink.remove_card(slot);
        if any_token_removed {
            self.sink.remove_tokens_on_slot(slot);
        }

        Some(card)
    }

    /// Places a token for `player` on `slot`.
    pub fn place_token(&self, player: usize, slot: Slot) {
        self.tokens[player].lock().insert(slot);
        self.sink.place_token(player, slot);
    }

    /// Removes `player`'s token from `slot`. No-op if absent.
    pub fn remove_token(&self, player: usize, slot: Slot) {
        if self.tokens[player].lock().remove(&slot) {
            self.sink.remove_token(player, slot);
        }
    }

    /// Whether `player` has a token on `slot`.
    #[must_use]
    pub fn has_token(&self, player: usize, slot: Slot) -> bool {
        self.tokens[player].lock().contains(&slot)
    }

    /// Number of tokens currently placed by `player`.
    #[must_use]
    pub fn token_count(&self, player: usize) -> usize {
        self.tokens[player].lock().len()
    }

    /// A snapshot of `player`'s current token set.
    #[must_use]
    pub fn tokens_snapshot(&self, player: usize) -> HashSet<Slot> {
        self.tokens[player].lock().clone()
    }

    /// Removes `slot` from `player`'s token set if present, notifying the
    /// UI and reporting whether a removal happened.
    pub fn discard_token(&self, player: usize, slot: Slot) -> bool {
        let removed = self.tokens[player].lock().remove(&slot);
        if removed {
            self.sink.remove_token(player, slot);
        }
        removed
    }

    /// Every currently-empty slot, in ascending order.
    #[must_use]
    pub fn empty_slots(&self) -> Vec<Slot> {
        let index = self.index.lock();
        (0..self.size)
            .filter(|slot| !index.occupied.contains(slot))
            .collect()
    }

    /// Number of slots currently holding a card.
    #[must_use]
    pub fn count_cards(&self) -> usize {
        self.index.lock().occupied.len()
    }

    /// The UI sink backing this table, for components (like the dealer)
    /// that need to push notifications the table itself has no method for
    /// (score, freeze, countdown, winners).
    #[must_use]
    pub fn sink(&self) -> &Arc<dyn TableSink> {
        &self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::NullSink;

    fn table(size: usize, players: usize) -> Table {
        Table::new(size, players, Arc::new(NullSink))
    }

    #[test]
    fn place_then_remove_round_trips() {
        let table = table(4, 1);
        let mut guard = table.lock_slot(0, true);
        table.place_card(&mut guard, 7, 0);
        assert_eq!(guard.card(0), Some(7));
        drop(guard);

        assert_eq!(table.count_cards(), 1);
        assert_eq!(table.empty_slots(), vec![1, 2, 3]);

        let mut guard = table.lock_slot(0, true);
        let removed = table.remove_card(&mut guard, 0);
        assert_eq!(removed, Some(7));
        drop(guard);

        assert_eq!(table.count_cards(), 0);
    }

    #[test]
    fn remove_card_clears_tokens() {
        let table = table(4, 2);
        let mut guard = table.lock_slot(0, true);
        table.place_card(&mut guard, 1, 0);
        drop(guard);

        table.place_token(0, 0);
        table.place_token(1, 0);
        assert!(table.has_token(0, 0));
        assert!(table.has_token(1, 0));

        let mut guard = table.lock_slot(0, true);
        table.remove_card(&mut guard, 0);
        drop(guard);

        assert!(!table.has_token(0, 0));
        assert!(!table.has_token(1, 0));
    }

    #[test]
    fn remove_token_is_noop_if_absent() {
        let table = table(2, 1);
        table.remove_token(0, 0);
        assert!(!table.has_token(0, 0));
    }

    #[test]
    fn token_add_remove_round_trip_is_idempotent() {
        let table = table(2, 1);
        table.place_token(0, 1);
        table.remove_token(0, 1);
        assert_eq!(table.token_count(0), 0);
    }

    #[test]
    fn lock_slots_deadlock_regression_ascending_descending() {
        let table = table(8, 1);
        // Two overlapping multi-slot acquisitions from "different callers"
        // (here sequential, since a real concurrent test lives in
        // tests/concurrency.rs): as long as both always request ascending
        // order, this can never deadlock.
        let guard_a = table.lock_slots(&[5, 2, 7], true);
        drop(guard_a);
        let guard_b = table.lock_slots(&[7, 2, 5], true);
        assert_eq!(guard_b.slots().collect::<Vec<_>>(), vec![2, 5, 7]);
    }
}
