//! Player state and the key-press admission pipeline.

pub mod agent;
pub mod computer;

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU32, Ordering};
use std::sync::Condvar;

use crate::card::Slot;
use crate::clock::now_ms;
use crate::sync::Mutex;
use crate::table::Table;
use crate::ui::TableSink;

/// One seat at the table: a human or a computer-driven agent.
///
/// `Player` owns only the state a human key-press or a computer agent
/// mutates directly — score, freeze, the examined flag, and the queue of
/// chosen slots awaiting dealer evaluation. Token placement lives on
/// [`crate::table::Table`], since a token is, semantically, shared state
/// about the table rather than about the player alone.
pub struct Player {
    id: usize,
    human: bool,
    feature_size: usize,
    score: AtomicU32,
    terminate: AtomicBool,
    examined: AtomicBool,
    freeze_until_ms: AtomicI64,
    chosen_slots: Mutex<VecDeque<Slot>>,
    has_slot: Condvar,
}

impl Player {
    /// Creates a fresh, unfrozen, unexamined player with an empty queue.
    #[must_use]
    pub fn new(id: usize, human: bool, feature_size: usize) -> Self {
        Self {
            id,
            human,
            feature_size,
            score: AtomicU32::new(0),
            terminate: AtomicBool::new(false),
            examined: AtomicBool::new(false),
            freeze_until_ms: AtomicI64::new(-1),
            chosen_slots: Mutex::new(VecDeque::with_capacity(feature_size)),
            has_slot: Condvar::new(),
        }
    }

    /// This player's seat index.
    #[must_use]
    pub const fn id(&self) -> usize {
        self.id
    }

    /// Whether this seat is driven by a human (via `key_pressed`) rather
    /// than the computer-agent generator.
    #[must_use]
    pub const fn is_human(&self) -> bool {
        self.human
    }

    /// This player's current score.
    #[must_use]
    pub fn score(&self) -> u32 {
        self.score.load(Ordering::Acquire)
    }

    /// Whether a claim from this player is currently pending dealer
    /// evaluation. While set, further key presses are rejected.
    #[must_use]
    pub fn is_examined(&self) -> bool {
        self.examined.load(Ordering::Acquire)
    }

    pub(crate) fn set_examined(&self, value: bool) {
        self.examined.store(value, Ordering::Release);
    }

    /// The absolute timestamp, in milliseconds, before which this player's
    /// key presses are rejected. `-1` means not frozen.
    #[must_use]
    pub fn freeze_until_ms(&self) -> i64 {
        self.freeze_until_ms.load(Ordering::Acquire)
    }

    pub(crate) fn set_freeze_until_ms(&self, value: i64) {
        self.freeze_until_ms.store(value, Ordering::Release);
    }

    /// Whether this player's thread(s) have been asked to stop.
    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.terminate.load(Ordering::Acquire)
    }

    /// Attempts to enqueue `slot` as a chosen slot.
    ///
    /// Admitted iff: this player is not awaiting examination, the table is
    /// ready, the player is not frozen, and fewer than `feature_size` slots
    /// are already queued. The whole predicate and the enqueue happen under
    /// the same lock that guards the queue, so this can never race a
    /// concurrent `point`/`penalty`/`clear_queue` clearing it out from
    /// under a press that should have been rejected.
    ///
    /// Returns whether the press was admitted.
    pub fn key_pressed(&self, table: &Table, slot: Slot) -> bool {
        let mut queue = self.chosen_slots.lock();
        if self.is_examined()
            || !table.is_ready()
            || self.freeze_until_ms() > now_ms()
            || queue.len() >= self.feature_size
        {
            return false;
        }
        queue.push_back(slot);
        drop(queue);
        self.has_slot.notify_one();
        true
    }

    /// Blocks until a chosen slot is available or this player is
    /// terminated with an empty queue, returning the next slot in FIFO
    /// order, or `None` once terminated and drained.
    pub(crate) fn wait_for_slot(&self) -> Option<Slot> {
        let mut queue = self.chosen_slots.lock();
        while queue.is_empty() && !self.is_terminated() {
            queue = self
                .has_slot
                .wait(queue)
                .unwrap_or_else(std::sync::PoisonError::into_inner);
        }
        queue.pop_front()
    }

    /// Awards a point: increments the score, starts the point freeze,
    /// clears the examined flag and the chosen-slot queue, and notifies the
    /// UI of both.
    pub(crate) fn point(&self, sink: &dyn TableSink, point_freeze_ms: i64) {
        let score = self.score.fetch_add(1, Ordering::AcqRel) + 1;
        self.set_freeze_until_ms(now_ms() + point_freeze_ms);
        self.set_examined(false);
        self.chosen_slots.lock().clear();
        sink.set_score(self.id, score);
        sink.set_freeze(self.id, point_freeze_ms);
    }

    /// Imposes a penalty freeze, clearing the examined flag and the
    /// chosen-slot queue without touching the score.
    pub(crate) fn penalty(&self, sink: &dyn TableSink, penalty_freeze_ms: i64) {
        self.set_freeze_until_ms(now_ms() + penalty_freeze_ms);
        self.set_examined(false);
        self.chosen_slots.lock().clear();
        sink.set_freeze(self.id, penalty_freeze_ms);
    }

    /// Drops any queued, unexamined chosen slots without otherwise
    /// disturbing score or freeze state. Used at round boundaries when the
    /// table is cleared out from under whatever a player had queued.
    pub(crate) fn clear_queue(&self) {
        self.chosen_slots.lock().clear();
    }

    /// Requests this player's thread(s) stop, waking a blocked
    /// `wait_for_slot`.
    pub(crate) fn terminate(&self) {
        self.terminate.store(true, Ordering::Release);
        self.has_slot.notify_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::NullSink;
    use std::sync::Arc;

    fn table() -> Table {
        let t = Table::new(4, 1, Arc::new(NullSink));
        t.set_ready(true);
        t
    }

    #[test]
    fn key_press_admitted_then_rejected_once_examined() {
        let player = Player::new(0, true, 3);
        let table = table();

        assert!(player.key_pressed(&table, 0));
        assert!(player.key_pressed(&table, 1));
        assert!(player.key_pressed(&table, 2));
        // queue is now full (3 == feature_size)
        assert!(!player.key_pressed(&table, 3));

        player.set_examined(true);
        player.clear_queue();
        assert!(!player.key_pressed(&table, 0));
    }

    #[test]
    fn key_press_rejected_while_frozen() {
        let player = Player::new(0, true, 3);
        let table = table();
        player.set_freeze_until_ms(now_ms() + 60_000);
        assert!(!player.key_pressed(&table, 0));
    }

    #[test]
    fn key_press_rejected_when_table_not_ready() {
        let player = Player::new(0, true, 3);
        let table = Table::new(4, 1, Arc::new(NullSink));
        assert!(!player.key_pressed(&table, 0));
    }

    #[test]
    fn point_increments_score_and_freezes() {
        let player = Player::new(0, true, 3);
        let sink = NullSink;
        player.point(&sink, 1_000);
        assert_eq!(player.score(), 1);
        assert!(player.freeze_until_ms() > now_ms());
        assert!(!player.is_examined());
    }

    #[test]
    fn penalty_freezes_without_scoring() {
        let player = Player::new(0, true, 3);
        let sink = NullSink;
        player.penalty(&sink, 3_000);
        assert_eq!(player.score(), 0);
        assert!(player.freeze_until_ms() > now_ms());
    }

    #[test]
    fn terminate_wakes_a_blocked_wait() {
        let player = Arc::new(Player::new(0, true, 3));
        let waiter = Arc::clone(&player);
        let handle = std::thread::spawn(move || waiter.wait_for_slot());
        std::thread::sleep(std::time::Duration::from_millis(20));
        player.terminate();
        assert_eq!(handle.join().unwrap(), None);
    }
}
