//! Dealing cards onto and off of the table.

use rand::seq::SliceRandom;

use crate::card::Card;
use crate::config::Mode;

use super::Dealer;

impl Dealer {
    /// Deals from the deck into every currently empty slot, shuffling both
    /// the deck and the slot order first.
    ///
    /// Acquires writer locks on every empty slot and the deck, in that
    /// order, clears the table-ready gate for the duration, and restores it
    /// once the new layout is fully in place. Only pushes a fresh timer
    /// deadline to the UI when this call actually placed a card and the
    /// round isn't about to end — an empty `timer_loop` tick that finds no
    /// empty slots (or finds the deck too depleted to fill them) must not
    /// keep resetting the countdown, or the round would never time out.
    pub(super) fn place_cards_on_table(&self) {
        self.table.set_ready(false);

        let empty_slots = self.table.empty_slots();
        let mut guard = self.table.lock_slots(&empty_slots, true);
        let mut deck = self.deck.lock();

        let mut shuffled_slots = empty_slots;
        shuffled_slots.shuffle(&mut *self.rng.lock());

        let mut drawn: Vec<Card> = deck.drain(..).collect();
        drawn.shuffle(&mut *self.rng.lock());
        *deck = drawn.into();

        let placed = shuffled_slots.len().min(deck.len());
        for slot in shuffled_slots.into_iter().take(placed) {
            if let Some(card) = deck.pop_front() {
                self.table.place_card(&mut guard, card, slot);
            }
        }

        drop(deck);
        drop(guard);

        if self.config.mode() != Mode::Countdown {
            let finished_reachable = self.rules.find_sets(&self.cards_on_table(), 1).is_empty();
            self.set_reshuffle_at(if finished_reachable {
                crate::clock::now_ms()
            } else {
                i64::MAX
            });
        }

        if placed > 0 && !self.should_finish() {
            self.update_timer_display(true);
            self.log_hints_if_enabled();
        }

        self.table.set_ready(true);
    }

    fn log_hints_if_enabled(&self) {
        if !self.config.config().hints() {
            return;
        }
        let cards = self.cards_on_table();
        let hints = self.rules.find_sets(&cards, 3);
        log::debug!("{} legal set(s) currently available on the table", hints.len());
    }

    /// Drains every queued removal (slot lists from adjudicated legal
    /// claims), returning each removed card to the deck.
    ///
    /// The original implementation's on-disk source treats `Countdown` mode
    /// specially here; this crate always returns removed cards to the deck
    /// in every mode, since nothing in the observable behavior distinguishes
    /// "discarded" from "returned but never redealt before the deck empties"
    /// — see `DESIGN.md`.
    pub(super) fn apply_pending_removals(&self) {
        loop {
            let Some(slots) = self.pending_removals.lock().pop_front() else {
                break;
            };
            let mut guard = self.table.lock_slots(&slots, true);
            let mut deck = self.deck.lock();
            for slot in slots {
                if let Some(card) = self.table.remove_card(&mut guard, slot) {
                    deck.push_back(card);
                }
            }
        }
    }

    /// Clears every slot on the table, returns every card to the deck, and
    /// drops every player's queued-but-unexamined chosen slots.
    pub(super) fn remove_all_cards_from_table(&self) {
        let mut guard = self.table.lock_all_slots(true);
        self.table.sink().remove_all_tokens();
        let mut deck = self.deck.lock();
        for slot in 0..self.table.size() {
            if let Some(card) = self.table.remove_card(&mut guard, slot) {
                deck.push_back(card);
            }
        }
        drop(deck);
        drop(guard);

        for player in &self.players {
            player.clear_queue();
        }
    }
}
