//! Claim adjudication and the token-toggle entry point from player threads.

use std::collections::VecDeque;

use crate::card::{Card, Slot};

use super::{Dealer, DealerLink};

impl Dealer {
    /// Drains and adjudicates every claim currently available: `first`
    /// (already dequeued by the timer loop's blocking wait) followed by
    /// whatever else has accumulated on the channel since.
    pub(super) fn examine_claims(&self, first: Option<usize>) {
        let mut pending: VecDeque<usize> = first.into_iter().collect();
        loop {
            match self.claims_rx.lock().try_recv() {
                Ok(player_id) => pending.push_back(player_id),
                Err(_) => break,
            }
        }

        while let Some(player_id) = pending.pop_front() {
            self.examine_one_claim(player_id);
        }
    }

    fn examine_one_claim(&self, player_id: usize) {
        let feature_size = self.rules.feature_size();
        let snapshot = self.table.tokens_snapshot(player_id);
        if snapshot.len() != feature_size {
            self.players[player_id].set_examined(false);
            return;
        }

        let guard = self.table.lock_all_slots(false);
        let cards: Vec<Card> = snapshot.iter().filter_map(|&slot| guard.card(slot)).collect();
        drop(guard);

        if cards.len() != snapshot.len() {
            // A concurrent removal raced the snapshot; the claim is stale.
            self.players[player_id].set_examined(false);
            return;
        }

        if self.rules.test_set(&cards) {
            self.pending_removals
                .lock()
                .push_back(snapshot.iter().copied().collect::<Vec<Slot>>());

            for (other_id, other) in self.players.iter().enumerate() {
                for &slot in &snapshot {
                    if self.table.discard_token(other_id, slot) {
                        other.set_examined(false);
                    }
                }
            }

            self.players[player_id].point(self.table.sink(), self.config.config().point_freeze_ms());
            log::info!("player {player_id} completed a legal set");
        } else {
            self.players[player_id].penalty(self.table.sink(), self.config.config().penalty_freeze_ms());
            log::info!("player {player_id} submitted an illegal set");
        }
    }
}

impl DealerLink for Dealer {
    fn toggle_token(&self, player: usize, slot: Slot) {
        let feature_size = self.rules.feature_size();

        if self.table.has_token(player, slot) {
            self.table.remove_token(player, slot);
            return;
        }

        if self.table.token_count(player) >= feature_size {
            return;
        }

        self.table.place_token(player, slot);
        if self.table.token_count(player) == feature_size {
            self.players[player].set_examined(true);
            let _ = self.claims_tx.send(player);
        }
    }
}
