//! Round lifecycle: start, finish-detection, termination, join, winners.

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use super::{Dealer, DealerLink, PlayerThreads};

impl Dealer {
    /// Runs the full round lifecycle: start every player thread, deal and
    /// time rounds until no legal set remains reachable, announce winners,
    /// then terminate and join every thread.
    ///
    /// Blocks the calling thread for the entire game; callers that want to
    /// drive a UI concurrently should call this from a dedicated thread.
    pub fn run(self: &Arc<Self>) {
        self.start_players();

        while !self.should_finish() {
            self.place_cards_on_table();
            self.timer_loop();
            self.remove_all_cards_from_table();
        }

        self.announce_winners();
        self.terminate();
        self.join();
    }

    fn start_players(self: &Arc<Self>) {
        let mut threads = self.threads.lock();
        for player in &self.players {
            let dealer_link: Arc<dyn DealerLink> = Arc::clone(self) as Arc<dyn DealerLink>;
            let table = Arc::clone(&self.table);
            let agent_player = Arc::clone(player);
            let agent = thread::Builder::new()
                .name(format!("set-player-{}", player.id()))
                .spawn(move || crate::player::agent::run(agent_player, table, dealer_link))
                .expect("failed to spawn player agent thread");

            let generator = if player.is_human() {
                None
            } else {
                let generator_player = Arc::clone(player);
                let table = Arc::clone(&self.table);
                let seed = self.next_seed();
                Some(
                    thread::Builder::new()
                        .name(format!("set-computer-{}", player.id()))
                        .spawn(move || crate::player::computer::run(generator_player, table, seed))
                        .expect("failed to spawn computer generator thread"),
                )
            };

            threads.push(Some(PlayerThreads { agent, generator }));
            drop_delay(self.config.config().table_delay_ms());
        }
    }

    /// Whether the round is over: terminated externally, or no legal set
    /// remains reachable. While cards remain in the deck, a set is always
    /// still reachable by reshuffling, so the check only looks at the deck
    /// itself; once the deck is exhausted, what matters is only whatever is
    /// currently laid out on the table.
    pub(super) fn should_finish(&self) -> bool {
        if self.terminate.load(Ordering::Acquire) {
            return true;
        }

        let deck_is_empty = self.deck.lock().is_empty();
        if !deck_is_empty {
            let remaining = self.deck.lock().iter().copied().collect::<Vec<_>>();
            return self.rules.find_sets(&remaining, 1).is_empty();
        }

        self.rules.find_sets(&self.cards_on_table(), 1).is_empty()
    }

    fn announce_winners(&self) {
        let max_score = self.players.iter().map(|p| p.score()).max().unwrap_or(0);
        let winners: Vec<usize> = self
            .players
            .iter()
            .filter(|p| p.score() == max_score)
            .map(|p| p.id())
            .collect();
        self.table.sink().announce_winners(&winners);
    }

    /// Asks every player thread to stop, then flips the dealer's own
    /// terminate flag. Players are signaled in descending id order with
    /// `table_delay_ms` spacing, mirroring the ascending order threads were
    /// started in. Idempotent: safe to call more than once, including from
    /// outside the normal `run` lifecycle (e.g. to cut a round short).
    pub fn terminate(&self) {
        for player in self.players.iter().rev() {
            player.terminate();
            drop_delay(self.config.config().table_delay_ms());
        }
        self.terminate.store(true, Ordering::Release);
    }

    /// Joins every started player/generator thread, in descending id order.
    /// Idempotent: threads already joined (or never started) are skipped.
    pub fn join(&self) {
        let mut threads = self.threads.lock();
        for slot in threads.iter_mut().rev() {
            if let Some(PlayerThreads { agent, generator }) = slot.take() {
                if let Some(generator) = generator {
                    let _ = generator.join();
                }
                let _ = agent.join();
            }
        }
    }
}

fn drop_delay(ms: u64) {
    if ms > 0 {
        thread::sleep(Duration::from_millis(ms));
    }
}
