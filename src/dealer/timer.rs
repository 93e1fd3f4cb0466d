//! Mode-aware round timing and the claim-channel wake loop.

use std::sync::atomic::Ordering;
use std::time::Duration;

use crate::clock::now_ms;
use crate::config::Mode;

use super::Dealer;

impl Dealer {
    /// Runs until the round's deadline passes or the dealer is terminated,
    /// adjudicating claims as they arrive.
    ///
    /// Each iteration blocks on the claim channel (which doubles as both
    /// the wake signal and the claim FIFO — see the crate's design notes on
    /// the channel-based wake decision), adjudicates whatever claims are
    /// pending, refreshes the timer display, applies any removals the
    /// claims produced, and re-deals into the freed slots.
    pub(super) fn timer_loop(&self) {
        while !self.terminate.load(Ordering::Acquire)
            && now_ms() < self.reshuffle_at()
            && !self.should_finish()
        {
            let first_claim = self.sleep_until_woken_or_timeout();
            self.examine_claims(first_claim);
            self.update_timer_display(false);
            self.apply_pending_removals();
            self.place_cards_on_table();
        }
    }

    fn sleep_until_woken_or_timeout(&self) -> Option<usize> {
        let remaining = self.reshuffle_at().saturating_sub(now_ms());
        let warning_ms = self.config.config().turn_timeout_warning_ms();
        let timeout = if remaining <= warning_ms {
            Duration::from_millis(10)
        } else {
            Duration::from_secs(1)
        };
        self.claims_rx.lock().recv_timeout(timeout).ok()
    }

    /// Pushes the current freeze/countdown/elapsed state to the UI sink.
    ///
    /// `reset` is set once per fresh deal (from `place_cards_on_table`) to
    /// restart the round deadline and clear every player's freeze display;
    /// every other call only refreshes what has already elapsed.
    pub(super) fn update_timer_display(&self, reset: bool) {
        let now = now_ms();
        let warning_ms = self.config.config().turn_timeout_warning_ms();
        let in_warning_window = self.reshuffle_at().saturating_sub(now) <= warning_ms;

        for player in &self.players {
            let remaining = (player.freeze_until_ms() - now).max(0);
            let display_ms = if in_warning_window {
                remaining
            } else {
                round_up_to_seconds(remaining)
            };
            self.table.sink().set_freeze(player.id(), display_ms);
        }

        match self.config.mode() {
            Mode::Countdown => {
                if reset {
                    self.set_reshuffle_at(now + self.config.config().turn_timeout_ms());
                    for player in &self.players {
                        player.set_freeze_until_ms(-1);
                    }
                }
                let remaining = (self.reshuffle_at() - now).max(0);
                self.table.sink().set_countdown(remaining, remaining <= warning_ms);
            }
            Mode::Elapsed => {
                if reset {
                    self.set_elapsed_base(now);
                }
                self.table.sink().set_elapsed(now - self.elapsed_base());
            }
            Mode::FreePlay => {}
        }
    }
}

fn round_up_to_seconds(ms: i64) -> i64 {
    ((ms + 999) / 1000) * 1000
}
