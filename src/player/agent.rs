//! The per-player main loop: drain chosen slots, toggle tokens.

use std::sync::Arc;

use crate::dealer::DealerLink;
use crate::table::Table;

use super::Player;

/// Runs until `player` is terminated and its queue drains empty.
///
/// Each chosen slot is handled under a writer lock on that slot alone, so a
/// toggle can never observe (or race) a card being placed or removed on it
/// mid-toggle. [`DealerLink::toggle_token`] is called while the lock is
/// still held, matching the contract `toggle_token` relies on to stay
/// consistent with `Dealer::examine_one_claim`'s full-table reader lock.
pub fn run(player: Arc<Player>, table: Arc<Table>, dealer: Arc<dyn DealerLink>) {
    loop {
        let Some(slot) = player.wait_for_slot() else {
            break;
        };

        let guard = table.lock_slot(slot, true);
        if table.is_ready() && guard.card(slot).is_some() {
            dealer.toggle_token(player.id(), slot);
        }
        drop(guard);
    }
}
