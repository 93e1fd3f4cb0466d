//! The computer-player input generator.
//!
//! Stands in for a human at the keyboard: picks a random slot and presses
//! it, the same way `agent::run` expects any press to arrive. Throttles
//! itself on rejection so an idle or frozen computer player doesn't spin.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::table::Table;

use super::Player;

/// Runs until `player` is terminated, pressing random slots on `table`.
pub fn run(player: Arc<Player>, table: Arc<Table>, seed: u64) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let table_size = table.size();
    if table_size == 0 {
        return;
    }

    while !player.is_terminated() {
        let slot = rng.random_range(0..table_size);
        if !player.key_pressed(&table, slot) {
            thread::sleep(Duration::from_millis(rng.random_range(5..=25)));
        }
    }
}
