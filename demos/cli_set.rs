//! CLI Set example.
//!
//! Deals a real game on the terminal: one human seat driven by typed
//! commands, the rest computer seats driven by the library's own random key
//! generator. Not a reference UI — a smoke test you can play by hand.

#![allow(clippy::missing_docs_in_private_items)]

use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{SystemTime, UNIX_EPOCH};

use setrs::{Card, ClassicRules, Dealer, GameConfig, Slot, TableSink};

/// Prints every table/score/timer notification to stdout.
struct TerminalSink {
    last_countdown_s: AtomicU32,
}

impl TerminalSink {
    fn new() -> Self {
        Self {
            last_countdown_s: AtomicU32::new(u32::MAX),
        }
    }
}

impl TableSink for TerminalSink {
    fn place_card(&self, card: Card, slot: Slot) {
        println!("  slot {slot:>2}: card {card:02} dealt");
    }

    fn remove_card(&self, slot: Slot) {
        println!("  slot {slot:>2}: cleared");
    }

    fn place_token(&self, player: usize, slot: Slot) {
        println!("  player {player} marks slot {slot}");
    }

    fn remove_token(&self, player: usize, slot: Slot) {
        println!("  player {player} unmarks slot {slot}");
    }

    fn set_score(&self, player: usize, score: u32) {
        println!(">>> player {player} now has {score} point(s)");
    }

    fn set_freeze(&self, player: usize, ms: i64) {
        if ms > 0 {
            println!("  player {player} frozen for {ms} ms");
        }
    }

    fn set_countdown(&self, ms: i64, warn: bool) {
        let seconds = (ms.max(0) / 1000) as u32;
        if self.last_countdown_s.swap(seconds, Ordering::Relaxed) != seconds {
            let marker = if warn { "!" } else { "" };
            println!("  [{seconds:>3}s remaining{marker}]");
        }
    }

    fn set_elapsed(&self, ms: i64) {
        let _ = ms;
    }

    fn announce_winners(&self, winners: &[usize]) {
        println!("=== game over ===");
        match winners {
            [] => println!("no winners"),
            [one] => println!("player {one} wins!"),
            many => println!("tied winners: {many:?}"),
        }
    }
}

fn main() {
    env_logger::init();
    println!("Set CLI example (type 'q' to quit, or '<slot>' to mark a slot as player 0)");

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();

    let config = GameConfig::default()
        .with_table(3, 4)
        .with_players(1, 2)
        .with_player_keys(vec![['0']])
        .with_turn_timeout_ms(90_000)
        .with_hints(true)
        .build()
        .expect("default configuration is always valid");

    let dealer = Dealer::new(config, Arc::new(ClassicRules::STANDARD), Arc::new(TerminalSink::new()), seed);

    let run_handle = {
        let dealer = Arc::clone(&dealer);
        thread::spawn(move || dealer.run())
    };

    let table = Arc::clone(dealer.table());
    let human = Arc::clone(&dealer.players()[0]);

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let Ok(line) = line else { break };
        let line = line.trim();
        if line.eq_ignore_ascii_case("q") {
            break;
        }

        let Ok(slot) = line.parse::<Slot>() else {
            println!("enter a slot number or 'q'");
            continue;
        };

        if slot >= table.size() {
            println!("slot out of range (0..{})", table.size());
            continue;
        }

        if !human.key_pressed(&table, slot) {
            println!("press on slot {slot} was dropped (frozen, already examined, or table busy)");
        }
    }

    print!("shutting down... ");
    io::stdout().flush().ok();
    dealer.terminate();
    run_handle.join().expect("dealer thread panicked");
    println!("done.");
}
