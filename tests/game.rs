//! End-to-end tests of the dealer/player/table pipeline.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use setrs::{ClassicRules, ConfigError, Dealer, DealerLink, GameConfig, NullSink, SetRules, Table};

/// Captures every notification the dealer sends a `TableSink`, so tests can
/// assert on outcomes instead of threading a channel through the dealer.
#[derive(Default)]
struct RecordingSink {
    removed_slots: Mutex<HashSet<usize>>,
    scores: Mutex<HashMap<usize, u32>>,
    winners: Mutex<Vec<usize>>,
    full_reshuffles: AtomicUsize,
}

impl setrs::TableSink for RecordingSink {
    fn remove_card(&self, slot: usize) {
        self.removed_slots.lock().unwrap().insert(slot);
    }

    fn set_score(&self, player: usize, score: u32) {
        self.scores.lock().unwrap().insert(player, score);
    }

    fn remove_all_tokens(&self) {
        self.full_reshuffles.fetch_add(1, Ordering::Relaxed);
    }

    fn announce_winners(&self, winners: &[usize]) {
        *self.winners.lock().unwrap() = winners.to_vec();
    }
}

fn build_dealer(
    rows: usize,
    columns: usize,
    human: usize,
    computer: usize,
    sink: Arc<RecordingSink>,
    seed: u64,
) -> Arc<Dealer> {
    let config = GameConfig::default()
        .with_table(rows, columns)
        .with_players(human, computer)
        .with_player_keys(vec![['a']; human])
        .with_turn_timeout_ms(60_000)
        .build()
        .expect("test configuration is valid");
    Dealer::new(config, Arc::new(ClassicRules::STANDARD), sink, seed)
}

/// Scenario 1 (spec.md §8): terminating a fresh dealer flips every player's
/// terminate flag and every thread it started joins cleanly.
#[test]
fn terminate_flag_propagates_and_threads_join() {
    let sink = Arc::new(RecordingSink::default());
    let dealer = build_dealer(3, 4, 1, 1, sink, 1);

    let handle = {
        let dealer = Arc::clone(&dealer);
        thread::spawn(move || dealer.run())
    };

    thread::sleep(Duration::from_millis(50));
    dealer.terminate();
    handle.join().expect("dealer thread panicked");

    for player in dealer.players() {
        assert!(player.is_terminated());
    }
}

/// A Countdown round must end on its own once `turn_timeout_ms` elapses,
/// even when nothing ever happens on the table: `place_cards_on_table` runs
/// on every `timer_loop` tick regardless of whether a claim arrived, and an
/// idle tick that finds no empty slots must not push the deadline back out
/// (spec.md §4.3 step 7 only resets the timer display "if any card was
/// placed"). Without that gate, `reshuffle_at` would be refreshed to
/// `now + turn_timeout_ms` on every tick forever and the round would never
/// time out on its own.
#[test]
fn countdown_round_ends_on_its_own_timeout_even_when_idle() {
    let sink = Arc::new(RecordingSink::default());
    let config = GameConfig::default()
        .with_table(3, 4)
        .with_players(0, 1)
        .with_turn_timeout_ms(100)
        .with_turn_timeout_warning_ms(20)
        .build()
        .expect("short countdown is still a valid configuration");
    let dealer = Dealer::new(config, Arc::new(ClassicRules::STANDARD), Arc::clone(&sink), 5);

    let handle = {
        let dealer = Arc::clone(&dealer);
        thread::spawn(move || dealer.run())
    };

    thread::sleep(Duration::from_millis(1_500));

    // Each full round (deal -> timer_loop -> drain) fires exactly one
    // `remove_all_tokens` at the `Draining` transition; seeing at least one
    // within 1.5s of a 100ms countdown proves the round actually ended
    // instead of `reshuffle_at` being pushed out on every idle tick.
    assert!(sink.full_reshuffles.load(Ordering::Relaxed) >= 1);

    dealer.terminate();
    handle.join().expect("dealer thread panicked");
}

/// Scenario 2 (spec.md §8), driven through the real claim pipeline rather
/// than the dealer's private removal queue: whatever three cards the dealer
/// actually deals, submitting all three as one player's claim resolves
/// consistently with `ClassicRules::test_set` on that same triple.
#[test]
fn claim_examination_matches_set_legality_of_the_dealt_triple() {
    let sink = Arc::new(RecordingSink::default());
    let dealer = build_dealer(1, 3, 1, 0, Arc::clone(&sink), 7);

    let handle = {
        let dealer = Arc::clone(&dealer);
        thread::spawn(move || dealer.run())
    };

    thread::sleep(Duration::from_millis(50));

    let cards: Vec<u32> = {
        let guard = dealer.table().lock_all_slots(false);
        (0..3)
            .map(|slot| guard.card(slot).expect("every slot should be dealt on a 3-slot table"))
            .collect()
    };
    let is_legal = ClassicRules::STANDARD.test_set(&cards);

    for slot in 0..3 {
        dealer.toggle_token(0, slot);
    }

    thread::sleep(Duration::from_millis(200));

    let player0 = &dealer.players()[0];
    if is_legal {
        assert_eq!(player0.score(), 1);
        assert_eq!(sink.scores.lock().unwrap().get(&0), Some(&1));
        for slot in 0..3 {
            assert!(sink.removed_slots.lock().unwrap().contains(&slot));
        }
    } else {
        assert_eq!(player0.score(), 0);
        assert!(player0.freeze_until_ms() > 0);
        assert!(sink.removed_slots.lock().unwrap().is_empty());
    }

    dealer.terminate();
    handle.join().expect("dealer thread panicked");
}

/// Two players contending for an overlapping slot (spec.md §4.3's
/// stale-snapshot scenario: a legal claim discards a still-queued player's
/// token on a shared slot) must never leave either player's token count out
/// of `[0, feature_size]`, regardless of which claim the dealer happens to
/// resolve first.
#[test]
fn overlapping_claims_never_corrupt_token_counts() {
    let sink = Arc::new(RecordingSink::default());
    let dealer = build_dealer(2, 3, 2, 0, Arc::clone(&sink), 11);

    let handle = {
        let dealer = Arc::clone(&dealer);
        thread::spawn(move || dealer.run())
    };

    thread::sleep(Duration::from_millis(50));

    // Both players put a token on slot 0; player 0 additionally claims
    // slots 1 and 2, player 1 claims slots 3 and 4. Whichever claim the
    // dealer resolves first may clear slot 0's token out from under the
    // other — exactly the race spec.md's stale-snapshot branch is for.
    dealer.toggle_token(0, 0);
    dealer.toggle_token(1, 0);
    dealer.toggle_token(0, 1);
    dealer.toggle_token(1, 3);
    dealer.toggle_token(0, 2);
    dealer.toggle_token(1, 4);

    thread::sleep(Duration::from_millis(200));

    // Regardless of which claim (if either) was legal, no player should
    // ever have more tokens recorded than `feature_size`, and the dealer
    // must not have panicked or wedged.
    assert!(dealer.table().token_count(0) <= 3);
    assert!(dealer.table().token_count(1) <= 3);

    dealer.terminate();
    handle.join().expect("dealer thread panicked");
}

/// A degenerate deck (one feature value, feature count too small to admit a
/// reachable set) ends the round on the very first `should_finish` check,
/// exercising `announce_winners` and full shutdown without needing to play
/// a real round to completion.
#[test]
fn unreachable_set_finishes_the_round_immediately_and_announces_winners() {
    let sink = Arc::new(RecordingSink::default());
    let config = GameConfig::default()
        .with_table(1, 1)
        .with_features(3, 1)
        .with_players(0, 1)
        .with_turn_timeout_ms(60_000)
        .build()
        .expect("degenerate single-card deck is still a valid configuration");
    let dealer = Dealer::new(config, Arc::new(ClassicRules::new(3, 1)), Arc::clone(&sink), 3);

    let handle = {
        let dealer = Arc::clone(&dealer);
        thread::spawn(move || dealer.run())
    };

    handle.join().expect("dealer thread panicked");

    let winners = sink.winners.lock().unwrap();
    assert_eq!(*winners, vec![0]);
    for player in dealer.players() {
        assert!(player.is_terminated());
    }
}

#[test]
fn config_rejects_zero_dimensions() {
    let err = GameConfig::default()
        .with_table(0, 4)
        .build()
        .expect_err("zero rows must be rejected");
    assert_eq!(err, ConfigError::ZeroDimension);
}

#[test]
fn config_rejects_table_larger_than_deck() {
    let err = GameConfig::default()
        .with_table(10, 10)
        .with_features(3, 1)
        .with_players(1, 0)
        .with_player_keys(vec![['a']])
        .build()
        .expect_err("a 100-slot table cannot be dealt from a 1-card deck");
    assert_eq!(err, ConfigError::TableLargerThanDeck);
}

#[test]
fn config_rejects_missing_player_keys() {
    let err = GameConfig::default()
        .with_players(2, 0)
        .with_player_keys(vec![['a']])
        .build()
        .expect_err("two human seats need two player keys");
    assert_eq!(err, ConfigError::NotEnoughKeys);
}

#[test]
fn config_rejects_no_players() {
    let err = GameConfig::default()
        .with_players(0, 0)
        .build()
        .expect_err("a game needs at least one seat");
    assert_eq!(err, ConfigError::NoPlayers);
}

/// Not part of the spec's scenario list, but a direct check of the table
/// invariant from spec.md §8: a token can never exist on an empty slot.
#[test]
fn removing_a_card_clears_every_players_token_on_that_slot() {
    let table = Table::new(2, 3, Arc::new(NullSink));
    {
        let mut guard = table.lock_slot(0, true);
        table.place_card(&mut guard, 5, 0);
    }
    for player in 0..3 {
        table.place_token(player, 0);
    }

    {
        let mut guard = table.lock_slot(0, true);
        table.remove_card(&mut guard, 0);
    }

    for player in 0..3 {
        assert!(!table.has_token(player, 0));
    }
}
