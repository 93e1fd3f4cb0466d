//! The presentation-layer collaborator.
//!
//! spec.md §6 lists `UserInterface` as an external collaborator specified
//! only by the calls the core makes into it — rendering cards, tokens, and
//! timers is out of scope for this crate. [`TableSink`] is that interface;
//! [`NullSink`] is a no-op implementation used by tests and as the default
//! for headless use.

use crate::card::{Card, Slot};

/// Receives notifications of every table, score, and timer mutation the
/// core performs.
///
/// Every method has a default no-op body: implementors only override the
/// calls they care about.
pub trait TableSink: Send + Sync {
    /// A card was placed on `slot`.
    fn place_card(&self, _card: Card, _slot: Slot) {}

    /// The card on `slot` was removed.
    fn remove_card(&self, _slot: Slot) {}

    /// `player` placed a token on `slot`.
    fn place_token(&self, _player: usize, _slot: Slot) {}

    /// `player`'s token on `slot` was removed.
    fn remove_token(&self, _player: usize, _slot: Slot) {}

    /// Every token on `slot` was removed (e.g. the card was cleared).
    fn remove_tokens_on_slot(&self, _slot: Slot) {}

    /// Every token on the table was removed (e.g. a full reshuffle).
    fn remove_all_tokens(&self) {}

    /// `player`'s score changed to `score`.
    fn set_score(&self, _player: usize, _score: u32) {}

    /// `player`'s remaining freeze changed to `ms` milliseconds.
    fn set_freeze(&self, _player: usize, _ms: i64) {}

    /// The countdown display changed to `ms` milliseconds remaining;
    /// `warn` is set once inside the warning window.
    fn set_countdown(&self, _ms: i64, _warn: bool) {}

    /// The elapsed-time display changed to `ms` milliseconds.
    fn set_elapsed(&self, _ms: i64) {}

    /// The round ended; `winners` lists every player tied for the highest
    /// score.
    fn announce_winners(&self, _winners: &[usize]) {}
}

/// A [`TableSink`] that discards every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl TableSink for NullSink {}
