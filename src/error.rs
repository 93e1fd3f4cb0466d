//! Error types.
//!
//! The concurrent core has no user-visible error surface (spec: every
//! rejected key-press, stale claim, or spurious wake is a silent no-op or a
//! re-poll). The one fallible entry point in this crate is validating a
//! [`crate::config::GameConfig`] before a [`crate::dealer::Dealer`] is built
//! from it.

use thiserror::Error;

/// Errors that can occur while validating a [`crate::config::GameConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// `rows` or `columns` is zero.
    #[error("table dimensions must be non-zero")]
    ZeroDimension,
    /// `feature_size` is zero.
    #[error("feature_size must be non-zero")]
    ZeroFeatureSize,
    /// `feature_count` is zero.
    #[error("feature_count must be non-zero")]
    ZeroFeatureCount,
    /// `feature_count.pow(feature_size)` does not fit a `u32`, or the table
    /// is larger than the deck it would be dealt from.
    #[error("table_size exceeds deck_size")]
    TableLargerThanDeck,
    /// Neither human nor computer players were configured.
    #[error("at least one player is required")]
    NoPlayers,
    /// `player_keys` has fewer entries than `human_players`.
    #[error("player_keys must have one entry per human player")]
    NotEnoughKeys,
    /// `turn_timeout_warning_ms` is not smaller than `turn_timeout_ms`.
    #[error("turn_timeout_warning_ms must be smaller than turn_timeout_ms")]
    WarningNotBeforeTimeout,
}
