//! Typed, validated game configuration.
//!
//! Loading these values from a properties file (or any other external
//! source) is outside the core's scope; this module only owns the typed
//! representation the dealer and players are built from, the way the
//! teacher crate's `GameOptions` is a plain builder that callers populate
//! however they like.

use crate::error::ConfigError;

/// The three timer modes, derived once from `turn_timeout_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// `turn_timeout_ms > 0`: the round ends when the countdown reaches
    /// zero.
    Countdown,
    /// `turn_timeout_ms < 0`: the round never times out; it only ends when
    /// no legal set remains on the table.
    FreePlay,
    /// `turn_timeout_ms == 0`: the round never times out; the UI is shown
    /// an elapsed-time counter instead of a countdown.
    Elapsed,
}

impl Mode {
    /// Derives the mode from the configured timeout, per spec.md §6.
    #[must_use]
    pub const fn from_turn_timeout_ms(turn_timeout_ms: i64) -> Self {
        if turn_timeout_ms > 0 {
            Self::Countdown
        } else if turn_timeout_ms < 0 {
            Self::FreePlay
        } else {
            Self::Elapsed
        }
    }
}

/// Validated configuration for a [`crate::dealer::Dealer`].
///
/// # Example
///
/// ```
/// use setrs::GameConfig;
///
/// let config = GameConfig::default()
///     .with_table(3, 4)
///     .with_players(2, 1)
///     .build()
///     .expect("valid config");
/// assert_eq!(config.table_size(), 12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    rows: usize,
    columns: usize,
    feature_size: u32,
    feature_count: u32,
    turn_timeout_ms: i64,
    turn_timeout_warning_ms: i64,
    point_freeze_ms: i64,
    penalty_freeze_ms: i64,
    human_players: usize,
    computer_players: usize,
    player_keys: Vec<[char; 1]>,
    hints: bool,
    table_delay_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: 3,
            columns: 4,
            feature_size: 3,
            feature_count: 4,
            turn_timeout_ms: 60_000,
            turn_timeout_warning_ms: 5_000,
            point_freeze_ms: 1_000,
            penalty_freeze_ms: 3_000,
            human_players: 1,
            computer_players: 0,
            player_keys: Vec::new(),
            hints: false,
            table_delay_ms: 10,
        }
    }
}

impl GameConfig {
    /// Sets the table dimensions.
    #[must_use]
    pub const fn with_table(mut self, rows: usize, columns: usize) -> Self {
        self.rows = rows;
        self.columns = columns;
        self
    }

    /// Sets the feature geometry (`feature_size` cards per set,
    /// `feature_count` values per feature). Defaults to the classic 81-card
    /// deck (`feature_count = 4`, `feature_size = 3`).
    #[must_use]
    pub const fn with_features(mut self, feature_size: u32, feature_count: u32) -> Self {
        self.feature_size = feature_size;
        self.feature_count = feature_count;
        self
    }

    /// Sets the number of human and computer players.
    #[must_use]
    pub const fn with_players(mut self, human: usize, computer: usize) -> Self {
        self.human_players = human;
        self.computer_players = computer;
        self
    }

    /// Sets the keyboard-to-slot key map for human players. Unused by
    /// computer players.
    #[must_use]
    pub fn with_player_keys(mut self, keys: Vec<[char; 1]>) -> Self {
        self.player_keys = keys;
        self
    }

    /// Sets the round timeout in milliseconds. Positive selects
    /// [`Mode::Countdown`], negative selects [`Mode::FreePlay`], zero
    /// selects [`Mode::Elapsed`].
    #[must_use]
    pub const fn with_turn_timeout_ms(mut self, turn_timeout_ms: i64) -> Self {
        self.turn_timeout_ms = turn_timeout_ms;
        self
    }

    /// Sets the countdown threshold, in milliseconds remaining, below which
    /// the dealer polls more frequently and the UI is warned.
    #[must_use]
    pub const fn with_turn_timeout_warning_ms(mut self, warning_ms: i64) -> Self {
        self.turn_timeout_warning_ms = warning_ms;
        self
    }

    /// Sets the freeze duration awarded on a legal set.
    #[must_use]
    pub const fn with_point_freeze_ms(mut self, ms: i64) -> Self {
        self.point_freeze_ms = ms;
        self
    }

    /// Sets the freeze duration imposed on an illegal set.
    #[must_use]
    pub const fn with_penalty_freeze_ms(mut self, ms: i64) -> Self {
        self.penalty_freeze_ms = ms;
        self
    }

    /// Sets whether the UI should be asked to render set hints.
    #[must_use]
    pub const fn with_hints(mut self, hints: bool) -> Self {
        self.hints = hints;
        self
    }

    /// Sets the inter-player thread start/join spacing, in milliseconds.
    #[must_use]
    pub const fn with_table_delay_ms(mut self, ms: u64) -> Self {
        self.table_delay_ms = ms;
        self
    }

    /// Validates the configuration, producing the derived fields the dealer
    /// relies on.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the table is empty, no players are
    /// configured, there are not enough player keys for the human players,
    /// the feature geometry is degenerate, or the table is larger than the
    /// deck it draws from.
    pub fn build(self) -> Result<ValidatedConfig, ConfigError> {
        if self.rows == 0 || self.columns == 0 {
            return Err(ConfigError::ZeroDimension);
        }
        if self.feature_size == 0 {
            return Err(ConfigError::ZeroFeatureSize);
        }
        if self.feature_count == 0 {
            return Err(ConfigError::ZeroFeatureCount);
        }
        if self.human_players + self.computer_players == 0 {
            return Err(ConfigError::NoPlayers);
        }
        if self.player_keys.len() < self.human_players {
            return Err(ConfigError::NotEnoughKeys);
        }
        if self.turn_timeout_warning_ms >= self.turn_timeout_ms && self.turn_timeout_ms > 0 {
            return Err(ConfigError::WarningNotBeforeTimeout);
        }

        let deck_size = self
            .feature_count
            .checked_pow(self.feature_size)
            .ok_or(ConfigError::TableLargerThanDeck)? as usize;
        let table_size = self.rows * self.columns;
        if table_size > deck_size {
            return Err(ConfigError::TableLargerThanDeck);
        }

        let mode = Mode::from_turn_timeout_ms(self.turn_timeout_ms);

        Ok(ValidatedConfig {
            config: self,
            table_size,
            deck_size,
            mode,
        })
    }

    /// Number of table slots (`rows * columns`).
    #[must_use]
    pub const fn table_size(&self) -> usize {
        self.rows * self.columns
    }

    /// The configured feature-combo size (cards per set).
    #[must_use]
    pub const fn feature_size(&self) -> u32 {
        self.feature_size
    }

    /// The configured number of values per feature.
    #[must_use]
    pub const fn feature_count(&self) -> u32 {
        self.feature_count
    }

    /// Number of human player seats.
    #[must_use]
    pub const fn human_players(&self) -> usize {
        self.human_players
    }

    /// Number of computer player seats.
    #[must_use]
    pub const fn computer_players(&self) -> usize {
        self.computer_players
    }

    /// Total number of player seats.
    #[must_use]
    pub const fn total_players(&self) -> usize {
        self.human_players + self.computer_players
    }

    /// The configured round timeout, in milliseconds.
    #[must_use]
    pub const fn turn_timeout_ms(&self) -> i64 {
        self.turn_timeout_ms
    }

    /// The configured warning threshold, in milliseconds.
    #[must_use]
    pub const fn turn_timeout_warning_ms(&self) -> i64 {
        self.turn_timeout_warning_ms
    }

    /// The configured point freeze duration, in milliseconds.
    #[must_use]
    pub const fn point_freeze_ms(&self) -> i64 {
        self.point_freeze_ms
    }

    /// The configured penalty freeze duration, in milliseconds.
    #[must_use]
    pub const fn penalty_freeze_ms(&self) -> i64 {
        self.penalty_freeze_ms
    }

    /// Whether the UI should be asked to render set hints.
    #[must_use]
    pub const fn hints(&self) -> bool {
        self.hints
    }

    /// The configured inter-player thread start/join spacing.
    #[must_use]
    pub const fn table_delay_ms(&self) -> u64 {
        self.table_delay_ms
    }
}

/// A [`GameConfig`] that has passed [`GameConfig::build`], with its derived
/// fields (`table_size`, `deck_size`, `mode`) pre-computed.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedConfig {
    config: GameConfig,
    table_size: usize,
    deck_size: usize,
    mode: Mode,
}

impl ValidatedConfig {
    /// The underlying configuration.
    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    /// `rows * columns`.
    #[must_use]
    pub const fn table_size(&self) -> usize {
        self.table_size
    }

    /// `feature_count.pow(feature_size)`.
    #[must_use]
    pub const fn deck_size(&self) -> usize {
        self.deck_size
    }

    /// The derived timer mode.
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }
}
