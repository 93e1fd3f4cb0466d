//! The concurrent game core of a real-time Set card-matching game.
//!
//! The crate provides a [`dealer::Dealer`] that owns the round/timer state
//! machine and a [`table::Table`] shared by every [`player::Player`] agent.
//! Rendering, input capture, and configuration file parsing are external
//! concerns the core only talks to through the [`ui::TableSink`] and
//! [`rules::SetRules`] traits.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use setrs::{ClassicRules, Dealer, GameConfig, NullSink};
//!
//! let config = GameConfig::default()
//!     .with_table(3, 4)
//!     .with_players(0, 2)
//!     .build()
//!     .expect("valid config");
//!
//! let dealer = Dealer::new(config, Arc::new(ClassicRules::STANDARD), Arc::new(NullSink), 42);
//! // dealer.run() blocks for the lifetime of the game; call it from a thread
//! // you control and use `Dealer::terminate`/`Dealer::join` to stop it early.
//! ```

pub mod card;
pub mod clock;
pub mod config;
pub mod dealer;
pub mod error;
pub mod player;
pub mod rules;
mod sync;
pub mod table;
pub mod ui;

pub use card::{Card, Slot};
pub use config::{GameConfig, Mode, ValidatedConfig};
pub use dealer::{Dealer, DealerLink};
pub use error::ConfigError;
pub use player::Player;
pub use rules::{ClassicRules, SetRules};
pub use table::{SlotGuard, Table};
pub use ui::{NullSink, TableSink};
