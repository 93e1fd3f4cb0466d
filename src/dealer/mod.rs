//! The dealer: round lifecycle, timing, and claim adjudication.

mod claims;
mod lifecycle;
mod placement;
mod timer;

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::mpsc::{self, Receiver, SyncSender};
use std::sync::Arc;
use std::thread::JoinHandle;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::card::{Card, Slot};
use crate::config::ValidatedConfig;
use crate::player::Player;
use crate::rules::SetRules;
use crate::sync::Mutex;
use crate::table::Table;
use crate::ui::TableSink;

/// The interface a player's main loop holds back onto the dealer.
///
/// Kept as a trait, rather than a concrete `Arc<Dealer>` field on `Player`,
/// so the player module has no dependency on the dealer module — only the
/// reverse. `toggle_token` is called by the player thread while it still
/// holds the writer lock on `slot`.
pub trait DealerLink: Send + Sync {
    /// Toggles `player`'s token on `slot`, submitting a claim to the dealer
    /// once a third token completes the set.
    fn toggle_token(&self, player: usize, slot: Slot);
}

struct PlayerThreads {
    agent: JoinHandle<()>,
    generator: Option<JoinHandle<()>>,
}

/// Owns the round lifecycle: dealing, timing, claim adjudication, and
/// player thread lifecycle.
///
/// `Dealer` is always driven through an `Arc<Dealer>` ([`Dealer::new`]
/// returns one directly) since player threads hold it as
/// `Arc<dyn DealerLink>` for the lifetime of the round.
pub struct Dealer {
    config: ValidatedConfig,
    rules: Arc<dyn SetRules>,
    table: Arc<Table>,
    players: Vec<Arc<Player>>,
    deck: Mutex<VecDeque<Card>>,
    pending_removals: Mutex<VecDeque<Vec<Slot>>>,
    claims_tx: SyncSender<usize>,
    claims_rx: Mutex<Receiver<usize>>,
    threads: Mutex<Vec<Option<PlayerThreads>>>,
    reshuffle_at: AtomicI64,
    elapsed_base: AtomicI64,
    terminate: AtomicBool,
    rng: Mutex<ChaCha8Rng>,
}

impl Dealer {
    /// Builds a dealer with a full deck, one [`Player`] per configured
    /// seat, and a fresh [`Table`], but does not start any threads — call
    /// [`Dealer::run`] for that.
    #[must_use]
    pub fn new(
        config: ValidatedConfig,
        rules: Arc<dyn SetRules>,
        sink: Arc<dyn TableSink>,
        seed: u64,
    ) -> Arc<Self> {
        let total_players = config.config().total_players();
        let table = Arc::new(Table::new(config.table_size(), total_players, sink));

        let players = (0..total_players)
            .map(|id| {
                let human = id < config.config().human_players();
                Arc::new(Player::new(id, human, config.config().feature_size() as usize))
            })
            .collect();

        let deck: VecDeque<Card> = (0..config.deck_size() as u32).collect();
        let (claims_tx, claims_rx) = mpsc::sync_channel(total_players.max(1));

        Arc::new(Self {
            config,
            rules,
            table,
            players,
            deck: Mutex::new(deck),
            pending_removals: Mutex::new(VecDeque::new()),
            claims_tx,
            claims_rx: Mutex::new(claims_rx),
            threads: Mutex::new(Vec::new()),
            reshuffle_at: AtomicI64::new(i64::MAX),
            elapsed_base: AtomicI64::new(0),
            terminate: AtomicBool::new(false),
            rng: Mutex::new(ChaCha8Rng::seed_from_u64(seed)),
        })
    }

    /// The shared table this dealer deals onto.
    #[must_use]
    pub fn table(&self) -> &Arc<Table> {
        &self.table
    }

    /// The players seated at this dealer's table, in id order.
    #[must_use]
    pub fn players(&self) -> &[Arc<Player>] {
        &self.players
    }

    fn reshuffle_at(&self) -> i64 {
        self.reshuffle_at.load(Ordering::Acquire)
    }

    fn set_reshuffle_at(&self, value: i64) {
        self.reshuffle_at.store(value, Ordering::Release);
    }

    fn elapsed_base(&self) -> i64 {
        self.elapsed_base.load(Ordering::Acquire)
    }

    fn set_elapsed_base(&self, value: i64) {
        self.elapsed_base.store(value, Ordering::Release);
    }

    fn next_seed(&self) -> u64 {
        use rand::Rng;
        self.rng.lock().random()
    }

    fn cards_on_table(&self) -> Vec<Card> {
        let guard = self.table.lock_all_slots(false);
        guard.slots().filter_map(|slot| guard.card(slot)).collect()
    }
}
