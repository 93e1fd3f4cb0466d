//! Wall-clock milliseconds, shared by every freeze/timeout comparison.

use std::time::{SystemTime, UNIX_EPOCH};

/// Milliseconds since the Unix epoch.
///
/// All of `freezeUntilMs`, `reshuffleAt`, and `elapsedBase` are absolute
/// values on this clock, so comparisons between a player's freeze and the
/// dealer's deadlines stay meaningful across threads without any shared
/// `Instant` anchor to pass around.
#[must_use]
pub fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}
