//! Staleness policy: when does a gap call for a backfill?

use time::Duration;

/// Default staleness threshold in minutes.
///
/// The upstream provider publishes a fresh observation roughly every half
/// hour. A gap below this threshold means the store lags by at most one
/// observation and a single append closes it; a gap at or beyond it means
/// intermediate readings were missed and only a series merge recovers them.
pub const DEFAULT_STALENESS_MINUTES: i64 = 40;

/// Decides whether a timestamp gap is small enough to append a single
/// reading or wide enough to trigger a series backfill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StalenessPolicy {
    staleness: Duration,
}

impl StalenessPolicy {
    /// Policy with a threshold of `minutes`.
    pub fn from_minutes(minutes: i64) -> Self {
        Self {
            staleness: Duration::minutes(minutes),
        }
    }

    /// The configured threshold.
    pub fn staleness(&self) -> Duration {
        self.staleness
    }

    /// True when `gap` is at or beyond the threshold.
    ///
    /// The boundary itself counts as stale: a gap of exactly the threshold
    /// triggers a backfill, not an append.
    pub fn is_stale(&self, gap: Duration) -> bool {
        gap >= self.staleness
    }
}

impl Default for StalenessPolicy {
    fn default() -> Self {
        Self::from_minutes(DEFAULT_STALENESS_MINUTES)
    }
}
