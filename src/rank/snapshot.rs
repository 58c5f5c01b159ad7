//! Cached rank snapshot
//!
//! The last successfully fetched rank and when it was fetched. Both fields are
//! persisted as decimal text in the preference store and are re-read on every
//! tick, so decoding must tolerate anything a user or an older build left there.

use std::fmt;

use crate::prefs::PrefStore;

/// Preference key holding the cached rank
pub const VALUE_KEY: &str = "kt.tiobe.what";

/// Preference key holding the fetch timestamp (epoch milliseconds)
pub const FETCHED_AT_KEY: &str = "kt.tiobe.when";

/// How long a cached rank is shown without refetching (24 hours)
pub const FRESHNESS_MS: i64 = 86_400_000;

/// Cached (rank, fetch time) pair. `value == 0` means nothing was ever fetched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RankSnapshot {
    pub value: u32,
    pub fetched_at_ms: i64,
}

impl RankSnapshot {
    /// The "never fetched" snapshot
    pub const UNSET: Self = Self {
        value: 0,
        fetched_at_ms: 0,
    };

    pub fn new(value: u32, fetched_at_ms: i64) -> Self {
        Self {
            value,
            fetched_at_ms,
        }
    }

    /// Decode the two stored strings.
    ///
    /// If either field fails to parse the whole snapshot is treated as unset,
    /// which forces a fetch on this tick.
    pub fn from_stored(value: &str, fetched_at: &str) -> Self {
        match (value.parse::<u32>(), fetched_at.parse::<i64>()) {
            (Ok(value), Ok(fetched_at_ms)) => Self::new(value, fetched_at_ms),
            (value_res, time_res) => {
                tracing::debug!(
                    value,
                    fetched_at,
                    value_ok = value_res.is_ok(),
                    time_ok = time_res.is_ok(),
                    "ignoring malformed cached rank"
                );
                Self::UNSET
            }
        }
    }

    /// Read the snapshot from a preference store
    pub fn load(store: &dyn PrefStore) -> Self {
        let value = store.get(VALUE_KEY, "0");
        let fetched_at = store.get(FETCHED_AT_KEY, "0");
        Self::from_stored(&value, &fetched_at)
    }

    /// Write both fields to a preference store
    pub fn save(&self, store: &mut dyn PrefStore) -> anyhow::Result<()> {
        store.put(VALUE_KEY, &self.value.to_string())?;
        store.put(FETCHED_AT_KEY, &self.fetched_at_ms.to_string())?;
        Ok(())
    }

    /// Remove both fields from a preference store
    pub fn clear(store: &mut dyn PrefStore) -> anyhow::Result<()> {
        store.remove(VALUE_KEY)?;
        store.remove(FETCHED_AT_KEY)?;
        Ok(())
    }

    pub fn is_unset(&self) -> bool {
        self.value == 0
    }

    /// True if the cached rank can be shown without refetching at `now_ms`.
    ///
    /// A clock that moved backwards keeps the snapshot fresh.
    pub fn is_fresh(&self, now_ms: i64) -> bool {
        self.value != 0
            && self.fetched_at_ms != 0
            && now_ms.saturating_sub(self.fetched_at_ms) < FRESHNESS_MS
    }

    /// Age of the snapshot at `now_ms`, or None if it was never fetched
    pub fn age_ms(&self, now_ms: i64) -> Option<i64> {
        if self.fetched_at_ms == 0 {
            None
        } else {
            Some(now_ms.saturating_sub(self.fetched_at_ms).max(0))
        }
    }
}

impl fmt::Display for RankSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unset() {
            write!(f, "unset")
        } else {
            write!(f, "#{}", self.value)
        }
    }
}
