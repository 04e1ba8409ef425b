use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// External metadata (and the genre map) stays valid this long.
pub const CACHE_TTL_DAYS: i64 = 7;

/// A timestamped cache record. Entries are never deleted explicitly, only
/// superseded by a fresh write or ignored once expired.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub data: T,
    pub timestamp: DateTime<Utc>,
}

impl<T> CacheEntry<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            timestamp: Utc::now(),
        }
    }

    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now - self.timestamp < Duration::days(CACHE_TTL_DAYS)
    }
}
