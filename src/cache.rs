//! A single-value cache that expires after a fixed time-to-live.
//!
//! Staleness is decided by the pure [is_stale] predicate and the current time
//! comes from a [Clock], so expiry can be tested without waiting.

use std::time::Duration;

use time::OffsetDateTime;

/// A source of the current time.
pub trait Clock: Send + Sync {
    /// The current time.
    fn now(&self) -> OffsetDateTime;
}

/// The system's UTC clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// A value and the time it was fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedValue<T> {
    /// The cached value.
    pub value: T,
    /// When the value was fetched.
    pub fetched_at: OffsetDateTime,
}

/// Whether a value fetched at `fetched_at` has outlived `ttl` at `now`.
///
/// A value that appears to come from the future (clock skew) is not stale.
pub fn is_stale(now: OffsetDateTime, fetched_at: OffsetDateTime, ttl: Duration) -> bool {
    let age = now - fetched_at;

    !age.is_negative() && age.unsigned_abs() >= ttl
}

/// Holds at most one value and knows when it needs re-fetching.
#[derive(Debug, Clone)]
pub struct TtlCache<T> {
    entry: Option<CachedValue<T>>,
    ttl: Duration,
}

impl<T> TtlCache<T> {
    /// Create an empty cache whose values expire after `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self { entry: None, ttl }
    }

    /// The cached value, if there is one and it has not expired at `now`.
    pub fn fresh(&self, now: OffsetDateTime) -> Option<&T> {
        self.entry
            .as_ref()
            .filter(|entry| !is_stale(now, entry.fetched_at, self.ttl))
            .map(|entry| &entry.value)
    }

    /// The cached value regardless of its age.
    pub fn last(&self) -> Option<&T> {
        self.entry.as_ref().map(|entry| &entry.value)
    }

    /// Replace the cached value with `value` fetched at `fetched_at`.
    pub fn store(&mut self, value: T, fetched_at: OffsetDateTime) {
        self.entry = Some(CachedValue { value, fetched_at });
    }
}
