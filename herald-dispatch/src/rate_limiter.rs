//! Per-tenant sliding-window admission control
//!
//! Each tenant owns one limiter. Admission purges timestamps that have
//! fallen out of the rolling window, then compares the retained count to
//! the tenant's limit. Recording a send is a separate step so that only
//! sends which actually went out count against the window.

use std::{
    collections::VecDeque,
    time::{Duration, Instant},
};

use parking_lot::Mutex;

/// Sliding-window rate limiter for a single tenant.
///
/// Timestamps are appended in monotonically non-decreasing order (the
/// owning worker is the only writer), so expired entries are always at
/// the front.
#[derive(Debug)]
pub struct RateLimiter {
    limit: usize,
    window: Duration,
    timestamps: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    /// Create a limiter allowing at most `limit` sends per rolling
    /// `window`.
    #[must_use]
    pub fn new(limit: usize, window: Duration) -> Self {
        Self {
            limit,
            window,
            timestamps: Mutex::new(VecDeque::new()),
        }
    }

    /// Whether another send is currently allowed.
    ///
    /// Expired timestamps are purged first; the answer is `true` iff the
    /// remaining count is strictly below the limit. Does not record
    /// anything.
    pub fn admit(&self) -> bool {
        let now = Instant::now();
        let mut timestamps = self.timestamps.lock();

        while timestamps
            .front()
            .is_some_and(|&t| now.duration_since(t) > self.window)
        {
            timestamps.pop_front();
        }

        timestamps.len() < self.limit
    }

    /// Record a successful send at the current time.
    ///
    /// Call only after a real transmission succeeded.
    pub fn record(&self) {
        self.record_at(Instant::now());
    }

    pub(crate) fn record_at(&self, at: Instant) {
        self.timestamps.lock().push_back(at);
    }

    /// Count of recorded sends still inside the window.
    ///
    /// Read-only: unlike [`admit`](Self::admit) this never purges, so it
    /// is safe to call from reporting paths concurrently with the owning
    /// worker.
    #[must_use]
    pub fn sent_in_window(&self) -> usize {
        let now = Instant::now();
        self.timestamps
            .lock()
            .iter()
            .filter(|&&t| now.duration_since(t) <= self.window)
            .count()
    }

    /// The configured limit.
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admits_until_limit_reached() {
        let limiter = RateLimiter::new(3, Duration::from_secs(3600));

        for _ in 0..3 {
            assert!(limiter.admit());
            limiter.record();
        }

        assert!(!limiter.admit());
        assert_eq!(limiter.sent_in_window(), 3);
    }

    #[test]
    fn zero_limit_never_admits() {
        let limiter = RateLimiter::new(0, Duration::from_secs(3600));
        assert!(!limiter.admit());
    }

    #[test]
    fn admit_purges_expired_timestamps() {
        let limiter = RateLimiter::new(2, Duration::from_secs(60));

        let stale = Instant::now()
            .checked_sub(Duration::from_secs(120))
            .unwrap();
        limiter.record_at(stale);
        limiter.record_at(stale);

        // Both entries fell out of the window, so admission is open again.
        assert!(limiter.admit());
        assert_eq!(limiter.sent_in_window(), 0);
    }

    #[test]
    fn recent_timestamps_survive_the_purge() {
        let limiter = RateLimiter::new(2, Duration::from_secs(60));

        let stale = Instant::now()
            .checked_sub(Duration::from_secs(120))
            .unwrap();
        limiter.record_at(stale);
        limiter.record_at(Instant::now());

        assert!(limiter.admit());
        limiter.record();
        assert!(!limiter.admit());
    }

    #[test]
    fn sent_in_window_does_not_purge() {
        let limiter = RateLimiter::new(5, Duration::from_secs(60));

        let stale = Instant::now()
            .checked_sub(Duration::from_secs(120))
            .unwrap();
        limiter.record_at(stale);
        limiter.record_at(Instant::now());

        // The stale entry is excluded from the count but still stored.
        assert_eq!(limiter.sent_in_window(), 1);
        assert_eq!(limiter.timestamps.lock().len(), 2);
    }

    #[test]
    fn admit_does_not_record() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));

        assert!(limiter.admit());
        assert!(limiter.admit());
        assert_eq!(limiter.sent_in_window(), 0);
    }
}
