//! Lifetime counters for one upstream.
//!
//! Observational only: nothing here feeds the health state machine.
//! Updates are plain atomics, independent of the health lock.

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

/// Submission and failure totals since the client was built.
#[derive(Debug, Default)]
pub struct UpstreamCounters {
    accepts: AtomicU64,
    rejects: AtomicU64,
    fails: AtomicU64,
    /// Unix milliseconds of the last recorded submission, 0 if none.
    last_submission_at: AtomicI64,
}

/// Point-in-time copy of the counters for reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CountersSnapshot {
    pub accepts: u64,
    pub rejects: u64,
    pub fails: u64,
    pub last_submission_at: i64,
}

impl UpstreamCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// A submitted block was accepted by the daemon.
    pub fn record_accept(&self) {
        self.accepts.fetch_add(1, Ordering::Relaxed);
        self.touch_submission();
    }

    /// A submitted block was rejected by the daemon.
    pub fn record_reject(&self) {
        self.rejects.fetch_add(1, Ordering::Relaxed);
        self.touch_submission();
    }

    /// A new failure streak began while the upstream was alive.
    pub(crate) fn record_fail(&self) {
        self.fails.fetch_add(1, Ordering::Relaxed);
    }

    pub fn accepts(&self) -> u64 {
        self.accepts.load(Ordering::Relaxed)
    }

    pub fn rejects(&self) -> u64 {
        self.rejects.load(Ordering::Relaxed)
    }

    pub fn fails(&self) -> u64 {
        self.fails.load(Ordering::Relaxed)
    }

    pub fn last_submission_at(&self) -> i64 {
        self.last_submission_at.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> CountersSnapshot {
        CountersSnapshot {
            accepts: self.accepts(),
            rejects: self.rejects(),
            fails: self.fails(),
            last_submission_at: self.last_submission_at(),
        }
    }

    fn touch_submission(&self) {
        self.last_submission_at.fetch_max(now_millis(), Ordering::Relaxed);
    }
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submissions_are_counted_and_stamped() {
        let counters = UpstreamCounters::new();
        assert_eq!(counters.snapshot(), CountersSnapshot::default());

        counters.record_accept();
        counters.record_accept();
        counters.record_reject();

        let snapshot = counters.snapshot();
        assert_eq!(snapshot.accepts, 2);
        assert_eq!(snapshot.rejects, 1);
        assert_eq!(snapshot.fails, 0);
        assert!(snapshot.last_submission_at > 0);
    }

    #[test]
    fn test_fails_do_not_touch_submission_time() {
        let counters = UpstreamCounters::new();
        counters.record_fail();
        assert_eq!(counters.fails(), 1);
        assert_eq!(counters.last_submission_at(), 0);
    }

    #[test]
    fn test_snapshot_serializes() {
        let counters = UpstreamCounters::new();
        counters.record_reject();
        let json = serde_json::to_value(counters.snapshot()).unwrap();
        assert_eq!(json["rejects"], 1);
        assert_eq!(json["accepts"], 0);
    }
}
