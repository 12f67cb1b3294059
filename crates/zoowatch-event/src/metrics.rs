//! Event counters

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Counters for one running event
#[derive(Clone, Default)]
pub struct EventMetrics {
    inner: Arc<MetricsInner>,
}

#[derive(Default)]
struct MetricsInner {
    messages_seen: AtomicU64,
    accepted: AtomicU64,
    removed: AtomicU64,
    correct_guesses: AtomicU64,
    action_failures: AtomicU64,
    lookup_failures: AtomicU64,
}

impl EventMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message from the monitored channel
    pub fn record_message(&self) {
        self.inner.messages_seen.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an accepted message
    pub fn record_accepted(&self, correct_guess: bool) {
        self.inner.accepted.fetch_add(1, Ordering::Relaxed);
        if correct_guess {
            self.inner.correct_guesses.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record a removed message
    pub fn record_removed(&self) {
        self.inner.removed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a failed chat action
    pub fn record_action_failure(&self) {
        self.inner.action_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Record knowledge-base lookups that errored
    pub fn record_lookup_failures(&self, count: u64) {
        self.inner.lookup_failures.fetch_add(count, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> EventMetricsSnapshot {
        EventMetricsSnapshot {
            messages_seen: self.inner.messages_seen.load(Ordering::Relaxed),
            accepted: self.inner.accepted.load(Ordering::Relaxed),
            removed: self.inner.removed.load(Ordering::Relaxed),
            correct_guesses: self.inner.correct_guesses.load(Ordering::Relaxed),
            action_failures: self.inner.action_failures.load(Ordering::Relaxed),
            lookup_failures: self.inner.lookup_failures.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`EventMetrics`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct EventMetricsSnapshot {
    pub messages_seen: u64,
    pub accepted: u64,
    pub removed: u64,
    pub correct_guesses: u64,
    pub action_failures: u64,
    pub lookup_failures: u64,
}

impl EventMetricsSnapshot {
    /// Share of seen messages that were accepted
    pub fn acceptance_rate(&self) -> f64 {
        if self.messages_seen == 0 {
            0.0
        } else {
            self.accepted as f64 / self.messages_seen as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let metrics = EventMetrics::new();
        let shared = metrics.clone();

        metrics.record_message();
        metrics.record_message();
        metrics.record_accepted(true);
        shared.record_removed();
        shared.record_action_failure();
        shared.record_lookup_failures(3);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.messages_seen, 2);
        assert_eq!(snapshot.accepted, 1);
        assert_eq!(snapshot.correct_guesses, 1);
        assert_eq!(snapshot.removed, 1);
        assert_eq!(snapshot.action_failures, 1);
        assert_eq!(snapshot.lookup_failures, 3);
        assert!((snapshot.acceptance_rate() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_rate() {
        assert_eq!(EventMetricsSnapshot::default().acceptance_rate(), 0.0);
    }
}
