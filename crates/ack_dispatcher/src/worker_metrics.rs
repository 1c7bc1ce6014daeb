//! Ack worker metrics for observability

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use crate::dispatcher::AckOutcome;

/// Counters for one ack worker
#[derive(Debug, Default)]
pub struct WorkerMetrics {
    /// Current queue length
    queue_len: AtomicUsize,
    /// Events handed to the dispatcher
    handled_count: AtomicU64,
    /// Acks delivered
    acked_count: AtomicU64,
    /// Ack sends that failed
    send_failure_count: AtomicU64,
    /// Events rejected as malformed
    rejected_count: AtomicU64,
    /// Events that needed no ack
    ignored_count: AtomicU64,
    /// Events dropped because the queue was full
    dropped_count: AtomicU64,
}

impl WorkerMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_len(&self) -> usize {
        self.queue_len.load(Ordering::Relaxed)
    }

    pub fn set_queue_len(&self, len: usize) {
        self.queue_len.store(len, Ordering::Relaxed);
    }

    pub fn handled_count(&self) -> u64 {
        self.handled_count.load(Ordering::Relaxed)
    }

    pub fn acked_count(&self) -> u64 {
        self.acked_count.load(Ordering::Relaxed)
    }

    pub fn send_failure_count(&self) -> u64 {
        self.send_failure_count.load(Ordering::Relaxed)
    }

    pub fn rejected_count(&self) -> u64 {
        self.rejected_count.load(Ordering::Relaxed)
    }

    pub fn ignored_count(&self) -> u64 {
        self.ignored_count.load(Ordering::Relaxed)
    }

    pub fn dropped_count(&self) -> u64 {
        self.dropped_count.load(Ordering::Relaxed)
    }

    pub fn inc_dropped_count(&self) {
        self.dropped_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Account for one handled event
    ///
    /// Counters are independent atomics; a snapshot taken mid-run may see an
    /// outcome before the matching `handled_count` increment.
    pub fn record(&self, outcome: &AckOutcome) {
        let counter = match outcome {
            AckOutcome::Acknowledged => &self.acked_count,
            AckOutcome::SendFailed => &self.send_failure_count,
            AckOutcome::Rejected(_) => &self.rejected_count,
            AckOutcome::Ignored(_) => &self.ignored_count,
        };
        counter.fetch_add(1, Ordering::Relaxed);
        self.handled_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> WorkerMetricsSnapshot {
        WorkerMetricsSnapshot {
            queue_len: self.queue_len(),
            handled_count: self.handled_count(),
            acked_count: self.acked_count(),
            send_failure_count: self.send_failure_count(),
            rejected_count: self.rejected_count(),
            ignored_count: self.ignored_count(),
            dropped_count: self.dropped_count(),
        }
    }
}

/// Snapshot of worker metrics (for reporting)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerMetricsSnapshot {
    pub queue_len: usize,
    pub handled_count: u64,
    pub acked_count: u64,
    pub send_failure_count: u64,
    pub rejected_count: u64,
    pub ignored_count: u64,
    pub dropped_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::IgnoreReason;
    use crate::error::AckRejection;

    #[test]
    fn test_record_outcomes() {
        let metrics = WorkerMetrics::new();
        metrics.record(&AckOutcome::Acknowledged);
        metrics.record(&AckOutcome::Acknowledged);
        metrics.record(&AckOutcome::SendFailed);
        metrics.record(&AckOutcome::Rejected(AckRejection::NilEvent));
        metrics.record(&AckOutcome::Ignored(IgnoreReason::NotEligible));
        metrics.inc_dropped_count();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.handled_count, 5);
        assert_eq!(snapshot.acked_count, 2);
        assert_eq!(snapshot.send_failure_count, 1);
        assert_eq!(snapshot.rejected_count, 1);
        assert_eq!(snapshot.ignored_count, 1);
        assert_eq!(snapshot.dropped_count, 1);
    }

    #[test]
    fn test_snapshot_while_recording() {
        use std::sync::Arc;
        use std::thread;

        let metrics = Arc::new(WorkerMetrics::new());
        let writer = {
            let metrics = Arc::clone(&metrics);
            thread::spawn(move || {
                for i in 0..200_000u64 {
                    let outcome = if i % 2 == 0 {
                        AckOutcome::Acknowledged
                    } else {
                        AckOutcome::Ignored(IgnoreReason::NotEligible)
                    };
                    metrics.record(&outcome);
                }
            })
        };

        // Live snapshots must never panic, whatever interleaving they see
        for _ in 0..50_000 {
            let snapshot = metrics.snapshot();
            assert!(snapshot.ignored_count <= 100_000);
            assert!(snapshot.acked_count <= 100_000);
        }
        writer.join().unwrap();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.handled_count, 200_000);
        assert_eq!(snapshot.acked_count, 100_000);
        assert_eq!(snapshot.ignored_count, 100_000);
        assert_eq!(
            snapshot.acked_count
                + snapshot.send_failure_count
                + snapshot.rejected_count
                + snapshot.ignored_count,
            snapshot.handled_count
        );
    }
}
