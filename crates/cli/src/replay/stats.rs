//! Replay statistics.

use std::time::Duration;

use ack_dispatcher::WorkerMetricsSnapshot;

/// Statistics from a replay run
#[derive(Debug, Clone, Default)]
pub struct ReplayStats {
    /// Events read from the fixture
    pub events_read: u64,

    /// Distinct simulated devices
    pub devices: usize,

    /// Sends attempted on simulated connections
    pub sends: u64,

    /// Total duration of the replay
    pub duration: Duration,

    /// Ack worker outcome counters
    pub worker: WorkerMetricsSnapshot,
}

impl ReplayStats {
    /// Events handled per second
    pub fn events_per_sec(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.worker.handled_count as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Failed ack sends as a percentage of attempted acks
    pub fn failure_rate(&self) -> f64 {
        let total = self.worker.acked_count + self.worker.send_failure_count;
        if total > 0 {
            (self.worker.send_failure_count as f64 / total as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║                      Replay Statistics                       ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");

        println!("📊 Overview");
        println!("   ├─ Duration: {:.2}s", self.duration.as_secs_f64());
        println!("   ├─ Events read: {}", self.events_read);
        println!("   ├─ Events/s: {:.2}", self.events_per_sec());
        println!("   └─ Devices: {}", self.devices);

        println!("\n📨 Ack Outcomes");
        println!("   ├─ Acknowledged: {}", self.worker.acked_count);
        println!(
            "   ├─ Send failures: {} ({:.2}%)",
            self.worker.send_failure_count,
            self.failure_rate()
        );
        println!("   ├─ Rejected: {}", self.worker.rejected_count);
        println!("   ├─ Ignored: {}", self.worker.ignored_count);
        println!("   └─ Dropped (queue full): {}", self.worker.dropped_count);

        println!();
    }
}
