//! Replayer - feeds recorded events through the ack worker.
//!
//! Each distinct device id gets one simulated connection that answers sends
//! according to `[simulation]`.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::{debug, info, instrument, warn};

use ack_dispatcher::mock::{MockConnection, SendBehavior};
use ack_dispatcher::{AckDispatcher, AckWorkerHandle, OutboundMeasures};
use contracts::GatewayBlueprint;

use super::{EventFixture, ReplayStats};

/// Replay configuration
#[derive(Debug, Clone)]
pub struct ReplayConfig {
    /// The gateway configuration
    pub blueprint: GatewayBlueprint,

    /// Events in replay order
    pub events: Vec<EventFixture>,
}

/// Drives one replay run
pub struct Replayer {
    config: ReplayConfig,
}

impl Replayer {
    pub fn new(config: ReplayConfig) -> Self {
        Self { config }
    }

    /// Replay every event and wait for the worker to drain
    #[instrument(name = "replay_run", skip_all, fields(events = self.config.events.len()))]
    pub async fn run(self, measures: OutboundMeasures) -> Result<ReplayStats> {
        let start_time = Instant::now();
        let blueprint = &self.config.blueprint;
        let connections = self.connections();

        let mut stats = ReplayStats {
            events_read: self.config.events.len() as u64,
            devices: connections.len(),
            ..ReplayStats::default()
        };

        if !blueprint.ack.enabled {
            warn!("Ack dispatch disabled, events are read but not dispatched");
            stats.duration = start_time.elapsed();
            return Ok(stats);
        }

        let dispatcher = Arc::new(AckDispatcher::new(measures));
        let handle = AckWorkerHandle::spawn(dispatcher, blueprint.ack.queue_capacity)
            .context("Failed to start ack worker")?;

        for fixture in &self.config.events {
            handle
                .submit(fixture.to_event(&connections))
                .await
                .context("Ack worker stopped during replay")?;
        }
        debug!("All events submitted, draining ack worker");

        let metrics = Arc::clone(handle.metrics());
        handle.shutdown().await;

        stats.worker = metrics.snapshot();
        stats.sends = connections.values().map(|c| c.send_count()).sum();
        stats.duration = start_time.elapsed();

        observability::record_worker_snapshot(&stats.worker);
        info!(
            acked = stats.worker.acked_count,
            send_failures = stats.worker.send_failure_count,
            rejected = stats.worker.rejected_count,
            "Replay finished"
        );

        Ok(stats)
    }

    /// One simulated connection per distinct device id
    fn connections(&self) -> HashMap<String, Arc<MockConnection>> {
        let simulation = &self.config.blueprint.simulation;
        let delay = Duration::from_millis(simulation.send_delay_ms);

        let mut connections = HashMap::new();
        for device_id in self.config.events.iter().filter_map(|e| e.device_id.as_ref()) {
            connections.entry(device_id.clone()).or_insert_with(|| {
                Arc::new(
                    MockConnection::new(
                        device_id.as_str(),
                        SendBehavior::FailEvery(simulation.fail_every),
                    )
                    .with_delay(delay),
                )
            });
        }
        connections
    }
}
