//! AckWorkerHandle - runs the dispatcher behind a bounded queue

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, instrument, warn};

use contracts::DeviceEvent;

use crate::dispatcher::AckDispatcher;
use crate::error::AckError;
use crate::worker_metrics::WorkerMetrics;

/// Handle to a running ack worker
pub struct AckWorkerHandle {
    /// Channel to send events to worker
    tx: mpsc::Sender<DeviceEvent>,
    /// Shared metrics
    metrics: Arc<WorkerMetrics>,
    /// Worker task handle
    worker_handle: JoinHandle<()>,
}

impl AckWorkerHandle {
    /// Create a new AckWorkerHandle and spawn the worker task
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(dispatcher: Arc<AckDispatcher>, queue_capacity: usize) -> Result<Self, AckError> {
        if queue_capacity == 0 {
            return Err(AckError::InvalidQueueCapacity(queue_capacity));
        }

        let (tx, rx) = mpsc::channel(queue_capacity);
        let metrics = Arc::new(WorkerMetrics::new());

        let worker_metrics = Arc::clone(&metrics);
        let worker_handle = tokio::spawn(async move {
            ack_worker(dispatcher, rx, worker_metrics).await;
        });

        Ok(Self {
            tx,
            metrics,
            worker_handle,
        })
    }

    /// Get current metrics
    pub fn metrics(&self) -> &Arc<WorkerMetrics> {
        &self.metrics
    }

    /// Queue an event (non-blocking)
    ///
    /// Returns true if queued, false if the queue is full (event dropped)
    pub fn try_submit(&self, event: DeviceEvent) -> bool {
        match self.tx.try_send(event) {
            Ok(()) => {
                self.metrics
                    .set_queue_len(self.tx.max_capacity() - self.tx.capacity());
                true
            }
            Err(mpsc::error::TrySendError::Full(event)) => {
                self.metrics.inc_dropped_count();
                warn!(kind = ?event.kind, "Ack queue full, event dropped");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                error!("Ack worker closed unexpectedly");
                false
            }
        }
    }

    /// Queue an event, waiting for room
    pub async fn submit(&self, event: DeviceEvent) -> Result<(), AckError> {
        self.tx.send(event).await.map_err(|_| AckError::WorkerClosed)
    }

    /// Drain queued events and stop the worker
    #[instrument(name = "ack_worker_shutdown", skip(self))]
    pub async fn shutdown(self) {
        // Drop sender to signal worker to stop
        drop(self.tx);
        if let Err(e) = self.worker_handle.await {
            error!(error = ?e, "Ack worker task panicked");
        }
        debug!("AckWorkerHandle shutdown complete");
    }
}

/// Worker task that hands each event to the dispatcher
///
/// Device sends block, so every event runs on the blocking pool.
#[instrument(name = "ack_worker_loop", skip_all)]
async fn ack_worker(
    dispatcher: Arc<AckDispatcher>,
    mut rx: mpsc::Receiver<DeviceEvent>,
    metrics: Arc<WorkerMetrics>,
) {
    debug!("Ack worker started");

    while let Some(event) = rx.recv().await {
        metrics.set_queue_len(rx.len());

        let dispatcher = Arc::clone(&dispatcher);
        match tokio::task::spawn_blocking(move || dispatcher.handle_event(&event)).await {
            Ok(outcome) => metrics.record(&outcome),
            Err(e) => {
                // Keep consuming, one bad event must not stop acks
                error!(error = %e, "Ack handling task failed");
            }
        }
    }

    debug!("Ack worker stopped");
}
