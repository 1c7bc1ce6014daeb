//! In-memory instruments and connections
//!
//! Used by tests and by the CLI replay. Every interaction is recorded so
//! callers can assert exactly which instruments were touched and how.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use contracts::{ConnectionHandle, ContractError, DeviceId, DeviceRequest, DeviceResponse};

use crate::labels::AckLabels;
use crate::measures::{Counter, Histogram, OutboundMeasures};

/// One recorded instrument interaction
#[derive(Debug, Clone, PartialEq)]
pub enum InstrumentCall {
    With(AckLabels),
    Add(u64),
    Observe(f64),
}

type CallLog = Arc<Mutex<Vec<InstrumentCall>>>;

fn push(log: &CallLog, call: InstrumentCall) {
    log.lock().unwrap_or_else(PoisonError::into_inner).push(call);
}

fn snapshot(log: &CallLog) -> Vec<InstrumentCall> {
    log.lock().unwrap_or_else(PoisonError::into_inner).clone()
}

/// Counter that records every call; scoped instances share one log
#[derive(Debug, Clone, Default)]
pub struct RecordingCounter {
    calls: CallLog,
}

impl RecordingCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// All calls made on this counter and its scoped instances
    pub fn calls(&self) -> Vec<InstrumentCall> {
        snapshot(&self.calls)
    }

    /// Sum of all `add` deltas
    pub fn total(&self) -> u64 {
        self.calls()
            .iter()
            .map(|call| match call {
                InstrumentCall::Add(delta) => *delta,
                _ => 0,
            })
            .sum()
    }

    pub fn is_untouched(&self) -> bool {
        self.calls().is_empty()
    }
}

impl Counter for RecordingCounter {
    fn with(&self, labels: &AckLabels) -> Box<dyn Counter> {
        push(&self.calls, InstrumentCall::With(labels.clone()));
        Box::new(self.clone())
    }

    fn add(&self, delta: u64) {
        push(&self.calls, InstrumentCall::Add(delta));
    }
}

/// Histogram that records every call; scoped instances share one log
#[derive(Debug, Clone, Default)]
pub struct RecordingHistogram {
    calls: CallLog,
}

impl RecordingHistogram {
    pub fn new() -> Self {
        Self::default()
    }

    /// All calls made on this histogram and its scoped instances
    pub fn calls(&self) -> Vec<InstrumentCall> {
        snapshot(&self.calls)
    }

    /// Observed values in call order
    pub fn observations(&self) -> Vec<f64> {
        self.calls()
            .iter()
            .filter_map(|call| match call {
                InstrumentCall::Observe(value) => Some(*value),
                _ => None,
            })
            .collect()
    }

    pub fn is_untouched(&self) -> bool {
        self.calls().is_empty()
    }
}

impl Histogram for RecordingHistogram {
    fn with(&self, labels: &AckLabels) -> Box<dyn Histogram> {
        push(&self.calls, InstrumentCall::With(labels.clone()));
        Box::new(self.clone())
    }

    fn observe(&self, value: f64) {
        push(&self.calls, InstrumentCall::Observe(value));
    }
}

/// Recording counterparts of [`OutboundMeasures`]
#[derive(Debug, Clone, Default)]
pub struct RecordingMeasures {
    pub ack_success: RecordingCounter,
    pub ack_failure: RecordingCounter,
    pub ack_success_latency: RecordingHistogram,
    pub ack_failure_latency: RecordingHistogram,
}

impl RecordingMeasures {
    pub fn new() -> Self {
        Self::default()
    }

    /// Measures wired to these recorders
    pub fn measures(&self) -> OutboundMeasures {
        OutboundMeasures {
            ack_success: Arc::new(self.ack_success.clone()),
            ack_failure: Arc::new(self.ack_failure.clone()),
            ack_success_latency: Arc::new(self.ack_success_latency.clone()),
            ack_failure_latency: Arc::new(self.ack_failure_latency.clone()),
        }
    }

    /// True when no instrument has been touched at all
    pub fn is_untouched(&self) -> bool {
        self.ack_success.is_untouched()
            && self.ack_failure.is_untouched()
            && self.ack_success_latency.is_untouched()
            && self.ack_failure_latency.is_untouched()
    }
}

/// How a [`MockConnection`] answers sends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SendBehavior {
    /// Every send succeeds
    #[default]
    Succeed,
    /// Every send fails
    Fail,
    /// Every n-th send fails (1-based); 0 never fails
    FailEvery(u64),
    /// The connection is gone; every send reports it closed
    Closed,
}

/// Connection that records requests instead of writing to a socket
#[derive(Debug, Clone)]
pub struct MockConnection {
    device_id: DeviceId,
    behavior: SendBehavior,
    delay: Duration,
    sends: Arc<AtomicU64>,
    requests: Arc<Mutex<Vec<DeviceRequest>>>,
}

impl MockConnection {
    pub fn new(device_id: impl Into<DeviceId>, behavior: SendBehavior) -> Self {
        Self {
            device_id: device_id.into(),
            behavior,
            delay: Duration::ZERO,
            sends: Arc::new(AtomicU64::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Connection whose sends always succeed
    pub fn succeeding(device_id: impl Into<DeviceId>) -> Self {
        Self::new(device_id, SendBehavior::Succeed)
    }

    /// Connection whose sends always fail
    pub fn failing(device_id: impl Into<DeviceId>) -> Self {
        Self::new(device_id, SendBehavior::Fail)
    }

    /// Block every send for `delay`
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Requests received so far, successful or not
    pub fn requests(&self) -> Vec<DeviceRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn send_count(&self) -> u64 {
        self.sends.load(Ordering::Relaxed)
    }

    fn should_fail(&self, attempt: u64) -> bool {
        match self.behavior {
            SendBehavior::Succeed => false,
            SendBehavior::Fail | SendBehavior::Closed => true,
            SendBehavior::FailEvery(0) => false,
            SendBehavior::FailEvery(n) => attempt % n == 0,
        }
    }
}

impl ConnectionHandle for MockConnection {
    fn device_id(&self) -> &DeviceId {
        &self.device_id
    }

    fn send(&self, request: DeviceRequest) -> Result<DeviceResponse, ContractError> {
        let attempt = self.sends.fetch_add(1, Ordering::Relaxed) + 1;
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);

        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }

        if self.behavior == SendBehavior::Closed {
            return Err(ContractError::device_closed(self.device_id.as_str()));
        }

        if self.should_fail(attempt) {
            return Err(ContractError::device_send(
                self.device_id.as_str(),
                "mock send failure",
            ));
        }

        Ok(DeviceResponse {
            device_id: self.device_id.clone(),
            message: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{Message, MessageType};

    #[test]
    fn test_fail_every() {
        let conn = MockConnection::new("mac:1", SendBehavior::FailEvery(2));
        let request = DeviceRequest::new(Message::new(MessageType::SimpleEvent));

        assert!(conn.send(request.clone()).is_ok());
        assert!(conn.send(request.clone()).is_err());
        assert!(conn.send(request).is_ok());
        assert_eq!(conn.send_count(), 3);
        assert_eq!(conn.requests().len(), 3);
    }

    #[test]
    fn test_closed_connection() {
        let conn = MockConnection::new("mac:1", SendBehavior::Closed);
        let request = DeviceRequest::new(Message::new(MessageType::SimpleEvent));

        let err = conn.send(request).unwrap_err();
        assert!(matches!(err, ContractError::DeviceClosed { ref device_id } if device_id == "mac:1"));
        assert_eq!(conn.send_count(), 1);
    }

    #[test]
    fn test_recording_counter_shares_log_with_scoped_instances() {
        let counter = RecordingCounter::new();
        let message = Message::new(MessageType::SimpleEvent);
        let labels = AckLabels::new(&message, "foo");

        counter.with(&labels).add(1);
        assert_eq!(
            counter.calls(),
            vec![InstrumentCall::With(labels), InstrumentCall::Add(1)]
        );
        assert_eq!(counter.total(), 1);
    }
}
