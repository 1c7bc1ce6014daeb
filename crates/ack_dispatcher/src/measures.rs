//! Outbound ack instruments
//!
//! The dispatcher never talks to a metrics registry directly. It receives an
//! [`OutboundMeasures`] bundle at construction, scopes each instrument with
//! the event's labels and records into the scoped instance.

use std::fmt;
use std::sync::Arc;

use metrics::Label;

use crate::labels::AckLabels;

/// Name of the ack success counter
pub const ACK_SUCCESS: &str = "ack_success";
/// Name of the ack failure counter
pub const ACK_FAILURE: &str = "ack_failure";
/// Name of the ack success latency histogram
pub const ACK_SUCCESS_LATENCY: &str = "ack_success_latency_seconds";
/// Name of the ack failure latency histogram
pub const ACK_FAILURE_LATENCY: &str = "ack_failure_latency_seconds";

/// Labeled monotonic counter
pub trait Counter: Send + Sync {
    /// Instance scoped by `labels`
    fn with(&self, labels: &AckLabels) -> Box<dyn Counter>;

    fn add(&self, delta: u64);
}

/// Labeled histogram
pub trait Histogram: Send + Sync {
    /// Instance scoped by `labels`
    fn with(&self, labels: &AckLabels) -> Box<dyn Histogram>;

    fn observe(&self, value: f64);
}

/// The four instruments written by the ack dispatcher
#[derive(Clone)]
pub struct OutboundMeasures {
    pub ack_success: Arc<dyn Counter>,
    pub ack_failure: Arc<dyn Counter>,
    pub ack_success_latency: Arc<dyn Histogram>,
    pub ack_failure_latency: Arc<dyn Histogram>,
}

impl OutboundMeasures {
    /// Instruments backed by the global `metrics` recorder
    pub fn from_registry() -> Self {
        Self {
            ack_success: Arc::new(RegistryCounter::new(ACK_SUCCESS)),
            ack_failure: Arc::new(RegistryCounter::new(ACK_FAILURE)),
            ack_success_latency: Arc::new(RegistryHistogram::new(ACK_SUCCESS_LATENCY)),
            ack_failure_latency: Arc::new(RegistryHistogram::new(ACK_FAILURE_LATENCY)),
        }
    }
}

impl fmt::Debug for OutboundMeasures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutboundMeasures").finish_non_exhaustive()
    }
}

/// Counter that records through the `metrics` facade
#[derive(Debug, Clone)]
pub struct RegistryCounter {
    name: &'static str,
    labels: Vec<Label>,
}

impl RegistryCounter {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            labels: Vec::new(),
        }
    }
}

impl Counter for RegistryCounter {
    fn with(&self, labels: &AckLabels) -> Box<dyn Counter> {
        Box::new(Self {
            name: self.name,
            labels: labels.to_metric_labels(),
        })
    }

    fn add(&self, delta: u64) {
        metrics::counter!(self.name, self.labels.clone()).increment(delta);
    }
}

/// Histogram that records through the `metrics` facade
#[derive(Debug, Clone)]
pub struct RegistryHistogram {
    name: &'static str,
    labels: Vec<Label>,
}

impl RegistryHistogram {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            labels: Vec::new(),
        }
    }
}

impl Histogram for RegistryHistogram {
    fn with(&self, labels: &AckLabels) -> Box<dyn Histogram> {
        Box::new(Self {
            name: self.name,
            labels: labels.to_metric_labels(),
        })
    }

    fn observe(&self, value: f64) {
        metrics::histogram!(self.name, self.labels.clone()).record(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{Message, MessageType, QosValue};
    use metrics_exporter_prometheus::PrometheusBuilder;

    fn labels() -> AckLabels {
        let mut message = Message::new(MessageType::SimpleEvent);
        message.quality_of_service = QosValue::MEDIUM;
        AckLabels::new(&message, "foo")
    }

    #[test]
    fn test_registry_instruments_render_with_labels() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        let measures = OutboundMeasures::from_registry();

        metrics::with_local_recorder(&recorder, || {
            measures.ack_success.with(&labels()).add(1);
            measures.ack_success_latency.with(&labels()).observe(0.25);
        });

        let rendered = handle.render();
        assert!(rendered.contains("ack_success{"), "{rendered}");
        assert!(rendered.contains(r#"partner_id="foo""#), "{rendered}");
        assert!(rendered.contains(r#"qos_level="medium""#), "{rendered}");
        assert!(rendered.contains(r#"message_type="SimpleEvent""#), "{rendered}");
        assert!(rendered.contains("ack_success_latency_seconds"), "{rendered}");
        assert!(!rendered.contains("ack_failure{"), "{rendered}");
    }
}
