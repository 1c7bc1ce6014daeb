//! AckDispatcher - decides and sends delivery acknowledgments
//!
//! Every device event passes through the same ordered checks:
//!
//! 1. the event exists
//! 2. it carries a live connection handle
//! 3. its payload is a WRP message (anything else is not our concern)
//! 4. the message has exactly one partner id
//! 5. it is a received simple event with QOS medium or above
//!
//! Failing 1, 2 or 4 logs an error. Failing 3 or 5 is silent. Passing all of
//! them sends an ack and records success or failure metrics.

use std::sync::Arc;
use std::time::Instant;

use tracing::error;

use contracts::{
    Connection, ConnectionHandle, DeviceEvent, DeviceListener, EventKind, EventMessage, Message,
    MessageType, QosLevel,
};

use crate::error::AckRejection;
use crate::labels::AckLabels;
use crate::measures::OutboundMeasures;
use crate::request::ack_request;

/// Why an event was let through without an ack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Payload is absent or not a WRP message
    UnrecognizedMessage,
    /// Valid message that does not warrant an ack
    NotEligible,
}

/// Result of handling one event. Informational only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AckOutcome {
    /// Dropped with an error log, no metrics
    Rejected(AckRejection),
    /// Dropped silently
    Ignored(IgnoreReason),
    /// Ack delivered, success metrics recorded
    Acknowledged,
    /// Ack send failed, failure metrics recorded and logged
    SendFailed,
}

enum Decision<'a> {
    Ignore(IgnoreReason),
    Ack {
        connection: &'a Arc<dyn ConnectionHandle>,
        message: &'a Message,
        labels: AckLabels,
    },
}

/// Whether a validated event owes the device an ack
pub fn is_ack_eligible(kind: EventKind, message: &Message) -> bool {
    kind == EventKind::MessageReceived
        && message.message_type == MessageType::SimpleEvent
        && message.quality_of_service.level() >= QosLevel::Medium
}

fn decide(event: Option<&DeviceEvent>) -> Result<Decision<'_>, AckRejection> {
    let event = event.ok_or(AckRejection::NilEvent)?;

    let connection = match &event.connection {
        Connection::Live(handle) => handle,
        Connection::Unrecognized(found) => {
            return Err(AckRejection::InvalidConnection { found: *found });
        }
        Connection::Absent => {
            return Err(AckRejection::InvalidConnection { found: "none" });
        }
    };

    let message = match &event.message {
        EventMessage::Wrp(message) => message,
        EventMessage::Other(_) | EventMessage::Absent => {
            return Ok(Decision::Ignore(IgnoreReason::UnrecognizedMessage));
        }
    };

    let partner_id = message
        .sole_partner_id()
        .ok_or(AckRejection::InvalidPartnerIds {
            count: message.partner_ids.len(),
        })?;
    let labels = AckLabels::new(message, partner_id);

    if !is_ack_eligible(event.kind, message) {
        return Ok(Decision::Ignore(IgnoreReason::NotEligible));
    }

    Ok(Decision::Ack {
        connection,
        message,
        labels,
    })
}

/// Stateless ack dispatcher; share it behind an `Arc` and call it from any thread
#[derive(Debug, Clone)]
pub struct AckDispatcher {
    measures: OutboundMeasures,
}

impl AckDispatcher {
    pub fn new(measures: OutboundMeasures) -> Self {
        Self { measures }
    }

    /// Handle one device event.
    ///
    /// Never panics on malformed input and never returns an error; every
    /// failure ends up in the log and/or the failure metrics.
    pub fn handle_event<'a>(&self, event: impl Into<Option<&'a DeviceEvent>>) -> AckOutcome {
        match decide(event.into()) {
            Err(rejection) => {
                error!(error = %rejection, "Dropping device event");
                AckOutcome::Rejected(rejection)
            }
            Ok(Decision::Ignore(reason)) => AckOutcome::Ignored(reason),
            Ok(Decision::Ack {
                connection,
                message,
                labels,
            }) => self.send_and_measure(connection.as_ref(), message, &labels),
        }
    }

    fn send_and_measure(
        &self,
        connection: &dyn ConnectionHandle,
        message: &Message,
        labels: &AckLabels,
    ) -> AckOutcome {
        let request = ack_request(message);

        let started = Instant::now();
        let result = connection.send(request);
        let latency = started.elapsed().as_secs_f64();

        match result {
            Ok(_) => {
                self.measures.ack_success.with(labels).add(1);
                self.measures.ack_success_latency.with(labels).observe(latency);
                AckOutcome::Acknowledged
            }
            Err(e) => {
                error!(
                    device_id = %connection.device_id(),
                    partner_id = %labels.partner_id,
                    qos_level = %labels.qos_level,
                    message_type = %labels.message_type,
                    error = %e,
                    "Failed to send ack to device"
                );
                self.measures.ack_failure.with(labels).add(1);
                self.measures.ack_failure_latency.with(labels).observe(latency);
                AckOutcome::SendFailed
            }
        }
    }
}

impl DeviceListener for AckDispatcher {
    fn on_device_event(&self, event: Option<&DeviceEvent>) {
        self.handle_event(event);
    }
}
