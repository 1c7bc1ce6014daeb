//! Metric labels for acknowledgment outcomes

use contracts::{Message, MessageType, QosLevel};
use metrics::Label;

/// Label key for the QOS band
pub const QOS_LEVEL_LABEL: &str = "qos_level";
/// Label key for the owning partner
pub const PARTNER_ID_LABEL: &str = "partner_id";
/// Label key for the message type name
pub const MESSAGE_TYPE_LABEL: &str = "message_type";

/// Label set scoping every outbound ack instrument
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AckLabels {
    pub qos_level: QosLevel,
    pub partner_id: String,
    pub message_type: MessageType,
}

impl AckLabels {
    /// Labels for a validated message and its single partner id
    pub fn new(message: &Message, partner_id: &str) -> Self {
        Self {
            qos_level: message.quality_of_service.level(),
            partner_id: partner_id.to_string(),
            message_type: message.message_type,
        }
    }

    /// Key/value pairs in a stable order
    pub fn pairs(&self) -> [(&'static str, &str); 3] {
        [
            (QOS_LEVEL_LABEL, self.qos_level.as_str()),
            (PARTNER_ID_LABEL, &self.partner_id),
            (MESSAGE_TYPE_LABEL, self.message_type.friendly_name()),
        ]
    }

    /// Labels in the form the `metrics` facade expects
    pub fn to_metric_labels(&self) -> Vec<Label> {
        self.pairs()
            .into_iter()
            .map(|(key, value)| Label::new(key, value.to_string()))
            .collect()
    }
}
