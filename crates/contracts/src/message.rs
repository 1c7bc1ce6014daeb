//! WRP message - the protocol payload carried by device events
//!
//! Field names follow the WRP JSON encoding (`msg_type`, `dest`, `qos`, ...).
//! Only `msg_type`, `qos` and `partner_ids` take part in acknowledgment
//! decisions; every other field is carried opaquely.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::{ContractError, QosValue};

/// WRP message type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum MessageType {
    /// Sentinel for an unset type
    #[default]
    Invalid0,
    /// Second reserved sentinel
    Invalid1,
    Authorization,
    SimpleRequestResponse,
    SimpleEvent,
    Create,
    Retrieve,
    Update,
    Delete,
    ServiceRegistration,
    ServiceAlive,
    Unknown,
}

impl MessageType {
    /// Human-readable name used as a metric label
    pub const fn friendly_name(self) -> &'static str {
        match self {
            Self::Invalid0 | Self::Invalid1 => "Invalid",
            Self::Authorization => "Auth",
            Self::SimpleRequestResponse => "SimpleRequestResponse",
            Self::SimpleEvent => "SimpleEvent",
            Self::Create => "Create",
            Self::Retrieve => "Retrieve",
            Self::Update => "Update",
            Self::Delete => "Delete",
            Self::ServiceRegistration => "ServiceRegistration",
            Self::ServiceAlive => "ServiceAlive",
            Self::Unknown => "Unknown",
        }
    }

    /// Wire ordinal
    pub const fn code(self) -> i64 {
        self as i64
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.friendly_name())
    }
}

impl TryFrom<i64> for MessageType {
    type Error = ContractError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        let message_type = match code {
            0 => Self::Invalid0,
            1 => Self::Invalid1,
            2 => Self::Authorization,
            3 => Self::SimpleRequestResponse,
            4 => Self::SimpleEvent,
            5 => Self::Create,
            6 => Self::Retrieve,
            7 => Self::Update,
            8 => Self::Delete,
            9 => Self::ServiceRegistration,
            10 => Self::ServiceAlive,
            11 => Self::Unknown,
            other => return Err(ContractError::Other(format!("unknown msg_type {other}"))),
        };
        Ok(message_type)
    }
}

impl From<MessageType> for i64 {
    fn from(message_type: MessageType) -> Self {
        message_type.code()
    }
}

/// WRP message
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "msg_type")]
    pub message_type: MessageType,

    #[serde(default)]
    pub source: String,

    #[serde(rename = "dest", default)]
    pub destination: String,

    #[serde(default)]
    pub transaction_uuid: String,

    #[serde(default)]
    pub content_type: String,

    #[serde(default)]
    pub accept: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<i64>,

    /// Request delivery response
    #[serde(rename = "rdr", default, skip_serializing_if = "Option::is_none")]
    pub request_delivery_response: Option<i64>,

    #[serde(default)]
    pub headers: Vec<String>,

    #[serde(default)]
    pub metadata: HashMap<String, String>,

    #[serde(default)]
    pub spans: Vec<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_spans: Option<bool>,

    #[serde(default)]
    pub path: String,

    #[serde(default)]
    pub payload: Bytes,

    #[serde(default)]
    pub service_name: String,

    #[serde(default)]
    pub url: String,

    /// Owning tenant(s); a well-formed message carries exactly one
    #[serde(default)]
    pub partner_ids: Vec<String>,

    #[serde(default)]
    pub session_id: String,

    #[serde(rename = "qos", default)]
    pub quality_of_service: QosValue,
}

impl Message {
    /// Create an empty message of the given type
    pub fn new(message_type: MessageType) -> Self {
        Self {
            message_type,
            ..Self::default()
        }
    }

    /// The single partner id, if and only if exactly one is present
    pub fn sole_partner_id(&self) -> Option<&str> {
        match self.partner_ids.as_slice() {
            [partner_id] => Some(partner_id),
            _ => None,
        }
    }
}
