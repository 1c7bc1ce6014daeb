//! Event fixture format
//!
//! One JSON object per line:
//!
//! ```text
//! {"kind":"message_received","device_id":"mac:112233445566","message":{"msg_type":4,"qos":50,"partner_ids":["comcast"]}}
//! ```
//!
//! Blank lines and lines starting with `#` are skipped. A missing
//! `device_id` replays the event without a connection, a missing `message`
//! replays it without a payload.

use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use ack_dispatcher::mock::MockConnection;
use contracts::{Connection, DeviceEvent, EventKind, EventMessage, Message};

use crate::error::{CliError, Result};

/// A recorded device event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventFixture {
    pub kind: EventKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,
}

impl EventFixture {
    /// Build the device event, resolving the device id against live connections
    pub fn to_event(&self, connections: &HashMap<String, Arc<MockConnection>>) -> DeviceEvent {
        let connection = match self.device_id.as_deref().and_then(|id| connections.get(id)) {
            Some(handle) => Connection::Live(handle.clone()),
            None => Connection::Absent,
        };
        let message = match &self.message {
            Some(message) => EventMessage::Wrp(message.clone()),
            None => EventMessage::Absent,
        };
        DeviceEvent::new(connection, message, self.kind)
    }
}

/// Parse JSON-lines fixtures
pub fn parse_fixture(reader: impl BufRead) -> Result<Vec<EventFixture>> {
    let mut fixtures = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let fixture = serde_json::from_str(trimmed)
            .map_err(|e| CliError::fixture_parse(idx + 1, e.to_string()))?;
        fixtures.push(fixture);
    }
    Ok(fixtures)
}

/// Load fixtures from a file
pub fn load_fixture(path: &Path) -> Result<Vec<EventFixture>> {
    if !path.exists() {
        return Err(CliError::events_not_found(path.display().to_string()));
    }
    let file = std::fs::File::open(path)?;
    parse_fixture(std::io::BufReader::new(file))
}
