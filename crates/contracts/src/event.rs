//! DeviceEvent - connection registry output
//!
//! One event per occurrence observed on a device connection. Events are
//! immutable once built and are handed to listeners by reference.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{ConnectionHandle, Message, MessageType};

/// Event category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Connect,
    Disconnect,
    MessageSent,
    MessageReceived,
    MessageFailed,
    TransactionComplete,
    TransactionBroken,
}

/// Reference to the connection an event belongs to
#[derive(Debug, Clone, Default)]
pub enum Connection {
    /// A live connection that can be sent to
    Live(Arc<dyn ConnectionHandle>),

    /// Something was attached, but it is not a connection handle
    Unrecognized(&'static str),

    /// Nothing attached
    #[default]
    Absent,
}

impl Connection {
    /// Wrap a concrete connection handle
    pub fn live(handle: impl ConnectionHandle + 'static) -> Self {
        Self::Live(Arc::new(handle))
    }

    /// The handle, if this is a live connection
    pub fn handle(&self) -> Option<&Arc<dyn ConnectionHandle>> {
        match self {
            Self::Live(handle) => Some(handle),
            Self::Unrecognized(_) | Self::Absent => None,
        }
    }
}

/// Payload carried by an event
#[derive(Debug, Clone, Default)]
pub enum EventMessage {
    /// A decoded WRP message
    Wrp(Message),

    /// A typed payload of some other shape; only its type is known
    Other(MessageType),

    /// No payload
    #[default]
    Absent,
}

impl EventMessage {
    /// The WRP message, if the payload is one
    pub fn as_wrp(&self) -> Option<&Message> {
        match self {
            Self::Wrp(message) => Some(message),
            Self::Other(_) | Self::Absent => None,
        }
    }
}

impl From<Message> for EventMessage {
    fn from(message: Message) -> Self {
        Self::Wrp(message)
    }
}

/// Device event
#[derive(Debug, Clone)]
pub struct DeviceEvent {
    /// Connection the event was observed on
    pub connection: Connection,

    /// Payload, if any
    pub message: EventMessage,

    /// Event category
    pub kind: EventKind,
}

impl DeviceEvent {
    /// Create an event
    pub fn new(connection: Connection, message: impl Into<EventMessage>, kind: EventKind) -> Self {
        Self {
            connection,
            message: message.into(),
            kind,
        }
    }

    /// Event with no connection and no payload
    pub fn empty(kind: EventKind) -> Self {
        Self::new(Connection::Absent, EventMessage::Absent, kind)
    }
}

/// Receiver of device events.
///
/// The registry calls listeners synchronously, possibly from many threads at
/// once, and ignores whatever happens inside. `None` is delivered when the
/// source has no event to attach to a notification.
pub trait DeviceListener: Send + Sync {
    fn on_device_event(&self, event: Option<&DeviceEvent>);
}

impl<F> DeviceListener for F
where
    F: Fn(Option<&DeviceEvent>) + Send + Sync,
{
    fn on_device_event(&self, event: Option<&DeviceEvent>) {
        self(event)
    }
}
