//! ConnectionHandle trait - outbound path to one device
//!
//! The connection registry owns the live connections; components that need to
//! push data back to a device only ever see this capability.

use std::fmt;

use crate::{ContractError, DeviceId, Message};

/// Wire encoding requested for an outbound message
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    #[default]
    Msgpack,
    Json,
}

/// Request routed to a single device
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceRequest {
    /// Message to deliver
    pub message: Message,

    /// Encoding the connection should use on the wire
    pub format: Format,
}

impl DeviceRequest {
    /// Create a request with the default wire format
    pub fn new(message: Message) -> Self {
        Self {
            message,
            format: Format::default(),
        }
    }
}

/// Response returned by a device connection for a request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceResponse {
    /// Device that handled the request
    pub device_id: DeviceId,

    /// Reply message, present only for request/response exchanges
    pub message: Option<Message>,
}

/// Live connection to one device.
///
/// `send` may block on network I/O; implementations own any timeout or retry
/// policy. Implementations must be shareable across threads since events for
/// the same device can be handled concurrently.
pub trait ConnectionHandle: Send + Sync {
    /// Device behind this connection
    fn device_id(&self) -> &DeviceId;

    /// Deliver a request to the device
    ///
    /// # Errors
    /// Returns the delivery failure; the caller decides how to account for it
    fn send(&self, request: DeviceRequest) -> Result<DeviceResponse, ContractError>;
}

impl fmt::Debug for dyn ConnectionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionHandle")
            .field("device_id", self.device_id())
            .finish()
    }
}
