//! Layered error definitions
//!
//! Categorized by source: config / device / general

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Device Errors =====
    /// Sending a request over a device connection failed
    #[error("send to device '{device_id}' failed: {message}")]
    DeviceSend { device_id: String, message: String },

    /// The device connection was already closed
    #[error("device '{device_id}' connection closed")]
    DeviceClosed { device_id: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create device send error
    pub fn device_send(device_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DeviceSend {
            device_id: device_id.into(),
            message: message.into(),
        }
    }

    /// Create device closed error
    pub fn device_closed(device_id: impl Into<String>) -> Self {
        Self::DeviceClosed {
            device_id: device_id.into(),
        }
    }
}
