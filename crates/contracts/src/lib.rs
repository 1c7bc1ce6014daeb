//! # Contracts
//!
//! Frozen interface contracts shared by the gateway crates: device events,
//! the WRP protocol message, QOS classification, the connection capability
//! and the configuration blueprint.
//! Business crates depend on this crate only; reverse dependencies are prohibited.
//!
//! ## Event model
//! - Every observed occurrence on a device connection becomes one [`DeviceEvent`]
//! - The connection and the message are modelled as enums with explicit
//!   "absent" and "unrecognized" variants instead of nullable references

mod blueprint;
mod connection;
mod device_id;
mod error;
mod event;
mod message;
mod qos;

pub use blueprint::*;
pub use connection::*;
pub use device_id::DeviceId;
pub use error::*;
pub use event::*;
pub use message::*;
pub use qos::*;
