//! Ack dispatcher error types

use thiserror::Error;

/// Why an event was dropped before any ack decision could be made.
///
/// These never leave the dispatcher; they are rendered into the error log.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AckRejection {
    /// The source delivered a notification without an event
    #[error("nil event received")]
    NilEvent,

    /// The event has no usable connection handle
    #[error("invalid or missing connection handle ({found})")]
    InvalidConnection { found: &'static str },

    /// A WRP message must carry exactly one partner id
    #[error("invalid partner identifier set: expected 1, got {count}")]
    InvalidPartnerIds { count: usize },
}

/// Errors surfaced by the ack worker
#[derive(Debug, Error)]
pub enum AckError {
    /// Worker queues must hold at least one event
    #[error("invalid ack queue capacity {0}")]
    InvalidQueueCapacity(usize),

    /// The worker stopped accepting events
    #[error("ack worker closed")]
    WorkerClosed,
}
