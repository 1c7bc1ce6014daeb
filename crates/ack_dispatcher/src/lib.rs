//! # Ack Dispatcher
//!
//! 设备消息确认 (ack) 模块。
//!
//! 负责：
//! - 校验连接注册表发出的 `DeviceEvent`
//! - 为 QOS 中等及以上的 SimpleEvent 回发 ack
//! - 记录 ack 成功/失败次数与延迟

pub mod dispatcher;
pub mod error;
pub mod labels;
pub mod measures;
pub mod mock;
pub mod request;
pub mod worker;
pub mod worker_metrics;

#[cfg(any(test, feature = "test-util"))]
pub mod log_capture;

pub use contracts::{DeviceEvent, DeviceListener};
pub use dispatcher::{AckDispatcher, AckOutcome, IgnoreReason, is_ack_eligible};
pub use error::{AckError, AckRejection};
pub use labels::{AckLabels, MESSAGE_TYPE_LABEL, PARTNER_ID_LABEL, QOS_LEVEL_LABEL};
pub use measures::{
    ACK_FAILURE, ACK_FAILURE_LATENCY, ACK_SUCCESS, ACK_SUCCESS_LATENCY, Counter, Histogram,
    OutboundMeasures, RegistryCounter, RegistryHistogram,
};
pub use request::ack_request;
pub use worker::AckWorkerHandle;
pub use worker_metrics::{WorkerMetrics, WorkerMetricsSnapshot};
