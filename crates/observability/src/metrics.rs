//! Ack 指标描述与 worker 统计上报
//!
//! 指标名与标签由 `ack_dispatcher` 定义，这里只负责描述和 worker 侧的汇总值。

use ack_dispatcher::{
    WorkerMetricsSnapshot, ACK_FAILURE, ACK_FAILURE_LATENCY, ACK_SUCCESS, ACK_SUCCESS_LATENCY,
};
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, Unit};

/// Worker 队列长度
pub const WORKER_QUEUE_LEN: &str = "ack_worker_queue_len";
/// Worker 已处理事件数
pub const WORKER_HANDLED: &str = "ack_worker_events_handled_total";
/// 队列满被丢弃的事件数
pub const WORKER_DROPPED: &str = "ack_worker_events_dropped_total";

/// 向当前 recorder 注册 ack 指标描述
pub fn describe_outbound_metrics() {
    describe_counter!(
        ACK_SUCCESS,
        "Number of successful acks sent to devices"
    );
    describe_counter!(
        ACK_FAILURE,
        "Number of acks that could not be sent to devices"
    );
    describe_histogram!(
        ACK_SUCCESS_LATENCY,
        Unit::Seconds,
        "Time spent sending a successful ack"
    );
    describe_histogram!(
        ACK_FAILURE_LATENCY,
        Unit::Seconds,
        "Time spent on a failed ack send"
    );
    describe_gauge!(WORKER_QUEUE_LEN, "Events waiting in the ack worker queue");
    describe_counter!(WORKER_HANDLED, "Events handled by the ack worker");
    describe_counter!(WORKER_DROPPED, "Events dropped because the ack queue was full");
}

/// 上报 worker 统计快照
///
/// 快照是累计值，计数器直接设置为绝对值。
pub fn record_worker_snapshot(snapshot: &WorkerMetricsSnapshot) {
    gauge!(WORKER_QUEUE_LEN).set(snapshot.queue_len as f64);
    counter!(WORKER_HANDLED).absolute(snapshot.handled_count);
    counter!(WORKER_DROPPED).absolute(snapshot.dropped_count);
}
