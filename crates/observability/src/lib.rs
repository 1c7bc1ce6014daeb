//! # Observability
//!
//! 可观测性模块：Tracing + Prometheus 指标。
//!
//! ## 功能
//!
//! - Tracing 初始化 (JSON/Pretty/Compact 格式)
//! - Prometheus 指标导出
//! - ack 指标描述与 worker 统计上报
//!
//! ## 使用示例
//!
//! ```ignore
//! observability::init_tracing(&blueprint.observability)?;
//! if let Some(port) = observability::exporter_port(&blueprint.observability) {
//!     observability::init_metrics_only(port)?;
//! }
//! let dispatcher = AckDispatcher::new(OutboundMeasures::from_registry());
//! ```

pub mod metrics;

use anyhow::{Context, Result};
use contracts::{LogFormat, ObservabilitySettings};
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

// Re-exports
pub use crate::metrics::{
    describe_outbound_metrics, record_worker_snapshot, WORKER_DROPPED, WORKER_HANDLED,
    WORKER_QUEUE_LEN,
};

/// 按配置初始化 Tracing（不启动 Prometheus exporter）
///
/// `RUST_LOG` 优先于 `log_level`。
pub fn init_tracing(settings: &ObservabilitySettings) -> Result<()> {
    tracing_subscriber::registry()
        .with(env_filter(&settings.log_level))
        .with(fmt_layer(settings.log_format))
        .try_init()
        .context("Failed to initialize tracing subscriber")?;

    tracing::info!(
        log_format = ?settings.log_format,
        log_level = %settings.log_level,
        "Tracing initialized from configuration"
    );
    Ok(())
}

/// `RUST_LOG` 存在时使用它，否则使用默认级别
pub fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// 仅初始化 Prometheus 指标（不初始化 Tracing）
///
/// 用于 Tracing 已由其他模块初始化的场景。
pub fn init_metrics_only(port: u16) -> Result<()> {
    PrometheusBuilder::new()
        .with_http_listener(([0, 0, 0, 0], port))
        .install()
        .context("Failed to install Prometheus recorder")?;

    describe_outbound_metrics();
    tracing::info!(port = port, "Prometheus metrics endpoint initialized");
    Ok(())
}

/// Exporter 端口 (0 = 禁用)
pub fn exporter_port(settings: &ObservabilitySettings) -> Option<u16> {
    match settings.metrics_port {
        0 => None,
        port => Some(port),
    }
}

/// 按日志格式构建 fmt layer
pub fn fmt_layer<S>(format: LogFormat) -> Box<dyn Layer<S> + Send + Sync>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a> + 'static,
{
    match format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true)
            .with_thread_names(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
        LogFormat::Pretty => fmt::layer().pretty().boxed(),
        LogFormat::Compact => fmt::layer().compact().boxed(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = ObservabilitySettings::default();
        assert_eq!(settings.metrics_port, 9000);
        assert_eq!(settings.log_level, "info");
        assert_eq!(exporter_port(&settings), Some(9000));
    }

    #[test]
    fn test_port_zero_disables_exporter() {
        let settings = ObservabilitySettings {
            metrics_port: 0,
            ..ObservabilitySettings::default()
        };
        assert_eq!(exporter_port(&settings), None);
    }

    #[test]
    fn test_init_tracing_applies_settings() {
        let settings = ObservabilitySettings {
            log_format: LogFormat::Compact,
            log_level: "debug".to_string(),
            ..ObservabilitySettings::default()
        };
        init_tracing(&settings).unwrap();

        if std::env::var_os("RUST_LOG").is_none() {
            assert!(tracing::enabled!(tracing::Level::DEBUG));
            assert!(!tracing::enabled!(tracing::Level::TRACE));
        }

        // Global subscriber is set once per process
        assert!(init_tracing(&settings).is_err());
    }
}
