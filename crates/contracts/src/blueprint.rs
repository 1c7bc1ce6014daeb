//! GatewayBlueprint - Config Loader output
//!
//! Describes the outbound acknowledgment settings of a gateway process:
//! observability, the ack worker and the replay simulation used by the CLI.

use serde::{Deserialize, Serialize};

/// Config version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete gateway configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GatewayBlueprint {
    #[serde(default)]
    pub version: ConfigVersion,

    /// Logging and metrics export
    #[serde(default)]
    pub observability: ObservabilitySettings,

    /// Acknowledgment dispatch
    #[serde(default)]
    pub ack: AckConfig,

    /// Simulated device connections for event replay
    #[serde(default)]
    pub simulation: SimulationConfig,
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// JSON structured logs
    #[default]
    Json,
    /// Human-readable
    Pretty,
    /// Compact single line
    Compact,
}

/// Logging and metrics export settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilitySettings {
    #[serde(default)]
    pub log_format: LogFormat,

    /// Default filter when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Prometheus listener port, 0 disables the exporter
    #[serde(default = "default_metrics_port")]
    pub metrics_port: u16,
}

impl Default for ObservabilitySettings {
    fn default() -> Self {
        Self {
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            metrics_port: default_metrics_port(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_metrics_port() -> u16 {
    9000
}

/// Acknowledgment dispatch settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckConfig {
    /// When false, device events are not offered to the ack dispatcher
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Bounded queue in front of the ack worker
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

impl Default for AckConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            queue_capacity: default_queue_capacity(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_queue_capacity() -> usize {
    1024
}

/// Behaviour of the simulated device connections
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Every n-th send fails; 0 means sends never fail
    #[serde(default)]
    pub fail_every: u64,

    /// Artificial send latency in milliseconds
    #[serde(default)]
    pub send_delay_ms: u64,
}
