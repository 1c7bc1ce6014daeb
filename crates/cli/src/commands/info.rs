//! `info` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use ack_dispatcher::{
    ACK_FAILURE, ACK_FAILURE_LATENCY, ACK_SUCCESS, ACK_SUCCESS_LATENCY, MESSAGE_TYPE_LABEL,
    PARTNER_ID_LABEL, QOS_LEVEL_LABEL,
};
use contracts::GatewayBlueprint;

use crate::cli::InfoArgs;

/// Configuration info for JSON output
#[derive(Serialize)]
struct ConfigInfo<'a> {
    version: String,
    blueprint: &'a GatewayBlueprint,
    metrics: Vec<&'static str>,
    labels: Vec<&'static str>,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration info");

    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    let blueprint = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    if args.json {
        let info = ConfigInfo {
            version: format!("{:?}", blueprint.version),
            blueprint: &blueprint,
            metrics: metric_names(),
            labels: label_names(),
        };
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_config_info(&blueprint);
    }

    Ok(())
}

fn metric_names() -> Vec<&'static str> {
    vec![ACK_SUCCESS, ACK_FAILURE, ACK_SUCCESS_LATENCY, ACK_FAILURE_LATENCY]
}

fn label_names() -> Vec<&'static str> {
    vec![QOS_LEVEL_LABEL, PARTNER_ID_LABEL, MESSAGE_TYPE_LABEL]
}

fn print_config_info(blueprint: &GatewayBlueprint) {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║               Talaria Ack Configuration                      ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    let obs = &blueprint.observability;
    println!("🔭 Observability");
    println!("   ├─ Version: {:?}", blueprint.version);
    println!("   ├─ Log format: {:?}", obs.log_format);
    println!("   ├─ Log level: {}", obs.log_level);
    match obs.metrics_port {
        0 => println!("   └─ Metrics: disabled"),
        port => println!("   └─ Metrics: 0.0.0.0:{}", port),
    }

    println!("\n📨 Ack");
    println!("   ├─ Enabled: {}", blueprint.ack.enabled);
    println!("   ├─ Queue capacity: {}", blueprint.ack.queue_capacity);
    println!("   ├─ Metrics: {}", metric_names().join(", "));
    println!("   └─ Labels: {}", label_names().join(", "));

    let sim = &blueprint.simulation;
    println!("\n🧪 Simulation");
    match sim.fail_every {
        0 => println!("   ├─ Failures: never"),
        n => println!("   ├─ Failures: every {} sends", n),
    }
    println!("   └─ Send delay: {} ms", sim.send_delay_ms);

    println!();
}
