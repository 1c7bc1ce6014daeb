//! `run` command implementation.

use anyhow::{Context, Result};
use tracing::{info, warn};

use ack_dispatcher::OutboundMeasures;
use contracts::GatewayBlueprint;

use crate::cli::RunArgs;
use crate::error::CliError;
use crate::replay::{load_fixture, ReplayConfig, Replayer};

/// Execute the `run` command
///
/// With `log_from_config` set, tracing is initialized from the loaded
/// `[observability]` section.
pub async fn run_replay(args: &RunArgs, log_from_config: bool) -> Result<()> {
    if !args.config.exists() {
        return Err(CliError::config_not_found(args.config.display().to_string()).into());
    }

    let mut blueprint = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    if log_from_config {
        observability::init_tracing(&blueprint.observability)?;
        info!(version = env!("CARGO_PKG_VERSION"), "Talaria ack CLI starting");
    }
    info!(config = %args.config.display(), "Configuration file read");

    // Apply CLI overrides
    if let Some(fail_every) = args.fail_every {
        info!(fail_every, "Overriding simulation.fail_every from CLI");
        blueprint.simulation.fail_every = fail_every;
    }
    if let Some(port) = args.metrics_port {
        info!(port, "Overriding observability.metrics_port from CLI");
        blueprint.observability.metrics_port = port;
    }

    let events = load_fixture(&args.events)
        .with_context(|| format!("Failed to load events from {}", args.events.display()))?;

    info!(
        events = events.len(),
        ack_enabled = blueprint.ack.enabled,
        queue_capacity = blueprint.ack.queue_capacity,
        "Configuration loaded"
    );

    if args.dry_run {
        info!("Dry run mode - configuration and events are valid, exiting");
        print_config_summary(&blueprint, events.len());
        return Ok(());
    }

    if let Some(port) = observability::exporter_port(&blueprint.observability) {
        observability::init_metrics_only(port)?;
    }

    let replayer = Replayer::new(ReplayConfig { blueprint, events });

    info!("Starting replay...");

    tokio::select! {
        result = replayer.run(OutboundMeasures::from_registry()) => {
            let stats = result.context("Replay failed")?;
            info!(
                handled = stats.worker.handled_count,
                duration_secs = stats.duration.as_secs_f64(),
                events_per_sec = format!("{:.2}", stats.events_per_sec()),
                "Replay completed successfully"
            );
            stats.print_summary();
        }
        _ = shutdown_signal() => {
            warn!("Received shutdown signal, stopping replay...");
        }
    }

    info!("Talaria ack finished");
    Ok(())
}

/// Resolve on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Print configuration summary for dry-run mode
fn print_config_summary(blueprint: &GatewayBlueprint, event_count: usize) {
    println!("\n=== Configuration Summary ===\n");
    println!("Ack:");
    println!("  Enabled: {}", blueprint.ack.enabled);
    println!("  Queue capacity: {}", blueprint.ack.queue_capacity);
    println!("\nSimulation:");
    println!("  Fail every: {}", blueprint.simulation.fail_every);
    println!("  Send delay: {} ms", blueprint.simulation.send_delay_ms);
    println!("\nEvents: {}", event_count);
    println!();
}
