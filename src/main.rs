//! Sentinel, a single-service health supervisor.
//!
//! A watchdog that keeps one backend service alive: it probes the
//! service's health endpoint on an interval, counts consecutive
//! failures, and restarts the service when the failure threshold is
//! reached.
//!
//! # Architecture Overview
//!
//! ```text
//!              ┌───────────────────────────────────────────────────────┐
//!              │                      SENTINEL                         │
//!              │                                                       │
//!              │   ┌──────────┐ poll  ┌─────────┐ outcome ┌─────────┐  │
//!              │   │supervisor│──────▶│ health  │────────▶│ failure │  │
//!              │   │   loop   │       │  probe  │         │ tracker │  │
//!              │   └────┬─────┘       └────┬────┘         └────┬────┘  │
//!              │        │ escalate         │ GET /health       │       │
//!              │        ▼                  ▼                   │       │
//!              │   ┌──────────┐      ┌──────────────┐    threshold     │
//!              │   │ process  │      │   Managed    │     reached      │
//!              │   │ manager  │─────▶│   Service    │                  │
//!              │   └──────────┘ stop/│  (child proc)│                  │
//!              │                sweep└──────────────┘                  │
//!              │                relaunch                               │
//!              │                                                       │
//!              │  ┌─────────────────────────────────────────────────┐  │
//!              │  │            Cross-Cutting Concerns               │  │
//!              │  │  ┌────────┐ ┌───────────┐ ┌─────────────────┐   │  │
//!              │  │  │ config │ │ lifecycle │ │  observability  │   │  │
//!              │  │  │        │ │ (signals, │ │ (logs, metrics) │   │  │
//!              │  │  └────────┘ │ shutdown) │ └─────────────────┘   │  │
//!              │  │             └───────────┘                       │  │
//!              │  └─────────────────────────────────────────────────┘  │
//!              └───────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use sentinel::config::{self, SupervisorConfig};
use sentinel::lifecycle::{signals, Shutdown};
use sentinel::observability::{logging, metrics};
use sentinel::supervisor::Supervisor;

/// Watchdog for a single backend service.
#[derive(Parser)]
#[command(name = "sentinel", about = "Keeps a single backend service alive", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Managed service base URL (overrides config).
    #[arg(long)]
    service_url: Option<String>,

    /// Child command line used to (re)launch the service (overrides config).
    #[arg(long)]
    child: Option<String>,

    /// Seconds between health probes (overrides config).
    #[arg(long)]
    interval: Option<u64>,

    /// Consecutive failures before a restart (overrides config).
    #[arg(long)]
    failure_threshold: Option<u32>,

    /// Log level when RUST_LOG is unset (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => match config::load_config(path) {
            Ok(config) => config,
            Err(error) => {
                eprintln!("failed to load {}: {error}", path.display());
                return ExitCode::from(2);
            }
        },
        None => SupervisorConfig::default(),
    };
    apply_overrides(&mut config, &cli);

    logging::init(&config.observability.log_level);

    // CLI overrides bypass the loader, so re-validate the effective config.
    if let Err(errors) = config::validate_config(&config) {
        for error in &errors {
            tracing::error!(%error, "invalid configuration");
        }
        return ExitCode::from(2);
    }

    tracing::info!(
        service = %config.service.url,
        interval_secs = config.health.interval_secs,
        failure_threshold = config.health.failure_threshold,
        child = %config.child.command,
        "configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => {
                tracing::error!(
                    metrics_address = %config.observability.metrics_address,
                    "failed to parse metrics address"
                );
            }
        }
    }

    let shutdown = Shutdown::new();
    signals::spawn_signal_listener(&shutdown);

    let supervisor = Supervisor::new(config);
    match supervisor.run(shutdown).await {
        Ok(()) => {
            tracing::info!("shutdown complete");
            ExitCode::SUCCESS
        }
        Err(error) => {
            tracing::error!(%error, "supervisor terminated");
            ExitCode::FAILURE
        }
    }
}

fn apply_overrides(config: &mut SupervisorConfig, cli: &Cli) {
    if let Some(url) = &cli.service_url {
        config.service.url = url.clone();
    }
    if let Some(child) = &cli.child {
        let mut parts = child.split_whitespace().map(str::to_string);
        if let Some(command) = parts.next() {
            config.child.command = command;
            config.child.args = parts.collect();
        }
    }
    if let Some(interval) = cli.interval {
        config.health.interval_secs = interval;
    }
    if let Some(threshold) = cli.failure_threshold {
        config.health.failure_threshold = threshold;
    }
    if let Some(level) = &cli.log_level {
        config.observability.log_level = level.clone();
    }
}
