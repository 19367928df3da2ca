//! The supervision loop.
//!
//! # State Machine
//! ```text
//! Init ──▶ Polling ──▶ Escalating ──▶ Restarting ──▶ Polling
//!  │          │                           │
//!  │          └── shutdown ──▶ stop child, exit 0
//!  └── initial launch fails ──▶ fatal, exit non-zero
//! ```
//!
//! # Design Decisions
//! - One probe in flight at a time; the interval sleep, the probe and
//!   every stop/warm-up wait race against the shutdown token
//! - Per-poll failures are absorbed into the failure counter; only a
//!   failed launch (initial or during restart) is terminal
//! - After a successful restart the interval is reset, so the next
//!   probe runs a full interval after warm-up

use std::time::Duration;

use thiserror::Error;
use tokio::time::{self, MissedTickBehavior};

use crate::config::SupervisorConfig;
use crate::health::probe::{HealthOutcome, HealthProbe};
use crate::health::tracker::FailureTracker;
use crate::lifecycle::Shutdown;
use crate::observability::metrics;
use crate::process::{LaunchError, ManagedProcess, ProcessManager, RestartError};

/// Terminal supervisor failures. Everything else is absorbed into the
/// failure counter.
#[derive(Debug, Error)]
pub enum SupervisorError {
    #[error("initial launch failed: {0}")]
    InitialLaunch(#[from] LaunchError),

    #[error("restart failed: {0}")]
    Restart(#[from] RestartError),
}

/// Supervises a single managed service.
pub struct Supervisor {
    config: SupervisorConfig,
    probe: HealthProbe,
    tracker: FailureTracker,
    manager: ProcessManager,
    current: Option<ManagedProcess>,
}

impl Supervisor {
    pub fn new(config: SupervisorConfig) -> Self {
        let probe = HealthProbe::new(&config.service, &config.health);
        let manager = ProcessManager::new(config.child.clone());
        Self {
            config,
            probe,
            tracker: FailureTracker::new(),
            manager,
            current: None,
        }
    }

    /// Run until shutdown is triggered or a terminal failure occurs.
    ///
    /// Returns Ok(()) on clean shutdown; the caller maps errors to a
    /// non-zero exit code.
    pub async fn run(mut self, shutdown: Shutdown) -> Result<(), SupervisorError> {
        self.init(&shutdown).await?;

        let interval = Duration::from_secs(self.config.health.interval_secs);
        let mut ticker = time::interval_at(time::Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if self.poll_once(&shutdown).await? {
                        ticker.reset();
                    }
                }
                _ = shutdown.triggered() => {
                    tracing::info!("shutdown requested, stopping supervisor");
                    break;
                }
            }
        }

        self.stop_current().await;
        Ok(())
    }

    /// One-time start check before polling begins.
    async fn init(&mut self, shutdown: &Shutdown) -> Result<(), SupervisorError> {
        tracing::info!(
            service = %self.config.service.url,
            interval_secs = self.config.health.interval_secs,
            failure_threshold = self.config.health.failure_threshold,
            "supervisor starting"
        );

        let outcome = self.probe.probe().await;
        metrics::record_probe(outcome.is_healthy());
        if outcome.is_healthy() {
            tracing::info!("managed service already healthy");
            return Ok(());
        }

        tracing::info!(outcome = ?outcome, "managed service not healthy, launching");
        match self.manager.start() {
            Ok(process) => {
                self.current = Some(process);
                let grace = Duration::from_secs(self.config.child.startup_grace_secs);
                tracing::info!(grace_secs = grace.as_secs(), "warming up before first poll");
                shutdown.sleep_cancellable(grace).await;
                Ok(())
            }
            Err(error) => {
                tracing::error!(%error, "initial launch failed, nothing to supervise");
                Err(SupervisorError::InitialLaunch(error))
            }
        }
    }

    /// One polling cycle. Returns true when a restart happened.
    async fn poll_once(&mut self, shutdown: &Shutdown) -> Result<bool, SupervisorError> {
        let outcome = self.probe.probe().await;
        metrics::record_probe(outcome.is_healthy());

        match outcome {
            HealthOutcome::Healthy => {
                if self.tracker.record_success() {
                    tracing::info!("managed service recovered, failure streak cleared");
                } else {
                    tracing::debug!("managed service healthy");
                }
                Ok(false)
            }
            // Degraded and Unreachable weigh the same toward escalation.
            HealthOutcome::Degraded(reason) | HealthOutcome::Unreachable(reason) => {
                let failures = self.tracker.record_failure();
                tracing::warn!(
                    failures,
                    threshold = self.config.health.failure_threshold,
                    %reason,
                    "health probe failed"
                );

                if self
                    .tracker
                    .should_escalate(self.config.health.failure_threshold)
                {
                    self.escalate(shutdown).await?;
                    return Ok(true);
                }
                Ok(false)
            }
        }
    }

    /// Run the restart cycle; a failure here is terminal.
    async fn escalate(&mut self, shutdown: &Shutdown) -> Result<(), SupervisorError> {
        tracing::error!(
            failures = self.tracker.consecutive_failures(),
            "failure threshold reached, restarting managed service"
        );

        match self.manager.restart(self.current.take(), shutdown).await {
            Ok(process) => {
                metrics::record_restart(true);
                self.current = Some(process);
                self.tracker.reset();
                Ok(())
            }
            Err(error) => {
                metrics::record_restart(false);
                tracing::error!(%error, "restart failed, supervisor cannot recover");
                Err(SupervisorError::Restart(error))
            }
        }
    }

    /// Stop the tracked child as part of supervisor shutdown. This is
    /// the only path that stops the managed service deliberately.
    async fn stop_current(&mut self) {
        if let Some(mut process) = self.current.take() {
            let timeout = Duration::from_secs(self.config.child.stop_timeout_secs);
            if !self.manager.stop_graceful(&mut process, timeout).await {
                self.manager.kill_forceful(&mut process).await;
            }
        }
    }
}
