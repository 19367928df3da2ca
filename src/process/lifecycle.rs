//! Child process lifecycle control.
//!
//! # Responsibilities
//! - Launch the managed service as a child process
//! - Graceful stop (terminate, bounded wait), forced kill as fallback
//! - Run the restart cycle: Stopping → Sweeping → Launching → WarmingUp
//!
//! # Design Decisions
//! - Launch never waits for readiness; the health probe is authoritative
//! - On unix the child gets its own process group so signals reach the
//!   whole tree; platform-specific signalling never leaks out of this module
//! - Restart aborts on spawn failure instead of retrying internally;
//!   the loop owns that policy

use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::process::{Child, Command};
use uuid::Uuid;

use crate::config::schema::ChildConfig;
use crate::lifecycle::Shutdown;
use crate::process::sweep::sweep_stragglers;

/// Handle to the currently tracked child process.
#[derive(Debug)]
pub struct ManagedProcess {
    pid: u32,
    started_at: Instant,
    child: Child,
}

impl ManagedProcess {
    pub fn pid(&self) -> u32 {
        self.pid
    }

    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }
}

/// Errors from launching the managed service.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("executable not found: {0}")]
    MissingExecutable(String),

    #[error("failed to spawn {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from a restart cycle.
#[derive(Debug, Error)]
pub enum RestartError {
    #[error("relaunch failed: {0}")]
    Launch(#[from] LaunchError),
}

/// Starts, stops, and restarts the managed service.
pub struct ProcessManager {
    config: ChildConfig,
}

impl ProcessManager {
    pub fn new(config: ChildConfig) -> Self {
        Self { config }
    }

    /// Launch the managed service. Captures the PID immediately and
    /// returns without waiting for the service to become ready.
    pub fn start(&self) -> Result<ManagedProcess, LaunchError> {
        let command_path = Path::new(&self.config.command);
        // Bare names resolve via PATH; only explicit paths can be pre-checked.
        if command_path.components().count() > 1 && !command_path.exists() {
            return Err(LaunchError::MissingExecutable(self.config.command.clone()));
        }

        let mut command = Command::new(&self.config.command);
        #[cfg(unix)]
        {
            // Own process group so stop/kill can target the full tree.
            unsafe {
                command.pre_exec(|| {
                    if nix::libc::setpgid(0, 0) == 0 {
                        Ok(())
                    } else {
                        Err(std::io::Error::last_os_error())
                    }
                });
            }
        }
        command.args(&self.config.args).stdin(Stdio::null());
        if let Some(cwd) = &self.config.cwd {
            command.current_dir(cwd);
        }
        if !self.config.env.is_empty() {
            command.envs(&self.config.env);
        }

        let child = command.spawn().map_err(|error| {
            if error.kind() == std::io::ErrorKind::NotFound {
                LaunchError::MissingExecutable(self.config.command.clone())
            } else {
                LaunchError::Spawn {
                    command: self.config.command.clone(),
                    source: error,
                }
            }
        })?;

        let pid = match child.id() {
            Some(pid) => pid,
            None => {
                return Err(LaunchError::Spawn {
                    command: self.config.command.clone(),
                    source: std::io::Error::other("child exited before its pid could be read"),
                });
            }
        };

        tracing::info!(pid, command = %self.config.command, "managed service started");
        Ok(ManagedProcess {
            pid,
            started_at: Instant::now(),
            child,
        })
    }

    /// Ask the process to exit and wait up to `timeout`.
    /// Returns whether it exited voluntarily.
    pub async fn stop_graceful(&self, process: &mut ManagedProcess, timeout: Duration) -> bool {
        tracing::info!(
            pid = process.pid,
            uptime_secs = process.uptime().as_secs(),
            "stopping managed service"
        );

        #[cfg(unix)]
        signal_terminate(process.pid);
        #[cfg(not(unix))]
        if let Err(error) = process.child.start_kill() {
            tracing::debug!(pid = process.pid, %error, "process already gone");
        }

        match tokio::time::timeout(timeout, process.child.wait()).await {
            Ok(Ok(status)) => {
                tracing::info!(pid = process.pid, %status, "managed service exited");
                true
            }
            Ok(Err(error)) => {
                tracing::warn!(pid = process.pid, %error, "failed to await managed service exit");
                false
            }
            Err(_) => {
                tracing::warn!(
                    pid = process.pid,
                    timeout_secs = timeout.as_secs(),
                    "managed service did not exit in time"
                );
                false
            }
        }
    }

    /// Unconditionally kill the process. Best effort; the process may
    /// have already exited.
    pub async fn kill_forceful(&self, process: &mut ManagedProcess) {
        tracing::warn!(pid = process.pid, "force-killing managed service");

        #[cfg(unix)]
        signal_kill(process.pid);
        if let Err(error) = process.child.start_kill() {
            tracing::debug!(pid = process.pid, %error, "process already gone");
        }

        // Reap so the pid cannot linger as a zombie.
        if tokio::time::timeout(Duration::from_secs(2), process.child.wait())
            .await
            .is_err()
        {
            tracing::warn!(pid = process.pid, "managed service still not reaped after kill");
        }
    }

    /// One full restart cycle: Stopping → Sweeping → Launching → WarmingUp.
    ///
    /// The warm-up wait races against `shutdown`; a spawn failure aborts
    /// the cycle and is fatal to the caller.
    pub async fn restart(
        &self,
        current: Option<ManagedProcess>,
        shutdown: &Shutdown,
    ) -> Result<ManagedProcess, RestartError> {
        let cycle = Uuid::new_v4();
        tracing::info!(%cycle, "restart cycle starting");

        // Stopping
        if let Some(mut process) = current {
            let timeout = Duration::from_secs(self.config.stop_timeout_secs);
            if !self.stop_graceful(&mut process, timeout).await {
                self.kill_forceful(&mut process).await;
            }
        }

        // Sweeping
        let swept = sweep_stragglers(&self.config.signature(), &[std::process::id()]);
        if swept > 0 {
            tracing::warn!(%cycle, swept, "killed straggler instances");
        }

        // Launching
        let process = self.start()?;

        // WarmingUp
        let grace = Duration::from_secs(self.config.startup_grace_secs);
        tracing::info!(
            %cycle,
            pid = process.pid(),
            grace_secs = grace.as_secs(),
            "warming up before probing resumes"
        );
        if !shutdown.sleep_cancellable(grace).await {
            tracing::info!(%cycle, "shutdown requested during warm-up");
        }

        tracing::info!(%cycle, pid = process.pid(), "restart cycle complete");
        Ok(process)
    }
}

#[cfg(unix)]
fn signal_terminate(pid: u32) {
    send_signal(pid, nix::sys::signal::Signal::SIGTERM);
}

#[cfg(unix)]
fn signal_kill(pid: u32) {
    send_signal(pid, nix::sys::signal::Signal::SIGKILL);
}

/// Signal the process group first, falling back to the pid alone.
#[cfg(unix)]
fn send_signal(pid: u32, signal: nix::sys::signal::Signal) {
    use nix::errno::Errno;
    use nix::sys::signal::kill;
    use nix::unistd::Pid;

    let group = Pid::from_raw(-(pid as i32));
    match kill(group, signal) {
        Ok(()) | Err(Errno::ESRCH) => return,
        Err(error) => {
            tracing::warn!(pid, %signal, %error, "failed to signal process group");
        }
    }

    match kill(Pid::from_raw(pid as i32), signal) {
        Ok(()) | Err(Errno::ESRCH) => {}
        Err(error) => {
            tracing::warn!(pid, %signal, %error, "failed to signal process");
        }
    }
}
