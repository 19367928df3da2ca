//! Straggler cleanup.
//!
//! # Responsibilities
//! - Find OS processes matching the managed service's launch signature
//! - Force-kill them, tracked or not
//!
//! # Design Decisions
//! - Inherently racy against processes the supervisor does not own:
//!   best effort, log and continue, never fatal
//! - Matches on the full command line, and every kill is logged with
//!   the victim's pid and command line

use sysinfo::{ProcessesToUpdate, System};

/// Force-kill every process whose command line contains `signature`,
/// skipping the pids in `exclude`. Returns the number of kills.
pub fn sweep_stragglers(signature: &str, exclude: &[u32]) -> usize {
    if signature.is_empty() {
        return 0;
    }

    let mut system = System::new();
    system.refresh_processes(ProcessesToUpdate::All, true);

    let mut killed = 0;
    for (pid, process) in system.processes() {
        let pid = pid.as_u32();
        if exclude.contains(&pid) {
            continue;
        }

        let cmdline = process
            .cmd()
            .iter()
            .map(|part| part.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ");
        if !cmdline.contains(signature) {
            continue;
        }

        if process.kill() {
            tracing::warn!(pid, %cmdline, "killed straggler instance");
            killed += 1;
        } else {
            // It may have exited between the scan and the kill.
            tracing::warn!(pid, %cmdline, "failed to kill straggler instance");
        }
    }

    killed
}
