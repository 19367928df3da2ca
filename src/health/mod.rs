//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Probe (probe.rs):
//!     Bounded GET {url}{health_path}
//!     → classify response
//!     → HealthOutcome
//!
//! Tracker (tracker.rs):
//!     HealthOutcome per poll
//!     → consecutive-failure counter
//!     → escalation decision at threshold
//! ```
//!
//! # Design Decisions
//! - The probe classifies, the tracker counts, the loop decides
//! - Degraded (reachable but not ready) and Unreachable count identically
//! - One probe in flight at a time; outcomes are never persisted

pub mod probe;
pub mod tracker;

pub use probe::{HealthOutcome, HealthProbe};
pub use tracker::FailureTracker;
