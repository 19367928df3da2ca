//! Supervision subsystem.
//!
//! # Data Flow
//! ```text
//! SupervisorLoop (runner.rs):
//!     interval tick → HealthProbe → FailureTracker
//!                                        │ threshold reached
//!                                        ▼
//!                              ProcessManager::restart
//!                                        │
//!                              reset tracker, keep polling
//! ```
//!
//! # Design Decisions
//! - All mutable state (failure counter, current child) lives in one
//!   Supervisor instance; no ambient globals
//! - Failure outcomes never abort the loop; only launch failures do

pub mod runner;

pub use runner::{Supervisor, SupervisorError};
