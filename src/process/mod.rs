//! Process lifecycle subsystem.
//!
//! # Data Flow (one restart cycle)
//! ```text
//! Stopping:  graceful stop → forced kill on timeout
//! Sweeping:  kill stray instances by command-line signature
//! Launching: spawn a fresh child, capture the pid
//! WarmingUp: fixed wait (cancellable) before probing resumes
//! ```
//!
//! # Design Decisions
//! - The child is the supervisor's only shared mutable resource and is
//!   owned exclusively by this module plus the loop
//! - Sweeping is the one operation that reaches outside that ownership
//!   boundary; it is best-effort and never fatal
//! - A spawn failure aborts the cycle; the loop decides what happens next

pub mod lifecycle;
pub mod sweep;

pub use lifecycle::{LaunchError, ManagedProcess, ProcessManager, RestartError};
