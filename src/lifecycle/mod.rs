//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger
//!     second signal  → forced exit
//!
//! Shutdown (shutdown.rs):
//!     trigger → every sleep/wait in the supervisor unblocks
//! ```
//!
//! # Design Decisions
//! - Every suspension point races against the shutdown token, so
//!   shutdown latency is bounded by the shortest wait in progress
//! - The supervisor, not this module, decides what cleanup to run

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
