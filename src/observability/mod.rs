//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (probe/restart counters, health gauge)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape, opt-in)
//! ```
//!
//! # Design Decisions
//! - Logs, not metrics, are the contract alerting depends on; metrics
//!   are a cheap complement and default off

pub mod logging;
pub mod metrics;
