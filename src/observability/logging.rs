//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber
//! - Configure the log level from config, RUST_LOG winning
//!
//! # Design Decisions
//! - The log stream is the supervisor's primary observable contract:
//!   every state transition is a leveled, timestamped event

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber. `default_level` applies to this
/// crate when RUST_LOG is unset.
pub fn init(default_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(format!("sentinel={default_level}"))
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
