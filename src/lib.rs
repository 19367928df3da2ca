//! Single-service health supervisor library.

pub mod config;
pub mod health;
pub mod lifecycle;
pub mod observability;
pub mod process;
pub mod supervisor;

pub use config::SupervisorConfig;
pub use lifecycle::Shutdown;
pub use supervisor::Supervisor;
