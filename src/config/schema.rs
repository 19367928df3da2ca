//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the
//! supervisor. All types derive Serde traits for deserialization from
//! config files, and every field has a default so a minimal config works.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration for the supervisor.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SupervisorConfig {
    /// Managed service endpoint settings.
    pub service: ServiceConfig,

    /// Health probe and escalation settings.
    pub health: HealthConfig,

    /// Child process settings.
    pub child: ChildConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Managed service endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Base URL of the managed service (e.g., "http://127.0.0.1:5001").
    pub url: String,

    /// Path probed for health checks, relative to `url`.
    pub health_path: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:5001".to_string(),
            health_path: "/health".to_string(),
        }
    }
}

/// Health probe configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HealthConfig {
    /// Seconds between health probes.
    pub interval_secs: u64,

    /// Per-probe timeout in seconds.
    pub timeout_secs: u64,

    /// Number of consecutive failed probes before a restart.
    pub failure_threshold: u32,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            interval_secs: 30,
            timeout_secs: 10,
            failure_threshold: 3,
        }
    }
}

/// Child process configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChildConfig {
    /// Executable used to (re)launch the managed service.
    pub command: String,

    /// Arguments passed to the executable.
    pub args: Vec<String>,

    /// Working directory for the child (inherited when unset).
    pub cwd: Option<PathBuf>,

    /// Extra environment variables for the child.
    pub env: HashMap<String, String>,

    /// Seconds to wait after a launch before probing resumes.
    pub startup_grace_secs: u64,

    /// Seconds to wait for a graceful exit before force-killing.
    pub stop_timeout_secs: u64,

    /// Command-line signature used to sweep stray instances.
    /// Defaults to the full command line when unset.
    pub sweep_signature: Option<String>,
}

impl Default for ChildConfig {
    fn default() -> Self {
        Self {
            command: String::new(),
            args: Vec::new(),
            cwd: None,
            env: HashMap::new(),
            startup_grace_secs: 15,
            stop_timeout_secs: 5,
            sweep_signature: None,
        }
    }
}

impl ChildConfig {
    /// The signature stray instances are matched against.
    pub fn signature(&self) -> String {
        match &self.sweep_signature {
            Some(signature) => signature.clone(),
            None => {
                let mut parts = vec![self.command.clone()];
                parts.extend(self.args.iter().cloned());
                parts.join(" ").trim().to_string()
            }
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level applied when RUST_LOG is unset (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9095".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SupervisorConfig::default();
        assert_eq!(config.service.url, "http://127.0.0.1:5001");
        assert_eq!(config.service.health_path, "/health");
        assert_eq!(config.health.interval_secs, 30);
        assert_eq!(config.health.timeout_secs, 10);
        assert_eq!(config.health.failure_threshold, 3);
        assert_eq!(config.child.startup_grace_secs, 15);
        assert_eq!(config.child.stop_timeout_secs, 5);
        assert!(!config.observability.metrics_enabled);
    }

    #[test]
    fn test_signature_defaults_to_command_line() {
        let child = ChildConfig {
            command: "python3".to_string(),
            args: vec!["api/app.py".to_string()],
            ..ChildConfig::default()
        };
        assert_eq!(child.signature(), "python3 api/app.py");
    }

    #[test]
    fn test_signature_override_wins() {
        let child = ChildConfig {
            command: "python3".to_string(),
            args: vec!["api/app.py".to_string()],
            sweep_signature: Some("api/app.py".to_string()),
            ..ChildConfig::default()
        };
        assert_eq!(child.signature(), "api/app.py");
    }

    #[test]
    fn test_minimal_toml_parses() {
        let config: SupervisorConfig = toml::from_str(
            r#"
            [child]
            command = "python3"
            args = ["api/app.py"]
            "#,
        )
        .unwrap();
        assert_eq!(config.child.command, "python3");
        assert_eq!(config.health.interval_secs, 30);
    }
}
