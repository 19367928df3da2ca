//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (intervals and thresholds must be non-zero)
//! - Check the service URL and metrics address actually parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: SupervisorConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;
use url::Url;

use crate::config::schema::SupervisorConfig;

/// A single semantic problem found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("service.url is not a valid http(s) URL: {0}")]
    InvalidServiceUrl(String),

    #[error("health.interval_secs must be at least 1")]
    ZeroInterval,

    #[error("health.timeout_secs must be at least 1")]
    ZeroTimeout,

    #[error("health.failure_threshold must be at least 1")]
    ZeroThreshold,

    #[error("child.command must not be empty")]
    EmptyCommand,

    #[error("child.stop_timeout_secs must be at least 1")]
    ZeroStopTimeout,

    #[error("observability.metrics_address is not a valid socket address: {0}")]
    InvalidMetricsAddress(String),
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &SupervisorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match Url::parse(&config.service.url) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        _ => errors.push(ValidationError::InvalidServiceUrl(
            config.service.url.clone(),
        )),
    }

    if config.health.interval_secs == 0 {
        errors.push(ValidationError::ZeroInterval);
    }
    if config.health.timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }
    if config.health.failure_threshold == 0 {
        errors.push(ValidationError::ZeroThreshold);
    }

    if config.child.command.trim().is_empty() {
        errors.push(ValidationError::EmptyCommand);
    }
    if config.child.stop_timeout_secs == 0 {
        errors.push(ValidationError::ZeroStopTimeout);
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<std::net::SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::SupervisorConfig;

    fn valid_config() -> SupervisorConfig {
        let mut config = SupervisorConfig::default();
        config.child.command = "python3".to_string();
        config
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_all_errors_reported() {
        let mut config = valid_config();
        config.service.url = "not a url".to_string();
        config.health.interval_secs = 0;
        config.health.failure_threshold = 0;
        config.child.command = String::new();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ValidationError::ZeroInterval));
        assert!(errors.contains(&ValidationError::ZeroThreshold));
        assert!(errors.contains(&ValidationError::EmptyCommand));
    }

    #[test]
    fn test_non_http_scheme_rejected() {
        let mut config = valid_config();
        config.service.url = "ftp://127.0.0.1:5001".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::InvalidServiceUrl(
                "ftp://127.0.0.1:5001".to_string()
            )]
        );
    }

    #[test]
    fn test_metrics_address_checked_only_when_enabled() {
        let mut config = valid_config();
        config.observability.metrics_address = "nonsense".to_string();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert!(validate_config(&config).is_err());
    }
}
