//! Active health probing.
//!
//! # Responsibilities
//! - Issue one bounded-timeout GET against the managed service
//! - Classify the response into a [`HealthOutcome`]
//!
//! # Design Decisions
//! - No retries inside the probe; retry policy belongs to the loop
//! - Classification of a parsed body is a pure function (testable without a socket)
//! - A 200 response with an unexpected body is Degraded, not Unreachable

use std::time::Duration;

use serde::Deserialize;

use crate::config::schema::{HealthConfig, ServiceConfig};

/// Value the managed service reports in `status` once it is up.
const READY_STATUS: &str = "API is running";

/// Outcome of a single health probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthOutcome {
    /// Endpoint reachable and the service reports ready.
    Healthy,
    /// Endpoint reachable but the service is not ready to serve.
    Degraded(String),
    /// Connection failure, timeout, or a non-200 status.
    Unreachable(String),
}

impl HealthOutcome {
    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthOutcome::Healthy)
    }
}

/// Body shape of the managed service's health endpoint.
/// Unknown fields are ignored.
#[derive(Debug, Deserialize)]
struct HealthReport {
    status: String,
    model_loaded: bool,
}

/// Probes the managed service's health endpoint.
pub struct HealthProbe {
    client: reqwest::Client,
    /// Pre-joined probe URL.
    endpoint: String,
    timeout: Duration,
}

impl HealthProbe {
    pub fn new(service: &ServiceConfig, health: &HealthConfig) -> Self {
        let endpoint = format!(
            "{}{}",
            service.url.trim_end_matches('/'),
            service.health_path
        );
        Self {
            client: reqwest::Client::new(),
            endpoint,
            timeout: Duration::from_secs(health.timeout_secs),
        }
    }

    /// Issue one bounded probe and classify the result.
    pub async fn probe(&self) -> HealthOutcome {
        let response = match self
            .client
            .get(&self.endpoint)
            .timeout(self.timeout)
            .send()
            .await
        {
            Ok(response) => response,
            Err(error) if error.is_timeout() => {
                return HealthOutcome::Unreachable(format!(
                    "timed out after {}s",
                    self.timeout.as_secs()
                ));
            }
            Err(error) => {
                return HealthOutcome::Unreachable(format!("connection error: {error}"));
            }
        };

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return HealthOutcome::Unreachable(format!("unexpected status {status}"));
        }

        let body = match response.bytes().await {
            Ok(body) => body,
            Err(error) => {
                return HealthOutcome::Unreachable(format!("failed to read body: {error}"));
            }
        };

        match serde_json::from_slice::<HealthReport>(&body) {
            Ok(report) => classify(&report),
            Err(error) => HealthOutcome::Degraded(format!("malformed health body: {error}")),
        }
    }
}

/// Pure classification of an already-parsed health report.
fn classify(report: &HealthReport) -> HealthOutcome {
    if report.status != READY_STATUS {
        HealthOutcome::Degraded(format!("service reports status {:?}", report.status))
    } else if !report.model_loaded {
        HealthOutcome::Degraded("model not loaded".to_string())
    } else {
        HealthOutcome::Healthy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> Result<HealthReport, serde_json::Error> {
        serde_json::from_str(body)
    }

    #[test]
    fn test_ready_body_is_healthy() {
        let report = parse(r#"{"status":"API is running","model_loaded":true}"#).unwrap();
        assert_eq!(classify(&report), HealthOutcome::Healthy);
    }

    #[test]
    fn test_model_not_loaded_is_degraded() {
        let report = parse(r#"{"status":"API is running","model_loaded":false}"#).unwrap();
        assert_eq!(
            classify(&report),
            HealthOutcome::Degraded("model not loaded".to_string())
        );
    }

    #[test]
    fn test_wrong_status_is_degraded() {
        let report = parse(r#"{"status":"starting","model_loaded":true}"#).unwrap();
        assert!(matches!(classify(&report), HealthOutcome::Degraded(_)));
    }

    #[test]
    fn test_extra_fields_ignored() {
        let report =
            parse(r#"{"status":"API is running","model_loaded":true,"version":"1.2"}"#).unwrap();
        assert_eq!(classify(&report), HealthOutcome::Healthy);
    }

    #[test]
    fn test_missing_fields_fail_to_parse() {
        assert!(parse(r#"{"status":"API is running"}"#).is_err());
        assert!(parse(r#"{}"#).is_err());
    }

    #[test]
    fn test_endpoint_join_strips_trailing_slash() {
        let service = ServiceConfig {
            url: "http://127.0.0.1:5001/".to_string(),
            health_path: "/health".to_string(),
        };
        let probe = HealthProbe::new(&service, &HealthConfig::default());
        assert_eq!(probe.endpoint, "http://127.0.0.1:5001/health");
    }
}
