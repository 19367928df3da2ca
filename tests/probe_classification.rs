//! Probe classification against a live socket.

use std::net::SocketAddr;

use sentinel::config::{HealthConfig, ServiceConfig};
use sentinel::health::probe::{HealthOutcome, HealthProbe};

mod common;

fn make_probe(addr: SocketAddr) -> HealthProbe {
    let service = ServiceConfig {
        url: format!("http://{addr}"),
        health_path: "/health".to_string(),
    };
    let health = HealthConfig {
        timeout_secs: 2,
        ..HealthConfig::default()
    };
    HealthProbe::new(&service, &health)
}

#[tokio::test]
async fn ready_service_is_healthy() {
    let addr = common::start_health_endpoint(|| async { (200, common::ready_body()) }).await;
    assert_eq!(make_probe(addr).probe().await, HealthOutcome::Healthy);
}

#[tokio::test]
async fn model_not_loaded_is_degraded() {
    let addr = common::start_health_endpoint(|| async { (200, common::degraded_body()) }).await;
    match make_probe(addr).probe().await {
        HealthOutcome::Degraded(reason) => assert!(reason.contains("model")),
        other => panic!("expected Degraded, got {other:?}"),
    }
}

#[tokio::test]
async fn error_status_is_unreachable() {
    let addr =
        common::start_health_endpoint(|| async { (500, r#"{"error":"boom"}"#.to_string()) }).await;
    match make_probe(addr).probe().await {
        HealthOutcome::Unreachable(reason) => assert!(reason.contains("500")),
        other => panic!("expected Unreachable, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_is_degraded() {
    let addr =
        common::start_health_endpoint(|| async { (200, "not json at all".to_string()) }).await;
    assert!(matches!(
        make_probe(addr).probe().await,
        HealthOutcome::Degraded(_)
    ));
}

#[tokio::test]
async fn connection_refused_is_unreachable() {
    let addr = common::unused_addr().await;
    assert!(matches!(
        make_probe(addr).probe().await,
        HealthOutcome::Unreachable(_)
    ));
}
