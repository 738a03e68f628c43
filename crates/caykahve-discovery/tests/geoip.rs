//! Integration tests for `GeoIpSource` using wiremock HTTP mocks.

use std::sync::Arc;
use std::time::Duration;

use caykahve_core::{LatestNotification, Location};
use caykahve_discovery::{
    GeoIpSource, LocationError, LocationResolver, LocationSource, ResolveOutcome,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn source(server: &MockServer) -> GeoIpSource {
    GeoIpSource::new(&format!("{}/json", server.uri()), "caykahve-test/0.1")
        .expect("client construction should not fail")
}

#[tokio::test]
async fn resolves_coordinates_from_lookup() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "success",
            "city": "Ankara",
            "lat": 39.9208,
            "lon": 32.8541
        })))
        .mount(&server)
        .await;

    let loc = source(&server)
        .current_position(Duration::from_secs(2))
        .await
        .expect("should resolve");
    assert!((loc.latitude - 39.9208).abs() < 1e-9);
    assert!((loc.longitude - 32.8541).abs() < 1e-9);
}

#[tokio::test]
async fn forbidden_maps_to_denied() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let err = source(&server)
        .current_position(Duration::from_secs(2))
        .await
        .unwrap_err();
    assert_eq!(err, LocationError::Denied);
}

#[tokio::test]
async fn failed_lookup_maps_to_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "fail",
            "message": "private range"
        })))
        .mount(&server)
        .await;

    let err = source(&server)
        .current_position(Duration::from_secs(2))
        .await
        .unwrap_err();
    assert_eq!(err, LocationError::Unavailable);
}

#[tokio::test]
async fn slow_lookup_maps_to_timed_out() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "lat": 1.0, "lon": 1.0 }))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let err = source(&server)
        .current_position(Duration::from_millis(200))
        .await
        .unwrap_err();
    assert_eq!(err, LocationError::TimedOut);
}

#[tokio::test]
async fn resolver_timer_beats_hung_lookup() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "lat": 1.0, "lon": 1.0 }))
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&server)
        .await;

    let fallback = Location::new(41.015_137, 28.979_53).unwrap();
    let notes = Arc::new(LatestNotification::new());
    let resolver = LocationResolver::new(fallback, notes.clone())
        .with_deadline(Some(Duration::from_millis(300)))
        .with_device_timeout(Duration::from_secs(30));

    let started = std::time::Instant::now();
    let res = resolver.resolve(&source(&server)).await;

    assert_eq!(res.outcome, ResolveOutcome::Fallback(LocationError::TimedOut));
    assert_eq!(res.location, fallback);
    assert!(started.elapsed() < Duration::from_secs(5));
    assert!(notes.latest().is_some());
}
