//! HTTP surface tests: routes, payloads, admin breaker view.

use std::sync::Arc;

use serde_json::{json, Value};
use tokio::net::TcpListener;

use waypoint::config::new_handle;
use waypoint::lifecycle::Shutdown;
use waypoint::orchestrator::Coordinator;
use waypoint::resilience::BreakerRegistry;
use waypoint::HttpServer;

mod common;

async fn start_service(config: waypoint::AppConfig) -> (String, Shutdown) {
    let breakers = Arc::new(BreakerRegistry::new(config.breaker.clone()));
    let coordinator =
        Arc::new(Coordinator::from_config(new_handle(config.clone()), breakers.clone()).unwrap());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(&config, coordinator, breakers);
    let receiver = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, receiver).await;
    });

    (format!("http://{addr}"), shutdown)
}

#[tokio::test]
async fn query_endpoint_answers() {
    let geocoding = common::start_fixed_provider(200, common::geocoding_body("48.85", "2.35")).await;
    let weather = common::start_fixed_provider(200, common::weather_body(23.6, 35)).await;
    let places = common::start_fixed_provider(200, common::places_body(&["Louvre"])).await;

    let (url, shutdown) = start_service(common::test_config(geocoding, weather, places)).await;

    let client = reqwest::Client::new();
    let res = client
        .post(format!("{url}/query"))
        .json(&json!({ "query": "I'm going to Paris" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    let answer = body["answer"].as_str().unwrap();
    assert!(answer.contains("Weather in paris"), "{answer}");
    assert!(answer.contains("- Louvre"), "{answer}");

    shutdown.trigger();
}

#[tokio::test]
async fn empty_query_gets_a_prompt() {
    let geocoding = common::start_fixed_provider(200, "[]".into()).await;
    let weather = common::start_fixed_provider(200, "{}".into()).await;
    let places = common::start_fixed_provider(200, "{}".into()).await;

    let (url, shutdown) = start_service(common::test_config(geocoding, weather, places)).await;

    let client = reqwest::Client::new();
    let res = client
        .post(format!("{url}/query"))
        .json(&json!({ "query": "   " }))
        .send()
        .await
        .unwrap();

    let body: Value = res.json().await.unwrap();
    assert_eq!(
        body["answer"].as_str().unwrap(),
        "Please enter a destination or travel query."
    );

    shutdown.trigger();
}

#[tokio::test]
async fn healthz_is_alive() {
    let geocoding = common::start_fixed_provider(200, "[]".into()).await;
    let weather = common::start_fixed_provider(200, "{}".into()).await;
    let places = common::start_fixed_provider(200, "{}".into()).await;

    let (url, shutdown) = start_service(common::test_config(geocoding, weather, places)).await;

    let res = reqwest::get(format!("{url}/healthz")).await.unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "ok");

    shutdown.trigger();
}

#[tokio::test]
async fn admin_breakers_reports_tripped_endpoint() {
    let geocoding = common::start_fixed_provider(200, common::geocoding_body("48.85", "2.35")).await;
    let weather = common::start_fixed_provider(503, "{}".into()).await;
    let places = common::start_fixed_provider(200, common::places_body(&["Louvre"])).await;

    let (url, shutdown) = start_service(common::test_config(geocoding, weather, places)).await;

    let client = reqwest::Client::new();
    client
        .post(format!("{url}/query"))
        .json(&json!({ "query": "I'm going to Paris" }))
        .send()
        .await
        .unwrap();

    let res = client
        .get(format!("{url}/admin/breakers"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let snapshots: Value = res.json().await.unwrap();

    let weather_snapshot = snapshots
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["endpoint"] == "weather")
        .expect("weather breaker listed");
    assert_eq!(weather_snapshot["state"], "open");

    let places_snapshot = snapshots
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["endpoint"] == "places")
        .expect("places breaker listed");
    assert_eq!(places_snapshot["state"], "closed");

    shutdown.trigger();
}
