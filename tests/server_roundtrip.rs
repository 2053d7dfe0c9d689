//! Tests against a bound server over real HTTP.

use std::net::SocketAddr;
use std::time::Duration;

use reqwest::redirect::Policy;
use serde_json::{json, Value};

mod common;

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(Policy::none())
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_structured_and_browser_paths() {
    let addr: SocketAddr = "127.0.0.1:28191".parse().unwrap();
    let shutdown = common::start_server(addr).await;
    let client = client();

    let res = client
        .post(format!("http://{addr}/deals"))
        .header("Accept", "application/json")
        .json(&json!({"title": "Big Deal", "value": 10, "stage": "won", "client_id": 1}))
        .send()
        .await
        .expect("server unreachable");
    assert_eq!(res.status(), 422);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Validation errors");
    assert!(body["errors"]["stage"][0]
        .as_str()
        .unwrap()
        .contains("prospect, qualified, proposal, negotiation, closed_won, closed_lost"));

    let res = client
        .post(format!("http://{addr}/deals"))
        .header("Referer", "/deals/create?from=board")
        .form(&[("title", "Big Deal"), ("stage", "prospect"), ("client_id", "1")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 303);
    assert_eq!(res.headers()["location"], "/deals/create?from=board");

    shutdown.trigger();
}

#[tokio::test]
async fn test_graceful_shutdown_stops_accepting() {
    let addr: SocketAddr = "127.0.0.1:28192".parse().unwrap();
    let shutdown = common::start_server(addr).await;
    let client = client();

    let res = client
        .get(format!("http://{addr}/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    shutdown.trigger();
    tokio::time::sleep(Duration::from_millis(200)).await;

    let res = client.get(format!("http://{addr}/health")).send().await;
    assert!(res.is_err(), "server should be closed after shutdown");
}
