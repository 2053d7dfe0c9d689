//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, Response};
use axum::Router;
use serde_json::Value;

use crm_requests::config::{AppConfig, SocialLinks};
use crm_requests::http::{build_router, AppState, HttpServer};
use crm_requests::lifecycle::Shutdown;

/// Config with a few seeded clients and contacts.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.records.insert("clients".into(), vec![1, 2]);
    config.records.insert("contacts".into(), vec![7]);
    config
}

pub fn test_links() -> SocialLinks {
    SocialLinks::resolve_with(|_| None)
}

pub fn test_router() -> Router {
    let config = test_config();
    let state = AppState::from_config(&config, test_links()).unwrap();
    build_router(&config, state)
}

pub fn json_post(path: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::ACCEPT, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// A browser form post, optionally from a page and with a session cookie.
pub fn form_post(
    path: &str,
    body: &str,
    referer: Option<&str>,
    cookie: Option<&str>,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header(header::ACCEPT, "text/html");
    if let Some(referer) = referer {
        builder = builder.header(header::REFERER, referer);
    }
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn read_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Start a real server on `addr`; trigger the returned handle to stop it.
pub async fn start_server(addr: SocketAddr) -> Shutdown {
    let mut config = test_config();
    config.listener.bind_address = addr.to_string();
    let state = AppState::from_config(&config, test_links()).unwrap();

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    let shutdown = Shutdown::new();
    let signal = shutdown.signal();
    let server = HttpServer::new(config, state);

    tokio::spawn(async move {
        let _ = server.run(listener, signal).await;
    });

    tokio::time::sleep(Duration::from_millis(100)).await;
    shutdown
}
