//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the axum Router with all handlers
//! - Wire up middleware (tracing, timeouts, body limits, request ID)
//! - Count requests per matched route
//! - Bind server to listener and shut down gracefully

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::MatchedPath,
    http::Request,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tracing::Span;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{AppConfig, SocialLinks};
use crate::http::handlers;
use crate::http::session::FlashStore;
use crate::lifecycle::ShutdownSignal;
use crate::observability::metrics;
use crate::validation::{InMemoryRecords, RequestValidator, RuleSetError};

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub validator: Arc<RequestValidator>,
    pub records: Arc<InMemoryRecords>,
    pub flash: FlashStore,
    pub links: Arc<SocialLinks>,
}

impl AppState {
    /// Build state with the in-memory lookup seeded from `config.records`.
    pub fn from_config(config: &AppConfig, links: SocialLinks) -> Result<Self, RuleSetError> {
        let records = Arc::new(InMemoryRecords::new());
        for (collection, ids) in &config.records {
            for id in ids {
                records.insert(collection, "id", &(*id).into());
            }
            tracing::debug!(collection = %collection, count = ids.len(), "Seeded records");
        }

        let validator = RequestValidator::new(records.clone())?;
        Ok(Self {
            validator: Arc::new(validator),
            records,
            flash: FlashStore::new(Duration::from_secs(config.session.flash_ttl_secs)),
            links: Arc::new(links),
        })
    }
}

/// HTTP server for the CRM submission endpoints.
pub struct HttpServer {
    router: Router,
    config: AppConfig,
}

impl HttpServer {
    pub fn new(config: AppConfig, state: AppState) -> Self {
        let router = build_router(&config, state);
        Self { router, config }
    }

    /// Run the server until `shutdown` resolves.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: ShutdownSignal,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown.wait())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

/// Build the axum router with all middleware layers.
#[allow(deprecated)]
pub fn build_router(config: &AppConfig, state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/links", get(handlers::links))
        .route("/{collection}", post(handlers::store))
        .route("/{collection}/create", get(handlers::create_form))
        .route_layer(middleware::from_fn(track_requests))
        .with_state(state)
        .layer(RequestBodyLimitLayer::new(config.limits.max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

/// HTTP span carrying the id set by `SetRequestIdLayer`, which runs first.
fn request_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-");
    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id,
    )
}

async fn track_requests(request: Request<Body>, next: Next) -> Response {
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;
    metrics::record_request(&route, response.status().as_u16());
    response
}
