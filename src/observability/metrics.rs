//! Metrics collection and exposition.
//!
//! # Metrics
//! - `crm_validation_total` (counter): submissions by entity, outcome
//! - `crm_validation_violations_total` (counter): violations by entity, code
//! - `crm_http_requests_total` (counter): requests by route, status

use std::net::SocketAddr;

use metrics::counter;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::validation::{EntityKind, ValidationOutcome};

/// Install the Prometheus exporter with an HTTP listener on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_validation(entity: EntityKind, outcome: &ValidationOutcome) {
    let result = if outcome.is_accepted() { "accepted" } else { "rejected" };
    counter!("crm_validation_total", "entity" => entity.as_str(), "outcome" => result).increment(1);

    for v in outcome.violations() {
        counter!(
            "crm_validation_violations_total",
            "entity" => entity.as_str(),
            "code" => v.violation.code()
        )
        .increment(1);
    }
}

pub fn record_request(route: &str, status: u16) {
    counter!(
        "crm_http_requests_total",
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}
