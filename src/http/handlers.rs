//! Request handlers.

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::config::SocialLinks;
use crate::http::input::SubmittedInput;
use crate::http::negotiate::{present, Negotiated, RequestContext};
use crate::http::server::AppState;
use crate::http::session::{session_cookie, session_id, Flash};
use crate::observability::metrics;
use crate::validation::EntityKind;

#[derive(Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
}

/// Props handed to the form view of one entity.
#[derive(Debug, Serialize)]
pub struct FormProps {
    pub entity: EntityKind,
    pub errors: Map<String, Value>,
    pub old: Map<String, Value>,
}

pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub async fn links(State(state): State<AppState>) -> Json<SocialLinks> {
    Json(SocialLinks::clone(&state.links))
}

fn unknown_collection(collection: &str) -> Response {
    tracing::debug!(collection = %collection, "Unknown collection");
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": format!("Unknown collection '{collection}'") })),
    )
        .into_response()
}

/// Validate a submission and answer according to the caller's hints.
pub async fn store(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    headers: HeaderMap,
    SubmittedInput(input): SubmittedInput,
) -> Response {
    let Some(entity) = EntityKind::from_collection(&collection) else {
        return unknown_collection(&collection);
    };

    let context = RequestContext::from_headers(&headers);
    let outcome = state.validator.validate(entity, &input);
    metrics::record_validation(entity, &outcome);

    match present(outcome, context, &input) {
        Negotiated::Continue(values) => {
            tracing::info!(entity = %entity, "Submission accepted");
            if context.wants_structured {
                (StatusCode::CREATED, Json(json!({ "data": values }))).into_response()
            } else {
                Redirect::to(&format!("/{}", entity.collection())).into_response()
            }
        }
        Negotiated::Structured(body) => body.into_response(),
        Negotiated::RedirectBack { errors, old_input } => {
            let session = session_id(&headers).unwrap_or_else(Uuid::new_v4);
            state.flash.put(
                session,
                Flash {
                    errors,
                    old: old_input,
                },
            );

            let target = back_target(&headers, entity);
            tracing::debug!(entity = %entity, target = %target, "Redirecting back with errors");

            let mut response = Redirect::to(&target).into_response();
            response
                .headers_mut()
                .insert(header::SET_COOKIE, session_cookie(session));
            response
        }
    }
}

/// Form view props, consuming any flash left by a rejected submission.
pub async fn create_form(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    headers: HeaderMap,
) -> Response {
    let Some(entity) = EntityKind::from_collection(&collection) else {
        return unknown_collection(&collection);
    };

    let flash = session_id(&headers)
        .and_then(|session| state.flash.take(&session))
        .unwrap_or_default();

    Json(FormProps {
        entity,
        errors: flash.errors,
        old: flash.old,
    })
    .into_response()
}

/// `Referer` when it is present and printable, else the entity's form.
fn back_target(headers: &HeaderMap, entity: EntityKind) -> String {
    headers
        .get(header::REFERER)
        .and_then(|v: &HeaderValue| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| entity.create_path())
}
