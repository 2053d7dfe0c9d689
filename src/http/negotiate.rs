//! Response negotiation for validation outcomes.
//!
//! # Responsibilities
//! - Decide whether the caller wants a structured reply
//! - Shape a rejection as a 422 JSON payload or a redirect back
//!
//! # Design Decisions
//! - The structured/redirect choice is an explicit capability flag derived
//!   at the HTTP boundary, not something the validator knows about
//! - Acceptance is a pass-through; no response is produced here

use axum::{
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::validation::ValidationOutcome;

pub const VALIDATION_ERRORS_MESSAGE: &str = "Validation errors";

/// Caller hints resolved from the incoming request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RequestContext {
    pub wants_structured: bool,
}

impl RequestContext {
    /// Structured when `Accept` mentions JSON or the call is an XHR.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let accepts_json = headers
            .get(header::ACCEPT)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.to_ascii_lowercase().contains("json"));

        let is_xhr = headers
            .get("x-requested-with")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.eq_ignore_ascii_case("XMLHttpRequest"));

        Self {
            wants_structured: accepts_json || is_xhr,
        }
    }
}

/// The 422 payload sent to structured callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationErrorBody {
    pub message: &'static str,
    pub errors: Map<String, Value>,
}

impl IntoResponse for ValidationErrorBody {
    fn into_response(self) -> Response {
        (StatusCode::UNPROCESSABLE_ENTITY, Json(self)).into_response()
    }
}

/// What the HTTP layer should do with an outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum Negotiated {
    /// Validation passed; continue processing with the normalized values.
    Continue(Map<String, Value>),
    /// Reply with a structured error payload.
    Structured(ValidationErrorBody),
    /// Redirect back to the form with errors and the submitted input.
    RedirectBack {
        errors: Map<String, Value>,
        old_input: Map<String, Value>,
    },
}

pub fn present(
    outcome: ValidationOutcome,
    context: RequestContext,
    submitted: &Map<String, Value>,
) -> Negotiated {
    if let ValidationOutcome::Accepted(values) = outcome {
        return Negotiated::Continue(values);
    }

    let errors = outcome.error_bag();
    if context.wants_structured {
        Negotiated::Structured(ValidationErrorBody {
            message: VALIDATION_ERRORS_MESSAGE,
            errors,
        })
    } else {
        Negotiated::RedirectBack {
            errors,
            old_input: submitted.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{FieldViolation, Violation};
    use axum::http::HeaderValue;
    use serde_json::json;

    fn rejected() -> ValidationOutcome {
        ValidationOutcome::Rejected(vec![FieldViolation {
            field: "title".into(),
            violation: Violation::MissingRequiredField {
                label: "title".into(),
            },
        }])
    }

    fn submitted() -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("value".into(), json!("12"));
        map
    }

    #[test]
    fn test_context_from_headers() {
        let mut headers = HeaderMap::new();
        assert!(!RequestContext::from_headers(&headers).wants_structured);

        headers.insert(header::ACCEPT, HeaderValue::from_static("text/html"));
        assert!(!RequestContext::from_headers(&headers).wants_structured);

        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        assert!(RequestContext::from_headers(&headers).wants_structured);

        let mut headers = HeaderMap::new();
        headers.insert("x-requested-with", HeaderValue::from_static("XMLHttpRequest"));
        assert!(RequestContext::from_headers(&headers).wants_structured);
    }

    #[test]
    fn test_accepted_passes_through() {
        let mut values = Map::new();
        values.insert("title".into(), json!("Big Deal"));
        let negotiated = present(
            ValidationOutcome::Accepted(values.clone()),
            RequestContext { wants_structured: true },
            &submitted(),
        );
        assert_eq!(negotiated, Negotiated::Continue(values));
    }

    #[test]
    fn test_structured_rejection() {
        let negotiated = present(
            rejected(),
            RequestContext { wants_structured: true },
            &submitted(),
        );
        let Negotiated::Structured(body) = negotiated else {
            panic!("expected structured reply");
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "message": "Validation errors",
                "errors": {"title": ["The title field is required."]}
            })
        );
        assert_eq!(body.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_redirect_rejection_keeps_input() {
        let negotiated = present(rejected(), RequestContext::default(), &submitted());
        let Negotiated::RedirectBack { errors, old_input } = negotiated else {
            panic!("expected redirect");
        };
        assert_eq!(errors["title"], json!(["The title field is required."]));
        assert_eq!(old_input, submitted());
    }
}
