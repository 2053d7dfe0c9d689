//! Submitted input extraction.
//!
//! JSON bodies are taken as-is; anything else is read as an urlencoded form,
//! with every value kept as a string for the validator to coerce.

use axum::{
    extract::{rejection::FormRejection, rejection::JsonRejection, FromRequest, Request},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Form, Json,
};
use serde_json::{json, Map, Value};
use thiserror::Error;

/// The submitted field map of a request.
#[derive(Debug, Clone, Default)]
pub struct SubmittedInput(pub Map<String, Value>);

#[derive(Debug, Error)]
pub enum InputError {
    #[error(transparent)]
    Json(#[from] JsonRejection),

    #[error(transparent)]
    Form(#[from] FormRejection),
}

impl InputError {
    fn status(&self) -> StatusCode {
        match self {
            InputError::Json(r) => r.status(),
            InputError::Form(r) => r.status(),
        }
    }

    fn body_text(&self) -> String {
        match self {
            InputError::Json(r) => r.body_text(),
            InputError::Form(r) => r.body_text(),
        }
    }
}

impl IntoResponse for InputError {
    fn into_response(self) -> Response {
        tracing::debug!(error = %self, "Rejected request body");
        // 422 is reserved for validation errors.
        let status = match self.status() {
            s @ (StatusCode::UNSUPPORTED_MEDIA_TYPE | StatusCode::PAYLOAD_TOO_LARGE) => s,
            _ => StatusCode::BAD_REQUEST,
        };
        (status, Json(json!({ "message": self.body_text() }))).into_response()
    }
}

fn is_json(req: &Request) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| {
            let mime = v.split(';').next().unwrap_or_default().trim();
            mime == "application/json" || mime.ends_with("+json")
        })
}

impl<S> FromRequest<S> for SubmittedInput
where
    S: Send + Sync,
{
    type Rejection = InputError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_json(&req) {
            let Json(map) = Json::<Map<String, Value>>::from_request(req, state).await?;
            return Ok(Self(map));
        }

        let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state).await?;
        let map = pairs
            .into_iter()
            .map(|(name, value)| (name, Value::String(value)))
            .collect();
        Ok(Self(map))
    }
}
