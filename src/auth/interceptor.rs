//! Request gate that enforces API key authentication.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::protocol::{ErrorBody, API_KEY_HEADER};

use super::Validator;

/// Reject requests that lack an accepted `x-api-key` header.
///
/// A missing header yields 401 and a rejected key yields 403, each with a
/// JSON [`ErrorBody`]. Accepted requests are forwarded untouched.
///
/// Install with `axum::middleware::from_fn_with_state(validator, require_api_key)`.
pub async fn require_api_key(
    State(validator): State<Arc<dyn Validator>>,
    request: Request,
    next: Next,
) -> Response {
    let rejection = match request.headers().get(API_KEY_HEADER) {
        None => Some((
            StatusCode::UNAUTHORIZED,
            ErrorBody::unauthenticated("missing API key"),
        )),
        Some(value) => {
            let accepted = value
                .to_str()
                .map(|key| validator.validate(key))
                .unwrap_or(false);
            (!accepted).then(|| {
                (
                    StatusCode::FORBIDDEN,
                    ErrorBody::permission_denied("invalid API key"),
                )
            })
        }
    };

    if let Some((status, body)) = rejection {
        tracing::debug!(
            "Rejected {} {}: {}",
            request.method(),
            request.uri().path(),
            body.message
        );
        return (status, Json(body)).into_response();
    }

    next.run(request).await
}
