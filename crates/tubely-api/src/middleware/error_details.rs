//! Production error-body redaction
//!
//! `HttpAppError` renders `details` and `error_type` for non-sensitive errors and
//! attaches a redacted copy of its body to the response. In production this layer
//! swaps the body for that copy, so the decision follows the `Config` in
//! `AppState` rather than any process-wide switch.

use crate::error::RedactedErrorBody;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

pub async fn error_details_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;

    if !state.config.is_production() {
        return response;
    }

    let Some(RedactedErrorBody(body)) = response.extensions().get::<RedactedErrorBody>().cloned()
    else {
        return response;
    };

    let (mut parts, _) = response.into_parts();
    parts.headers.remove(header::CONTENT_LENGTH);
    (parts, Json(body)).into_response()
}
