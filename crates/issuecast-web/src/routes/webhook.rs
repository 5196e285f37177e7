//! Webhook ingestion endpoint.

use axum::{body::Bytes, extract::State, http::HeaderMap, http::StatusCode, Json};
use axum::response::{IntoResponse, Response};
use tracing::{debug, error, info, warn};

use issuecast_core::classify::{classify, WebhookPayload};

use crate::state::AppState;

/// Header GitLab uses to carry the shared webhook secret.
const TOKEN_HEADER: &str = "x-gitlab-token";

/// `POST /webhook` — authenticate, classify, broadcast.
///
/// Authentication failures are the only error surfaced to the sender. A body
/// that fails to parse is logged and acknowledged with 200 anyway: the
/// failure is local, and a non-2xx would make GitLab retry the same payload
/// indefinitely.
pub async fn receive(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let token = headers
        .get(TOKEN_HEADER)
        .and_then(|value| value.to_str().ok());
    if !token.is_some_and(|t| constant_time_eq(t, &state.webhook_secret)) {
        warn!("Rejected webhook with missing or invalid token");
        return (
            StatusCode::FORBIDDEN,
            Json(serde_json::json!({ "error": "Forbidden: invalid webhook token" })),
        )
            .into_response();
    }

    let payload: WebhookPayload = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            error!(error = %e, "Failed to parse webhook body");
            return (StatusCode::OK, "Webhook received").into_response();
        }
    };

    match classify(payload) {
        Some(event) => {
            info!(issue_id = event.issue.id, kind = ?event.kind, "Issue webhook classified");
            state.hub.publish(&event);
        }
        None => debug!("Ignoring webhook for non-issue event"),
    }

    (StatusCode::OK, "Webhook received").into_response()
}

/// Non-short-circuiting comparison of the presented token against the
/// configured secret.
fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes()
        .zip(b.bytes())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}
