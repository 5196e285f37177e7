//! Issue read wrappers and the close/reopen action gateway.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use issuecast_core::event::{DomainEvent, EventKind, IssueSnapshot, IssueState};
use issuecast_gitlab::GitLabError;

use crate::state::AppState;

type ApiError = (StatusCode, Json<serde_json::Value>);

/// Synchronous response to a close/reopen action. The same resulting state
/// also travels to every session through the broadcast; the caller's
/// reconciler treats both as equivalent.
#[derive(Serialize)]
pub struct ActionResponse {
    pub message: &'static str,
    #[serde(rename = "issueId")]
    pub issue_id: u64,
    pub state: IssueState,
}

fn gateway_error(context: &'static str) -> impl Fn(GitLabError) -> ApiError {
    move |err| {
        let status = match &err {
            GitLabError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::BAD_GATEWAY,
        };
        (
            status,
            Json(serde_json::json!({ "error": context, "details": err.to_string() })),
        )
    }
}

/// `GET /issues` — current snapshots straight from the tracker.
pub async fn list_issues(
    State(state): State<AppState>,
) -> Result<Json<Vec<IssueSnapshot>>, ApiError> {
    let issues = state
        .gitlab
        .list_issues()
        .await
        .map_err(gateway_error("Error fetching issues"))?;
    Ok(Json(
        issues.into_iter().map(|issue| issue.into_snapshot()).collect(),
    ))
}

/// `GET /issues/{iid}`
pub async fn get_issue(
    State(state): State<AppState>,
    Path(iid): Path<u64>,
) -> Result<Json<IssueSnapshot>, ApiError> {
    let issue = state
        .gitlab
        .get_issue(iid)
        .await
        .map_err(gateway_error("Error fetching issue"))?;
    Ok(Json(issue.into_snapshot()))
}

/// `POST /issues/{iid}/close`
///
/// Mutate first; only a confirmed tracker success is broadcast and returned.
pub async fn close_issue(
    State(state): State<AppState>,
    Path(iid): Path<u64>,
) -> Result<Json<ActionResponse>, ApiError> {
    let record = state
        .gitlab
        .close_issue(iid)
        .await
        .map_err(gateway_error("Error closing issue"))?;

    let snapshot = record.into_snapshot();
    let response_state = snapshot.state;
    info!(iid, "Issue closed, broadcasting");
    state
        .hub
        .publish(&DomainEvent::new(EventKind::IssueClosed, snapshot));

    Ok(Json(ActionResponse {
        message: "Issue closed successfully",
        issue_id: iid,
        state: response_state,
    }))
}

/// `POST /issues/{iid}/reopen`
///
/// The only producer of `IssueReopened` in the whole system.
pub async fn reopen_issue(
    State(state): State<AppState>,
    Path(iid): Path<u64>,
) -> Result<Json<ActionResponse>, ApiError> {
    let record = state
        .gitlab
        .reopen_issue(iid)
        .await
        .map_err(gateway_error("Error reopening issue"))?;

    let snapshot = record.into_snapshot();
    let response_state = snapshot.state;
    info!(iid, "Issue reopened, broadcasting");
    state
        .hub
        .publish(&DomainEvent::new(EventKind::IssueReopened, snapshot));

    Ok(Json(ActionResponse {
        message: "Issue reopened successfully",
        issue_id: iid,
        state: response_state,
    }))
}

#[derive(Deserialize)]
pub struct ChecklistRequest {
    pub text: String,
    pub checked: bool,
}

/// `POST /issues/{iid}/checklist` — toggle one checklist line in the issue
/// description and broadcast the update.
pub async fn update_checklist(
    State(state): State<AppState>,
    Path(iid): Path<u64>,
    Json(req): Json<ChecklistRequest>,
) -> Result<StatusCode, ApiError> {
    let record = state
        .gitlab
        .get_issue(iid)
        .await
        .map_err(gateway_error("Error updating checklist"))?;

    let description = record.description.unwrap_or_default();
    let updated = toggle_checklist_item(&description, &req.text, req.checked);

    let record = state
        .gitlab
        .update_description(iid, &updated)
        .await
        .map_err(gateway_error("Error updating checklist"))?;

    state
        .hub
        .publish(&DomainEvent::new(EventKind::IssueUpdated, record.into_snapshot()));

    Ok(StatusCode::OK)
}

/// Rewrite the checklist line containing `text` to the requested checked
/// state; other lines pass through untouched.
fn toggle_checklist_item(description: &str, text: &str, checked: bool) -> String {
    description
        .lines()
        .map(|line| {
            if line.contains(text) {
                format!("- [{}] {}", if checked { 'x' } else { ' ' }, text)
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
