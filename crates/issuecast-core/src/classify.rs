//! Webhook payload classification.
//!
//! Maps a raw GitLab issue webhook to a typed [`DomainEvent`], or to nothing
//! when the payload is not about an issue (merge-request and pipeline hooks
//! arrive on the same endpoint and must be silently ignored).

use serde::Deserialize;

use crate::event::{DomainEvent, EventKind, IssueSnapshot, IssueState};

/// Tolerant model of the inbound webhook body. Only the fields the
/// classifier needs are declared; everything else is ignored.
#[derive(Debug, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub event_type: Option<String>,
    #[serde(default)]
    pub object_attributes: Option<ObjectAttributes>,
}

#[derive(Debug, Deserialize)]
pub struct ObjectAttributes {
    pub iid: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Classify a webhook payload into a domain event.
///
/// Rules, evaluated in order:
/// 1. anything but an issue event is not applicable;
/// 2. a tracker-reported state of "closed" wins over any action value;
/// 3. an "open" or "create" action is a creation;
/// 4. everything else is a generic update.
///
/// Reopens are never inferred here: the webhook schema does not reliably
/// distinguish them from generic updates.
pub fn classify(payload: WebhookPayload) -> Option<DomainEvent> {
    if payload.event_type.as_deref() != Some("issue") {
        return None;
    }
    let attrs = payload.object_attributes?;

    let closed = attrs.state.as_deref() == Some("closed");
    let kind = if closed {
        EventKind::IssueClosed
    } else if matches!(attrs.action.as_deref(), Some("open") | Some("create")) {
        EventKind::IssueCreated
    } else {
        EventKind::IssueUpdated
    };

    let issue = IssueSnapshot {
        id: attrs.iid,
        title: attrs.title,
        state: if closed {
            IssueState::Closed
        } else {
            IssueState::Opened
        },
        description: attrs.description,
    };

    Some(DomainEvent::new(kind, issue))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue_payload(state: &str, action: &str) -> WebhookPayload {
        serde_json::from_value(serde_json::json!({
            "event_type": "issue",
            "object_attributes": {
                "iid": 42,
                "title": "Bug",
                "state": state,
                "action": action,
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_non_issue_events_are_not_applicable() {
        let payload: WebhookPayload = serde_json::from_value(serde_json::json!({
            "event_type": "merge_request",
            "object_attributes": { "iid": 5, "title": "MR", "state": "opened" }
        }))
        .unwrap();
        assert!(classify(payload).is_none());

        let no_type: WebhookPayload = serde_json::from_value(serde_json::json!({
            "object_kind": "pipeline"
        }))
        .unwrap();
        assert!(classify(no_type).is_none());
    }

    #[test]
    fn test_open_action_is_created() {
        let event = classify(issue_payload("opened", "open")).unwrap();
        assert_eq!(event.kind, EventKind::IssueCreated);
        assert_eq!(event.issue.id, 42);
        assert_eq!(event.issue.title, "Bug");
        assert_eq!(event.issue.state, IssueState::Opened);
    }

    #[test]
    fn test_create_action_is_created() {
        let event = classify(issue_payload("opened", "create")).unwrap();
        assert_eq!(event.kind, EventKind::IssueCreated);
    }

    #[test]
    fn test_closed_state_wins_over_action() {
        // A "close" payload can still carry an action value; the reported
        // state takes precedence.
        for action in ["open", "create", "close", "update"] {
            let event = classify(issue_payload("closed", action)).unwrap();
            assert_eq!(event.kind, EventKind::IssueClosed);
            assert_eq!(event.issue.state, IssueState::Closed);
        }
    }

    #[test]
    fn test_other_actions_are_updates() {
        let event = classify(issue_payload("opened", "update")).unwrap();
        assert_eq!(event.kind, EventKind::IssueUpdated);
        assert_eq!(event.issue.state, IssueState::Opened);
    }

    #[test]
    fn test_missing_attributes_is_not_applicable() {
        let payload: WebhookPayload =
            serde_json::from_value(serde_json::json!({ "event_type": "issue" })).unwrap();
        assert!(classify(payload).is_none());
    }

    #[test]
    fn test_description_is_carried() {
        let payload: WebhookPayload = serde_json::from_value(serde_json::json!({
            "event_type": "issue",
            "object_attributes": {
                "iid": 9,
                "title": "Checklist",
                "state": "opened",
                "action": "update",
                "description": "- [ ] step one",
            }
        }))
        .unwrap();
        let event = classify(payload).unwrap();
        assert_eq!(event.issue.description.as_deref(), Some("- [ ] step one"));
    }
}
