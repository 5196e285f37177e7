//! Domain events and their wire representation.
//!
//! Every push message is a single JSON object `{"event": <kind>, "data":
//! <issue snapshot>}`, one message per publish, no batching.

use serde::{Deserialize, Deserializer, Serialize};

/// Event kinds broadcast to connected viewers.
///
/// `IssueReopened` is only ever produced by the direct reopen action; webhook
/// classification cannot distinguish a reopen from a generic update.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventKind {
    IssueCreated,
    IssueClosed,
    IssueReopened,
    IssueUpdated,
}

/// Issue state as reported by the tracker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    Opened,
    Closed,
}

impl IssueState {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueState::Opened => "opened",
            IssueState::Closed => "closed",
        }
    }
}

impl std::fmt::Display for IssueState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Detail-view pushes may carry the state as a small integer code
/// (1 = opened, 0 = closed) instead of the string enum; both forms are
/// accepted and normalized here, at the edge.
impl<'de> Deserialize<'de> for IssueState {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Code(i64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Code(1) => Ok(IssueState::Opened),
            Raw::Code(0) => Ok(IssueState::Closed),
            Raw::Code(code) => Err(serde::de::Error::custom(format!(
                "unknown issue state code: {code}"
            ))),
            Raw::Text(s) => match s.as_str() {
                "opened" | "open" => Ok(IssueState::Opened),
                "closed" | "close" => Ok(IssueState::Closed),
                other => Err(serde::de::Error::custom(format!(
                    "unknown issue state: {other}"
                ))),
            },
        }
    }
}

/// The tracker's view of an issue at the moment an event fired.
///
/// Never cached and later trusted as fresh; the external tracker remains the
/// source of truth.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueSnapshot {
    pub id: u64,
    pub title: String,
    pub state: IssueState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A classified issue event, immutable once constructed.
///
/// Serializes directly to the push-channel wire format.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainEvent {
    #[serde(rename = "event")]
    pub kind: EventKind,
    #[serde(rename = "data")]
    pub issue: IssueSnapshot,
}

impl DomainEvent {
    pub fn new(kind: EventKind, issue: IssueSnapshot) -> Self {
        Self { kind, issue }
    }
}
