//! Client-side state reconciliation.
//!
//! A viewer learns about an issue through two independent channels: the
//! synchronous response to its own close/reopen action, and the asynchronous
//! broadcast echo of that same action. There is no sequence number tying the
//! two together, so every transition here is an assignment to a target value,
//! never a toggle; applying the same update twice is a no-op.

use tracing::debug;

use crate::event::{DomainEvent, EventKind, IssueSnapshot, IssueState};

/// Which action the detail view currently offers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionControl {
    Close,
    Reopen,
}

/// Reconciled state for a single displayed issue (detail view).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IssueView {
    issue_id: u64,
    displayed_state: IssueState,
}

impl IssueView {
    pub fn new(issue_id: u64, state: IssueState) -> Self {
        Self {
            issue_id,
            displayed_state: state,
        }
    }

    pub fn issue_id(&self) -> u64 {
        self.issue_id
    }

    pub fn displayed_state(&self) -> IssueState {
        self.displayed_state
    }

    /// The action control is derived from the displayed state, so repeated
    /// application of the same state can never swap it twice.
    pub fn action_control(&self) -> ActionControl {
        match self.displayed_state {
            IssueState::Opened => ActionControl::Close,
            IssueState::Closed => ActionControl::Reopen,
        }
    }

    /// Apply the synchronous result of this viewer's own action.
    pub fn apply_sync_result(&mut self, state: IssueState) {
        self.displayed_state = state;
    }

    /// Apply a broadcast event. Events for other issues are ignored.
    pub fn apply_broadcast(&mut self, event: &DomainEvent) {
        if event.issue.id != self.issue_id {
            return;
        }
        self.displayed_state = event.issue.state;
    }
}

/// One row of the list view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IssueRow {
    pub id: u64,
    pub title: String,
    pub state: IssueState,
}

impl From<IssueSnapshot> for IssueRow {
    fn from(snapshot: IssueSnapshot) -> Self {
        Self {
            id: snapshot.id,
            title: snapshot.title,
            state: snapshot.state,
        }
    }
}

/// Reconciled state for the issue list view, newest first.
#[derive(Clone, Debug, Default)]
pub struct IssueList {
    rows: Vec<IssueRow>,
}

impl IssueList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshots(snapshots: impl IntoIterator<Item = IssueSnapshot>) -> Self {
        Self {
            rows: snapshots.into_iter().map(IssueRow::from).collect(),
        }
    }

    pub fn rows(&self) -> &[IssueRow] {
        &self.rows
    }

    /// Route a broadcast event to the matching row by issue id.
    ///
    /// Creations for unknown ids are prepended; updates to known ids assign
    /// the new state; updates to issues not shown are dropped. A row is never
    /// duplicated. Returns whether anything visible changed.
    pub fn apply_broadcast(&mut self, event: &DomainEvent) -> bool {
        if let Some(row) = self.rows.iter_mut().find(|r| r.id == event.issue.id) {
            let changed = row.state != event.issue.state;
            row.state = event.issue.state;
            return changed;
        }

        match event.kind {
            EventKind::IssueCreated => {
                self.rows.insert(0, IssueRow::from(event.issue.clone()));
                true
            }
            _ => {
                debug!(issue_id = event.issue.id, "Dropping event for issue not shown");
                false
            }
        }
    }
}
