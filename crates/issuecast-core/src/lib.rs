//! Issuecast Core Library
//!
//! Domain events, webhook classification, and client-side reconciliation
//! logic for the real-time issue board.

pub mod classify;
pub mod event;
pub mod reconcile;

pub use event::{DomainEvent, EventKind, IssueSnapshot, IssueState};
