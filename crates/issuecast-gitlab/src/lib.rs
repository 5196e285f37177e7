//! GitLab issues REST client.
//!
//! Thin boundary wrapper around the project issues endpoint; nothing here is
//! cached, the tracker stays the source of truth.

mod client;
mod error;

pub use client::{GitLabClient, IssueRecord};
pub use error::GitLabError;
