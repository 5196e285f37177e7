//! GitLab client errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GitLabError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("GitLab API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Issue not found: {0}")]
    NotFound(u64),
}
