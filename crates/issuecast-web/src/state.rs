//! Application state.

use std::sync::Arc;

use issuecast_gitlab::GitLabClient;

use crate::hub::BroadcastHub;

/// State shared across handlers. The hub and tracker client are injected
/// here, so their lifecycle is the router's lifecycle.
#[derive(Clone)]
pub struct AppState {
    pub hub: Arc<BroadcastHub>,
    pub gitlab: Arc<GitLabClient>,
    pub webhook_secret: String,
}

impl AppState {
    pub fn new(gitlab: Arc<GitLabClient>, webhook_secret: impl Into<String>) -> Self {
        Self {
            hub: Arc::new(BroadcastHub::new()),
            gitlab,
            webhook_secret: webhook_secret.into(),
        }
    }
}
