//! HTTP client for the GitLab project issues endpoint.

use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use issuecast_core::event::{IssueSnapshot, IssueState};

use crate::error::GitLabError;

/// Request timeout for tracker calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// An issue record as returned by the GitLab REST API. Only the fields the
/// board needs are declared.
#[derive(Clone, Debug, Deserialize)]
pub struct IssueRecord {
    pub iid: u64,
    pub title: String,
    pub state: IssueState,
    #[serde(default)]
    pub description: Option<String>,
}

impl IssueRecord {
    pub fn into_snapshot(self) -> IssueSnapshot {
        IssueSnapshot {
            id: self.iid,
            title: self.title,
            state: self.state,
            description: self.description,
        }
    }
}

/// Client for one GitLab project's issues endpoint.
///
/// `api_url` is the full collection URL, e.g.
/// `https://gitlab.example.com/api/v4/projects/123/issues`.
pub struct GitLabClient {
    client: reqwest::Client,
    api_url: String,
    token: String,
}

impl GitLabClient {
    pub fn new(api_url: impl Into<String>, token: impl Into<String>) -> Result<Self, GitLabError> {
        let api_url = api_url.into();
        debug!(api_url = %api_url, "GitLabClient initialized");
        Ok(Self {
            client: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()?,
            api_url,
            token: token.into(),
        })
    }

    fn issue_url(&self, iid: u64) -> String {
        format!("{}/{}", self.api_url, iid)
    }

    /// Fetch all issues of the project.
    pub async fn list_issues(&self) -> Result<Vec<IssueRecord>, GitLabError> {
        let response = self
            .client
            .get(&self.api_url)
            .header("PRIVATE-TOKEN", &self.token)
            .send()
            .await?;
        let response = check_status(response).await?;
        Ok(response.json().await?)
    }

    /// Fetch a single issue by its project-scoped id.
    pub async fn get_issue(&self, iid: u64) -> Result<IssueRecord, GitLabError> {
        let response = self
            .client
            .get(self.issue_url(iid))
            .header("PRIVATE-TOKEN", &self.token)
            .send()
            .await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(GitLabError::NotFound(iid));
        }
        let response = check_status(response).await?;
        Ok(response.json().await?)
    }

    /// Close an issue; returns the updated record.
    pub async fn close_issue(&self, iid: u64) -> Result<IssueRecord, GitLabError> {
        self.state_event(iid, "close").await
    }

    /// Reopen a closed issue; returns the updated record.
    pub async fn reopen_issue(&self, iid: u64) -> Result<IssueRecord, GitLabError> {
        self.state_event(iid, "reopen").await
    }

    async fn state_event(&self, iid: u64, event: &str) -> Result<IssueRecord, GitLabError> {
        debug!(iid, event, "Sending issue state event to GitLab");
        let response = self
            .client
            .put(self.issue_url(iid))
            .header("PRIVATE-TOKEN", &self.token)
            .json(&serde_json::json!({ "state_event": event }))
            .send()
            .await?;
        let response = check_status(response).await?;
        Ok(response.json().await?)
    }

    /// Replace an issue's description; returns the updated record.
    pub async fn update_description(
        &self,
        iid: u64,
        description: &str,
    ) -> Result<IssueRecord, GitLabError> {
        let response = self
            .client
            .put(self.issue_url(iid))
            .header("PRIVATE-TOKEN", &self.token)
            .json(&serde_json::json!({ "description": description }))
            .send()
            .await?;
        let response = check_status(response).await?;
        Ok(response.json().await?)
    }
}

/// Turn any non-2xx response into an API error carrying the body.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, GitLabError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(GitLabError::Api {
        status: status.as_u16(),
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn issue_json(iid: u64, state: &str) -> serde_json::Value {
        serde_json::json!({
            "iid": iid,
            "title": "Bug",
            "state": state,
            "description": "Something broke",
            "author": { "name": "dev" },
        })
    }

    async fn client_for(server: &MockServer) -> GitLabClient {
        GitLabClient::new(format!("{}/issues", server.uri()), "secret-token").unwrap()
    }

    #[tokio::test]
    async fn test_list_issues() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/issues"))
            .and(header("PRIVATE-TOKEN", "secret-token"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([issue_json(1, "opened")])),
            )
            .mount(&server)
            .await;

        let issues = client_for(&server).await.list_issues().await.unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].iid, 1);
        assert_eq!(issues[0].state, IssueState::Opened);
    }

    #[tokio::test]
    async fn test_close_issue_sends_state_event() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/issues/42"))
            .and(body_partial_json(serde_json::json!({ "state_event": "close" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(issue_json(42, "closed")))
            .expect(1)
            .mount(&server)
            .await;

        let record = client_for(&server).await.close_issue(42).await.unwrap();
        assert_eq!(record.state, IssueState::Closed);

        let snapshot = record.into_snapshot();
        assert_eq!(snapshot.id, 42);
    }

    #[tokio::test]
    async fn test_reopen_issue_sends_state_event() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/issues/42"))
            .and(body_partial_json(serde_json::json!({ "state_event": "reopen" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(issue_json(42, "opened")))
            .expect(1)
            .mount(&server)
            .await;

        let record = client_for(&server).await.reopen_issue(42).await.unwrap();
        assert_eq!(record.state, IssueState::Opened);
    }

    #[tokio::test]
    async fn test_non_success_is_an_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/issues/42"))
            .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
            .mount(&server)
            .await;

        let err = client_for(&server).await.close_issue(42).await.unwrap_err();
        match err {
            GitLabError::Api { status, body } => {
                assert_eq!(status, 401);
                assert_eq!(body, "unauthorized");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_missing_issue_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/issues/99"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = client_for(&server).await.get_issue(99).await.unwrap_err();
        assert!(matches!(err, GitLabError::NotFound(99)));
    }
}
