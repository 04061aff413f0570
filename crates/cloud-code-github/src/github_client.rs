use async_trait::async_trait;
use serde::Serialize;
use serde_json::json;

/// Thin GitHub REST client for the two write operations the orchestrator
/// hooks need: opening a pull request and posting an issue/PR comment.
///
/// Authenticates with a single personal-access or installation token passed
/// at construction, not a full GitHub App JWT exchange — narrower than the
/// reference implementation's app-auth flow, noted as a deliberate
/// simplification.
#[async_trait]
pub trait GithubClient: Send + Sync {
    async fn create_pull_request(
        &self,
        owner: &str,
        repo: &str,
        request: NewPullRequest<'_>,
    ) -> Result<u64, reqwest::Error>;

    async fn post_comment(
        &self,
        owner: &str,
        repo: &str,
        issue_number: u64,
        body: &str,
    ) -> Result<(), reqwest::Error>;
}

/// Parameters for opening a new pull request.
pub struct NewPullRequest<'a> {
    pub title: &'a str,
    pub head: &'a str,
    pub base: &'a str,
    pub body: &'a str,
}

#[derive(Serialize)]
struct CreatePullRequestBody<'a> {
    title: &'a str,
    head: &'a str,
    base: &'a str,
    body: &'a str,
}

/// `reqwest`-backed implementation of [`GithubClient`] against the real
/// GitHub REST API.
pub struct RestGithubClient {
    http: reqwest::Client,
    token: String,
    api_base: String,
}

impl RestGithubClient {
    /// Builds a client authenticating every request with `token` as a
    /// bearer credential.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            token: token.into(),
            api_base: "https://api.github.com".to_string(),
        }
    }

    /// Overrides the API base URL, for pointing tests at a mock server.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }
}

#[async_trait]
impl GithubClient for RestGithubClient {
    async fn create_pull_request(
        &self,
        owner: &str,
        repo: &str,
        request: NewPullRequest<'_>,
    ) -> Result<u64, reqwest::Error> {
        let url = format!("{}/repos/{owner}/{repo}/pulls", self.api_base);
        let body = CreatePullRequestBody {
            title: request.title,
            head: request.head,
            base: request.base,
            body: request.body,
        };

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.token)
            .header("User-Agent", "cloud-code")
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let payload: serde_json::Value = response.json().await?;
        Ok(payload["number"].as_u64().unwrap_or_default())
    }

    async fn post_comment(
        &self,
        owner: &str,
        repo: &str,
        issue_number: u64,
        body: &str,
    ) -> Result<(), reqwest::Error> {
        let url = format!("{}/repos/{owner}/{repo}/issues/{issue_number}/comments", self.api_base);
        self.http
            .post(url)
            .bearer_auth(&self.token)
            .header("User-Agent", "cloud-code")
            .json(&json!({ "body": body }))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
