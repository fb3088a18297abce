use std::time::Duration;

use diffscribe_core::{DiffscribeError, GitHubConfig};

const DIFF_MEDIA_TYPE: &str = "application/vnd.github.v3.diff";
const JSON_MEDIA_TYPE: &str = "application/vnd.github.v3+json";

/// GitHub REST client for fetching comparison diffs and posting PR comments.
///
/// Authenticates with the classic `Authorization: token <token>` scheme.
///
/// # Examples
///
/// ```
/// use diffscribe_core::GitHubConfig;
/// use diffscribe_review::github::GitHubClient;
///
/// let client = GitHubClient::new(&GitHubConfig::default(), "ghp_xxxx", None).unwrap();
/// assert_eq!(
///     client.compare_url("octocat/hello", "abc", "def"),
///     "https://api.github.com/repos/octocat/hello/compare/abc...def"
/// );
/// ```
pub struct GitHubClient {
    http: reqwest::Client,
    api_url: String,
    user_agent: String,
    token: String,
}

impl GitHubClient {
    /// Create a client for the configured API root.
    ///
    /// # Errors
    ///
    /// Returns [`DiffscribeError::Config`] if the HTTP client cannot be built.
    pub fn new(
        config: &GitHubConfig,
        token: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, DiffscribeError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| DiffscribeError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            http,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            user_agent: config.user_agent.clone(),
            token: token.into(),
        })
    }

    /// URL of the compare endpoint for `base...head`.
    pub fn compare_url(&self, repo: &str, base: &str, head: &str) -> String {
        format!("{}/repos/{repo}/compare/{base}...{head}", self.api_url)
    }

    /// URL of the issue comments collection for a pull request.
    pub fn comments_url(&self, repo: &str, pr_number: &str) -> String {
        format!("{}/repos/{repo}/issues/{pr_number}/comments", self.api_url)
    }

    /// Fetch the unified diff between two commits.
    ///
    /// # Errors
    ///
    /// Returns [`DiffscribeError::GitHub`] on network errors or a non-2xx status.
    pub async fn compare_diff(
        &self,
        repo: &str,
        base: &str,
        head: &str,
    ) -> Result<String, DiffscribeError> {
        let url = self.compare_url(repo, base, head);

        let response = self
            .http
            .get(&url)
            .header("Authorization", format!("token {}", self.token))
            .header("Accept", DIFF_MEDIA_TYPE)
            .header("User-Agent", &self.user_agent)
            .send()
            .await
            .map_err(|e| DiffscribeError::GitHub(format!("failed to fetch diff: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DiffscribeError::GitHub(format!(
                "compare {base}...{head} failed with {status}: {body}"
            )));
        }

        response
            .text()
            .await
            .map_err(|e| DiffscribeError::GitHub(format!("failed to read diff response: {e}")))
    }

    /// Post a Markdown comment on a pull request's conversation.
    ///
    /// # Errors
    ///
    /// Returns [`DiffscribeError::GitHub`] on network errors or a non-2xx status.
    pub async fn post_issue_comment(
        &self,
        repo: &str,
        pr_number: &str,
        body: &str,
    ) -> Result<(), DiffscribeError> {
        let url = self.comments_url(repo, pr_number);

        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("token {}", self.token))
            .header("Accept", JSON_MEDIA_TYPE)
            .header("User-Agent", &self.user_agent)
            .json(&serde_json::json!({ "body": body }))
            .send()
            .await
            .map_err(|e| DiffscribeError::GitHub(format!("failed to post comment: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DiffscribeError::GitHub(format!(
                "posting comment to #{pr_number} failed with {status}: {body}"
            )));
        }

        Ok(())
    }
}
