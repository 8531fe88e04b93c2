use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use serde_json::json;

use crate::error::{GatekeeperError, Result};
use crate::event::RepoSlug;
use crate::github::{is_matching_draft, DraftRelease, GitHubApi};

const API_VERSION: &str = "2022-11-28";

/// GitHub REST client for a single repository.
pub struct RestClient {
    http: Client,
    api_url: String,
    repo: RepoSlug,
}

impl RestClient {
    /// Build a client authenticated with `token`.
    ///
    /// # Arguments
    /// * `api_url` - REST base URL (`https://api.github.com`, or a GHES URL)
    /// * `repo` - Repository the workflows act on
    /// * `token` - Token with `issues`, `pull_requests`, and `contents` scopes
    pub fn new(api_url: &str, repo: RepoSlug, token: &str) -> Result<Self> {
        if token.trim().is_empty() {
            return Err(GatekeeperError::github("GITHUB_TOKEN is not set"));
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| GatekeeperError::github("token contains invalid header characters"))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static(API_VERSION),
        );

        let http = Client::builder()
            .user_agent(concat!("git-gatekeeper/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()?;

        Ok(RestClient {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            repo,
        })
    }

    fn repo_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/{}",
            self.api_url, self.repo.owner, self.repo.name, path
        )
    }

    fn send(&self, request: RequestBuilder, what: &str) -> Result<Response> {
        let response = request.send()?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().unwrap_or_default();
        Err(GatekeeperError::github(format!(
            "{} failed with {}: {}",
            what, status, body
        )))
    }
}

impl GitHubApi for RestClient {
    fn add_labels(&self, pr_number: u64, labels: &[String]) -> Result<()> {
        let url = self.repo_url(&format!("issues/{}/labels", pr_number));
        self.send(
            self.http.post(url).json(&json!({ "labels": labels })),
            "adding labels",
        )?;
        tracing::info!(pr = pr_number, labels = ?labels, "labels added");
        Ok(())
    }

    fn create_comment(&self, pr_number: u64, body: &str) -> Result<()> {
        let url = self.repo_url(&format!("issues/{}/comments", pr_number));
        self.send(
            self.http.post(url).json(&json!({ "body": body })),
            "posting comment",
        )?;
        tracing::info!(pr = pr_number, "comment posted");
        Ok(())
    }

    fn close_pull_request(&self, pr_number: u64) -> Result<()> {
        let url = self.repo_url(&format!("pulls/{}", pr_number));
        self.send(
            self.http.patch(url).json(&json!({ "state": "closed" })),
            "closing pull request",
        )?;
        tracing::info!(pr = pr_number, "pull request closed");
        Ok(())
    }

    fn find_draft_release(&self, draft_tag: &str) -> Result<Option<DraftRelease>> {
        let url = self.repo_url("releases?per_page=100");
        let releases: Vec<DraftRelease> = self
            .send(self.http.get(url), "listing releases")?
            .json()?;
        Ok(releases
            .into_iter()
            .find(|release| is_matching_draft(release, draft_tag)))
    }

    fn publish_release(&self, release_id: u64, tag: &str, title: &str) -> Result<()> {
        let url = self.repo_url(&format!("releases/{}", release_id));
        self.send(
            self.http.patch(url).json(&json!({
                "tag_name": tag,
                "name": title,
                "draft": false,
            })),
            "publishing release",
        )?;
        tracing::info!(release_id, tag, "release published");
        Ok(())
    }
}
