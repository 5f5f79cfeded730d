//! GitHub REST API journal source.
//!
//! Alternative to the `gh` CLI for hosts where it is not installed. Uses
//! two endpoints:
//!
//! - `GET /repos/{repo}/issues?labels=…&state=all&per_page=N&sort=created&direction=desc`
//! - `GET /repos/{repo}/issues/{number}`
//!
//! The issues endpoint also returns pull requests; those are filtered out.
//!
//! # Environment Variables
//!
//! The token is read from the variable named by `github.token_env`
//! (default `GITHUB_TOKEN`). It is optional for public repositories.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use second_brain_core::models::JournalRef;
use second_brain_core::source::JournalSource;

use crate::config::Config;

const USER_AGENT: &str = concat!("second-brain/", env!("CARGO_PKG_VERSION"));

/// Journal source backed by the GitHub REST API.
pub struct GithubApiSource {
    client: reqwest::Client,
    api_url: String,
    repo: String,
    label: String,
    limit: usize,
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiIssue {
    number: i64,
    title: String,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    pull_request: Option<serde_json::Value>,
}

impl GithubApiSource {
    pub fn new(config: &Config, repo: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.journal.timeout_secs))
            .user_agent(USER_AGENT)
            .build()?;

        let token = std::env::var(&config.github.token_env)
            .ok()
            .filter(|t| !t.trim().is_empty());

        Ok(Self {
            client,
            api_url: config.github.api_url.trim_end_matches('/').to_string(),
            repo: repo.to_string(),
            label: config.journal.label.clone(),
            limit: config.journal.limit,
            token,
        })
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    async fn get(&self, url: &str, query: &[(&str, String)]) -> Result<reqwest::Response> {
        let mut req = self
            .client
            .get(url)
            .query(query)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28");
        debug!(%url, "GitHub API request");
        if let Some(token) = &self.token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }

        let response = req
            .send()
            .await
            .with_context(|| format!("GET {} failed", url))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            bail!("GitHub API error {} for {}: {}", status, url, body_text.trim());
        }
        Ok(response)
    }
}

#[async_trait]
impl JournalSource for GithubApiSource {
    fn describe(&self) -> String {
        format!("api:{}", self.repo)
    }

    async fn fetch_recent_journals(&self) -> Result<Vec<JournalRef>> {
        let url = format!("{}/repos/{}/issues", self.api_url, self.repo);
        let query = [
            ("labels", self.label.clone()),
            ("state", "all".to_string()),
            ("per_page", self.limit.to_string()),
            ("sort", "created".to_string()),
            ("direction", "desc".to_string()),
        ];
        let issues: Vec<ApiIssue> = self
            .get(&url, &query)
            .await?
            .json()
            .await
            .context("Failed to decode issue list")?;
        Ok(issues_to_refs(issues))
    }

    async fn fetch_body(&self, id: i64) -> Result<String> {
        let url = format!("{}/repos/{}/issues/{}", self.api_url, self.repo, id);
        let issue: ApiIssue = self
            .get(&url, &[])
            .await?
            .json()
            .await
            .with_context(|| format!("Failed to decode issue #{}", id))?;
        Ok(issue.body.unwrap_or_default())
    }
}

fn issues_to_refs(issues: Vec<ApiIssue>) -> Vec<JournalRef> {
    issues
        .into_iter()
        .filter(|i| i.pull_request.is_none())
        .map(|i| JournalRef {
            id: i.number,
            title: i.title.trim().to_string(),
        })
        .collect()
}
