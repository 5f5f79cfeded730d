//! GitHub CLI journal source.
//!
//! Shells out to an authenticated `gh` binary:
//!
//! ```bash
//! gh issue list --repo OWNER/REPO --label journal --state all --limit 50 --json number,title
//! gh issue view 42 --repo OWNER/REPO --json body --jq .body
//! ```
//!
//! Each invocation runs under `journal.timeout_secs`; a timeout is reported
//! like any other command failure. The child is killed when the timeout
//! drops it.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;
use tracing::debug;

use second_brain_core::models::JournalRef;
use second_brain_core::source::JournalSource;

use crate::config::Config;

/// Journal source backed by the `gh` CLI.
pub struct GhCliSource {
    gh_path: PathBuf,
    repo: String,
    label: String,
    limit: usize,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct GhIssue {
    number: i64,
    title: String,
}

impl GhCliSource {
    pub fn new(config: &Config, repo: &str) -> Self {
        Self {
            gh_path: config.journal.gh_path.clone(),
            repo: repo.to_string(),
            label: config.journal.label.clone(),
            limit: config.journal.limit,
            timeout: Duration::from_secs(config.journal.timeout_secs),
        }
    }

    /// Run `gh --version`, returning the first line of its output.
    pub async fn version(&self) -> Result<String> {
        let out = self.run(&["--version"]).await?;
        Ok(out.lines().next().unwrap_or_default().trim().to_string())
    }

    async fn run(&self, args: &[&str]) -> Result<String> {
        debug!(gh = %self.gh_path.display(), args = %args.join(" "), "running gh");
        let child = Command::new(&self.gh_path)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("Failed to run {}", self.gh_path.display()))?;

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .with_context(|| {
                format!(
                    "{} {} timed out after {}s",
                    self.gh_path.display(),
                    args.first().unwrap_or(&""),
                    self.timeout.as_secs()
                )
            })??;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "{} {} failed ({}): {}",
                self.gh_path.display(),
                args.join(" "),
                output.status,
                stderr.trim()
            );
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl JournalSource for GhCliSource {
    fn describe(&self) -> String {
        format!("gh:{}", self.repo)
    }

    async fn fetch_recent_journals(&self) -> Result<Vec<JournalRef>> {
        let limit = self.limit.to_string();
        let out = self
            .run(&[
                "issue", "list", "--repo", &self.repo, "--label", &self.label, "--state", "all",
                "--limit", &limit, "--json", "number,title",
            ])
            .await?;
        parse_issue_list(&out)
    }

    async fn fetch_body(&self, id: i64) -> Result<String> {
        let number = id.to_string();
        self.run(&[
            "issue", "view", &number, "--repo", &self.repo, "--json", "body", "--jq", ".body",
        ])
        .await
    }
}

fn parse_issue_list(json: &str) -> Result<Vec<JournalRef>> {
    let issues: Vec<GhIssue> =
        serde_json::from_str(json).context("Failed to parse gh issue list output")?;
    Ok(issues
        .into_iter()
        .map(|i| JournalRef {
            id: i.number,
            title: i.title.trim().to_string(),
        })
        .collect())
}
