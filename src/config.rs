//! Configuration parsing and validation.
//!
//! Second Brain is configured through a TOML file passed with `--config`.
//!
//! ```toml
//! [db]
//! path = "./data/brain.sqlite"
//!
//! [journal]
//! repo = "owner/journal"
//! label = "journal"
//! limit = 50
//! source = "gh"          # "gh" (GitHub CLI) or "api" (GitHub REST API)
//! timeout_secs = 30
//!
//! [github]
//! api_url = "https://api.github.com"
//! token_env = "GITHUB_TOKEN"
//!
//! [tagger.keywords]
//! rust = ["rust", "cargo", "clippy"]
//! ```
//!
//! Only `[db]` is required. `journal.repo` can also come from `--repo` or
//! the `JOURNAL_REPO` environment variable, which take precedence.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use second_brain_core::tagger::Taxonomy;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub db: DbConfig,
    #[serde(default)]
    pub journal: JournalConfig,
    #[serde(default)]
    pub github: GithubConfig,
    #[serde(default)]
    pub tagger: TaggerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
    #[serde(default = "default_db_timeout_secs")]
    pub acquire_timeout_secs: u64,
}

fn default_db_timeout_secs() -> u64 {
    10
}

/// Which transport fetches journals from GitHub.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[default]
    Gh,
    Api,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JournalConfig {
    #[serde(default)]
    pub repo: Option<String>,
    #[serde(default = "default_label")]
    pub label: String,
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub source: SourceKind,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_gh_path")]
    pub gh_path: PathBuf,
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            repo: None,
            label: default_label(),
            limit: default_limit(),
            source: SourceKind::default(),
            timeout_secs: default_timeout_secs(),
            gh_path: default_gh_path(),
        }
    }
}

fn default_label() -> String {
    "journal".to_string()
}
fn default_limit() -> usize {
    50
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_gh_path() -> PathBuf {
    PathBuf::from("gh")
}

#[derive(Debug, Deserialize, Clone)]
pub struct GithubConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_token_env")]
    pub token_env: String,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            token_env: default_token_env(),
        }
    }
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}
fn default_token_env() -> String {
    "GITHUB_TOKEN".to_string()
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct TaggerConfig {
    /// Replaces the built-in taxonomy when present.
    #[serde(default)]
    pub keywords: Option<BTreeMap<String, Vec<String>>>,
}

impl TaggerConfig {
    pub fn taxonomy(&self) -> Result<Taxonomy> {
        match &self.keywords {
            Some(map) => Taxonomy::from_map(map.clone()),
            None => Ok(Taxonomy::default()),
        }
    }
}

impl Config {
    /// Config with only a database path, for commands that never touch
    /// the tracker (e.g. `brain atomize`).
    pub fn minimal() -> Self {
        Self {
            db: DbConfig {
                path: PathBuf::from("./data/brain.sqlite"),
                acquire_timeout_secs: default_db_timeout_secs(),
            },
            journal: JournalConfig::default(),
            github: GithubConfig::default(),
            tagger: TaggerConfig::default(),
        }
    }

    /// Resolve the journal repository, preferring an explicit override.
    pub fn journal_repo(&self, override_repo: Option<&str>) -> Result<String> {
        let repo = override_repo
            .map(str::to_string)
            .or_else(|| self.journal.repo.clone())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "journal repository not set: use --repo, JOURNAL_REPO, or journal.repo in the config"
                )
            })?;
        validate_repo(&repo)?;
        Ok(repo)
    }
}

fn validate_repo(repo: &str) -> Result<()> {
    let mut parts = repo.split('/');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty() => Ok(()),
        _ => bail!("journal repository must look like 'owner/name', got '{}'", repo),
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_config(&content)
}

pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).with_context(|| "Failed to parse config file")?;

    if !(1..=100).contains(&config.journal.limit) {
        bail!("journal.limit must be between 1 and 100");
    }
    if config.journal.label.trim().is_empty() {
        bail!("journal.label must not be empty");
    }
    if config.journal.timeout_secs == 0 {
        bail!("journal.timeout_secs must be > 0");
    }
    if config.db.acquire_timeout_secs == 0 {
        bail!("db.acquire_timeout_secs must be > 0");
    }
    if let Some(repo) = &config.journal.repo {
        validate_repo(repo)?;
    }
    config
        .tagger
        .taxonomy()
        .with_context(|| "Invalid [tagger.keywords] table")?;

    Ok(config)
}
