//! Keyword-based multi-label tagging.
//!
//! A [`Taxonomy`] maps each tag to the keywords that trigger it. The
//! [`Tagger`] owns an immutable taxonomy and marks a tag present when any of
//! its keywords occurs as a substring of the lower-cased text. There is no
//! tokenization, so short keywords like `"go"` or `"ai"` also match inside
//! longer words.
//!
//! # Example
//!
//! ```rust
//! use second_brain_core::tagger::{Tagger, Taxonomy};
//!
//! let tagger = Tagger::new(Taxonomy::default());
//! let tags = tagger.tags("Rolled out Grafana dashboards for the k3s cluster");
//! assert!(tags.contains("observability"));
//! assert!(tags.contains("kubernetes"));
//! ```

use std::collections::{BTreeMap, BTreeSet};

use anyhow::{bail, Result};

/// Tag → keyword dictionary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Taxonomy {
    entries: BTreeMap<String, Vec<String>>,
}

impl Taxonomy {
    /// Build a taxonomy from `(tag, keywords)` pairs.
    ///
    /// Keywords are lower-cased so matching stays case-insensitive. Tags
    /// with no keywords and empty keywords are rejected since they could
    /// never (or would always) match.
    pub fn from_map(map: BTreeMap<String, Vec<String>>) -> Result<Self> {
        let mut entries = BTreeMap::new();
        for (tag, keywords) in map {
            let tag = tag.trim().to_string();
            if tag.is_empty() {
                bail!("tagger: tag names must not be empty");
            }
            if keywords.is_empty() {
                bail!("tagger: tag '{}' has no keywords", tag);
            }
            let mut lowered = Vec::with_capacity(keywords.len());
            for kw in keywords {
                if kw.trim().is_empty() {
                    bail!("tagger: tag '{}' has an empty keyword", tag);
                }
                lowered.push(kw.to_lowercase());
            }
            entries.insert(tag, lowered);
        }
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl Default for Taxonomy {
    /// The ops/homelab taxonomy.
    fn default() -> Self {
        const DEFAULT: &[(&str, &[&str])] = &[
            (
                "ai",
                &["ai", "llm", "rag", "pgvector", "embedding", "openai", "gemini", "agent", "deepseek"],
            ),
            (
                "observability",
                &["grafana", "loki", "alloy", "opentelemetry", "otel", "metrics", "tracing", "logs", "prometheus"],
            ),
            (
                "kubernetes",
                &["kubernetes", "k3s", "pod", "pvc", "statefulset", "daemonset", "kubectl", "helm", "k8s"],
            ),
            (
                "database",
                &["postgres", "postgresql", "jsonb", "timescaledb", "postgis", "sql", "mongodb", "database", "db"],
            ),
            (
                "devops",
                &["github actions", "gitops", "reconciliation", "ci-cd", "docker", "terraform", "nix", "shell.nix"],
            ),
            (
                "career",
                &[
                    "impostor syndrome", "growth", "senior", "leadership", "reflection", "mentorship",
                    "career", "brag", "win", "impact", "job", "application", "interview", "resume", "cv",
                ],
            ),
            (
                "platform",
                &[
                    "openbao", "tailscale", "security", "infrastructure", "infra", "zero-trust", "secrets",
                    "bao", "cloud", "platform", "homelab",
                ],
            ),
            (
                "cloud",
                &["aws", "azure", "gcp", "digitalocean", "atlas", "cloudflare", "cloud-native", "serverless"],
            ),
            (
                "sre",
                &["incident", "rca", "post-mortem", "outage", "reliability", "slo", "sli", "error budget", "toil"],
            ),
            (
                "language",
                &["go", "golang", "python", "rust", "typescript", "javascript", "bash", "shell"],
            ),
            (
                "linux",
                &["linux", "systemd", "kernel", "gpu", "psu", "hardware", "cpu", "memory", "nixos"],
            ),
            (
                "productivity",
                &["para", "second brain", "zettelkasten", "notion", "obsidian", "journal", "workflow"],
            ),
        ];

        let entries = DEFAULT
            .iter()
            .map(|(tag, kws)| {
                (
                    tag.to_string(),
                    kws.iter().map(|k| k.to_string()).collect(),
                )
            })
            .collect();
        Self { entries }
    }
}

/// Classifies text into zero or more tags.
#[derive(Debug, Clone, Default)]
pub struct Tagger {
    taxonomy: Taxonomy,
}

impl Tagger {
    pub fn new(taxonomy: Taxonomy) -> Self {
        Self { taxonomy }
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    /// Return every tag with at least one keyword found in `text`.
    ///
    /// The result may be empty; callers decide how to label untagged text.
    pub fn tags(&self, text: &str) -> BTreeSet<String> {
        let lower = text.to_lowercase();
        self.taxonomy
            .entries
            .iter()
            .filter(|(_, keywords)| keywords.iter().any(|kw| lower.contains(kw.as_str())))
            .map(|(tag, _)| tag.clone())
            .collect()
    }
}
