//! Core data models used throughout Second Brain.
//!
//! These types represent the journal entries fetched from the tracker and
//! the atomic thoughts that flow from the atomizer into the store.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::fingerprint::{checksum, estimate_tokens};

/// Watermark used when the store holds no thoughts yet.
pub const EPOCH_WATERMARK: &str = "1970-01-01";

/// Tag assigned when no taxonomy keyword matches a thought.
pub const FALLBACK_TAG: &str = "random";

/// Index entry for a journal issue: its number and ISO-date title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalRef {
    pub id: i64,
    pub title: String,
}

/// A journal entry with its raw markdown body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    pub id: i64,
    pub title: String,
    pub body: String,
}

/// PARA category a thought is filed under.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Project,
    Area,
    #[default]
    Resource,
    Archive,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Project => "project",
            Category::Area => "area",
            Category::Resource => "resource",
            Category::Archive => "archive",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "project" => Ok(Category::Project),
            "area" => Ok(Category::Area),
            "resource" => Ok(Category::Resource),
            "archive" => Ok(Category::Archive),
            other => anyhow::bail!("unknown PARA category: '{}'", other),
        }
    }
}

/// One self-contained idea extracted from a journal entry.
///
/// Built once through [`AtomicThought::new`], which derives the context
/// string, checksum and token estimate. Fields are never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AtomicThought {
    pub date: String,
    pub content: String,
    pub category: Category,
    pub tags: Vec<String>,
    pub context_string: String,
    pub checksum: String,
    pub token_count: i64,
}

impl AtomicThought {
    /// Assemble a thought from its content and tags.
    ///
    /// `tags` is sorted and deduplicated; an empty list becomes
    /// `["random"]`.
    pub fn new(date: &str, content: &str, category: Category, tags: Vec<String>) -> Self {
        let mut tags = tags;
        tags.sort();
        tags.dedup();
        if tags.is_empty() {
            tags.push(FALLBACK_TAG.to_string());
        }

        let context_string = format!(
            "Date: {} | Category: {} | Tags: {} | Content: {}",
            date,
            category,
            tags.join(", "),
            content
        );
        let token_count = estimate_tokens(&context_string);

        Self {
            date: date.to_string(),
            content: content.to_string(),
            category,
            tags,
            checksum: checksum(content),
            context_string,
            token_count,
        }
    }
}

/// Result of an idempotent insert keyed on the thought checksum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    Duplicate,
}

/// Per-category totals used for end-of-run reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryStats {
    pub category: String,
    pub total_count: i64,
    pub latest_entry_date: String,
}
