//! Storage abstraction for Second Brain.
//!
//! The [`ThoughtStore`] trait covers everything the sync engine needs from
//! persistence: the watermark query, idempotent inserts keyed on the thought
//! checksum, and per-category statistics for reporting. The SQLite backend
//! lives in the application crate; [`memory::InMemoryStore`] backs tests.

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{AtomicThought, CategoryStats, InsertOutcome};

/// Abstract storage backend for atomic thoughts.
///
/// # Operations
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`latest_entry_date`](ThoughtStore::latest_entry_date) | Watermark for delta selection |
/// | [`insert_thought`](ThoughtStore::insert_thought) | Idempotent insert on checksum |
/// | [`stats`](ThoughtStore::stats) | Per-category totals |
/// | [`count`](ThoughtStore::count) | Total stored thoughts |
#[async_trait]
pub trait ThoughtStore: Send + Sync {
    /// Latest `entry_date` already stored, or `"1970-01-01"` when empty.
    async fn latest_entry_date(&self) -> Result<String>;

    /// Insert a thought unless one with the same checksum exists.
    ///
    /// A checksum conflict is reported as [`InsertOutcome::Duplicate`],
    /// never as an error.
    async fn insert_thought(&self, thought: &AtomicThought) -> Result<InsertOutcome>;

    /// Totals and latest entry date per PARA category.
    async fn stats(&self) -> Result<Vec<CategoryStats>>;

    /// Number of stored thoughts.
    async fn count(&self) -> Result<i64>;
}
