//! Journal source abstraction.
//!
//! A [`JournalSource`] lists the recent journal issues of a tracker and
//! fetches the markdown body of one of them. The application crate provides
//! the `gh` CLI and GitHub REST implementations.

use anyhow::Result;
use async_trait::async_trait;

use crate::models::JournalRef;

#[async_trait]
pub trait JournalSource: Send + Sync {
    /// Short label for logs and `brain sources` output (e.g. `"gh:owner/repo"`).
    fn describe(&self) -> String;

    /// Most recent journal issues carrying the journal label, newest first.
    ///
    /// The list is bounded by the source's configured limit and spans both
    /// open and closed issues.
    async fn fetch_recent_journals(&self) -> Result<Vec<JournalRef>>;

    /// Raw markdown body of issue `id`.
    async fn fetch_body(&self, id: i64) -> Result<String>;
}
