//! Incremental journal sync.
//!
//! A run walks through a fixed sequence of stages:
//!
//! ```text
//! ResolveWatermark ─▶ FetchIndex ─▶ SelectDelta ─▶ IngestOne* ─▶ Report
//!        │                 │
//!        └── fatal ────────┴──▶ SyncError
//! ```
//!
//! The watermark is the latest `entry_date` in the store, read once before
//! anything is fetched. Only journals titled after it are ingested, oldest
//! first, one at a time. A document whose body cannot be fetched is skipped
//! and a thought that fails to persist is counted and dropped; neither
//! aborts the run. Re-running is always safe because inserts are idempotent
//! on the thought checksum.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::atomize::Atomizer;
use crate::delta::select_delta;
use crate::error::SyncError;
use crate::models::{CategoryStats, InsertOutcome, SourceDocument, EPOCH_WATERMARK};
use crate::source::JournalSource;
use crate::store::ThoughtStore;

/// Knobs for a single sync run.
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// Ignore the stored watermark and consider every listed journal.
    pub full: bool,
    /// Atomize but do not write anything to the store.
    pub dry_run: bool,
    /// Process at most this many of the selected journals (oldest first).
    pub limit: Option<usize>,
}

/// A journal that was selected but could not be ingested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedDocument {
    pub id: i64,
    pub title: String,
    pub reason: String,
}

/// Outcome of a sync run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncReport {
    pub watermark: String,
    pub documents_listed: usize,
    pub documents_selected: usize,
    pub documents_ingested: usize,
    pub skipped_documents: Vec<SkippedDocument>,
    pub thoughts_extracted: usize,
    pub thoughts_inserted: usize,
    pub thoughts_duplicate: usize,
    pub thoughts_failed: usize,
    pub dry_run: bool,
    pub stats: Option<Vec<CategoryStats>>,
}

impl SyncReport {
    pub fn is_up_to_date(&self) -> bool {
        self.documents_selected == 0
    }
}

/// Read the watermark from the store.
pub async fn resolve_watermark(store: &dyn ThoughtStore) -> Result<String, SyncError> {
    store
        .latest_entry_date()
        .await
        .map_err(SyncError::WatermarkQuery)
}

/// Run one incremental sync from `source` into `store`.
pub async fn run_sync(
    source: &dyn JournalSource,
    store: &dyn ThoughtStore,
    atomizer: &Atomizer,
    options: &SyncOptions,
) -> Result<SyncReport, SyncError> {
    let watermark = if options.full {
        EPOCH_WATERMARK.to_string()
    } else {
        resolve_watermark(store).await?
    };
    info!(%watermark, full = options.full, "resolved watermark");

    let source_name = source.describe();
    let journals = source
        .fetch_recent_journals()
        .await
        .map_err(|error| SyncError::SourceIndex {
            source_name: source_name.clone(),
            error,
        })?;
    info!(source = %source_name, count = journals.len(), "fetched journal index");

    let documents_listed = journals.len();
    let mut selected = select_delta(journals, &watermark);
    if let Some(limit) = options.limit {
        selected.truncate(limit);
    }

    let mut report = SyncReport {
        watermark,
        documents_listed,
        documents_selected: selected.len(),
        dry_run: options.dry_run,
        ..SyncReport::default()
    };

    if selected.is_empty() {
        info!("already up to date");
        report.stats = collect_stats(store).await;
        return Ok(report);
    }

    for journal in selected {
        info!(id = journal.id, title = %journal.title, "ingesting journal");

        let body = match source.fetch_body(journal.id).await {
            Ok(body) => body,
            Err(e) => {
                warn!(id = journal.id, title = %journal.title, error = %format!("{:#}", e), "failed to fetch journal body, skipping");
                report.skipped_documents.push(SkippedDocument {
                    id: journal.id,
                    title: journal.title,
                    reason: format!("{:#}", e),
                });
                continue;
            }
        };

        let doc = SourceDocument {
            id: journal.id,
            title: journal.title,
            body,
        };
        ingest_document(&doc, store, atomizer, options.dry_run, &mut report).await;
        report.documents_ingested += 1;
    }

    report.stats = collect_stats(store).await;
    Ok(report)
}

async fn ingest_document(
    doc: &SourceDocument,
    store: &dyn ThoughtStore,
    atomizer: &Atomizer,
    dry_run: bool,
    report: &mut SyncReport,
) {
    let thoughts = atomizer.atomize(&doc.title, &doc.body);
    debug!(id = doc.id, thoughts = thoughts.len(), "atomized journal");
    report.thoughts_extracted += thoughts.len();

    if dry_run {
        return;
    }

    for thought in &thoughts {
        match store.insert_thought(thought).await {
            Ok(InsertOutcome::Inserted) => report.thoughts_inserted += 1,
            Ok(InsertOutcome::Duplicate) => {
                debug!(checksum = %thought.checksum, "thought already stored");
                report.thoughts_duplicate += 1;
            }
            Err(e) => {
                warn!(
                    id = doc.id,
                    checksum = %thought.checksum,
                    error = %format!("{:#}", e),
                    "failed to persist thought, skipping"
                );
                report.thoughts_failed += 1;
            }
        }
    }
}

async fn collect_stats(store: &dyn ThoughtStore) -> Option<Vec<CategoryStats>> {
    match store.stats().await {
        Ok(stats) => Some(stats),
        Err(e) => {
            warn!(error = %format!("{:#}", e), "could not fetch category stats");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use anyhow::{anyhow, bail, Result};
    use async_trait::async_trait;

    use super::*;
    use crate::models::{AtomicThought, JournalRef};
    use crate::store::memory::InMemoryStore;

    struct FakeSource {
        index: Result<Vec<JournalRef>, String>,
        bodies: HashMap<i64, String>,
        fetched: Mutex<Vec<i64>>,
    }

    impl FakeSource {
        fn new(entries: &[(i64, &str, &str)]) -> Self {
            Self {
                index: Ok(entries
                    .iter()
                    .map(|(id, title, _)| JournalRef {
                        id: *id,
                        title: title.to_string(),
                    })
                    .collect()),
                bodies: entries
                    .iter()
                    .map(|(id, _, body)| (*id, body.to_string()))
                    .collect(),
                fetched: Mutex::new(Vec::new()),
            }
        }

        fn failing_index() -> Self {
            Self {
                index: Err("gh: not logged in".to_string()),
                bodies: HashMap::new(),
                fetched: Mutex::new(Vec::new()),
            }
        }

        fn fetched(&self) -> Vec<i64> {
            self.fetched.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl JournalSource for FakeSource {
        fn describe(&self) -> String {
            "fake".to_string()
        }

        async fn fetch_recent_journals(&self) -> Result<Vec<JournalRef>> {
            self.index.clone().map_err(|e| anyhow!(e))
        }

        async fn fetch_body(&self, id: i64) -> Result<String> {
            self.fetched.lock().unwrap().push(id);
            match self.bodies.get(&id) {
                Some(body) => Ok(body.clone()),
                None => bail!("issue {} not found", id),
            }
        }
    }

    /// Store that fails on demand, wrapping an in-memory store.
    #[derive(Default)]
    struct FlakyStore {
        inner: InMemoryStore,
        fail_watermark: bool,
        fail_content: Option<String>,
        fail_stats: bool,
    }

    #[async_trait]
    impl ThoughtStore for FlakyStore {
        async fn latest_entry_date(&self) -> Result<String> {
            if self.fail_watermark {
                bail!("connection refused");
            }
            self.inner.latest_entry_date().await
        }

        async fn insert_thought(&self, thought: &AtomicThought) -> Result<InsertOutcome> {
            if self.fail_content.as_deref() == Some(thought.content.as_str()) {
                bail!("connection reset");
            }
            self.inner.insert_thought(thought).await
        }

        async fn stats(&self) -> Result<Vec<CategoryStats>> {
            if self.fail_stats {
                bail!("view missing");
            }
            self.inner.stats().await
        }

        async fn count(&self) -> Result<i64> {
            self.inner.count().await
        }
    }

    async fn seed(store: &dyn ThoughtStore, date: &str) {
        let t = AtomicThought::new(date, &format!("seed {}", date), crate::models::Category::Resource, vec![]);
        store.insert_thought(&t).await.unwrap();
    }

    #[tokio::test]
    async fn test_ingests_only_newer_journals_oldest_first() {
        let store = InMemoryStore::new();
        seed(&store, "2026-02-18").await;
        let source = FakeSource::new(&[
            (3, "2026-02-20", "## Thought\n- third"),
            (2, "2026-02-19", "## Thought\n- second"),
            (1, "2026-02-17", "## Thought\n- first"),
        ]);

        let report = run_sync(&source, &store, &Atomizer::default(), &SyncOptions::default())
            .await
            .unwrap();

        assert_eq!(report.watermark, "2026-02-18");
        assert_eq!(report.documents_listed, 3);
        assert_eq!(report.documents_selected, 2);
        assert_eq!(report.documents_ingested, 2);
        assert_eq!(report.thoughts_inserted, 2);
        assert_eq!(source.fetched(), vec![2, 3]);

        let dates: Vec<String> = store.thoughts().unwrap().into_iter().skip(1).map(|t| t.date).collect();
        assert_eq!(dates, vec!["2026-02-19", "2026-02-20"]);
    }

    #[tokio::test]
    async fn test_up_to_date_short_circuits() {
        let store = InMemoryStore::new();
        seed(&store, "2026-02-19").await;
        let source = FakeSource::new(&[(1, "2026-02-18", "## Thought\n- old")]);

        let report = run_sync(&source, &store, &Atomizer::default(), &SyncOptions::default())
            .await
            .unwrap();

        assert!(report.is_up_to_date());
        assert_eq!(report.thoughts_extracted, 0);
        assert!(source.fetched().is_empty());
        assert!(report.stats.is_some());
    }

    #[tokio::test]
    async fn test_watermark_failure_is_fatal() {
        let store = FlakyStore {
            fail_watermark: true,
            ..FlakyStore::default()
        };
        let source = FakeSource::new(&[(1, "2026-02-18", "## Thought\n- x")]);

        let err = run_sync(&source, &store, &Atomizer::default(), &SyncOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, SyncError::WatermarkQuery(_)));
        assert!(source.fetched().is_empty());
    }

    #[tokio::test]
    async fn test_index_failure_is_fatal() {
        let store = InMemoryStore::new();
        let source = FakeSource::failing_index();

        let err = run_sync(&source, &store, &Atomizer::default(), &SyncOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, SyncError::SourceIndex { .. }));
        assert!(err.to_string().contains("not logged in"));
    }

    #[tokio::test]
    async fn test_body_failure_skips_document_only() {
        let store = InMemoryStore::new();
        let mut source = FakeSource::new(&[
            (1, "2026-02-01", "## Thought\n- kept one"),
            (2, "2026-02-02", ""),
            (3, "2026-02-03", "## Thought\n- kept three"),
        ]);
        source.bodies.remove(&2);

        let report = run_sync(&source, &store, &Atomizer::default(), &SyncOptions::default())
            .await
            .unwrap();

        assert_eq!(report.documents_ingested, 2);
        assert_eq!(report.skipped_documents.len(), 1);
        assert_eq!(report.skipped_documents[0].id, 2);
        assert!(report.skipped_documents[0].reason.contains("not found"));
        assert_eq!(report.thoughts_inserted, 2);
    }

    #[tokio::test]
    async fn test_persist_failure_skips_thought_only() {
        let store = FlakyStore {
            fail_content: Some("broken".to_string()),
            ..FlakyStore::default()
        };
        let source = FakeSource::new(&[(1, "2026-02-01", "## Thought\n- fine\n- broken\n- also fine")]);

        let report = run_sync(&source, &store, &Atomizer::default(), &SyncOptions::default())
            .await
            .unwrap();

        assert_eq!(report.thoughts_extracted, 3);
        assert_eq!(report.thoughts_inserted, 2);
        assert_eq!(report.thoughts_failed, 1);
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_rerun_is_idempotent() {
        let store = InMemoryStore::new();
        let source = FakeSource::new(&[(1, "2026-02-01", "## Project\n- a\n- b\n## Area\n- c")]);
        let options = SyncOptions {
            full: true,
            ..SyncOptions::default()
        };

        let first = run_sync(&source, &store, &Atomizer::default(), &options).await.unwrap();
        let checksums_before: Vec<String> = store.thoughts().unwrap().into_iter().map(|t| t.checksum).collect();
        let second = run_sync(&source, &store, &Atomizer::default(), &options).await.unwrap();
        let checksums_after: Vec<String> = store.thoughts().unwrap().into_iter().map(|t| t.checksum).collect();

        assert_eq!(first.thoughts_inserted, 3);
        assert_eq!(second.thoughts_inserted, 0);
        assert_eq!(second.thoughts_duplicate, 3);
        assert_eq!(checksums_before, checksums_after);
    }

    #[tokio::test]
    async fn test_dry_run_writes_nothing() {
        let store = InMemoryStore::new();
        let source = FakeSource::new(&[(1, "2026-02-01", "## Thought\n- a\n- b")]);
        let options = SyncOptions {
            dry_run: true,
            ..SyncOptions::default()
        };

        let report = run_sync(&source, &store, &Atomizer::default(), &options).await.unwrap();

        assert!(report.dry_run);
        assert_eq!(report.thoughts_extracted, 2);
        assert_eq!(report.thoughts_inserted, 0);
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_limit_keeps_oldest() {
        let store = InMemoryStore::new();
        let source = FakeSource::new(&[
            (3, "2026-02-03", "## Thought\n- c"),
            (2, "2026-02-02", "## Thought\n- b"),
            (1, "2026-02-01", "## Thought\n- a"),
        ]);
        let options = SyncOptions {
            limit: Some(2),
            ..SyncOptions::default()
        };

        let report = run_sync(&source, &store, &Atomizer::default(), &options).await.unwrap();

        assert_eq!(report.documents_selected, 2);
        assert_eq!(source.fetched(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_stats_failure_is_not_fatal() {
        let store = FlakyStore {
            fail_stats: true,
            ..FlakyStore::default()
        };
        let source = FakeSource::new(&[(1, "2026-02-01", "## Thought\n- a")]);

        let report = run_sync(&source, &store, &Atomizer::default(), &SyncOptions::default())
            .await
            .unwrap();

        assert_eq!(report.thoughts_inserted, 1);
        assert!(report.stats.is_none());
    }
}
