//! Error types for the sync engine.
//!
//! Only failures that abort a run are errors. Per-document and per-thought
//! failures are recorded in the [`SyncReport`](crate::sync::SyncReport)
//! and the run continues.

/// Fatal sync failure.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// The store could not report the latest ingested date.
    #[error("failed to query latest entry date: {0:#}")]
    WatermarkQuery(#[source] anyhow::Error),

    /// The journal index could not be fetched from the source.
    #[error("failed to fetch journal index from {source_name}: {error:#}")]
    SourceIndex {
        source_name: String,
        #[source]
        error: anyhow::Error,
    },
}
