//! In-memory [`ThoughtStore`] implementation for tests and dry runs.
//!
//! Rows live in a `Vec` behind `std::sync::RwLock`; a checksum index gives
//! the same conflict semantics as the unique constraint of the SQL schema.

use std::collections::{BTreeMap, HashSet};
use std::sync::RwLock;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::models::{AtomicThought, CategoryStats, InsertOutcome, EPOCH_WATERMARK};

use super::ThoughtStore;

#[derive(Default)]
struct Inner {
    rows: Vec<AtomicThought>,
    checksums: HashSet<String>,
}

/// In-memory store.
pub struct InMemoryStore {
    inner: RwLock<Inner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
        }
    }

    /// Snapshot of all stored thoughts in insertion order.
    pub fn thoughts(&self) -> Result<Vec<AtomicThought>> {
        let inner = self.inner.read().map_err(|_| anyhow!("store lock poisoned"))?;
        Ok(inner.rows.clone())
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ThoughtStore for InMemoryStore {
    async fn latest_entry_date(&self) -> Result<String> {
        let inner = self.inner.read().map_err(|_| anyhow!("store lock poisoned"))?;
        Ok(inner
            .rows
            .iter()
            .map(|t| t.date.as_str())
            .max()
            .unwrap_or(EPOCH_WATERMARK)
            .to_string())
    }

    async fn insert_thought(&self, thought: &AtomicThought) -> Result<InsertOutcome> {
        let mut inner = self.inner.write().map_err(|_| anyhow!("store lock poisoned"))?;
        if !inner.checksums.insert(thought.checksum.clone()) {
            return Ok(InsertOutcome::Duplicate);
        }
        inner.rows.push(thought.clone());
        Ok(InsertOutcome::Inserted)
    }

    async fn stats(&self) -> Result<Vec<CategoryStats>> {
        let inner = self.inner.read().map_err(|_| anyhow!("store lock poisoned"))?;
        let mut by_category: BTreeMap<&str, (i64, &str)> = BTreeMap::new();
        for t in &inner.rows {
            let entry = by_category
                .entry(t.category.as_str())
                .or_insert((0, t.date.as_str()));
            entry.0 += 1;
            if t.date.as_str() > entry.1 {
                entry.1 = t.date.as_str();
            }
        }
        Ok(by_category
            .into_iter()
            .map(|(category, (total_count, latest))| CategoryStats {
                category: category.to_string(),
                total_count,
                latest_entry_date: latest.to_string(),
            })
            .collect())
    }

    async fn count(&self) -> Result<i64> {
        let inner = self.inner.read().map_err(|_| anyhow!("store lock poisoned"))?;
        Ok(inner.rows.len() as i64)
    }
}
