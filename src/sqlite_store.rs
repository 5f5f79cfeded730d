//! SQLite-backed [`ThoughtStore`] implementation.
//!
//! Maps each [`ThoughtStore`] operation onto the `second_brain` table and
//! the `second_brain_stats` view created by [`crate::migrate`].

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use second_brain_core::models::{AtomicThought, CategoryStats, InsertOutcome, EPOCH_WATERMARK};
use second_brain_core::store::ThoughtStore;

/// SQLite implementation of the [`ThoughtStore`] trait.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn close(self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl ThoughtStore for SqliteStore {
    async fn latest_entry_date(&self) -> Result<String> {
        let latest: String = sqlx::query_scalar(
            "SELECT COALESCE(MAX(entry_date), ?) FROM second_brain",
        )
        .bind(EPOCH_WATERMARK)
        .fetch_one(&self.pool)
        .await
        .context("querying latest entry_date")?;
        Ok(latest)
    }

    async fn insert_thought(&self, thought: &AtomicThought) -> Result<InsertOutcome> {
        let tags_json = serde_json::to_string(&thought.tags)?;
        let now = chrono::Utc::now().timestamp();

        let result = sqlx::query(
            r#"
            INSERT INTO second_brain (entry_date, content, category, origin_type, tags,
                                      context_string, checksum, token_count, created_at)
            VALUES (?, ?, ?, 'journal', ?, ?, ?, ?, ?)
            ON CONFLICT(checksum) DO NOTHING
            "#,
        )
        .bind(&thought.date)
        .bind(&thought.content)
        .bind(thought.category.as_str())
        .bind(&tags_json)
        .bind(&thought.context_string)
        .bind(&thought.checksum)
        .bind(thought.token_count)
        .bind(now)
        .execute(&self.pool)
        .await
        .with_context(|| format!("inserting thought {}", thought.checksum))?;

        if result.rows_affected() == 0 {
            Ok(InsertOutcome::Duplicate)
        } else {
            Ok(InsertOutcome::Inserted)
        }
    }

    async fn stats(&self) -> Result<Vec<CategoryStats>> {
        let rows = sqlx::query(
            "SELECT category, total_entries, latest_entry FROM second_brain_stats ORDER BY category",
        )
        .fetch_all(&self.pool)
        .await
        .context("querying second_brain_stats")?;

        Ok(rows
            .iter()
            .map(|row| CategoryStats {
                category: row.get("category"),
                total_count: row.get("total_entries"),
                latest_entry_date: row.get("latest_entry"),
            })
            .collect())
    }

    async fn count(&self) -> Result<i64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM second_brain")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }
}
