use anyhow::Result;
use sqlx::SqlitePool;

use crate::config::Config;
use crate::db;

pub async fn run_migrations(config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;
    apply_schema(&pool).await?;
    pool.close().await;
    Ok(())
}

/// Create the thought table, its indexes, and the stats view. Idempotent.
pub async fn apply_schema(pool: &SqlitePool) -> Result<()> {
    // Tags are stored as a JSON array; checksum is the idempotency key.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS second_brain (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            entry_date TEXT NOT NULL,
            content TEXT NOT NULL,
            category TEXT NOT NULL,
            origin_type TEXT NOT NULL DEFAULT 'journal',
            tags TEXT NOT NULL DEFAULT '[]',
            context_string TEXT NOT NULL,
            checksum TEXT NOT NULL UNIQUE,
            token_count INTEGER NOT NULL,
            created_at INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_second_brain_entry_date ON second_brain(entry_date DESC)",
    )
    .execute(pool)
    .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_second_brain_category ON second_brain(category)")
        .execute(pool)
        .await?;

    sqlx::query(
        r#"
        CREATE VIEW IF NOT EXISTS second_brain_stats AS
        SELECT
            category,
            COUNT(*) AS total_entries,
            MAX(entry_date) AS latest_entry
        FROM second_brain
        GROUP BY category
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
