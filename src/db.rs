use std::str::FromStr;
use std::time::Duration;

use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::config::Config;

pub async fn connect(config: &Config) -> Result<SqlitePool> {
    let db_path = &config.db.path;

    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", db_path.display()))?
        .create_if_missing(true)
        .busy_timeout(Duration::from_secs(config.db.acquire_timeout_secs))
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal);

    // A sync is strictly sequential; one connection is all it needs.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(config.db.acquire_timeout_secs))
        .connect_with(options)
        .await?;

    Ok(pool)
}
