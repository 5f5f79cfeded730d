//! Store statistics and health overview.
//!
//! Provides a quick PARA breakdown of what has been ingested: thought counts
//! per category, the latest entry date in each, and the current watermark.
//! Used by `brain stats` to confirm that syncs are landing where expected.

use anyhow::Result;

use second_brain_core::store::ThoughtStore;

use crate::config::Config;
use crate::db;
use crate::migrate;
use crate::sqlite_store::SqliteStore;

/// Run the stats command: query the database and print a summary.
pub async fn run_stats(config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;
    migrate::apply_schema(&pool).await?;
    let store = SqliteStore::new(pool);

    let total = store.count().await?;
    let watermark = store.latest_entry_date().await?;
    let stats = store.stats().await?;
    store.close().await;

    let db_size = std::fs::metadata(&config.db.path)
        .map(|m| m.len())
        .unwrap_or(0);

    println!("Second Brain — Store Stats");
    println!("==========================");
    println!();
    println!("  Database:    {}", config.db.path.display());
    println!("  Size:        {}", format_bytes(db_size));
    println!();
    println!("  Thoughts:    {}", total);
    println!("  Watermark:   {}", watermark);

    if !stats.is_empty() {
        println!();
        println!("  By category:");
        println!("  {:<12} {:>8}   {}", "CATEGORY", "ENTRIES", "LATEST");
        println!("  {}", "-".repeat(36));
        for s in &stats {
            println!(
                "  {:<12} {:>8}   {}",
                s.category, s.total_count, s.latest_entry_date
            );
        }
    }

    println!();
    Ok(())
}

/// Format a byte count as a human-readable string.
fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.2} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}
