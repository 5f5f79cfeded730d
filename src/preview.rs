//! `brain atomize`: run the atomizer over a local markdown file.
//!
//! Nothing is written to the store, so this is the quickest way to check how
//! a journal template will be split before pushing it to the tracker.

use std::path::Path;

use anyhow::{Context, Result};

use crate::config::Config;
use crate::ingest::build_atomizer;

pub fn run_atomize(config: &Config, path: &Path, date: Option<String>, json: bool) -> Result<()> {
    let body = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read journal file: {}", path.display()))?;

    let date = date.unwrap_or_else(|| date_from_path(path));
    let thoughts = build_atomizer(config)?.atomize(&date, &body);

    if json {
        println!("{}", serde_json::to_string_pretty(&thoughts)?);
        return Ok(());
    }

    println!("{} ({} thoughts)", date, thoughts.len());
    for (i, t) in thoughts.iter().enumerate() {
        println!();
        println!(
            "  [{}] {} | tags: {} | ~{} tokens",
            i + 1,
            t.category,
            t.tags.join(", "),
            t.token_count
        );
        println!("      checksum: {}", t.checksum);
        for line in t.content.lines() {
            println!("      {}", line);
        }
    }
    Ok(())
}

/// Use the file stem as the entry date when it parses as `YYYY-MM-DD`,
/// otherwise today's date.
fn date_from_path(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok())
        .map(str::to_string)
        .unwrap_or_else(|| chrono::Local::now().format("%Y-%m-%d").to_string())
}
