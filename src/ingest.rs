//! `brain sync`: wires the configured source and the SQLite store into the
//! core sync engine and prints the run summary.

use anyhow::Result;
use tracing::info;

use second_brain_core::atomize::Atomizer;
use second_brain_core::source::JournalSource;
use second_brain_core::sync::{run_sync as sync_journals, SyncOptions, SyncReport};
use second_brain_core::tagger::Tagger;

use crate::config::{Config, SourceKind};
use crate::connector_gh::GhCliSource;
use crate::connector_github::GithubApiSource;
use crate::db;
use crate::migrate;
use crate::sqlite_store::SqliteStore;

/// Build the journal source selected by `journal.source`.
pub fn build_source(config: &Config, repo_override: Option<&str>) -> Result<Box<dyn JournalSource>> {
    let repo = config.journal_repo(repo_override)?;
    Ok(match config.journal.source {
        SourceKind::Gh => Box::new(GhCliSource::new(config, &repo)),
        SourceKind::Api => Box::new(GithubApiSource::new(config, &repo)?),
    })
}

/// Build the atomizer with the configured taxonomy.
pub fn build_atomizer(config: &Config) -> Result<Atomizer> {
    Ok(Atomizer::new(Tagger::new(config.tagger.taxonomy()?)))
}

pub async fn run_sync(
    config: &Config,
    repo_override: Option<&str>,
    options: SyncOptions,
    json: bool,
) -> Result<()> {
    let source = build_source(config, repo_override)?;
    let atomizer = build_atomizer(config)?;

    info!(source = %source.describe(), db = %config.db.path.display(), "starting sync");
    let pool = db::connect(config).await?;
    migrate::apply_schema(&pool).await?;
    let store = SqliteStore::new(pool);

    let result = sync_journals(source.as_ref(), &store, &atomizer, &options).await;
    store.close().await;

    let report = result?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&source.describe(), &report);
    }
    Ok(())
}

fn print_report(source: &str, report: &SyncReport) {
    if report.dry_run {
        println!("sync {} (dry-run)", source);
    } else {
        println!("sync {}", source);
    }
    println!("  watermark: {}", report.watermark);
    println!("  journals listed: {}", report.documents_listed);

    if report.is_up_to_date() {
        println!("  already up to date, no new journals");
        print_stats(report);
        println!("ok");
        return;
    }

    println!("  journals selected: {}", report.documents_selected);
    println!("  journals ingested: {}", report.documents_ingested);
    println!("  journals skipped: {}", report.skipped_documents.len());
    for skipped in &report.skipped_documents {
        println!("    #{} ({}): {}", skipped.id, skipped.title, skipped.reason);
    }
    println!("  thoughts extracted: {}", report.thoughts_extracted);
    if !report.dry_run {
        println!("  thoughts inserted: {}", report.thoughts_inserted);
        println!("  thoughts already stored: {}", report.thoughts_duplicate);
        println!("  thoughts failed: {}", report.thoughts_failed);
    }
    print_stats(report);
    println!("ok");
}

fn print_stats(report: &SyncReport) {
    let Some(stats) = &report.stats else {
        return;
    };
    if stats.is_empty() {
        return;
    }
    println!("  by category:");
    for s in stats {
        println!(
            "    [{:<8}] {:>4} entries (latest: {})",
            s.category, s.total_count, s.latest_entry_date
        );
    }
}
