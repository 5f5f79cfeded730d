use anyhow::Result;

use crate::config::{Config, SourceKind};
use crate::connector_gh::GhCliSource;
use crate::connector_github::GithubApiSource;

/// Print the configured journal source and whether it looks usable.
pub async fn list_sources(config: &Config, repo_override: Option<&str>) -> Result<()> {
    let repo = config.journal_repo(repo_override);
    let repo_display = repo.as_deref().unwrap_or("NOT CONFIGURED");

    println!("{:<8} {:<28} {:<10} DETAIL", "SOURCE", "REPO", "STATUS");

    let gh_repo = repo.as_deref().unwrap_or("-");
    let gh = GhCliSource::new(config, gh_repo);
    let (gh_status, gh_detail) = match gh.version().await {
        Ok(version) => ("OK", version),
        Err(e) => ("MISSING", format!("{:#}", e)),
    };
    let active = |kind: SourceKind| if config.journal.source == kind { "*" } else { " " };

    println!(
        "{}{:<7} {:<28} {:<10} {}",
        active(SourceKind::Gh),
        "gh",
        repo_display,
        gh_status,
        gh_detail
    );

    let api = GithubApiSource::new(config, gh_repo)?;
    let api_detail = format!(
        "{} (token: {})",
        config.github.api_url,
        if api.has_token() {
            format!("${} set", config.github.token_env)
        } else {
            format!("${} unset", config.github.token_env)
        }
    );
    println!(
        "{}{:<7} {:<28} {:<10} {}",
        active(SourceKind::Api),
        "api",
        repo_display,
        "OK",
        api_detail
    );

    if let Err(e) = repo {
        println!();
        println!("{}", e);
    }

    Ok(())
}
