//! Compile every page and surface dead links.

use super::load_config;
use anyhow::{bail, Result};
use docunit_core::pages::page_path;
use docunit_core::{discover_pages, MarkdownCompiler};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tokio::task::JoinSet;

#[derive(Serialize)]
struct PageReport {
    page: String,
    dead_links: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct CheckSummary<'a> {
    pages: usize,
    dead_links: usize,
    errors: usize,
    reports: &'a [PageReport],
}

pub async fn check_site(config_path: &Path, json: bool) -> Result<()> {
    let config = load_config(config_path)?;
    let pages = discover_pages(&config.src_dir(), &config.src_exclude);
    let compiler = Arc::new(MarkdownCompiler::new(config, pages.clone()));

    let mut tasks = JoinSet::new();
    for page in pages.iter().cloned() {
        let compiler = Arc::clone(&compiler);
        tasks.spawn(async move {
            let file = page_path(compiler.src_dir(), &page);
            match compiler.compile_file(&file).await {
                Ok(result) => PageReport {
                    page,
                    dead_links: result.dead_links.clone(),
                    error: None,
                },
                Err(err) => PageReport {
                    page,
                    dead_links: Vec::new(),
                    error: Some(err.to_string()),
                },
            }
        });
    }

    let mut reports = Vec::with_capacity(pages.len());
    while let Some(joined) = tasks.join_next().await {
        reports.push(joined?);
    }
    reports.sort_by(|a, b| a.page.cmp(&b.page));

    let dead_links: usize = reports.iter().map(|r| r.dead_links.len()).sum();
    let errors = reports.iter().filter(|r| r.error.is_some()).count();
    tracing::info!(pages = reports.len(), dead_links, errors, "check complete");

    if json {
        let summary = CheckSummary {
            pages: reports.len(),
            dead_links,
            errors,
            reports: &reports,
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "Checked {} pages: {} dead links, {} errors",
            reports.len(),
            dead_links,
            errors
        );
        for report in &reports {
            if let Some(err) = &report.error {
                println!("- {}: {}", report.page, err);
            }
            for link in &report.dead_links {
                println!("- {}: dead link {}", report.page, link);
            }
        }
    }

    if dead_links > 0 || errors > 0 {
        bail!("{} dead links and {} errors found", dead_links, errors);
    }

    Ok(())
}
