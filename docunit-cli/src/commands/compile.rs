//! Compile a single page.

use super::load_config;
use anyhow::{Context, Result};
use docunit_core::{discover_pages, MarkdownCompiler};
use std::path::Path;

pub async fn compile_page(config_path: &Path, file: &Path, json: bool) -> Result<()> {
    let config = load_config(config_path)?;
    let pages = discover_pages(&config.src_dir(), &config.src_exclude);
    let compiler = MarkdownCompiler::new(config, pages);

    let file = std::path::absolute(file)
        .with_context(|| format!("Failed to resolve {}", file.display()))?;
    let result = compiler
        .compile_file(&file)
        .await
        .with_context(|| format!("Failed to compile {}", file.display()))?;

    tracing::info!(
        "Compiled {} ({} dead links, {} includes)",
        result.page_data.relative_path,
        result.dead_links.len(),
        result.includes.len()
    );

    if json {
        println!("{}", serde_json::to_string_pretty(result.as_ref())?);
    } else {
        println!("{}", result.unit_source);
    }

    Ok(())
}
