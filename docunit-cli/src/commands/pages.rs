//! List the pages of the source tree.

use super::load_config;
use anyhow::Result;
use docunit_core::discover_pages;
use std::path::Path;

pub fn list_pages(config_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;
    for page in discover_pages(&config.src_dir(), &config.src_exclude) {
        println!("{}", page);
    }
    Ok(())
}
