//! CLI command implementations.

pub mod check;
pub mod compile;
pub mod pages;

pub use check::check_site;
pub use compile::compile_page;
pub use pages::list_pages;

use anyhow::{Context, Result};
use docunit_core::Config;
use std::path::Path;

/// Load the configuration file, or fall back to the current directory as source root
pub(crate) fn load_config(config_path: &Path) -> Result<Config> {
    if config_path.exists() {
        return Config::from_file(config_path).context("Failed to load configuration");
    }

    tracing::debug!(
        "No config at {}, using current directory",
        config_path.display()
    );
    Ok(Config::new("."))
}
