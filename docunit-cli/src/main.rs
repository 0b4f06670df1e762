//! # docunit CLI
//!
//! Command-line interface for the docunit markdown compiler.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "docunit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "docunit.yml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a single page and print the component unit
    Compile {
        /// Markdown file inside the source directory
        file: PathBuf,

        /// Print the full compile result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compile every page and report dead links
    Check {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// List the discovered pages
    Pages,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let subscriber = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(if cli.verbose {
                tracing::Level::DEBUG.into()
            } else {
                tracing::Level::INFO.into()
            }),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Compile { file, json } => commands::compile_page(&cli.config, &file, json).await,
        Commands::Check { json } => commands::check_site(&cli.config, json).await,
        Commands::Pages => commands::list_pages(&cli.config),
    }
}
