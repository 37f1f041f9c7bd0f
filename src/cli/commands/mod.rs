//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod analyze;
mod topics;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Config;

/// Export format for batch results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportFormat {
    /// One quoted CSV row per file
    #[default]
    Csv,
    /// Records plus summary as pretty-printed JSON
    Json,
}

#[derive(Parser)]
#[command(name = "rscan")]
#[command(about = "Keyword analysis of zipped annual-report batches")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true, env = "REPORTSCAN_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze every PDF, DOCX and TXT file in a zip archive
    Analyze {
        /// Zip archive to analyze
        archive: PathBuf,
        /// Also match Indonesian terms
        #[arg(short, long)]
        bilingual: bool,
        /// OCR scanned PDFs instead of skipping them
        #[arg(short = 's', long)]
        include_scanned: bool,
        /// Output file (default: <archive>_Analysis.csv next to the archive)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Output format
        #[arg(short, long, value_enum, default_value = "csv")]
        format: ReportFormat,
        /// Number of concurrent workers (default from config: 2)
        #[arg(short, long, env = "REPORTSCAN_WORKERS")]
        workers: Option<usize>,
    },

    /// Check availability of external OCR tools
    Check,

    /// List topics and the patterns they match
    Topics {
        /// Include Indonesian terms
        #[arg(short, long)]
        bilingual: bool,
    },
}

/// Run the CLI.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from_path(path).await?,
        None => Config::load().await,
    };

    match cli.command {
        Commands::Analyze {
            archive,
            bilingual,
            include_scanned,
            output,
            format,
            workers,
        } => {
            if let Some(workers) = workers {
                config.workers = workers;
            }
            analyze::cmd_analyze(
                &config,
                analyze::AnalyzeArgs {
                    archive,
                    bilingual,
                    include_scanned,
                    output,
                    format,
                },
            )
            .await
        }
        Commands::Check => analyze::cmd_check().await,
        Commands::Topics { bilingual } => topics::cmd_topics(&config, bilingual).await,
    }
}
