//! Offline KP analysis over documents already on disk.
//!
//! ```bash
//! # Render all seven reports and the summary from user_data/input_kp_*.json
//! kp-analyze run --data-dir user_data
//!
//! # Rebuild the summary from previously rendered reports
//! kp-analyze consolidate --data-dir user_data
//! ```

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use kp_analyzer::config::AppConfig;
use kp_analyzer::consolidation::text_parser::consolidate_dir;
use kp_analyzer::consolidation::{format_report, ConsolidationMode};
use kp_analyzer::models::SUMMARY_FILENAME;
use kp_analyzer::render::write_text;
use kp_analyzer::services::{run_analysis, AnalysisRequest};

#[derive(Parser)]
#[command(name = "kp-analyze", about = "KP astrology report pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render every domain report and the consolidated summary
    Run {
        /// Directory holding the input_kp_*.json documents
        #[arg(long)]
        data_dir: Option<PathBuf>,
        /// Consolidation mode: structured (default) or reparse
        #[arg(long)]
        mode: Option<String>,
    },
    /// Rebuild the summary from rendered output_kp_*.txt reports
    Consolidate {
        /// Directory holding the rendered reports
        #[arg(long)]
        data_dir: Option<PathBuf>,
        /// Summary path (default: <data-dir>/output_kp_comprehensive_analysis.txt)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(false)
        .init();

    match execute(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn execute(cli: Cli) -> anyhow::Result<()> {
    let config = AppConfig::load()?;

    match cli.command {
        Commands::Run { data_dir, mode } => {
            let mode = match mode {
                Some(m) => m.parse::<ConsolidationMode>()?,
                None => config.consolidation_mode,
            };
            let data_dir = data_dir.unwrap_or(config.data_dir);
            let result = run_analysis(&AnalysisRequest::new(data_dir, mode));
            if !result.is_success() {
                anyhow::bail!("Analysis failed: {}", result.message);
            }
            info!("Generated files:");
            for path in &result.generated_files {
                info!("  - {}", path.display());
            }
            if let Some(summary) = &result.output_file {
                println!("{}", summary.display());
            }
        }
        Commands::Consolidate { data_dir, output } => {
            let data_dir = data_dir.unwrap_or(config.data_dir);
            let report = consolidate_dir(&data_dir, false)?;
            let output = output.unwrap_or_else(|| data_dir.join(SUMMARY_FILENAME));
            write_text(&output, &format_report(&report))?;
            info!("Consolidated summary written");
            println!("{}", output.display());
        }
    }
    Ok(())
}
