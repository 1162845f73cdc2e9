//! trfscope CLI — Analyze and compare vidstab TRF transform files.
//!
//! Usage:
//!   trfscope analyze <PATH>            Analyze a single TRF file
//!   trfscope compare <PATH> <PATH>     Compare two TRF files
//!   trfscope export <PATH> -o <PATH>   Export decoded transforms as text

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use trfscope_analysis::pipeline::AnalysisOptions;
use trfscope_common::config::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "trfscope",
    about = "Stability analysis for vidstab TRF transform files",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a single TRF file
    #[command(alias = "analyse")]
    Analyze {
        /// Path to the TRF file
        path: PathBuf,

        /// Expected frame count, used to bias layout detection
        #[arg(long)]
        expected_frames: Option<u64>,

        /// Maximum number of records to decode
        #[arg(long)]
        max_records: Option<usize>,

        /// Records sampled per layout candidate during detection
        #[arg(long)]
        sample_window: Option<usize>,

        /// Also write the decoded transforms to a text-format file
        #[arg(long)]
        export: Option<PathBuf>,

        /// Emit metrics as JSON instead of the text report
        #[arg(long)]
        json: bool,
    },

    /// Compare two TRF files by instability index
    Compare {
        /// First TRF file
        path_a: PathBuf,

        /// Second TRF file
        path_b: PathBuf,

        /// Expected frame count, used to bias layout detection
        #[arg(long)]
        expected_frames: Option<u64>,

        /// Maximum number of records to decode
        #[arg(long)]
        max_records: Option<usize>,
    },

    /// Export decoded transforms to text TRF format
    Export {
        /// Path to the TRF file
        path: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Expected frame count, used to bias layout detection
        #[arg(long)]
        expected_frames: Option<u64>,
    },
}

fn resolve_options(
    config: &AppConfig,
    expected_frames: Option<u64>,
    max_records: Option<usize>,
    sample_window: Option<usize>,
) -> AnalysisOptions {
    AnalysisOptions {
        max_records: max_records.unwrap_or(config.analysis.max_records),
        sample_window: sample_window.unwrap_or(config.analysis.sample_window),
        expected_frames: expected_frames.or(config.analysis.expected_frames),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    trfscope_common::logging::init_logging(&trfscope_common::config::LoggingConfig {
        level: log_level.to_string(),
        json: false,
        file: None,
    });

    let config = AppConfig::load();

    match cli.command {
        Commands::Analyze {
            path,
            expected_frames,
            max_records,
            sample_window,
            export,
            json,
        } => {
            let options = resolve_options(&config, expected_frames, max_records, sample_window);
            tracing::debug!(?options, "resolved analysis options");
            commands::analyze::run(path, &options, export, json)
        }
        Commands::Compare {
            path_a,
            path_b,
            expected_frames,
            max_records,
        } => {
            let options = resolve_options(&config, expected_frames, max_records, None);
            commands::compare::run(path_a, path_b, &options)
        }
        Commands::Export {
            path,
            output,
            expected_frames,
        } => {
            let options = resolve_options(&config, expected_frames, None, None);
            commands::export::run(path, output, &options)
        }
    }
}
