// src/main.rs
use annual_report_reqs::runner::{self, RunOptions};
use annual_report_reqs::utils::{self, AppError};
use annual_report_reqs::PipelineConfig;
use clap::Parser;
use std::path::PathBuf;

/// Classify the annual report requirements of official statements
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Official statement text files to process
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Output directory for the JSON report (optional)
    #[arg(short, long)]
    output_dir: Option<String>,

    /// Debug mode - save annotated section dumps (requires --output-dir)
    #[arg(short, long)]
    debug: bool,

    /// Segment sections that run to the end of the document instead of skipping them
    #[arg(long)]
    accept_unterminated: bool,

    /// Print one JSON line per document instead of pretty JSON
    #[arg(long)]
    compact: bool,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. Parse CLI Arguments
    let args = Args::parse();
    tracing::info!("Starting processing for args: {:?}", args);

    // 3. Resolve configuration: environment first, CLI flag on top
    let config = PipelineConfig::from_env()?.with_accept_unterminated(args.accept_unterminated);
    tracing::debug!("Using pipeline config: {:?}", config);

    // 4. Process every document; reports go to stdout in input order
    let options = RunOptions {
        files: args.files,
        output_dir: args.output_dir,
        debug: args.debug,
        compact: args.compact,
    };
    let mut stdout = std::io::stdout();
    runner::run(&options, config, &mut stdout).await?;

    Ok(())
}
