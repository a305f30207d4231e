//! CLI entry point for dataset description.

use anyhow::{Result, anyhow};
use clap::{Args, Parser, Subcommand};
use data_describe::{DescribeConfig, DescribeConfigBuilder, Describer, RunSummary};
use std::path::PathBuf;
use tracing::{error, info};

#[cfg(feature = "fetch")]
use data_describe::fetch::{FetchConfig, Fetcher, clean_downloads};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Dataset description and report generator",
    long_about = "Summarizes every dataset file of one or more collections and writes \
                  a CSV export plus a typeset table per collection.\n\n\
                  EXAMPLES:\n  \
                  # Describe the default collections\n  \
                  data-describe describe\n\n  \
                  # Split class distributions over rows of 10 values and build a PDF\n  \
                  data-describe describe --max-values-per-row 10 --latex-engine pdflatex\n\n  \
                  # Machine-readable summary\n  \
                  data-describe describe --json | jq '.collections[].datasets'"
)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    /// Suppress progress output (only show warnings and errors)
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Describe dataset collections and write their reports
    Describe(DescribeArgs),

    /// Download the datasets listed in config folders
    #[cfg(feature = "fetch")]
    Fetch(FetchArgs),
}

#[derive(Args, Debug)]
struct DescribeArgs {
    /// JSON configuration file; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Root folder of a collection (repeatable)
    #[arg(short = 'd', long = "data-folder")]
    data_folders: Vec<PathBuf>,

    /// Output directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Keep previous output of each collection instead of wiping it
    #[arg(long)]
    keep_older: bool,

    /// Maximum class-distribution values per report row (0 = unbounded)
    #[arg(short = 'm', long)]
    max_values_per_row: Option<usize>,

    /// Extension of dataset files, without the dot
    #[arg(short, long)]
    extension: Option<String>,

    /// LaTeX engine used to compile the report (e.g. pdflatex)
    #[arg(long)]
    latex_engine: Option<String>,

    /// Output JSON to stdout instead of human-readable summary
    ///
    /// Disables all progress logs; only outputs the final run summary.
    #[arg(long)]
    json: bool,
}

#[cfg(feature = "fetch")]
#[derive(Args, Debug)]
struct FetchArgs {
    /// Folder with one subfolder per dataset (repeatable)
    #[arg(short, long = "config-folder")]
    config_folders: Vec<PathBuf>,

    /// Where fetched files are collected
    #[arg(short, long)]
    raw_data: Option<PathBuf>,

    /// File that receives every processed URL
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Keep the existing raw data folder
    #[arg(long)]
    keep_raw: bool,

    /// Remove downloaded files from the config folders instead of fetching
    #[arg(long)]
    clean: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let json_output = matches!(&cli.command, Command::Describe(args) if args.json);
    init_logging(&cli.log_level, cli.quiet, json_output);

    match cli.command {
        Command::Describe(args) => run_describe(args, cli.quiet),
        #[cfg(feature = "fetch")]
        Command::Fetch(args) => run_fetch(args),
    }
}

fn build_config(args: &DescribeArgs) -> Result<DescribeConfig> {
    let base = match &args.config {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            DescribeConfig::from_file(path)?
        }
        None => DescribeConfig::default(),
    };

    let mut builder = DescribeConfigBuilder::from_config(base);
    if !args.data_folders.is_empty() {
        builder = builder.data_folders(args.data_folders.iter());
    }
    if let Some(output) = &args.output {
        builder = builder.description(output);
    }
    if args.keep_older {
        builder = builder.remove_older(false);
    }
    if let Some(cap) = args.max_values_per_row {
        builder = builder.max_values_per_row(cap);
    }
    if let Some(extension) = &args.extension {
        builder = builder.file_extension(extension);
    }
    if let Some(engine) = &args.latex_engine {
        builder = builder.latex_engine(engine);
    }

    Ok(builder.build()?)
}

fn run_describe(args: DescribeArgs, quiet: bool) -> Result<()> {
    let config = build_config(&args)?;

    let mut builder = Describer::builder().config(config);
    if !quiet && !args.json {
        builder = builder.on_progress(|update| {
            let progress = update
                .fraction()
                .map(|f| format!("[{:.0}%] ", f * 100.0))
                .unwrap_or_default();
            info!("{}{}: {}", progress, update.stage.display_name(), update.message);
        });
    }

    let summary = builder.build()?.run().map_err(|e| {
        error!("Description failed: {}", e);
        anyhow!("Description failed: {}", e)
    })?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_human_readable_summary(&summary);
    }

    if summary.has_render_errors() {
        return Err(anyhow!(
            "Some reports could not be typeset; their CSV exports were written"
        ));
    }
    Ok(())
}

/// Print the run summary.
///
/// Uses `println!` so the summary is visible regardless of log level.
fn print_human_readable_summary(summary: &RunSummary) {
    println!();
    println!("{}", "=".repeat(80));
    println!("DESCRIPTION COMPLETE ({})", summary.generated_at);
    println!("{}", "=".repeat(80));

    for collection in &summary.collections {
        println!();
        println!("{} ({})", collection.root, collection.task_type);
        println!(
            "  Datasets: {} of {} file(s)",
            collection.datasets, collection.files_found
        );
        for skipped in &collection.skipped_files {
            println!("  Skipped:  {}", skipped);
        }
        if let Some(csv) = &collection.csv_path {
            println!("  CSV:      {}", csv);
        }
        if let Some(document) = &collection.document_path {
            println!("  Report:   {}", document);
        }
        if let Some(reason) = &collection.render_error {
            println!("  Report failed: {}", reason);
        }
    }

    if !summary.skipped_roots.is_empty() {
        println!();
        println!("Skipped (no dataset files):");
        for root in &summary.skipped_roots {
            println!("  {}", root);
        }
    }
    println!("{}", "=".repeat(80));
}

#[cfg(feature = "fetch")]
fn run_fetch(args: FetchArgs) -> Result<()> {
    let mut config = FetchConfig::default();
    if !args.config_folders.is_empty() {
        config.config_folders = args.config_folders;
    }
    if let Some(raw) = args.raw_data {
        config.raw_data_folder = raw;
    }
    if let Some(log_file) = args.log_file {
        config.log_file = log_file;
    }
    config.fresh = !args.keep_raw;

    if args.clean {
        for folder in &config.config_folders {
            let removed = clean_downloads(folder)?;
            info!("{}: removed {} file(s)", folder.display(), removed);
        }
        return Ok(());
    }

    let reports = Fetcher::new(config)?.run()?;
    for report in &reports {
        println!(
            "{} -> {}: {} fetched, {} failed",
            report.config_folder,
            report.raw_folder,
            report.fetched.len(),
            report.failed.len()
        );
        for failure in &report.failed {
            println!("  {}", failure);
        }
    }
    Ok(())
}
