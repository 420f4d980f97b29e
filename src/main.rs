//! iocreport - Threat-indicator report summarizer
//!
//! A CLI tool that parses three loosely-structured threat-intelligence
//! text reports (categories, full indicator listing, geolocation) and
//! writes a single summary report with charts and tables.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (missing input, config, write failure, etc.)
//!   2 - None of the inputs contained usable data; nothing was written

mod analysis;
mod cli;
mod config;
mod input;
mod models;
mod parser;
mod report;

use anyhow::{Context, Result};
use chrono::Local;
use cli::{Args, OutputFormat};
use config::{Config, CONFIG_FILE};
use indicatif::{ProgressBar, ProgressStyle};
use input::InputPaths;
use models::ParsedInputs;
use parser::ParseOptions;
use report::{AssembleOptions, ReportError};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("iocreport v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run_report(args) {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Report generation failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .iocreport.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).with_context(|| format!("Failed to write {}", CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE);
    println!("   Edit it to customize input files, output, and chart style.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the complete report workflow. Returns exit code (0 or 2).
fn run_report(args: Args) -> Result<i32> {
    let start_time = Instant::now();

    // Load configuration
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);
    config.validate()?;

    if !args.dry_run {
        input::setup_directories(&config.input.dir, &config.output.dir)?;
    }

    // Step 1: Read the three reports
    let paths = InputPaths::from_config(&config);
    println!("📥 Reading input reports from {}", config.input.dir.display());
    let texts = paths.read()?;
    println!("   Input files read successfully.");

    // Step 2: Parse
    let spinner = (!args.quiet).then(parse_spinner);
    let inputs = parser::parse_all(&texts, &ParseOptions::from(&config.parser));
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    print_parse_summary(&inputs);

    if inputs.indicators.is_empty() {
        warn!("No scores could be extracted from the full report; check its format");
    }

    if args.dry_run {
        println!("\n✅ Dry run complete. No report was written.");
        return Ok(if inputs.has_usable_data() { 0 } else { 2 });
    }

    // Step 3: Assemble
    println!("\n📝 Assembling report...");
    let options = AssembleOptions::from_config(&config.report);
    let document = match report::assemble(&inputs, &options) {
        Ok(document) => document,
        Err(ReportError::NoUsableData) => {
            eprintln!("\n⛔ {}. No report written.", ReportError::NoUsableData);
            return Ok(2);
        }
    };

    // Step 4: Render and save
    let output = match config.output.format {
        OutputFormat::Json => report::generate_json_report(&document)?,
        OutputFormat::Markdown => report::generate_markdown_report(&document, &config.chart),
    };

    let output_path = output_path(&args, &config);
    std::fs::write(&output_path, &output)
        .with_context(|| format!("Failed to write report to {}", output_path.display()))?;

    println!(
        "   Sections: {} | Charts: {}",
        document.sections.len(),
        document.series.len()
    );
    println!("   Duration: {:.1}s", start_time.elapsed().as_secs_f64());
    println!(
        "\n✅ Report complete! Saved to: {}",
        output_path.display()
    );

    Ok(0)
}

fn parse_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("Parsing reports...");
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

fn print_parse_summary(inputs: &ParsedInputs) {
    println!("\n📊 Parse Summary:");
    println!("   Categories: {}", inputs.categories.len());
    println!(
        "   Indicators: {} of {} blocks",
        inputs.indicators.blocks_matched, inputs.indicators.blocks_scanned
    );
    println!(
        "   Geolocation: {} stats, {} countries",
        inputs.geo.summary.len(),
        inputs.geo.countries.len()
    );
}

/// Explicit `--output`, or a timestamped name in the output directory.
fn output_path(args: &Args, config: &Config) -> PathBuf {
    if let Some(ref output) = args.output {
        return output.clone();
    }

    let name = input::timestamped_filename(
        &config.output.base_name,
        config.output.format.extension(),
        Local::now(),
    );
    config.output.dir.join(name)
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", CONFIG_FILE);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
