//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// iocreport - threat-indicator report summarizer
///
/// Reads a categories report, a full indicator report and a geolocation
/// report, and writes one summary with charts and tables.
///
/// Examples:
///   iocreport
///   iocreport --input-dir ENTRADA --categories source_37.txt --full source_1.txt --geo source_189.txt
///   iocreport --format json -o summary.json
///   iocreport --dry-run
///   iocreport --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Categories report (pipe-delimited table)
    #[arg(long, value_name = "FILE")]
    pub categories: Option<String>,

    /// Full indicator report (dash-separated blocks)
    #[arg(long, value_name = "FILE")]
    pub full: Option<String>,

    /// Geolocation report
    #[arg(long, value_name = "FILE")]
    pub geo: Option<String>,

    /// Directory that relative input file names are resolved against
    #[arg(long, value_name = "DIR", env = "IOCREPORT_INPUT_DIR")]
    pub input_dir: Option<PathBuf>,

    /// Directory for timestamped reports
    #[arg(long, value_name = "DIR", env = "IOCREPORT_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Exact output file path (skips the timestamped name)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (markdown, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Number of indicators in the risk ranking
    #[arg(long, value_name = "COUNT")]
    pub top_n: Option<usize>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .iocreport.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Parse the inputs and print what was found without writing a report
    #[arg(long)]
    pub dry_run: bool,

    /// Generate a default .iocreport.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Markdown => "md",
            OutputFormat::Json => "json",
        }
    }
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if self.top_n == Some(0) {
            return Err("Top-N must be at least 1".to_string());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(ref output) = self.output {
            if output.is_dir() {
                return Err(format!("Output path is a directory: {}", output.display()));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            categories: None,
            full: None,
            geo: None,
            input_dir: None,
            output_dir: None,
            output: None,
            format: None,
            top_n: None,
            config: None,
            verbose: false,
            quiet: false,
            dry_run: false,
            init_config: false,
        }
    }

    #[test]
    fn test_parse_from_command_line() {
        let args = Args::try_parse_from([
            "iocreport",
            "--categories",
            "source_37.txt",
            "--format",
            "json",
            "--top-n",
            "10",
        ])
        .unwrap();

        assert_eq!(args.categories.as_deref(), Some("source_37.txt"));
        assert_eq!(args.format, Some(OutputFormat::Json));
        assert_eq!(args.top_n, Some(10));
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_zero_top_n() {
        let mut args = make_args();
        args.top_n = Some(0);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }

    #[test]
    fn test_output_extension() {
        assert_eq!(OutputFormat::Markdown.extension(), "md");
        assert_eq!(OutputFormat::Json.extension(), "json");
    }
}
