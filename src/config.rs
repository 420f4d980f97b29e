//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.iocreport.toml` files.

use crate::cli::OutputFormat;
use crate::report::ChartStyle;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file name.
pub const CONFIG_FILE: &str = ".iocreport.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Input file settings.
    #[serde(default)]
    pub input: InputConfig,

    /// Output settings.
    #[serde(default)]
    pub output: OutputConfig,

    /// Parser settings.
    #[serde(default)]
    pub parser: ParserConfig,

    /// Report content settings.
    #[serde(default)]
    pub report: ReportConfig,

    /// Chart drawing settings.
    #[serde(default)]
    pub chart: ChartStyle,
}

/// Where the three source reports are read from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Directory that relative input file names are resolved against.
    #[serde(default = "default_input_dir")]
    pub dir: PathBuf,

    /// Categories report file name.
    #[serde(default = "default_categories_file")]
    pub categories: String,

    /// Full indicator report file name.
    #[serde(default = "default_full_file")]
    pub full: String,

    /// Geolocation report file name.
    #[serde(default = "default_geo_file")]
    pub geo: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            dir: default_input_dir(),
            categories: default_categories_file(),
            full: default_full_file(),
            geo: default_geo_file(),
        }
    }
}

fn default_input_dir() -> PathBuf {
    PathBuf::from("input")
}

fn default_categories_file() -> String {
    "categories.txt".to_string()
}

fn default_full_file() -> String {
    "full_report.txt".to_string()
}

fn default_geo_file() -> String {
    "geolocation.txt".to_string()
}

/// Where and how the report is written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output directory, created if missing.
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,

    /// File name prefix; a timestamp and extension are appended.
    #[serde(default = "default_base_name")]
    pub base_name: String,

    /// Output format.
    #[serde(default)]
    pub format: OutputFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            base_name: default_base_name(),
            format: OutputFormat::default(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_base_name() -> String {
    "threat_report".to_string()
}

/// Parser settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Minimum length of the dash line between full-report entries.
    #[serde(default = "default_separator_len")]
    pub separator_len: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            separator_len: default_separator_len(),
        }
    }
}

fn default_separator_len() -> usize {
    crate::parser::DEFAULT_SEPARATOR_LEN
}

/// Report content settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Cover title.
    #[serde(default = "default_title")]
    pub title: String,

    /// Cover subtitle.
    #[serde(default = "default_subtitle")]
    pub subtitle: String,

    /// Indicators shown in the risk ranking.
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            subtitle: default_subtitle(),
            top_n: default_top_n(),
        }
    }
}

fn default_title() -> String {
    "Automated Cybersecurity Report".to_string()
}

fn default_subtitle() -> String {
    "with Mandiant Advanced Threat Intelligence".to_string()
}

fn default_top_n() -> usize {
    crate::analysis::DEFAULT_TOP_N
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were given explicitly.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref dir) = args.input_dir {
            self.input.dir = dir.clone();
        }
        if let Some(ref name) = args.categories {
            self.input.categories = name.clone();
        }
        if let Some(ref name) = args.full {
            self.input.full = name.clone();
        }
        if let Some(ref name) = args.geo {
            self.input.geo = name.clone();
        }

        if let Some(ref dir) = args.output_dir {
            self.output.dir = dir.clone();
        }
        if let Some(format) = args.format {
            self.output.format = format;
        }

        if let Some(top_n) = args.top_n {
            self.report.top_n = top_n;
        }
    }

    /// Reject settings that cannot produce a report.
    pub fn validate(&self) -> Result<()> {
        if self.report.top_n == 0 {
            bail!("[report] top_n must be at least 1");
        }
        Ok(())
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
