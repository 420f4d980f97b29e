//! Input and output file handling.
//!
//! Resolves the three source reports, reads them as UTF-8, and builds
//! timestamped output paths.

use crate::config::Config;
use crate::parser::ReportTexts;
use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Paths of the three source reports.
#[derive(Debug, Clone)]
pub struct InputPaths {
    pub categories: PathBuf,
    pub full: PathBuf,
    pub geo: PathBuf,
}

impl InputPaths {
    /// Resolve configured file names against the input directory.
    pub fn from_config(config: &Config) -> Self {
        let dir = &config.input.dir;
        Self {
            categories: resolve(dir, &config.input.categories),
            full: resolve(dir, &config.input.full),
            geo: resolve(dir, &config.input.geo),
        }
    }

    pub fn read(&self) -> Result<ReportTexts> {
        Ok(ReportTexts {
            categories: read_report_text(&self.categories)?,
            full: read_report_text(&self.full)?,
            geo: read_report_text(&self.geo)?,
        })
    }
}

/// Absolute names are kept as given.
fn resolve(dir: &Path, name: &str) -> PathBuf {
    let path = Path::new(name);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        dir.join(path)
    }
}

/// Create the input and output directories if missing.
pub fn setup_directories(input_dir: &Path, output_dir: &Path) -> Result<()> {
    for dir in [input_dir, output_dir] {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    }
    Ok(())
}

/// Read a report as UTF-8, dropping a leading byte order mark.
pub fn read_report_text(path: &Path) -> Result<String> {
    let bytes =
        fs::read(path).with_context(|| format!("Input file not found: {}", path.display()))?;
    let text = String::from_utf8(bytes).with_context(|| {
        format!(
            "{} is not valid UTF-8; save the report with UTF-8 encoding",
            path.display()
        )
    })?;

    debug!("Read {} bytes from {}", text.len(), path.display());

    Ok(match text.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => text,
    })
}

/// `<base>_<YYYYmmdd_HHMMSS>.<extension>`
pub fn timestamped_filename(base_name: &str, extension: &str, at: DateTime<Local>) -> String {
    format!(
        "{}_{}.{}",
        base_name,
        at.format("%Y%m%d_%H%M%S"),
        extension.trim_start_matches('.')
    )
}
