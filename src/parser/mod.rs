//! Text report parsers.
//!
//! Each parser turns one loosely-structured text report into typed
//! records. Parsers never fail on bad input: malformed lines are skipped
//! and missing sections produce empty results.

pub mod categories;
pub mod geo;
pub mod indicators;

pub use categories::parse_categories;
pub use geo::parse_geolocation;
pub use indicators::{parse_indicators, DEFAULT_SEPARATOR_LEN};

use crate::models::ParsedInputs;
use tracing::info;

/// Raw text of the three input reports.
#[derive(Debug, Clone, Default)]
pub struct ReportTexts {
    pub categories: String,
    pub full: String,
    pub geo: String,
}

/// Parser settings.
#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    /// Minimum length of a dash line that separates indicator blocks.
    pub separator_len: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            separator_len: DEFAULT_SEPARATOR_LEN,
        }
    }
}

impl From<&crate::config::ParserConfig> for ParseOptions {
    fn from(config: &crate::config::ParserConfig) -> Self {
        Self {
            separator_len: config.separator_len,
        }
    }
}

/// Run all three parsers.
pub fn parse_all(texts: &ReportTexts, options: &ParseOptions) -> ParsedInputs {
    let categories = parse_categories(&texts.categories);
    info!("Categories report: {} records", categories.len());

    let indicators = parse_indicators(&texts.full, options.separator_len);
    info!(
        "Full report: {} indicators from {} blocks",
        indicators.blocks_matched, indicators.blocks_scanned
    );

    let geo = parse_geolocation(&texts.geo);
    info!(
        "Geolocation report: {} summary stats, {} countries",
        geo.summary.len(),
        geo.countries.len()
    );

    ParsedInputs {
        categories,
        indicators,
        geo,
    }
}
