//! Data models for the report pipeline.
//!
//! This module contains the typed records produced by the parsers, the
//! chart series derived from them, and the section descriptors handed to
//! the renderer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One row of the categories report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRecord {
    /// Category label, trimmed.
    pub category: String,
    /// Number of indicators in the category.
    pub count: u64,
    /// Average risk score of the category.
    pub avg_score: f64,
}

/// An indicator (IP or URL) with its risk score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorRecord {
    /// Indicator text as it appeared in the report (not validated).
    pub indicator: String,
    /// Risk score.
    pub score: u32,
}

/// Result of scanning the full indicator report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndicatorReport {
    /// Records in block order.
    pub records: Vec<IndicatorRecord>,
    /// Non-blank blocks that were examined.
    pub blocks_scanned: usize,
    /// Blocks that produced a record.
    pub blocks_matched: usize,
}

impl IndicatorReport {
    /// Blocks that were scanned but yielded nothing.
    pub fn blocks_skipped(&self) -> usize {
        self.blocks_scanned - self.blocks_matched
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// A single geolocated IP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryDetail {
    pub ip: String,
    pub location: String,
    pub isp: String,
}

/// All IPs resolved to one country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountrySummary {
    /// Country name as written in the header.
    pub country: String,
    /// IP count declared by the `(N IPs)` header.
    pub declared_count: u64,
    /// Parsed detail lines, in source order.
    pub entries: Vec<CountryDetail>,
}

impl CountrySummary {
    pub fn new(country: impl Into<String>, declared_count: u64) -> Self {
        Self {
            country: country.into(),
            declared_count,
            entries: Vec::new(),
        }
    }

    /// Number of detail lines actually parsed.
    pub fn actual_count(&self) -> usize {
        self.entries.len()
    }

    /// Whether the header count and the parsed lines disagree.
    pub fn has_discrepancy(&self) -> bool {
        self.declared_count != self.entries.len() as u64
    }
}

/// Named statistics in the geolocation summary block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeoStat {
    /// Total IPs analyzed
    Total,
    /// Successful lookups
    Success,
    /// Failed lookups
    Failure,
    /// Success rate percentage
    Rate,
    /// Unique countries found
    Countries,
}

impl GeoStat {
    pub const ALL: [GeoStat; 5] = [
        GeoStat::Total,
        GeoStat::Success,
        GeoStat::Failure,
        GeoStat::Rate,
        GeoStat::Countries,
    ];
}

impl fmt::Display for GeoStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeoStat::Total => write!(f, "Total IPs"),
            GeoStat::Success => write!(f, "Successful"),
            GeoStat::Failure => write!(f, "Failed"),
            GeoStat::Rate => write!(f, "Success rate"),
            GeoStat::Countries => write!(f, "Unique countries"),
        }
    }
}

/// Parsed geolocation report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeoReport {
    /// Raw captured values, present only for stats that matched.
    pub summary: BTreeMap<GeoStat, String>,
    /// Countries in first-appearance order, unique by name.
    pub countries: Vec<CountrySummary>,
}

impl GeoReport {
    pub fn stat(&self, stat: GeoStat) -> Option<&str> {
        self.summary.get(&stat).map(String::as_str)
    }

    #[allow(dead_code)] // Lookup helper for callers and tests
    pub fn country(&self, name: &str) -> Option<&CountrySummary> {
        self.countries.iter().find(|c| c.country == name)
    }

    /// True when neither the summary nor the distribution produced anything.
    pub fn is_empty(&self) -> bool {
        self.summary.is_empty() && self.countries.is_empty()
    }
}

/// The three parsed inputs of one run.
#[derive(Debug, Clone, Default)]
pub struct ParsedInputs {
    pub categories: Vec<CategoryRecord>,
    pub indicators: IndicatorReport,
    pub geo: GeoReport,
}

impl ParsedInputs {
    pub fn has_usable_data(&self) -> bool {
        !self.categories.is_empty() || !self.indicators.is_empty() || !self.geo.is_empty()
    }
}

/// How a series should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    VerticalBar,
    HorizontalBar,
}

/// One bar of a chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
}

/// Chart-ready data, already sorted for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    /// Identifier that sections use to reference this series.
    pub name: String,
    /// Chart title.
    pub title: String,
    /// Caption of the value axis.
    pub value_label: String,
    pub kind: ChartKind,
    pub points: Vec<ChartPoint>,
    /// Lowest upper bound of the value axis (e.g. 100 for risk scores).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub axis_floor: Option<f64>,
}

impl ChartSeries {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn max_value(&self) -> Option<f64> {
        self.points.iter().map(|p| p.value).reduce(f64::max)
    }

    /// Upper bound of the value axis: the floor, or 5% above the largest value.
    pub fn axis_max(&self) -> f64 {
        let headroom = self.max_value().unwrap_or(0.0) * 1.05;
        match self.axis_floor {
            Some(floor) => floor.max(headroom),
            None => headroom,
        }
    }
}

/// Summary statistics over indicator scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreStats {
    pub count: usize,
    pub min: u32,
    pub max: u32,
    pub mean: f64,
}

/// Which part of the document a section represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Cover,
    Categories,
    Ranking,
    Geolocation,
}

/// A header with its bullet items (one country and its IPs).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailGroup {
    /// Bare name the group is about, e.g. the country.
    pub label: String,
    /// Full header text, e.g. `France (2 IPs)`.
    pub header: String,
    pub items: Vec<String>,
}

/// A renderer-agnostic document section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub kind: SectionKind,
    pub heading: String,
    pub paragraphs: Vec<String>,
    /// Names of the chart series drawn in this section, in display order.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub charts: Vec<String>,
    /// Text shown instead of content when the source had no data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// Heading of the nested listing, when there is one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groups_heading: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub groups: Vec<DetailGroup>,
}

impl Section {
    pub fn new(kind: SectionKind, heading: impl Into<String>) -> Self {
        Self {
            kind,
            heading: heading.into(),
            paragraphs: Vec::new(),
            charts: Vec::new(),
            placeholder: None,
            groups_heading: None,
            groups: Vec::new(),
        }
    }

    #[allow(dead_code)] // Utility for renderers
    pub fn is_placeholder(&self) -> bool {
        self.placeholder.is_some()
    }
}

/// The assembled report, ready for rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportDocument {
    pub title: String,
    pub subtitle: String,
    pub generated_at: DateTime<Utc>,
    pub sections: Vec<Section>,
    pub series: Vec<ChartSeries>,
}

impl ReportDocument {
    pub fn series(&self, name: &str) -> Option<&ChartSeries> {
        self.series.iter().find(|s| s.name == name)
    }

    #[allow(dead_code)] // Lookup helper for callers and tests
    pub fn section(&self, kind: SectionKind) -> Option<&Section> {
        self.sections.iter().find(|s| s.kind == kind)
    }
}

/// Flag emoji for a country name, white flag when unknown.
pub fn country_flag(country: &str) -> &'static str {
    match country.trim() {
        "United States" => "🇺🇸",
        "The Netherlands" | "Netherlands" => "🇳🇱",
        "Germany" => "🇩🇪",
        "China" => "🇨🇳",
        "Spain" => "🇪🇸",
        "Canada" => "🇨🇦",
        "Singapore" => "🇸🇬",
        "United Kingdom" => "🇬🇧",
        "France" => "🇫🇷",
        "Russia" => "🇷🇺",
        "India" => "🇮🇳",
        "Japan" => "🇯🇵",
        "Brazil" => "🇧🇷",
        "Mexico" => "🇲🇽",
        "Italy" => "🇮🇹",
        "Australia" => "🇦🇺",
        _ => "🏳️",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(values: &[f64], floor: Option<f64>) -> ChartSeries {
        ChartSeries {
            name: "test".to_string(),
            title: "Test".to_string(),
            value_label: "Value".to_string(),
            kind: ChartKind::HorizontalBar,
            points: values
                .iter()
                .enumerate()
                .map(|(i, v)| ChartPoint {
                    label: format!("p{}", i),
                    value: *v,
                })
                .collect(),
            axis_floor: floor,
        }
    }

    #[test]
    fn test_axis_max_respects_floor() {
        assert_eq!(series(&[40.0, 95.0], Some(100.0)).axis_max(), 100.0);
        assert!((series(&[200.0], Some(100.0)).axis_max() - 210.0).abs() < 1e-9);
        assert!((series(&[10.0], None).axis_max() - 10.5).abs() < 1e-9);
    }

    #[test]
    fn test_country_discrepancy() {
        let mut summary = CountrySummary::new("France", 3);
        summary.entries.push(CountryDetail {
            ip: "1.1.1.1".to_string(),
            location: "Paris".to_string(),
            isp: "OVH".to_string(),
        });
        assert_eq!(summary.actual_count(), 1);
        assert!(summary.has_discrepancy());
    }

    #[test]
    fn test_geo_report_emptiness() {
        let mut geo = GeoReport::default();
        assert!(geo.is_empty());
        geo.summary.insert(GeoStat::Total, "42".to_string());
        assert!(!geo.is_empty());
        assert_eq!(geo.stat(GeoStat::Total), Some("42"));
        assert_eq!(geo.stat(GeoStat::Rate), None);
    }

    #[test]
    fn test_country_flag() {
        assert_eq!(country_flag("France"), "🇫🇷");
        assert_eq!(country_flag("  Japan "), "🇯🇵");
        assert_eq!(country_flag("Atlantis"), "🏳️");
    }

    #[test]
    fn test_geo_summary_serializes_with_stat_keys() {
        let mut geo = GeoReport::default();
        geo.summary.insert(GeoStat::Rate, "91.67".to_string());
        geo.summary.insert(GeoStat::Total, "12".to_string());

        let json = serde_json::to_string(&geo.summary).unwrap();
        assert_eq!(json, r#"{"total":"12","rate":"91.67"}"#);
    }
}
