//! Report assembly.
//!
//! Turns the parsed inputs into an ordered list of renderer-agnostic
//! sections plus the chart series they reference. Missing inputs become
//! placeholder sections; numbers are never invented for them.

use crate::analysis::{
    self, category_score_series, category_series, country_series, indicator_series, score_stats,
};
use crate::models::{
    CategoryRecord, ChartSeries, CountrySummary, DetailGroup, GeoReport, GeoStat,
    IndicatorReport, ParsedInputs, ReportDocument, Section, SectionKind,
};
use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, warn};

pub const CATEGORIES_PLACEHOLDER: &str = "No data available in the categories report.";
pub const RANKING_PLACEHOLDER: &str =
    "No data available. No IPs and scores could be extracted from the full report.";
pub const GEO_PLACEHOLDER: &str = "No valid data found in the geolocation report.";

/// Conditions that stop a report from being produced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReportError {
    #[error("No usable data in any of the three input reports; nothing to render")]
    NoUsableData,
}

/// Content settings for one document.
#[derive(Debug, Clone)]
pub struct AssembleOptions {
    pub title: String,
    pub subtitle: String,
    /// Indicators shown in the ranking chart.
    pub top_n: usize,
    pub generated_at: DateTime<Utc>,
}

impl AssembleOptions {
    pub fn from_config(config: &crate::config::ReportConfig) -> Self {
        Self {
            title: config.title.clone(),
            subtitle: config.subtitle.clone(),
            top_n: config.top_n,
            generated_at: Utc::now(),
        }
    }
}

/// Build the document, or refuse when no input had usable data.
pub fn assemble(
    inputs: &ParsedInputs,
    options: &AssembleOptions,
) -> Result<ReportDocument, ReportError> {
    if !inputs.has_usable_data() {
        return Err(ReportError::NoUsableData);
    }

    let mut document = ReportDocument {
        title: options.title.clone(),
        subtitle: options.subtitle.clone(),
        generated_at: options.generated_at,
        sections: Vec::new(),
        series: Vec::new(),
    };

    document.sections.push(cover_section(options));
    document
        .sections
        .push(categories_section(&inputs.categories, &mut document.series));
    document.sections.push(ranking_section(
        &inputs.indicators,
        options.top_n,
        &mut document.series,
    ));
    document
        .sections
        .push(geolocation_section(&inputs.geo, &mut document.series));

    debug!(
        "Assembled {} sections with {} chart series",
        document.sections.len(),
        document.series.len()
    );

    Ok(document)
}

fn cover_section(options: &AssembleOptions) -> Section {
    let mut section = Section::new(SectionKind::Cover, options.title.clone());
    section.paragraphs.push(options.subtitle.clone());
    section.paragraphs.push(format!(
        "Generated on: {}",
        options.generated_at.format("%Y-%m-%d %H:%M UTC")
    ));
    section
}

fn categories_section(
    records: &[CategoryRecord],
    series: &mut Vec<ChartSeries>,
) -> Section {
    let mut section = Section::new(SectionKind::Categories, "1. Threat Category Summary");

    if records.is_empty() {
        warn!("Categories report produced no records");
        section.placeholder = Some(CATEGORIES_PLACEHOLDER.to_string());
        return section;
    }

    let counts = category_series(records);
    let scores = category_score_series(records);
    let total = analysis::total_category_count(records);

    section.paragraphs.push(format!(
        "Categories: {}. IPs across all categories: {}.",
        records.len(),
        total
    ));
    if let Some(top) = analysis::sort_categories(records).first() {
        section.paragraphs.push(format!(
            "The largest category is {} with {} IPs and an average score of {:.2}.",
            top.category, top.count, top.avg_score
        ));
    }

    section.charts.push(counts.name.clone());
    section.charts.push(scores.name.clone());
    series.push(counts);
    series.push(scores);

    section
}

fn ranking_section(
    report: &IndicatorReport,
    top_n: usize,
    series: &mut Vec<ChartSeries>,
) -> Section {
    let mut section = Section::new(SectionKind::Ranking, "2. Risk Ranking (Top Scores)");

    let Some(stats) = score_stats(&report.records) else {
        warn!("Full report produced no indicators with a score");
        section.placeholder = Some(RANKING_PLACEHOLDER.to_string());
        return section;
    };

    let ranking = indicator_series(&report.records, top_n);

    section.paragraphs.push(format!(
        "Indicators with a risk score: {} (report blocks scanned: {}).",
        report.blocks_matched, report.blocks_scanned
    ));
    if report.blocks_skipped() > 0 {
        section.paragraphs.push(format!(
            "Blocks left out for a missing IP or score: {}.",
            report.blocks_skipped()
        ));
    }
    section.paragraphs.push(format!(
        "Scores range from {} to {} with a mean of {:.1}. The chart shows the top {}.",
        stats.min,
        stats.max,
        stats.mean,
        ranking.len()
    ));

    section.charts.push(ranking.name.clone());
    series.push(ranking);

    section
}

fn geolocation_section(geo: &GeoReport, series: &mut Vec<ChartSeries>) -> Section {
    let mut section = Section::new(SectionKind::Geolocation, "3. IP Geolocation Analysis");

    if geo.is_empty() {
        warn!("Geolocation report produced no usable data");
        section.placeholder = Some(GEO_PLACEHOLDER.to_string());
        return section;
    }

    if let Some(sentence) = summary_sentence(geo) {
        section.paragraphs.push(sentence);
    }

    if geo.countries.is_empty() {
        section
            .paragraphs
            .push("The report has no per-country distribution.".to_string());
        return section;
    }

    let countries = country_series(geo);
    section.charts.push(countries.name.clone());
    series.push(countries);

    section.groups_heading = Some("IP details by location".to_string());
    section.groups = geo.countries.iter().map(country_group).collect();

    section
}

/// One sentence from whichever stats were present.
fn summary_sentence(geo: &GeoReport) -> Option<String> {
    let parts: Vec<String> = GeoStat::ALL
        .iter()
        .filter_map(|stat| {
            geo.stat(*stat).map(|value| match stat {
                GeoStat::Rate => format!("{}: {}%", stat, value),
                _ => format!("{}: {}", stat, value),
            })
        })
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(format!("{}.", parts.join(". ")))
    }
}

/// The header shows the parsed line count; a differing declared count is shown next to it.
fn country_group(country: &CountrySummary) -> DetailGroup {
    let header = if country.has_discrepancy() {
        format!(
            "{} ({} IPs, {} declared)",
            country.country,
            country.actual_count(),
            country.declared_count
        )
    } else {
        format!("{} ({} IPs)", country.country, country.actual_count())
    };

    DetailGroup {
        label: country.country.clone(),
        header,
        items: country
            .entries
            .iter()
            .map(|e| format!("{} - {} ({})", e.ip, e.location, e.isp))
            .collect(),
    }
}
