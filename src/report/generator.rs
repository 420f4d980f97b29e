//! Markdown and JSON report generation.
//!
//! This module renders an assembled [`ReportDocument`]. Charts are drawn
//! as text inside fenced blocks using the [`ChartStyle`] passed in.

use super::chart::{display_label, format_value, render_bar_chart, ChartStyle};
use crate::analysis::COUNTRY_SERIES;
use crate::models::{ChartKind, ChartSeries, ReportDocument, Section, SectionKind};
use anyhow::Result;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(document: &ReportDocument, style: &ChartStyle) -> String {
    let mut output = String::new();

    for section in &document.sections {
        match section.kind {
            SectionKind::Cover => output.push_str(&generate_cover(section)),
            _ => output.push_str(&generate_section(section, document, style)),
        }
    }

    output.push_str(&generate_footer());

    output
}

/// Generate the cover block.
fn generate_cover(section: &Section) -> String {
    let mut cover = String::new();

    cover.push_str(&format!("# {}\n\n", section.heading));
    for paragraph in &section.paragraphs {
        cover.push_str(&format!("*{}*\n\n", paragraph));
    }
    cover.push_str("---\n\n");

    cover
}

/// Generate one data section.
fn generate_section(section: &Section, document: &ReportDocument, style: &ChartStyle) -> String {
    let mut block = String::new();

    block.push_str(&format!("## {}\n\n", section.heading));

    if let Some(ref placeholder) = section.placeholder {
        block.push_str(&format!("> {}\n\n", placeholder));
        return block;
    }

    for paragraph in &section.paragraphs {
        block.push_str(&format!("{}\n\n", paragraph));
    }

    for name in &section.charts {
        if let Some(series) = document.series(name) {
            block.push_str(&generate_chart_block(series, style));
            if series.kind == ChartKind::VerticalBar {
                block.push_str(&generate_series_table(series));
            }
        }
    }

    if let Some(ref heading) = section.groups_heading {
        block.push_str(&format!("### {}\n\n", heading));
    }
    for group in &section.groups {
        let flagged = display_label(&group.label, true, style);
        let header = group.header.replacen(&group.label, &flagged, 1);
        block.push_str(&format!("#### {}\n\n", header));
        for item in &group.items {
            block.push_str(&format!("- {}\n", item));
        }
        block.push('\n');
    }

    block
}

/// A chart inside a fenced text block.
fn generate_chart_block(series: &ChartSeries, style: &ChartStyle) -> String {
    let chart = render_bar_chart(series, style, series.name == COUNTRY_SERIES);
    format!("```text\n{}```\n\n", chart)
}

/// The values of a series as a Markdown table.
fn generate_series_table(series: &ChartSeries) -> String {
    let mut table = String::new();

    table.push_str(&format!("| Label | {} |\n", series.value_label));
    table.push_str("|:---|---:|\n");
    for point in &series.points {
        table.push_str(&format!(
            "| {} | {} |\n",
            point.label,
            format_value(point.value)
        ));
    }
    table.push('\n');

    table
}

/// Generate the report footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str(&format!(
        "*Report generated by iocreport v{}*\n",
        env!("CARGO_PKG_VERSION")
    ));

    footer
}

/// Generate a JSON report.
pub fn generate_json_report(document: &ReportDocument) -> Result<String> {
    serde_json::to_string_pretty(document).map_err(Into::into)
}
