//! Fixed-width text bar charts.
//!
//! Styling is passed in with every call; nothing here keeps state between
//! charts.

use crate::models::{country_flag, ChartKind, ChartSeries};
use serde::{Deserialize, Serialize};

/// How bars are drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartStyle {
    /// Glyph repeated to draw a bar.
    #[serde(default = "default_bar_glyph")]
    pub bar_glyph: String,

    /// Width of the longest possible bar, in glyphs.
    #[serde(default = "default_max_bar_width")]
    pub max_bar_width: usize,

    /// Labels longer than this are cut with an ellipsis.
    #[serde(default = "default_label_width")]
    pub label_width: usize,

    /// Print the value after each bar.
    #[serde(default = "default_true")]
    pub show_values: bool,

    /// Prefix country labels with their flag.
    #[serde(default = "default_true")]
    pub country_flags: bool,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            bar_glyph: default_bar_glyph(),
            max_bar_width: default_max_bar_width(),
            label_width: default_label_width(),
            show_values: true,
            country_flags: true,
        }
    }
}

fn default_bar_glyph() -> String {
    "█".to_string()
}

fn default_max_bar_width() -> usize {
    40
}

fn default_label_width() -> usize {
    32
}

fn default_true() -> bool {
    true
}

/// Label as displayed in charts and listings.
pub fn display_label(label: &str, is_country: bool, style: &ChartStyle) -> String {
    if is_country && style.country_flags {
        format!("{} {}", country_flag(label), label)
    } else {
        label.to_string()
    }
}

/// Draw a series as text. Vertical bar series are drawn sideways too;
/// the kind only changes the header line.
pub fn render_bar_chart(series: &ChartSeries, style: &ChartStyle, country_labels: bool) -> String {
    let mut chart = String::new();

    chart.push_str(&format!("{}\n", series.title));
    let orientation = match series.kind {
        ChartKind::VerticalBar => "columns",
        ChartKind::HorizontalBar => "bars",
    };
    chart.push_str(&format!(
        "({} {}, scale 0-{})\n\n",
        series.value_label,
        orientation,
        format_value(series.axis_max())
    ));

    if series.is_empty() {
        return chart;
    }

    let labels: Vec<String> = series
        .points
        .iter()
        .map(|p| truncate(&display_label(&p.label, country_labels, style), style.label_width))
        .collect();
    let pad = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let axis_max = series.axis_max();

    for (label, point) in labels.iter().zip(&series.points) {
        let width = bar_width(point.value, axis_max, style.max_bar_width);
        let fill = pad - label.chars().count();
        chart.push_str(&format!(
            "{}{} │{}",
            label,
            " ".repeat(fill),
            style.bar_glyph.repeat(width)
        ));
        if style.show_values {
            chart.push_str(&format!(" {}", format_value(point.value)));
        }
        chart.push('\n');
    }

    chart
}

/// Bar length scaled to the axis; any positive value gets at least one glyph.
fn bar_width(value: f64, axis_max: f64, max_width: usize) -> usize {
    if value <= 0.0 || axis_max <= 0.0 || max_width == 0 {
        return 0;
    }
    let width = (value / axis_max * max_width as f64).round() as usize;
    width.clamp(1, max_width)
}

/// Whole numbers without decimals, everything else with two.
pub fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}

fn truncate(label: &str, max: usize) -> String {
    if label.chars().count() <= max || max == 0 {
        return label.to_string();
    }
    let kept: String = label.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", kept)
}
