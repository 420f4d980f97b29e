//! Chart series and statistics.
//!
//! Pure functions that turn parsed records into display-ready series.
//! Inputs are borrowed and never reordered in place; every sort is stable
//! so ties keep their source order.

use crate::models::{
    CategoryRecord, ChartKind, ChartPoint, ChartSeries, GeoReport, IndicatorRecord, ScoreStats,
};
use std::cmp::Reverse;

/// Number of indicators shown in the ranking chart by default.
pub const DEFAULT_TOP_N: usize = 15;

/// Risk scores are drawn on an axis reaching at least this value.
pub const SCORE_AXIS_FLOOR: f64 = 100.0;

pub const CATEGORY_SERIES: &str = "category_counts";
pub const CATEGORY_SCORE_SERIES: &str = "category_scores";
pub const INDICATOR_SERIES: &str = "top_indicators";
pub const COUNTRY_SERIES: &str = "country_counts";

/// Categories ordered by indicator count, highest first.
pub fn sort_categories(records: &[CategoryRecord]) -> Vec<&CategoryRecord> {
    let mut sorted: Vec<&CategoryRecord> = records.iter().collect();
    sorted.sort_by_key(|r| Reverse(r.count));
    sorted
}

/// Indicator counts per category, as vertical bars.
pub fn category_series(records: &[CategoryRecord]) -> ChartSeries {
    ChartSeries {
        name: CATEGORY_SERIES.to_string(),
        title: "IoC Distribution by Category".to_string(),
        value_label: "Total IPs".to_string(),
        kind: ChartKind::VerticalBar,
        points: sort_categories(records)
            .into_iter()
            .map(|r| point(&r.category, r.count as f64))
            .collect(),
        axis_floor: None,
    }
}

/// Average score per category, in the same order as [`category_series`].
pub fn category_score_series(records: &[CategoryRecord]) -> ChartSeries {
    ChartSeries {
        name: CATEGORY_SCORE_SERIES.to_string(),
        title: "Average Risk Score by Category".to_string(),
        value_label: "Average score".to_string(),
        kind: ChartKind::VerticalBar,
        points: sort_categories(records)
            .into_iter()
            .map(|r| point(&r.category, r.avg_score))
            .collect(),
        axis_floor: Some(SCORE_AXIS_FLOOR),
    }
}

/// The `n` highest-scoring indicators.
pub fn top_indicators(records: &[IndicatorRecord], n: usize) -> Vec<IndicatorRecord> {
    let mut sorted: Vec<IndicatorRecord> = records.to_vec();
    sorted.sort_by_key(|r| Reverse(r.score));
    sorted.truncate(n);
    sorted
}

/// Ranking of the `n` highest-scoring indicators, as horizontal bars.
pub fn indicator_series(records: &[IndicatorRecord], n: usize) -> ChartSeries {
    let top = top_indicators(records, n);

    ChartSeries {
        name: INDICATOR_SERIES.to_string(),
        title: format!("Top {} Indicators by Risk Score", top.len()),
        value_label: "Mandiant Score".to_string(),
        kind: ChartKind::HorizontalBar,
        points: top
            .iter()
            .map(|r| point(&r.indicator, f64::from(r.score)))
            .collect(),
        axis_floor: Some(SCORE_AXIS_FLOOR),
    }
}

/// IPs per country, taken from the declared header counts.
pub fn country_series(geo: &GeoReport) -> ChartSeries {
    let mut countries: Vec<_> = geo.countries.iter().collect();
    countries.sort_by_key(|c| Reverse(c.declared_count));

    ChartSeries {
        name: COUNTRY_SERIES.to_string(),
        title: "Detected IPs by Country".to_string(),
        value_label: "IP count".to_string(),
        kind: ChartKind::HorizontalBar,
        points: countries
            .into_iter()
            .map(|c| point(&c.country, c.declared_count as f64))
            .collect(),
        axis_floor: None,
    }
}

/// Min, max and mean of all indicator scores.
pub fn score_stats(records: &[IndicatorRecord]) -> Option<ScoreStats> {
    let min = records.iter().map(|r| r.score).min()?;
    let max = records.iter().map(|r| r.score).max()?;
    let total: u64 = records.iter().map(|r| u64::from(r.score)).sum();

    Some(ScoreStats {
        count: records.len(),
        min,
        max,
        mean: total as f64 / records.len() as f64,
    })
}

/// Total indicators across all categories, saturating at `u64::MAX`.
pub fn total_category_count(records: &[CategoryRecord]) -> u64 {
    records.iter().map(|r| r.count).fold(0, u64::saturating_add)
}

fn point(label: &str, value: f64) -> ChartPoint {
    ChartPoint {
        label: label.to_string(),
        value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CountrySummary;

    fn category(name: &str, count: u64, avg: f64) -> CategoryRecord {
        CategoryRecord {
            category: name.to_string(),
            count,
            avg_score: avg,
        }
    }

    fn indicator(name: &str, score: u32) -> IndicatorRecord {
        IndicatorRecord {
            indicator: name.to_string(),
            score,
        }
    }

    #[test]
    fn test_category_series_sorted_stable() {
        let records = vec![
            category("Spam", 3, 20.0),
            category("Botnet", 12, 80.0),
            category("Phishing", 3, 60.0),
        ];
        let series = category_series(&records);
        let labels: Vec<_> = series.points.iter().map(|p| p.label.as_str()).collect();

        assert_eq!(labels, vec!["Botnet", "Spam", "Phishing"]);
        assert_eq!(series.points[0].value, 12.0);
        assert_eq!(series.kind, ChartKind::VerticalBar);
        // input untouched
        assert_eq!(records[0].category, "Spam");
    }

    #[test]
    fn test_category_score_series_follows_count_order() {
        let records = vec![category("Spam", 3, 20.0), category("Botnet", 12, 80.0)];
        let series = category_score_series(&records);
        assert_eq!(series.points[0].label, "Botnet");
        assert_eq!(series.points[0].value, 80.0);
    }

    #[test]
    fn test_top_indicators_truncates_and_keeps_ties() {
        let records = vec![
            indicator("a", 50),
            indicator("b", 90),
            indicator("c", 50),
            indicator("d", 10),
        ];
        let top = top_indicators(&records, 3);

        assert_eq!(top.len(), 3);
        assert_eq!(top[0].indicator, "b");
        assert_eq!(top[1].indicator, "a");
        assert_eq!(top[2].indicator, "c");
    }

    #[test]
    fn test_top_indicators_idempotent() {
        let records: Vec<_> = (0..30)
            .map(|i| indicator(&format!("10.0.0.{}", i), (i * 7 % 11) as u32))
            .collect();
        let first = top_indicators(&records, DEFAULT_TOP_N);
        let second = top_indicators(&records, DEFAULT_TOP_N);
        assert_eq!(first, second);
        assert_eq!(top_indicators(&first, DEFAULT_TOP_N), first);
    }

    #[test]
    fn test_indicator_series_axis() {
        let series = indicator_series(&[indicator("x", 40)], DEFAULT_TOP_N);
        assert_eq!(series.kind, ChartKind::HorizontalBar);
        assert_eq!(series.axis_floor, Some(SCORE_AXIS_FLOOR));
        assert_eq!(series.axis_max(), 100.0);
        assert_eq!(series.title, "Top 1 Indicators by Risk Score");
    }

    #[test]
    fn test_country_series_uses_declared_counts() {
        let france = CountrySummary::new("France", 3);
        let geo = GeoReport {
            summary: Default::default(),
            countries: vec![CountrySummary::new("Spain", 1), france],
        };
        let series = country_series(&geo);

        assert_eq!(series.points[0].label, "France");
        assert_eq!(series.points[0].value, 3.0);
        assert_eq!(series.points[1].label, "Spain");
    }

    #[test]
    fn test_score_stats() {
        assert!(score_stats(&[]).is_none());

        let stats = score_stats(&[indicator("a", 10), indicator("b", 30)]).unwrap();
        assert_eq!(stats.count, 2);
        assert_eq!(stats.min, 10);
        assert_eq!(stats.max, 30);
        assert_eq!(stats.mean, 20.0);
    }

    #[test]
    fn test_total_category_count() {
        let records = vec![category("a", 2, 0.0), category("b", 5, 0.0)];
        assert_eq!(total_category_count(&records), 7);
    }

    #[test]
    fn test_total_category_count_saturates() {
        let records = vec![category("a", u64::MAX, 1.0), category("b", 1, 2.0)];
        assert_eq!(total_category_count(&records), u64::MAX);
    }
}
