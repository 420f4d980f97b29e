//! Parser for the geolocation report.
//!
//! The report has a free-form statistics block followed by a per-country
//! distribution:
//!
//! ```text
//! Total IPs analyzed: 12
//! Successful lookups: 11
//! Failed lookups: 1
//! Success rate: 91.67%
//! Unique countries found: 3
//!
//! DISTRIBUTION BY COUNTRY:
//! France (2 IPs):
//!   • 51.15.0.1 - Paris, Île-de-France (Scaleway)
//!   • 51.15.0.2 - Roubaix, Hauts-de-France (OVH SAS)
//! ```
//!
//! Both passes are independent: a report with statistics but no
//! distribution (or the reverse) still yields a partial [`GeoReport`].

use crate::models::{CountryDetail, CountrySummary, GeoReport, GeoStat};
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

static STAT_PATTERNS: LazyLock<Vec<(GeoStat, Regex)>> = LazyLock::new(|| {
    [
        (
            GeoStat::Total,
            r"(?im)^[^\p{L}\n]*(?:Total IPs analyzed|Total de IPs analizadas)\s*:\s*(\d+)",
        ),
        (
            GeoStat::Success,
            r"(?im)^[^\p{L}\n]*(?:Successful lookups|Successful|Geolocalizaciones exitosas|Exitosas)\s*:\s*(\d+)",
        ),
        (
            GeoStat::Failure,
            r"(?im)^[^\p{L}\n]*(?:Failed lookups|Failed|Geolocalizaciones fallidas|Fallidas)\s*:\s*(\d+)",
        ),
        (
            GeoStat::Rate,
            r"(?im)^[^\p{L}\n]*(?:Success rate|Tasa de éxito)\s*:\s*(\d+(?:\.\d+)?)\s*%?",
        ),
        (
            GeoStat::Countries,
            r"(?im)^[^\p{L}\n]*(?:Unique countries found|Unique countries|Países únicos encontrados)\s*:\s*(\d+)",
        ),
    ]
    .into_iter()
    .map(|(stat, pattern)| (stat, Regex::new(pattern).expect("geo stat pattern")))
    .collect()
});

static DISTRIBUTION_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)DISTRIBUTION BY COUNTRY:?|DISTRIBUCIÓN POR PAÍS:?")
        .expect("distribution marker pattern")
});

/// `France (3 IPs):`
static COUNTRY_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\p{L}[\p{L}\s.'-]*?)\s*\((\d+)\s*IPs?\)\s*:").expect("country header pattern")
});

/// `• 51.15.0.1 - Paris, Île-de-France (Scaleway)`
static DETAIL_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*•\s*([0-9A-Fa-f.:]+)\s+-\s+(.*?)\s+\((.*?)\)").expect("detail line pattern")
});

/// Scanner position inside the distribution section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    /// No country header seen yet.
    NoCountry,
    /// Detail lines belong to `countries[index]`.
    InCountry(usize),
}

/// Parse both the statistics block and the country distribution.
pub fn parse_geolocation(text: &str) -> GeoReport {
    let report = GeoReport {
        summary: parse_summary(text),
        countries: parse_distribution(text),
    };

    if report.is_empty() {
        debug!("Geolocation report contained no usable data");
    }

    report
}

fn parse_summary(text: &str) -> std::collections::BTreeMap<GeoStat, String> {
    STAT_PATTERNS
        .iter()
        .filter_map(|(stat, regex)| {
            regex
                .captures(text)
                .map(|caps| (*stat, caps[1].to_string()))
        })
        .collect()
}

fn parse_distribution(text: &str) -> Vec<CountrySummary> {
    let Some(marker) = DISTRIBUTION_MARKER.find(text) else {
        debug!("No country distribution section in geolocation report");
        return Vec::new();
    };

    let mut countries: Vec<CountrySummary> = Vec::new();
    let mut cursor = Cursor::NoCountry;

    for line in text[marker.end()..].lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(caps) = COUNTRY_HEADER.captures(line) {
            let name = caps[1].trim();
            let Ok(declared) = caps[2].parse::<u64>() else {
                debug!("Skipping country header with bad count: {:?}", line);
                continue;
            };
            cursor = Cursor::InCountry(start_country(&mut countries, name, declared));
            continue;
        }

        let Some(caps) = DETAIL_LINE.captures(line) else {
            continue;
        };
        let detail = CountryDetail {
            ip: caps[1].to_string(),
            location: caps[2].trim().to_string(),
            isp: caps[3].trim().to_string(),
        };

        match cursor {
            Cursor::InCountry(index) => countries[index].entries.push(detail),
            Cursor::NoCountry => debug!("Dropping IP line before any country header: {}", detail.ip),
        }
    }

    countries
}

/// Open a country list and return its index. A repeated header replaces
/// the earlier list in place.
fn start_country(countries: &mut Vec<CountrySummary>, name: &str, declared: u64) -> usize {
    if let Some(index) = countries.iter().position(|c| c.country == name) {
        warn!(
            "Country '{}' appears twice in the distribution; keeping the later list",
            name
        );
        countries[index] = CountrySummary::new(name, declared);
        return index;
    }

    countries.push(CountrySummary::new(name, declared));
    countries.len() - 1
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
=== GEOLOCATION REPORT ===
Total IPs analyzed: 12
Successful lookups: 11
Failed lookups: 1
Success rate: 91.67%
Unique countries found: 3

DISTRIBUTION BY COUNTRY:
France (3 IPs):
  • 51.15.0.1 - Paris, Île-de-France (Scaleway)
  • 51.15.0.2 - Roubaix, Hauts-de-France (OVH SAS)
United States (1 IPs):
  • 8.8.8.8 - Mountain View, California (Google LLC)
";

    #[test]
    fn test_summary_stats() {
        let report = parse_geolocation(SAMPLE);

        assert_eq!(report.stat(GeoStat::Total), Some("12"));
        assert_eq!(report.stat(GeoStat::Success), Some("11"));
        assert_eq!(report.stat(GeoStat::Failure), Some("1"));
        assert_eq!(report.stat(GeoStat::Rate), Some("91.67"));
        assert_eq!(report.stat(GeoStat::Countries), Some("3"));
    }

    #[test]
    fn test_total_only() {
        let report = parse_geolocation("Total IPs analyzed: 42");
        assert_eq!(report.stat(GeoStat::Total), Some("42"));
        assert_eq!(report.summary.len(), 1);
        assert!(report.countries.is_empty());

        let report = parse_geolocation("Success rate: 50%");
        assert!(report.stat(GeoStat::Total).is_none());
    }

    #[test]
    fn test_spanish_labels() {
        let text = "Total de IPs analizadas: 7\nTasa de éxito: 100.0%\nPaíses únicos encontrados: 2\n\
                    DISTRIBUCIÓN POR PAÍS:\nSpain (1 IPs):\n • 1.2.3.4 - Madrid (Telefonica)\n";
        let report = parse_geolocation(text);

        assert_eq!(report.stat(GeoStat::Total), Some("7"));
        assert_eq!(report.stat(GeoStat::Rate), Some("100.0"));
        assert_eq!(report.stat(GeoStat::Countries), Some("2"));
        assert_eq!(report.countries.len(), 1);
        assert_eq!(report.countries[0].entries[0].location, "Madrid");
    }

    #[test]
    fn test_declared_count_discrepancy_is_preserved() {
        let report = parse_geolocation(SAMPLE);
        let france = report.country("France").unwrap();

        assert_eq!(france.declared_count, 3);
        assert_eq!(france.entries.len(), 2);
        assert!(france.has_discrepancy());
        assert_eq!(france.entries[1].isp, "OVH SAS");
        assert_eq!(france.entries[1].location, "Roubaix, Hauts-de-France");
    }

    #[test]
    fn test_country_order_follows_source() {
        let report = parse_geolocation(SAMPLE);
        let names: Vec<_> = report.countries.iter().map(|c| c.country.as_str()).collect();
        assert_eq!(names, vec!["France", "United States"]);
    }

    #[test]
    fn test_orphan_detail_lines_are_dropped() {
        let text = "DISTRIBUTION BY COUNTRY:\n• 9.9.9.9 - Zurich (Quad9)\nGermany (1 IPs):\n• 5.5.5.5 - Berlin (Hetzner)\n";
        let report = parse_geolocation(text);

        assert_eq!(report.countries.len(), 1);
        assert_eq!(report.countries[0].entries.len(), 1);
        assert_eq!(report.countries[0].entries[0].ip, "5.5.5.5");
    }

    #[test]
    fn test_labels_match_whole_words() {
        let report = parse_geolocation("Unsuccessful lookups: 4\nSuccessful lookups: 8\n");
        assert_eq!(report.stat(GeoStat::Success), Some("8"));

        let report = parse_geolocation("Unsuccessful lookups: 4\n");
        assert!(report.stat(GeoStat::Success).is_none());

        let report = parse_geolocation("  ✅ Successful lookups: 8\n- Failed: 1\n");
        assert_eq!(report.stat(GeoStat::Success), Some("8"));
        assert_eq!(report.stat(GeoStat::Failure), Some("1"));
    }

    #[test]
    fn test_repeated_header_overwrites() {
        let text = "DISTRIBUTION BY COUNTRY:\n\
                    Japan (2 IPs):\n• 1.1.1.1 - Tokyo (NTT)\n\
                    China (1 IPs):\n• 2.2.2.2 - Beijing (China Telecom)\n\
                    Japan (1 IPs):\n• 3.3.3.3 - Osaka (KDDI)\n";
        let report = parse_geolocation(text);

        assert_eq!(report.countries.len(), 2);
        assert_eq!(report.countries[0].country, "Japan");
        assert_eq!(report.countries[0].declared_count, 1);
        assert_eq!(report.countries[0].entries.len(), 1);
        assert_eq!(report.countries[0].entries[0].ip, "3.3.3.3");
    }

    #[test]
    fn test_missing_distribution_section() {
        let report = parse_geolocation("France (1 IPs):\n• 1.1.1.1 - Paris (OVH)\n");
        assert!(report.countries.is_empty());
        assert!(report.is_empty());
    }

    #[test]
    fn test_malformed_detail_lines_are_ignored() {
        let text = "DISTRIBUTION BY COUNTRY:\nItaly (2 IPs):\n• not an ip line\n• 4.4.4.4 - Rome (Aruba)\n";
        let report = parse_geolocation(text);
        assert_eq!(report.countries[0].entries.len(), 1);
    }
}
