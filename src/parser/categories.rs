//! Parser for the categories report.
//!
//! The report is a pipe-delimited table:
//!
//! ```text
//! Categoría            | IPs | Score promedio
//! =============================================
//! Botnet               | 12  | 78.50
//! Phishing             |  4  | 61.25
//! ```

use crate::models::CategoryRecord;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// `<label> | <integer> | <decimal>`; `=` is excluded from labels so rule lines never match.
static CATEGORY_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([^|=]+?)\s*\|\s*(\d+)\s*\|\s*([\d.]+)").expect("category line pattern")
});

/// Extract one record per matching line.
pub fn parse_categories(text: &str) -> Vec<CategoryRecord> {
    text.lines().filter_map(parse_line).collect()
}

fn parse_line(line: &str) -> Option<CategoryRecord> {
    let caps = CATEGORY_LINE.captures(line)?;

    let category = caps[1].trim();
    let count = caps[2].parse::<u64>();
    let avg_score = caps[3].parse::<f64>();

    match (count, avg_score) {
        (Ok(count), Ok(avg_score)) if !category.is_empty() => Some(CategoryRecord {
            category: category.to_string(),
            count,
            avg_score,
        }),
        _ => {
            debug!("Skipping malformed category line: {:?}", line);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_table() {
        let text = "\
Categoría            | IPs | Score promedio
=============================================
Botnet               | 12  | 78.50
  Phishing|4|61.25
";
        let records = parse_categories(text);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].category, "Botnet");
        assert_eq!(records[0].count, 12);
        assert_eq!(records[0].avg_score, 78.5);
        assert_eq!(records[1].category, "Phishing");
        assert_eq!(records[1].count, 4);
        assert_eq!(records[1].avg_score, 61.25);
    }

    #[test]
    fn test_malformed_numbers_are_skipped() {
        let text = "Botnet | 12 | 1.2.3\nMalware | 99999999999999999999999 | 5.0\nSpam | 3 | 40.0";
        let records = parse_categories(text);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].category, "Spam");
    }

    #[test]
    fn test_duplicates_are_kept() {
        let records = parse_categories("Botnet | 1 | 10\nBotnet | 2 | 20");
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].count, 2);
    }

    #[test]
    fn test_non_matching_text_is_empty() {
        assert!(parse_categories("").is_empty());
        assert!(parse_categories("no table here\n| 1 | 2").is_empty());
    }
}
