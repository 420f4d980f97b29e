//! Parser for the full indicator report.
//!
//! Entries are separated by long dash lines. Each entry carries an IP
//! marker line and a score marker line somewhere inside the block:
//!
//! ```text
//! 🔍 IP: 185.220.101.4
//! 📊 Mandiant Score: 87
//! ------------------------------------------------------------
//! ```

use crate::models::{IndicatorRecord, IndicatorReport};
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

/// Length of the dash line the report generator writes between entries.
pub const DEFAULT_SEPARATOR_LEN: usize = 60;

static IP_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)(?:🔍[ \t]*|^[ \t]*)IP:[ \t]*(.*)$").expect("IP marker pattern")
});

static SCORE_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)(?:📊[ \t]*|^[ \t]*)(?:Mandiant[ \t]+)?Score:[ \t]*(\d+)")
        .expect("score marker pattern")
});

/// Extract indicator records from the report.
///
/// Text without a single separator line is not treated as a block list
/// and yields an empty report.
pub fn parse_indicators(text: &str, separator_len: usize) -> IndicatorReport {
    let mut report = IndicatorReport::default();

    let Some(blocks) = split_blocks(text, separator_len) else {
        debug!("No block separators found in full report");
        return report;
    };

    for block in blocks {
        let block = block.trim();
        if block.is_empty() {
            continue;
        }
        report.blocks_scanned += 1;

        match parse_block(block) {
            Some(record) => {
                report.records.push(record);
                report.blocks_matched += 1;
            }
            None => debug!("Block without IP and score markers skipped"),
        }
    }

    debug!(
        "Scanned {} blocks, extracted {} indicators",
        report.blocks_scanned, report.blocks_matched
    );
    if report.blocks_scanned > 0 && report.blocks_matched == 0 {
        warn!(
            "None of the {} blocks in the full report contained both an IP and a score",
            report.blocks_scanned
        );
    }

    report
}

fn is_separator(line: &str, separator_len: usize) -> bool {
    let line = line.trim();
    line.len() >= separator_len.max(1) && line.bytes().all(|b| b == b'-')
}

/// Split on separator lines; `None` when there are none.
fn split_blocks(text: &str, separator_len: usize) -> Option<Vec<String>> {
    let mut blocks = Vec::new();
    let mut current = String::new();
    let mut seen_separator = false;

    for line in text.lines() {
        if is_separator(line, separator_len) {
            seen_separator = true;
            blocks.push(std::mem::take(&mut current));
        } else {
            current.push_str(line);
            current.push('\n');
        }
    }
    blocks.push(current);

    seen_separator.then_some(blocks)
}

fn parse_block(block: &str) -> Option<IndicatorRecord> {
    let indicator = IP_MARKER
        .captures(block)
        .map(|caps| caps[1].trim().to_string())
        .filter(|ip| !ip.is_empty())?;
    let score = SCORE_MARKER
        .captures(block)
        .and_then(|caps| caps[1].parse::<u32>().ok())?;

    Some(IndicatorRecord { indicator, score })
}
