// src/table/normalize.rs

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

use super::types::{FinalRecord, TableRow};

static REFERENCE_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\[.*?\]").expect("reference marker regex should compile"));
static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex should compile"));

/// Numeric entities that survive in raw cell markup.
const ENTITIES: &[(&str, &str)] = &[
    ("&#160;", " "),
    ("&nbsp;", " "),
    ("&#91;", "["),
    ("&#93;", "]"),
];

fn decode_entities(s: &str) -> String {
    ENTITIES
        .iter()
        .fold(s.to_owned(), |acc, (from, to)| acc.replace(from, to))
}

/// Clean one cell's visible text.
///
/// 1) trim
/// 2) drop `[...]` reference markers, newlines inside them included
/// 3) decode the handful of entities Wikipedia leaves in cell text
/// 4) collapse whitespace runs (U+00A0 included) to one space
///
/// Steps 2 and 3 repeat until the text stops changing, since decoding can
/// reveal a marker and stripping can splice an entity back together. The
/// output holds neither, so a second pass is a no-op.
pub fn clean_cell(raw: &str) -> String {
    let mut text = raw.trim().to_owned();
    loop {
        let next = decode_entities(&REFERENCE_MARKER.replace_all(&text, ""));
        if next == text {
            break;
        }
        text = next;
    }
    WHITESPACE_RUN.replace_all(&text, " ").trim().to_owned()
}

/// Map a row onto the fixed four-field record by position.
///
/// `headers` only helps diagnose oddly shaped tables; column order is never
/// remapped from label text.
pub fn normalize_row(row: &TableRow, headers: &[String]) -> FinalRecord {
    if headers.len() < 4 {
        trace!(headers = ?headers, "header row has fewer than 4 labels");
    }
    FinalRecord {
        year: clean_cell(row.cell(0)),
        winner: clean_cell(row.cell(1)),
        score: clean_cell(row.cell(2)),
        runners_up: clean_cell(row.cell(3)),
    }
}
