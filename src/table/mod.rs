// src/table/mod.rs

pub mod locate;
pub mod normalize;
pub mod rows;
pub mod types;

pub use locate::locate_finals_table;
pub use normalize::{clean_cell, normalize_row};
pub use rows::{extract_rows, header_labels, DEFAULT_MAX_ROWS};
pub use types::{FinalRecord, RawCell, TableRow};

use scraper::Html;
use tracing::{debug, instrument};

use crate::error::PipelineError;

/// What one pass over the page produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub headers: Vec<String>,
    pub records: Vec<FinalRecord>,
}

/// Locate the finals table in `doc` and turn its first rows into records.
pub fn extract_final_records(doc: &Html, max_rows: usize) -> Result<Extraction, PipelineError> {
    let table = locate_finals_table(doc).ok_or(PipelineError::TableNotFound)?;
    let headers = header_labels(table);
    debug!(headers = ?headers, "found headers");

    let records: Vec<FinalRecord> = extract_rows(table, max_rows)
        .iter()
        .map(|row| normalize_row(row, &headers))
        .collect();
    if records.is_empty() {
        return Err(PipelineError::NoRows);
    }
    Ok(Extraction { headers, records })
}

/// Parse raw page HTML and extract from it.
#[instrument(level = "debug", skip(html), fields(html_len = html.len()))]
pub fn extract_from_html(html: &str, max_rows: usize) -> Result<Extraction, PipelineError> {
    let doc = Html::parse_document(html);
    extract_final_records(&doc, max_rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_records_from_page() {
        let html = r#"
            <p>Intro</p>
            <table class="wikitable sortable plainrowheaders">
              <tbody>
                <tr><th>Year</th><th>Winners</th><th>Score</th><th>Runners-up</th><th>Venue</th></tr>
                <tr><th scope="row">2018</th><td>France</td><td>4–2</td><td>Croatia</td><td>Moscow</td></tr>
                <tr><th scope="row">2022</th><td>Argentina<sup class="reference">[n 3]</sup></td><td>3–3 (a.e.t.)<br/>(4–2 p)</td><td>France</td><td>Lusail</td></tr>
              </tbody>
            </table>"#;
        let out = extract_from_html(html, DEFAULT_MAX_ROWS).unwrap();
        assert_eq!(out.headers[1], "Winners");
        assert_eq!(out.records.len(), 2);
        assert_eq!(out.records[1].winner, "Argentina");
        assert_eq!(out.records[1].score, "3–3 (a.e.t.)(4–2 p)");
    }

    #[test]
    fn missing_table_is_reported() {
        let html = r#"<table class="wikitable"><tr><th>Team</th></tr></table>"#;
        assert!(matches!(
            extract_from_html(html, DEFAULT_MAX_ROWS),
            Err(PipelineError::TableNotFound)
        ));
    }

    #[test]
    fn table_without_usable_rows_is_reported() {
        let html = r#"<table class="wikitable">
            <tr><th>Year</th><th>Winners</th></tr>
            <tr><td>1930</td><td>Uruguay</td></tr>
        </table>"#;
        assert!(matches!(
            extract_from_html(html, DEFAULT_MAX_ROWS),
            Err(PipelineError::NoRows)
        ));
    }
}
