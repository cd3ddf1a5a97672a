// src/table/locate.rs

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, trace};

use super::rows::{cell_text, row_cells, table_rows};

static DATA_TABLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("table.wikitable").expect("data table selector should parse"));

/// Header keywords that mark the finals table.
const HEADER_KEYWORDS: &[&str] = &["year", "final"];

fn header_text(table: ElementRef<'_>) -> String {
    table_rows(table)
        .first()
        .map(|row| row_cells(*row).into_iter().map(cell_text).collect::<String>())
        .unwrap_or_default()
        .to_lowercase()
}

/// First `table.wikitable` whose header row mentions a year or a final.
///
/// First match wins; later tables are not considered.
pub fn locate_finals_table(doc: &Html) -> Option<ElementRef<'_>> {
    for (idx, table) in doc.select(&DATA_TABLE).enumerate() {
        let text = header_text(table);
        trace!(table = idx, header = %text, "checking candidate table");
        if HEADER_KEYWORDS.iter().any(|kw| text.contains(kw)) {
            debug!(table = idx, "finals table located");
            return Some(table);
        }
    }
    debug!("no candidate table matched");
    None
}
