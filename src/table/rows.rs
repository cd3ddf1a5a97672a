// src/table/rows.rs

use scraper::ElementRef;
use tracing::{debug, trace};

use super::types::TableRow;

/// Rows need at least this many cells to become a record.
pub const MIN_CELLS: usize = 4;

/// Default positional window after the header row.
pub const DEFAULT_MAX_ROWS: usize = 10;

/// Every `<tr>` that belongs to `table` itself, in document order.
///
/// Rows of nested tables are not included.
pub fn table_rows<'a>(table: ElementRef<'a>) -> Vec<ElementRef<'a>> {
    let mut rows = Vec::new();
    for child in table.children().filter_map(ElementRef::wrap) {
        match child.value().name() {
            "tr" => rows.push(child),
            "thead" | "tbody" | "tfoot" => rows.extend(
                child
                    .children()
                    .filter_map(ElementRef::wrap)
                    .filter(|el| el.value().name() == "tr"),
            ),
            _ => {}
        }
    }
    rows
}

/// Direct `<th>`/`<td>` children of a row.
pub fn row_cells<'a>(row: ElementRef<'a>) -> Vec<ElementRef<'a>> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|el| matches!(el.value().name(), "th" | "td"))
        .collect()
}

pub fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text().collect::<String>()
}

/// Trimmed labels of the table's first row.
pub fn header_labels(table: ElementRef<'_>) -> Vec<String> {
    table_rows(table)
        .first()
        .map(|row| {
            row_cells(*row)
                .into_iter()
                .map(|c| cell_text(c).trim().to_owned())
                .collect()
        })
        .unwrap_or_default()
}

/// Rows after the header, capped at `max_rows`.
///
/// The cap is positional: the first `max_rows` physical rows after the header
/// are taken, then rows with fewer than four cells are dropped. A short row
/// still uses up a slot in the window. Only the first four cells of each
/// surviving row are kept.
pub fn extract_rows(table: ElementRef<'_>, max_rows: usize) -> Vec<TableRow> {
    let rows = table_rows(table);
    debug!(physical_rows = rows.len(), max_rows, "walking table rows");

    rows.into_iter()
        .skip(1)
        .take(max_rows)
        .enumerate()
        .filter_map(|(idx, row)| {
            let cells = row_cells(row);
            if cells.len() < MIN_CELLS {
                trace!(row = idx + 1, cells = cells.len(), "dropping short row");
                return None;
            }
            Some(TableRow::new(
                cells.into_iter().take(MIN_CELLS).map(cell_text).collect(),
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn first_table(doc: &Html) -> ElementRef<'_> {
        let sel = Selector::parse("table").unwrap();
        doc.select(&sel).next().unwrap()
    }

    fn data_row(year: u32) -> String {
        format!("<tr><th>{year}</th><td>A</td><td>1–0</td><td>B</td><td>Venue</td></tr>")
    }

    fn table_html(body: &str) -> String {
        format!(
            "<table class=\"wikitable\"><tbody>\
             <tr><th>Year</th><th>Winners</th><th>Score</th><th>Runners-up</th><th>Venue</th></tr>\
             {body}</tbody></table>"
        )
    }

    #[test]
    fn caps_at_ten_rows() {
        let body: String = (1930..1950).map(data_row).collect();
        let doc = Html::parse_document(&table_html(&body));
        let rows = extract_rows(first_table(&doc), DEFAULT_MAX_ROWS);
        assert_eq!(rows.len(), 10);
        assert_eq!(rows[0].cell(0), "1930");
        assert_eq!(rows[9].cell(0), "1939");
        assert!(rows.iter().all(|r| r.len() == MIN_CELLS));
    }

    #[test]
    fn short_rows_are_dropped_but_use_a_slot() {
        let mut body: String = (1930..1935).map(data_row).collect();
        body.push_str("<tr><td>1942</td><td>cancelled</td><td>—</td></tr>");
        body.extend((1950..1960).map(data_row));
        let doc = Html::parse_document(&table_html(&body));
        let rows = extract_rows(first_table(&doc), DEFAULT_MAX_ROWS);
        assert_eq!(rows.len(), 9);
        assert!(rows.iter().all(|r| r.cell(0) != "1942"));
        assert_eq!(rows.last().unwrap().cell(0), "1953");
    }

    #[test]
    fn header_labels_come_from_first_row() {
        let doc = Html::parse_document(&table_html(&data_row(2018)));
        assert_eq!(
            header_labels(first_table(&doc)),
            vec!["Year", "Winners", "Score", "Runners-up", "Venue"]
        );
    }

    #[test]
    fn nested_table_rows_are_ignored() {
        let body = format!(
            "{}<tr><td>2022</td><td><table><tr><td>x</td><td>y</td><td>z</td><td>w</td></tr></table>Argentina</td><td>3–3</td><td>France</td></tr>",
            data_row(2018)
        );
        let doc = Html::parse_document(&table_html(&body));
        let rows = extract_rows(first_table(&doc), DEFAULT_MAX_ROWS);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].cell(0), "2022");
        assert_eq!(rows[1].cell(3), "France");
    }
}
