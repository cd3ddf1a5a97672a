// src/sheet/mod.rs

use serde::{Deserialize, Serialize};

use crate::table::FinalRecord;

/// Column labels, in the order every row is laid out.
pub const HEADER: [&str; 4] = ["Year", "Winner", "Score", "Runners-up"];

pub const MAJOR_DIMENSION_ROWS: &str = "ROWS";

/// Header row plus one row per record, in the shape the Sheets append body takes.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SheetMatrix {
    pub major_dimension: String,
    pub values: Vec<Vec<String>>,
}

impl SheetMatrix {
    pub fn header_row() -> Vec<String> {
        HEADER.iter().map(|h| h.to_string()).collect()
    }

    /// Never fails; an empty slice yields a header-only matrix.
    pub fn from_records(records: &[FinalRecord]) -> Self {
        let mut values = Vec::with_capacity(records.len() + 1);
        values.push(Self::header_row());
        values.extend(records.iter().map(FinalRecord::to_row));
        Self {
            major_dimension: MAJOR_DIMENSION_ROWS.to_owned(),
            values,
        }
    }

    /// Data rows read back as records. Short rows fill with empty strings.
    pub fn records(&self) -> Vec<FinalRecord> {
        self.values
            .iter()
            .skip(1)
            .map(|row| {
                let field = |i: usize| row.get(i).cloned().unwrap_or_default();
                FinalRecord {
                    year: field(0),
                    winner: field(1),
                    score: field(2),
                    runners_up: field(3),
                }
            })
            .collect()
    }

    pub fn has_header(&self) -> bool {
        self.values.first().map(Vec::as_slice) == Some(Self::header_row().as_slice())
    }

    pub fn row_count(&self) -> usize {
        self.values.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(year: &str) -> FinalRecord {
        FinalRecord {
            year: year.into(),
            winner: "Italy".into(),
            score: "2–1".into(),
            runners_up: "Czechoslovakia".into(),
        }
    }

    #[test]
    fn header_then_one_row_per_record() {
        let recs = vec![record("1934"), record("1938")];
        let m = SheetMatrix::from_records(&recs);
        assert_eq!(m.row_count(), recs.len() + 1);
        assert_eq!(m.values[0], vec!["Year", "Winner", "Score", "Runners-up"]);
        assert_eq!(m.values[2], vec!["1938", "Italy", "2–1", "Czechoslovakia"]);
        assert_eq!(m.records(), recs);
    }

    #[test]
    fn empty_input_is_header_only() {
        let m = SheetMatrix::from_records(&[]);
        assert_eq!(m.row_count(), 1);
        assert!(m.has_header());
        assert!(m.records().is_empty());
    }

    #[test]
    fn serializes_as_append_body() {
        let m = SheetMatrix::from_records(&[record("1934")]);
        let v = serde_json::to_value(&m).unwrap();
        assert_eq!(v["majorDimension"], "ROWS");
        assert_eq!(v["values"][1][0], "1934");
    }
}
