// src/table/types.rs

use serde::{Deserialize, Serialize};

/// Visible text of a single `<th>`/`<td>`.
pub type RawCell = String;

/// Cells of one physical `<tr>`, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableRow {
    pub cells: Vec<RawCell>,
}

impl TableRow {
    pub fn new(cells: Vec<RawCell>) -> Self {
        Self { cells }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cell at `idx`, or `""` when the row is shorter.
    pub fn cell(&self, idx: usize) -> &str {
        self.cells.get(idx).map(String::as_str).unwrap_or("")
    }
}

/// One World Cup final, normalized.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Eq, Hash, Default)]
pub struct FinalRecord {
    pub year: String,
    pub winner: String,
    pub score: String,
    #[serde(rename = "runnersUp")]
    pub runners_up: String,
}

impl FinalRecord {
    /// Fields in sheet column order.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.year.clone(),
            self.winner.clone(),
            self.score.clone(),
            self.runners_up.clone(),
        ]
    }
}
