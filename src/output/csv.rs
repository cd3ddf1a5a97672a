// src/output/csv.rs

use anyhow::{Context, Result};
use std::{fs, path::Path};
use tracing::{debug, instrument};

use crate::sheet::HEADER;
use crate::table::FinalRecord;

/// Header line unquoted, then every field wrapped in double quotes.
///
/// Embedded quotes and commas are written as-is.
pub fn render_csv(records: &[FinalRecord]) -> String {
    let mut out = HEADER.join(",");
    out.push('\n');
    for rec in records {
        let line = rec
            .to_row()
            .iter()
            .map(|f| format!("\"{}\"", f))
            .collect::<Vec<_>>()
            .join(",");
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// Write `records` as CSV to `path`, replacing any existing file.
#[instrument(level = "debug", skip(path, records), fields(path = %path.as_ref().display()))]
pub fn write_csv<P: AsRef<Path>>(path: P, records: &[FinalRecord]) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, render_csv(records)).with_context(|| format!("writing {:?}", path))?;
    debug!(rows = records.len(), "wrote CSV");
    Ok(())
}
