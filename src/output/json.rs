// src/output/json.rs

use anyhow::{Context, Result};
use std::{
    fs,
    io::{BufWriter, Write},
    path::Path,
};
use tracing::{debug, instrument};

use crate::sheet::SheetMatrix;

/// Pretty-print `matrix` to `path`, replacing any existing file.
#[instrument(level = "debug", skip(path, matrix), fields(path = %path.as_ref().display()))]
pub fn write_json<P: AsRef<Path>>(path: P, matrix: &SheetMatrix) -> Result<()> {
    let path = path.as_ref();
    let f = fs::File::create(path).with_context(|| format!("creating {:?}", path))?;
    let mut w = BufWriter::new(f);
    serde_json::to_writer_pretty(&mut w, matrix)
        .with_context(|| format!("serializing JSON to {:?}", path))?;
    w.write_all(b"\n")?;
    w.flush().with_context(|| format!("flushing {:?}", path))?;
    debug!(rows = matrix.row_count(), "wrote JSON");
    Ok(())
}

/// Load a matrix previously written by [`write_json`].
pub fn read_json<P: AsRef<Path>>(path: P) -> Result<SheetMatrix> {
    let path = path.as_ref();
    let f = fs::File::open(path).with_context(|| format!("opening {:?}", path))?;
    serde_json::from_reader(f).with_context(|| format!("parsing {:?}", path))
}
