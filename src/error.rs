// src/error.rs

use std::path::PathBuf;
use thiserror::Error;

/// Failures the pipeline reports to its caller.
///
/// `Fetch`, `TableNotFound` and `NoRows` halt a run before anything is
/// written. The rest are recorded per step and never stop later steps.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("fetching page failed: {0:#}")]
    Fetch(anyhow::Error),

    #[error("could not find the FIFA World Cup finals table")]
    TableNotFound,

    #[error("no data extracted from the table")]
    NoRows,

    #[error("writing {}: {error:#}", path.display())]
    Write {
        path: PathBuf,
        error: anyhow::Error,
    },

    #[error("authentication failed: {0:#}")]
    Auth(anyhow::Error),

    #[error("appending to spreadsheet failed: {0:#}")]
    Upload(anyhow::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl PipelineError {
    /// Whether this failure stops the run before any output is written.
    pub fn is_halting(&self) -> bool {
        matches!(
            self,
            PipelineError::Fetch(_) | PipelineError::TableNotFound | PipelineError::NoRows
        )
    }
}
