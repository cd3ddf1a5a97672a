// src/observer.rs

use std::{path::Path, sync::Mutex};
use tracing::{error, info, warn};

use crate::error::PipelineError;
use crate::table::FinalRecord;

/// Which local file a write event is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Json,
    Csv,
}

impl FileKind {
    pub fn as_str(&self) -> &str {
        match self {
            FileKind::Json => "json",
            FileKind::Csv => "csv",
        }
    }
}

/// Receives progress from a pipeline run. Every hook defaults to a no-op.
pub trait PipelineObserver {
    fn fetch_started(&self, _url: &str) {}
    fn fetched(&self, _bytes: usize) {}
    fn headers_found(&self, _headers: &[String]) {}
    fn records_extracted(&self, _records: &[FinalRecord]) {}
    fn file_written(&self, _kind: FileKind, _path: &Path) {}
    fn file_failed(&self, _kind: FileKind, _err: &PipelineError) {}
    fn upload_skipped(&self) {}
    fn uploaded(&self, _rows: u64) {}
    fn upload_failed(&self, _err: &PipelineError) {}
    fn halted(&self, _err: &PipelineError) {}
}

/// Logs every step through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl PipelineObserver for TracingObserver {
    fn fetch_started(&self, url: &str) {
        info!(%url, "fetching FIFA World Cup finals page");
    }

    fn fetched(&self, bytes: usize) {
        info!(bytes, "page fetched");
    }

    fn headers_found(&self, headers: &[String]) {
        info!(?headers, "found headers");
    }

    fn records_extracted(&self, records: &[FinalRecord]) {
        info!(count = records.len(), "extracted rows");
        for (i, r) in records.iter().enumerate() {
            info!(
                "{}. {} - {} vs {} ({})",
                i + 1,
                r.year,
                r.winner,
                r.runners_up,
                r.score
            );
        }
    }

    fn file_written(&self, kind: FileKind, path: &Path) {
        info!(kind = kind.as_str(), path = %path.display(), "data saved");
    }

    fn file_failed(&self, kind: FileKind, err: &PipelineError) {
        error!(kind = kind.as_str(), error = %err, "saving file failed");
    }

    fn upload_skipped(&self) {
        info!("skipping Google Sheets upload (no spreadsheet ID provided); set SPREADSHEET_ID to upload");
    }

    fn uploaded(&self, rows: u64) {
        info!(rows, "appended data to Google Sheets");
    }

    fn upload_failed(&self, err: &PipelineError) {
        warn!(error = %err, "Google Sheets upload failed; local files are unaffected");
    }

    fn halted(&self, err: &PipelineError) {
        error!(error = %err, "pipeline halted");
    }
}

/// One observed step, as collected by [`RecordingObserver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    FetchStarted(String),
    Fetched(usize),
    HeadersFound(Vec<String>),
    RecordsExtracted(usize),
    FileWritten(FileKind),
    FileFailed(FileKind),
    UploadSkipped,
    Uploaded(u64),
    UploadFailed,
    Halted(String),
}

/// Collects events in memory.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<Event>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    fn push(&self, event: Event) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl PipelineObserver for RecordingObserver {
    fn fetch_started(&self, url: &str) {
        self.push(Event::FetchStarted(url.to_owned()));
    }
    fn fetched(&self, bytes: usize) {
        self.push(Event::Fetched(bytes));
    }
    fn headers_found(&self, headers: &[String]) {
        self.push(Event::HeadersFound(headers.to_vec()));
    }
    fn records_extracted(&self, records: &[FinalRecord]) {
        self.push(Event::RecordsExtracted(records.len()));
    }
    fn file_written(&self, kind: FileKind, _path: &Path) {
        self.push(Event::FileWritten(kind));
    }
    fn file_failed(&self, kind: FileKind, _err: &PipelineError) {
        self.push(Event::FileFailed(kind));
    }
    fn upload_skipped(&self) {
        self.push(Event::UploadSkipped);
    }
    fn uploaded(&self, rows: u64) {
        self.push(Event::Uploaded(rows));
    }
    fn upload_failed(&self, _err: &PipelineError) {
        self.push(Event::UploadFailed);
    }
    fn halted(&self, err: &PipelineError) {
        self.push(Event::Halted(err.to_string()));
    }
}
