// src/pipeline.rs

use std::path::{Path, PathBuf};
use tracing::instrument;

use crate::config::Settings;
use crate::error::PipelineError;
use crate::fetch::PageFetcher;
use crate::observer::{FileKind, PipelineObserver};
use crate::output::{write_csv, write_json};
use crate::sheet::SheetMatrix;
use crate::sheets::{SheetsClient, StaticTokenProvider, TokenProvider};
use crate::table::{self, FinalRecord};

/// Result of one step that does not halt the run.
#[derive(Debug)]
pub enum Outcome<T> {
    Done(T),
    Skipped,
    Failed(PipelineError),
}

impl<T> Outcome<T> {
    pub fn is_done(&self) -> bool {
        matches!(self, Outcome::Done(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }

    pub fn error(&self) -> Option<&PipelineError> {
        match self {
            Outcome::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// Everything a completed run produced. Each output is reported on its own;
/// nothing is rolled back when a later step fails.
#[derive(Debug)]
pub struct RunReport {
    pub records: Vec<FinalRecord>,
    pub matrix: SheetMatrix,
    pub json: Outcome<PathBuf>,
    pub csv: Outcome<PathBuf>,
    pub upload: Outcome<u64>,
}

impl RunReport {
    pub fn fully_succeeded(&self) -> bool {
        self.json.is_done() && self.csv.is_done() && !self.upload.is_failed()
    }
}

/// Fetch, extract, format, write, upload. Strictly sequential.
pub struct Pipeline<F, O> {
    fetcher: F,
    observer: O,
    settings: Settings,
}

impl<F: PageFetcher, O: PipelineObserver> Pipeline<F, O> {
    pub fn new(fetcher: F, observer: O, settings: Settings) -> Self {
        Self {
            fetcher,
            observer,
            settings,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    fn halt(&self, err: PipelineError) -> PipelineError {
        self.observer.halted(&err);
        err
    }

    /// Scrape and write local files only.
    pub async fn run_local(&self) -> Result<RunReport, PipelineError> {
        self.run::<StaticTokenProvider>(None).await
    }

    /// Run every step. Fetch failure, a missing table or zero rows end the run
    /// with an error before anything is written; later failures are recorded
    /// in the report.
    #[instrument(level = "info", skip(self, sheets), fields(url = %self.settings.url))]
    pub async fn run<P: TokenProvider>(
        &self,
        sheets: Option<&SheetsClient<P>>,
    ) -> Result<RunReport, PipelineError> {
        let s = &self.settings;

        self.observer.fetch_started(s.url.as_str());
        let html = self
            .fetcher
            .fetch(&s.url)
            .await
            .map_err(|e| self.halt(PipelineError::Fetch(e)))?;
        self.observer.fetched(html.len());

        let extraction =
            table::extract_from_html(&html, s.max_rows).map_err(|e| self.halt(e))?;
        self.observer.headers_found(&extraction.headers);
        self.observer.records_extracted(&extraction.records);

        let matrix = SheetMatrix::from_records(&extraction.records);

        let json = self.write_step(FileKind::Json, &s.json_path, |p| write_json(p, &matrix));
        let csv = self.write_step(FileKind::Csv, &s.csv_path, |p| {
            write_csv(p, &extraction.records)
        });

        let upload = match (s.spreadsheet_id.as_deref(), sheets) {
            (Some(id), Some(client)) => self.upload(client, id, &matrix).await,
            _ => {
                self.observer.upload_skipped();
                Outcome::Skipped
            }
        };

        Ok(RunReport {
            records: extraction.records,
            matrix,
            json,
            csv,
            upload,
        })
    }

    fn write_step(
        &self,
        kind: FileKind,
        path: &Path,
        write: impl FnOnce(&Path) -> anyhow::Result<()>,
    ) -> Outcome<PathBuf> {
        match write(path) {
            Ok(()) => {
                self.observer.file_written(kind, path);
                Outcome::Done(path.to_path_buf())
            }
            Err(error) => {
                let err = PipelineError::Write {
                    path: path.to_path_buf(),
                    error,
                };
                self.observer.file_failed(kind, &err);
                Outcome::Failed(err)
            }
        }
    }

    async fn upload<P: TokenProvider>(
        &self,
        client: &SheetsClient<P>,
        spreadsheet_id: &str,
        matrix: &SheetMatrix,
    ) -> Outcome<u64> {
        let token = match client.authorize().await {
            Ok(t) => t,
            Err(e) => {
                let err = PipelineError::Auth(e);
                self.observer.upload_failed(&err);
                return Outcome::Failed(err);
            }
        };
        match client
            .append_with_token(&token, spreadsheet_id, &self.settings.range, matrix)
            .await
        {
            Ok(rows) => {
                self.observer.uploaded(rows);
                Outcome::Done(rows)
            }
            Err(e) => {
                let err = PipelineError::Upload(e);
                self.observer.upload_failed(&err);
                Outcome::Failed(err)
            }
        }
    }
}
