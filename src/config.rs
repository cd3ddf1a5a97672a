// src/config.rs

use clap::Parser;
use std::path::PathBuf;
use url::Url;

use crate::error::PipelineError;
use crate::fetch::DEFAULT_PAGE_URL;
use crate::output::{DEFAULT_CSV_FILE, DEFAULT_JSON_FILE};
use crate::sheets::auth::{DEFAULT_CREDENTIALS_FILE, DEFAULT_TOKEN_FILE};
use crate::sheets::client::DEFAULT_RANGE;
use crate::table::DEFAULT_MAX_ROWS;

/// Stand-in id from the sample config; treated as "no spreadsheet".
pub const PLACEHOLDER_SPREADSHEET_ID: &str = "YOUR_SPREADSHEET_ID_HERE";

/// Scrape the FIFA World Cup finals table from Wikipedia, save it as JSON and
/// CSV, and optionally append it to a Google Sheets spreadsheet.
#[derive(Parser, Debug, Clone)]
#[command(name = "cupfinals", version)]
pub struct CliArgs {
    /// Spreadsheet to append to; without one only local files are written
    #[arg(env = "SPREADSHEET_ID")]
    pub spreadsheet_id: Option<String>,

    /// Page holding the finals table
    #[arg(long, default_value = DEFAULT_PAGE_URL)]
    pub url: String,

    /// Rows to read after the header row
    #[arg(long, default_value_t = DEFAULT_MAX_ROWS)]
    pub max_rows: usize,

    /// Target range for the append
    #[arg(long, default_value = DEFAULT_RANGE)]
    pub range: String,

    /// JSON output path
    #[arg(long, default_value = DEFAULT_JSON_FILE)]
    pub json: PathBuf,

    /// CSV output path
    #[arg(long, default_value = DEFAULT_CSV_FILE)]
    pub csv: PathBuf,

    #[command(flatten)]
    pub auth: AuthArgs,

    /// Print the Sheets append request that would be sent
    #[arg(long)]
    pub show_request: bool,
}

/// OAuth file locations shared by both binaries.
#[derive(clap::Args, Debug, Clone)]
pub struct AuthArgs {
    /// OAuth client credentials downloaded from the Cloud Console
    #[arg(long, env = "GOOGLE_CREDENTIALS_FILE", default_value = DEFAULT_CREDENTIALS_FILE)]
    pub credentials: PathBuf,

    /// Where the OAuth token is stored between runs
    #[arg(long, env = "GOOGLE_TOKEN_FILE", default_value = DEFAULT_TOKEN_FILE)]
    pub token: PathBuf,
}

/// Resolved settings for one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub url: Url,
    pub max_rows: usize,
    pub json_path: PathBuf,
    pub csv_path: PathBuf,
    pub spreadsheet_id: Option<String>,
    pub range: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            url: Url::parse(DEFAULT_PAGE_URL).expect("default page URL should parse"),
            max_rows: DEFAULT_MAX_ROWS,
            json_path: PathBuf::from(DEFAULT_JSON_FILE),
            csv_path: PathBuf::from(DEFAULT_CSV_FILE),
            spreadsheet_id: None,
            range: DEFAULT_RANGE.to_owned(),
        }
    }
}

/// Blank or placeholder ids mean "don't upload".
pub fn resolve_spreadsheet_id(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|id| !id.is_empty() && *id != PLACEHOLDER_SPREADSHEET_ID)
        .map(str::to_owned)
}

impl TryFrom<&CliArgs> for Settings {
    type Error = PipelineError;

    fn try_from(args: &CliArgs) -> Result<Self, Self::Error> {
        let url = Url::parse(&args.url)
            .map_err(|e| PipelineError::Config(format!("--url {}: {}", args.url, e)))?;
        if args.max_rows == 0 {
            return Err(PipelineError::Config("--max-rows must be at least 1".into()));
        }
        Ok(Self {
            url,
            max_rows: args.max_rows,
            json_path: args.json.clone(),
            csv_path: args.csv.clone(),
            spreadsheet_id: resolve_spreadsheet_id(args.spreadsheet_id.as_deref()),
            range: args.range.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_and_blank_ids_are_ignored() {
        assert_eq!(resolve_spreadsheet_id(None), None);
        assert_eq!(resolve_spreadsheet_id(Some("  ")), None);
        assert_eq!(resolve_spreadsheet_id(Some(PLACEHOLDER_SPREADSHEET_ID)), None);
        assert_eq!(resolve_spreadsheet_id(Some(" 1AbC ")), Some("1AbC".into()));
    }

    #[test]
    fn defaults_match_settings_default() {
        let args = CliArgs::try_parse_from(["cupfinals"]).unwrap();
        let mut settings = Settings::try_from(&args).unwrap();
        // SPREADSHEET_ID may be set in the environment running the tests.
        settings.spreadsheet_id = None;
        assert_eq!(settings, Settings::default());
        assert_eq!(args.auth.credentials, PathBuf::from("credentials.json"));
    }

    #[test]
    fn positional_id_and_overrides() {
        let args = CliArgs::try_parse_from([
            "cupfinals",
            "sheet-42",
            "--max-rows",
            "5",
            "--csv",
            "out/finals.csv",
        ])
        .unwrap();
        let s = Settings::try_from(&args).unwrap();
        assert_eq!(s.spreadsheet_id.as_deref(), Some("sheet-42"));
        assert_eq!(s.max_rows, 5);
        assert_eq!(s.csv_path, PathBuf::from("out/finals.csv"));
    }

    #[test]
    fn rejects_bad_url_and_zero_rows() {
        let args = CliArgs::try_parse_from(["cupfinals", "--url", "not a url"]).unwrap();
        assert!(matches!(Settings::try_from(&args), Err(PipelineError::Config(_))));
        let args = CliArgs::try_parse_from(["cupfinals", "--max-rows", "0"]).unwrap();
        assert!(matches!(Settings::try_from(&args), Err(PipelineError::Config(_))));
    }

    #[test]
    fn help_is_available() {
        let err = CliArgs::try_parse_from(["cupfinals", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }
}
