use anyhow::{Context, Result};
use clap::Parser;
use cupfinals::{
    config::{resolve_spreadsheet_id, AuthArgs},
    output::{read_json, DEFAULT_JSON_FILE},
    sheets::{SheetsClient, StoredTokenProvider, DEFAULT_RANGE},
};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

/// Append a previously scraped `fifa_data.json` to a Google Sheets spreadsheet.
#[derive(Parser, Debug)]
struct Args {
    /// Spreadsheet to append to
    #[arg(env = "SPREADSHEET_ID")]
    spreadsheet_id: Option<String>,

    /// Create a new spreadsheet with this title and append there instead
    #[arg(long)]
    create: Option<String>,

    /// Matrix written by the scraper
    #[arg(long, default_value = DEFAULT_JSON_FILE)]
    input: PathBuf,

    /// Target range for the append
    #[arg(long, default_value = DEFAULT_RANGE)]
    range: String,

    #[command(flatten)]
    auth: AuthArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let matrix = read_json(&args.input).with_context(|| {
        format!(
            "loading {}; run the scraper first",
            args.input.display()
        )
    })?;
    if !matrix.has_header() {
        warn!(path = %args.input.display(), "first row is not the expected header");
    }

    let client = SheetsClient::new(StoredTokenProvider::interactive(
        &args.auth.credentials,
        &args.auth.token,
    ))?;

    let spreadsheet_id = match (&args.create, resolve_spreadsheet_id(args.spreadsheet_id.as_deref())) {
        (Some(title), _) => client
            .create_spreadsheet(title)
            .await
            .context("creating spreadsheet")?,
        (None, Some(id)) => id,
        (None, None) => {
            anyhow::bail!("no spreadsheet id; pass one as an argument or set SPREADSHEET_ID")
        }
    };

    info!(%spreadsheet_id, rows = matrix.row_count(), "appending FIFA World Cup data");
    let rows = client
        .append(&spreadsheet_id, &args.range, &matrix)
        .await
        .context("appending data to Google Sheets")?;
    info!(rows, "data appended to Google Sheets");
    Ok(())
}
