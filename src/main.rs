use anyhow::Result;
use clap::Parser;
use cupfinals::{
    config::{CliArgs, Settings},
    fetch::HttpFetcher,
    observer::TracingObserver,
    pipeline::Outcome,
    sheets::{append_request_details, SheetsClient, StoredTokenProvider},
    Pipeline,
};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let args = CliArgs::parse();

    // ─── init logging ────────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_target(false)
        .init();

    match run(args).await {
        Ok(code) => code,
        Err(e) => {
            error!("error in workflow: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: CliArgs) -> Result<ExitCode> {
    let settings = Settings::try_from(&args)?;
    info!("starting FIFA World Cup data extraction");

    let sheets = match settings.spreadsheet_id {
        Some(_) => Some(SheetsClient::new(StoredTokenProvider::interactive(
            &args.auth.credentials,
            &args.auth.token,
        ))?),
        None => None,
    };

    let pipeline = Pipeline::new(HttpFetcher::new()?, TracingObserver, settings);
    let report = match pipeline.run(sheets.as_ref()).await {
        Ok(report) => report,
        Err(e) if e.is_halting() => return Ok(ExitCode::FAILURE),
        Err(e) => return Err(e.into()),
    };

    if args.show_request {
        let id = pipeline
            .settings()
            .spreadsheet_id
            .as_deref()
            .unwrap_or("{SPREADSHEET_ID}");
        println!(
            "{}",
            append_request_details(id, &pipeline.settings().range, &report.matrix)?
        );
    }

    info!(records = report.records.len(), "workflow completed");
    for (what, done) in [
        ("json", report.json.is_done()),
        ("csv", report.csv.is_done()),
    ] {
        info!(file = what, saved = done, "local output");
    }
    match &report.upload {
        Outcome::Done(rows) => info!(rows, "uploaded to Google Sheets"),
        Outcome::Skipped => info!("Google Sheets upload skipped"),
        Outcome::Failed(e) => info!(error = %e, "Google Sheets upload not completed"),
    }
    Ok(ExitCode::SUCCESS)
}
