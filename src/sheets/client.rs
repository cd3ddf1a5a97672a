// src/sheets/client.rs

use anyhow::{anyhow, Context, Result};
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info, instrument};
use url::Url;

use super::auth::TokenProvider;
use crate::sheet::SheetMatrix;

pub const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/";
pub const DEFAULT_RANGE: &str = "Sheet1!A:D";

/// Values are parsed as if typed into the sheet, so years become numbers.
pub const VALUE_INPUT_OPTION: &str = "USER_ENTERED";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppendResponse {
    updates: Option<AppendUpdates>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppendUpdates {
    #[serde(default)]
    updated_rows: u64,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatedSpreadsheet {
    spreadsheet_id: String,
}

/// `.../spreadsheets/{id}/values/{range}[suffix]` under `base`.
fn values_url(base: &Url, spreadsheet_id: &str, range: &str, suffix: &str) -> Result<Url> {
    let last = format!("{range}{suffix}");
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| anyhow!("{} cannot be used as an API base", base))?
        .pop_if_empty()
        .extend(["spreadsheets", spreadsheet_id, "values", last.as_str()]);
    Ok(url)
}

fn append_url(base: &Url, spreadsheet_id: &str, range: &str) -> Result<Url> {
    let mut url = values_url(base, spreadsheet_id, range, ":append")?;
    url.query_pairs_mut()
        .append_pair("valueInputOption", VALUE_INPUT_OPTION);
    Ok(url)
}

async fn check(resp: Response, what: &str) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(anyhow!("{} returned {}: {}", what, status, body.trim()))
}

/// Human-readable description of the append call for `matrix`.
pub fn append_request_details(spreadsheet_id: &str, range: &str, matrix: &SheetMatrix) -> Result<String> {
    let base = Url::parse(SHEETS_API_BASE)?;
    let url = append_url(&base, spreadsheet_id, range)?;
    let body = serde_json::to_string_pretty(matrix)?;
    Ok(format!(
        "GOOGLE SHEETS API REQUEST DETAILS\n\
         POST {url}\n\
         Authorization: Bearer {{ACCESS_TOKEN}}\n\
         Content-Type: application/json\n\
         Scope: {scope}\n\
         \n{body}\n",
        scope = super::auth::SHEETS_SCOPE,
    ))
}

/// Minimal Sheets v4 client: append, read and create.
pub struct SheetsClient<P> {
    client: Client,
    base: Url,
    provider: P,
}

impl<P: TokenProvider> SheetsClient<P> {
    pub fn new(provider: P) -> Result<Self> {
        Ok(Self {
            client: Client::new(),
            base: Url::parse(SHEETS_API_BASE)?,
            provider,
        })
    }

    /// Point the client at another API root.
    pub fn with_base(mut self, base: Url) -> Self {
        self.base = base;
        self
    }

    /// Fetch a bearer token from the provider.
    pub async fn authorize(&self) -> Result<String> {
        self.provider.access_token().await
    }

    /// Append `matrix` below the last row of `range`; returns rows updated.
    pub async fn append(&self, spreadsheet_id: &str, range: &str, matrix: &SheetMatrix) -> Result<u64> {
        let token = self.authorize().await?;
        self.append_with_token(&token, spreadsheet_id, range, matrix)
            .await
    }

    #[instrument(level = "debug", skip(self, token, matrix), fields(rows = matrix.row_count()))]
    pub async fn append_with_token(
        &self,
        token: &str,
        spreadsheet_id: &str,
        range: &str,
        matrix: &SheetMatrix,
    ) -> Result<u64> {
        let url = append_url(&self.base, spreadsheet_id, range)?;
        debug!(%url, "appending values");
        let resp = self
            .client
            .post(url.clone())
            .bearer_auth(token)
            .json(matrix)
            .send()
            .await
            .with_context(|| format!("POST {} failed", url))?;
        let parsed: AppendResponse = check(resp, "values.append")
            .await?
            .json()
            .await
            .context("parsing append response")?;
        let rows = parsed.updates.map(|u| u.updated_rows).unwrap_or(0);
        info!(rows, "appended rows");
        Ok(rows)
    }

    /// Current values of `range`, formatted as the sheet shows them.
    #[instrument(level = "debug", skip(self))]
    pub async fn read(&self, spreadsheet_id: &str, range: &str) -> Result<Vec<Vec<String>>> {
        let token = self.authorize().await?;
        let url = values_url(&self.base, spreadsheet_id, range, "")?;
        let resp = self
            .client
            .get(url.clone())
            .bearer_auth(&token)
            .send()
            .await
            .with_context(|| format!("GET {} failed", url))?;
        let parsed: ValueRange = check(resp, "values.get")
            .await?
            .json()
            .await
            .context("parsing values response")?;
        Ok(parsed
            .values
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|v| match v {
                        serde_json::Value::String(s) => s,
                        other => other.to_string(),
                    })
                    .collect()
            })
            .collect())
    }

    /// Create an empty spreadsheet titled `title`; returns its id.
    #[instrument(level = "debug", skip(self))]
    pub async fn create_spreadsheet(&self, title: &str) -> Result<String> {
        let token = self.authorize().await?;
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("{} cannot be used as an API base", self.base))?
            .pop_if_empty()
            .push("spreadsheets");
        url.query_pairs_mut().append_pair("fields", "spreadsheetId");
        let resp = self
            .client
            .post(url.clone())
            .bearer_auth(&token)
            .json(&json!({ "properties": { "title": title } }))
            .send()
            .await
            .with_context(|| format!("POST {} failed", url))?;
        let created: CreatedSpreadsheet = check(resp, "spreadsheets.create")
            .await?
            .json()
            .await
            .context("parsing create response")?;
        info!(id = %created.spreadsheet_id, "created spreadsheet");
        Ok(created.spreadsheet_id)
    }
}
