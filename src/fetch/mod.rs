// src/fetch/mod.rs

use anyhow::{Context, Result};
use reqwest::{
    header::{HeaderMap, HeaderValue, USER_AGENT},
    Client,
};
use tracing::{debug, instrument};
use url::Url;

/// Wikipedia's list of World Cup finals.
pub const DEFAULT_PAGE_URL: &str = "https://en.wikipedia.org/wiki/List_of_FIFA_World_Cup_finals";

/// Browser-like agent string sent with every page request.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Source of raw page HTML.
#[allow(async_fn_in_trait)]
pub trait PageFetcher {
    async fn fetch(&self, url: &Url) -> Result<String>;
}

/// Fetches over HTTP(S). One attempt, no timeout.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        let client = Client::builder()
            .default_headers(headers)
            .build()
            .context("building HTTP client")?;
        Ok(Self { client })
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<String> {
        get_text(&self.client, url).await
    }
}

#[instrument(level = "debug", skip(client, url), fields(%url))]
pub async fn get_text(client: &Client, url: &Url) -> Result<String> {
    debug!("Fetching text from {}", url);
    let text = client
        .get(url.clone())
        .send()
        .await
        .with_context(|| format!("GET {} failed", url))?
        .error_for_status()
        .with_context(|| format!("Non-success status {}", url))?
        .text()
        .await
        .with_context(|| format!("Reading text from {}", url))?;
    debug!(bytes = text.len(), "fetched");
    Ok(text)
}

/// Serves canned HTML without touching the network.
#[derive(Debug, Clone, Default)]
pub struct StaticFetcher {
    pub html: String,
}

impl StaticFetcher {
    pub fn new(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }
}

impl PageFetcher for StaticFetcher {
    async fn fetch(&self, _url: &Url) -> Result<String> {
        Ok(self.html.clone())
    }
}
