// src/sheets/auth.rs

use anyhow::{Context, Result};
use reqwest::Client;
use std::path::PathBuf;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::types::{Credentials, Token, TokenResponse};

pub const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
pub const AUTH_URI: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub const TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

pub const DEFAULT_CREDENTIALS_FILE: &str = "credentials.json";
pub const DEFAULT_TOKEN_FILE: &str = "token.json";

/// Hands out a bearer token for the Sheets API.
#[allow(async_fn_in_trait)]
pub trait TokenProvider {
    async fn access_token(&self) -> Result<String>;
}

/// Always returns the same token.
#[derive(Debug, Clone)]
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl TokenProvider for StaticTokenProvider {
    async fn access_token(&self) -> Result<String> {
        Ok(self.token.clone())
    }
}

/// Where the operator's authorization code comes from.
#[allow(async_fn_in_trait)]
pub trait CodeSource {
    async fn authorization_code(&self, consent_url: &Url) -> Result<String>;
}

/// Prints the consent URL and reads the pasted code from stdin.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinCodeSource;

impl CodeSource for StdinCodeSource {
    async fn authorization_code(&self, consent_url: &Url) -> Result<String> {
        let mut err = io::stderr();
        let prompt = format!(
            "Authorize this app by visiting this url: {consent_url}\n\
             After authorization you are redirected to a URL with a code parameter.\n\
             Enter the code: "
        );
        err.write_all(prompt.as_bytes()).await?;
        err.flush().await?;

        let mut line = String::new();
        BufReader::new(io::stdin())
            .read_line(&mut line)
            .await
            .context("reading authorization code")?;
        let code = line.trim().to_owned();
        if code.is_empty() {
            anyhow::bail!("no authorization code entered");
        }
        Ok(code)
    }
}

/// Returns the code it was built with.
#[derive(Debug, Clone)]
pub struct FixedCodeSource(pub String);

impl CodeSource for FixedCodeSource {
    async fn authorization_code(&self, _consent_url: &Url) -> Result<String> {
        Ok(self.0.clone())
    }
}

/// Token kept in a JSON file next to the client credentials.
///
/// An existing token is reused and refreshed once it expires. Without one,
/// the operator is walked through the consent flow and the result is saved.
/// The token file is read and rewritten without locking.
pub struct StoredTokenProvider<C> {
    client: Client,
    credentials_path: PathBuf,
    token_path: PathBuf,
    token_uri: Option<String>,
    code_source: C,
}

impl StoredTokenProvider<StdinCodeSource> {
    pub fn interactive(credentials_path: impl Into<PathBuf>, token_path: impl Into<PathBuf>) -> Self {
        Self::new(credentials_path, token_path, StdinCodeSource)
    }
}

impl<C: CodeSource> StoredTokenProvider<C> {
    pub fn new(
        credentials_path: impl Into<PathBuf>,
        token_path: impl Into<PathBuf>,
        code_source: C,
    ) -> Self {
        Self {
            client: Client::new(),
            credentials_path: credentials_path.into(),
            token_path: token_path.into(),
            token_uri: None,
            code_source,
        }
    }

    /// Send token requests somewhere other than the credentials' `token_uri`.
    pub fn with_token_uri(mut self, uri: impl Into<String>) -> Self {
        self.token_uri = Some(uri.into());
        self
    }

    fn token_endpoint<'a>(&'a self, creds: &'a Credentials) -> &'a str {
        self.token_uri
            .as_deref()
            .or(creds.app.token_uri.as_deref())
            .unwrap_or(TOKEN_URI)
    }

    /// Consent page the operator has to visit.
    pub fn consent_url(creds: &Credentials) -> Result<Url> {
        let base = creds.app.auth_uri.as_deref().unwrap_or(AUTH_URI);
        Url::parse_with_params(
            base,
            &[
                ("access_type", "offline"),
                ("scope", SHEETS_SCOPE),
                ("response_type", "code"),
                ("client_id", creds.app.client_id.as_str()),
                ("redirect_uri", creds.redirect_uri()),
            ],
        )
        .context("building consent URL")
    }

    async fn request_token(&self, endpoint: &str, form: &[(&str, &str)]) -> Result<TokenResponse> {
        let resp = self
            .client
            .post(endpoint)
            .form(form)
            .send()
            .await
            .with_context(|| format!("POST {} failed", endpoint))?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("token endpoint returned {}: {}", status, body.trim());
        }
        resp.json::<TokenResponse>()
            .await
            .context("parsing token response")
    }

    #[instrument(level = "debug", skip(self, creds, refresh_token))]
    async fn refresh(&self, creds: &Credentials, refresh_token: &str) -> Result<Token> {
        let endpoint = self.token_endpoint(creds);
        let resp = self
            .request_token(
                endpoint,
                &[
                    ("client_id", creds.app.client_id.as_str()),
                    ("client_secret", creds.app.client_secret.as_str()),
                    ("refresh_token", refresh_token),
                    ("grant_type", "refresh_token"),
                ],
            )
            .await
            .context("refreshing access token")?;
        Ok(resp.into_token(Some(refresh_token.to_owned())))
    }

    #[instrument(level = "debug", skip(self, creds))]
    async fn authorize(&self, creds: &Credentials) -> Result<Token> {
        let consent = Self::consent_url(creds)?;
        let code = self
            .code_source
            .authorization_code(&consent)
            .await
            .context("obtaining authorization code")?;
        let endpoint = self.token_endpoint(creds);
        let resp = self
            .request_token(
                endpoint,
                &[
                    ("code", code.as_str()),
                    ("client_id", creds.app.client_id.as_str()),
                    ("client_secret", creds.app.client_secret.as_str()),
                    ("redirect_uri", creds.redirect_uri()),
                    ("grant_type", "authorization_code"),
                ],
            )
            .await
            .context("exchanging authorization code")?;
        Ok(resp.into_token(None))
    }

    fn persist(&self, token: &Token) -> Result<()> {
        token.save(&self.token_path)?;
        info!(path = %self.token_path.display(), "token saved");
        Ok(())
    }
}

impl<C: CodeSource> TokenProvider for StoredTokenProvider<C> {
    async fn access_token(&self) -> Result<String> {
        let creds = Credentials::load(&self.credentials_path)?;

        if !self.token_path.exists() {
            debug!(path = %self.token_path.display(), "no stored token; starting consent flow");
            let token = self.authorize(&creds).await?;
            self.persist(&token)?;
            return Ok(token.access_token);
        }

        let token = Token::load(&self.token_path)?;
        if !token.is_expired() {
            return Ok(token.access_token);
        }
        let Some(refresh_token) = token.refresh_token.as_deref() else {
            warn!("stored token expired and carries no refresh token");
            anyhow::bail!(
                "stored token in {} has expired and cannot be refreshed; delete it to re-authorize",
                self.token_path.display()
            );
        };
        let fresh = self.refresh(&creds, refresh_token).await?;
        self.persist(&fresh)?;
        Ok(fresh.access_token)
    }
}
