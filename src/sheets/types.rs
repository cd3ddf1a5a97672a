// src/sheets/types.rs

use anyhow::{anyhow, Context, Result};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// OAuth client registration as downloaded from the Cloud Console.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Eq)]
pub struct OAuthApp {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default)]
    pub redirect_uris: Vec<String>,
    #[serde(default)]
    pub auth_uri: Option<String>,
    #[serde(default)]
    pub token_uri: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CredentialsFile {
    installed: Option<OAuthApp>,
    web: Option<OAuthApp>,
}

/// Client id, secret and redirect URI for the consent flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub app: OAuthApp,
}

impl Credentials {
    pub fn from_json(text: &str) -> Result<Self> {
        let file: CredentialsFile =
            serde_json::from_str(text).context("parsing OAuth credentials")?;
        let app = file
            .installed
            .or(file.web)
            .ok_or_else(|| anyhow!("credentials hold neither an `installed` nor a `web` client"))?;
        if app.redirect_uris.is_empty() {
            anyhow::bail!("credentials list no redirect_uris");
        }
        Ok(Self { app })
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            anyhow::bail!(
                "{} not found; download OAuth 2.0 client credentials from the Google Cloud Console and save them there",
                path.display()
            );
        }
        let text = fs::read_to_string(path).with_context(|| format!("reading {:?}", path))?;
        Self::from_json(&text).with_context(|| format!("loading {:?}", path))
    }

    pub fn redirect_uri(&self) -> &str {
        &self.app.redirect_uris[0]
    }
}

/// Stored OAuth token, laid out the way Google's client libraries persist it.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Eq)]
pub struct Token {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    /// Expiry as epoch milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<i64>,
}

/// Tokens are refreshed this long before they actually expire.
const EXPIRY_SKEW_SECS: i64 = 60;

impl Token {
    pub fn is_expired(&self) -> bool {
        match self.expiry_date {
            Some(ms) => {
                let cutoff = Utc::now() + Duration::seconds(EXPIRY_SKEW_SECS);
                ms <= cutoff.timestamp_millis()
            }
            None => false,
        }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).with_context(|| format!("reading {:?}", path))?;
        serde_json::from_str(&text).with_context(|| format!("parsing stored token {:?}", path))
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("writing {:?}", path))
    }
}

/// Body of a token endpoint response.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
}

impl TokenResponse {
    /// Turn into a storable token. Refresh responses omit the refresh token,
    /// so the previous one is carried over.
    pub fn into_token(self, previous_refresh: Option<String>) -> Token {
        let expiry_date = self
            .expires_in
            .map(|secs| (Utc::now() + Duration::seconds(secs)).timestamp_millis());
        Token {
            access_token: self.access_token,
            refresh_token: self.refresh_token.or(previous_refresh),
            scope: self.scope,
            token_type: self.token_type,
            expiry_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn reads_installed_and_web_credentials() {
        let installed = r#"{"installed":{"client_id":"id","client_secret":"s","redirect_uris":["urn:ietf:wg:oauth:2.0:oob","http://localhost"]}}"#;
        let c = Credentials::from_json(installed).unwrap();
        assert_eq!(c.app.client_id, "id");
        assert_eq!(c.redirect_uri(), "urn:ietf:wg:oauth:2.0:oob");

        let web = r#"{"web":{"client_id":"w","client_secret":"s","redirect_uris":["https://example.test/cb"]}}"#;
        assert_eq!(Credentials::from_json(web).unwrap().app.client_id, "w");
    }

    #[test]
    fn rejects_credentials_without_client() {
        assert!(Credentials::from_json(r#"{"other":{}}"#).is_err());
        assert!(Credentials::from_json("not json").is_err());
    }

    #[test]
    fn missing_credentials_file_names_the_path() {
        let tmp = tempdir().unwrap();
        let err = Credentials::load(tmp.path().join("credentials.json")).unwrap_err();
        assert!(err.to_string().contains("credentials.json not found"));
    }

    #[test]
    fn token_round_trips_and_tracks_expiry() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("token.json");
        let fresh = TokenResponse {
            access_token: "a".into(),
            expires_in: Some(3600),
            refresh_token: None,
            scope: None,
            token_type: Some("Bearer".into()),
        }
        .into_token(Some("r".into()));
        assert!(!fresh.is_expired());
        assert_eq!(fresh.refresh_token.as_deref(), Some("r"));

        fresh.save(&path).unwrap();
        assert_eq!(Token::load(&path).unwrap(), fresh);

        let stale = Token {
            expiry_date: Some(Utc::now().timestamp_millis() - 1),
            ..fresh
        };
        assert!(stale.is_expired());
    }

    #[test]
    fn malformed_token_is_an_error() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("token.json");
        fs::write(&path, "{\"refresh_token\": 3}").unwrap();
        assert!(Token::load(&path).is_err());
    }
}
