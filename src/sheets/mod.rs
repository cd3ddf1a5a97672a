// src/sheets/mod.rs
//
// Google Sheets upload: OAuth token handling and the v4 values API.

pub mod auth;
pub mod client;
pub mod types;

pub use auth::{
    CodeSource, FixedCodeSource, StaticTokenProvider, StdinCodeSource, StoredTokenProvider,
    TokenProvider,
};
pub use client::{append_request_details, SheetsClient, DEFAULT_RANGE};
pub use types::{Credentials, Token};
