//! Remote data client for the hosted server-records table.
//!
//! The dashboard only ever needs one operation, "select all columns from a
//! table". [`RemoteStore`] is that operation; [`RestStore`] implements it
//! against a PostgREST endpoint (the REST surface of a Supabase project).

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::config::StoreConfig;
use crate::error::{DashError, Result};

/// Path prefix of the PostgREST API on a Supabase project
const REST_PREFIX: &str = "rest/v1";

/// A store that can return every row of a table.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Return all rows of `table` as untyped JSON, or a fetch error.
    async fn select_all(&self, table: &str) -> Result<Vec<Value>>;
}

/// PostgREST client authenticated with a project API key.
#[derive(Debug, Clone)]
pub struct RestStore {
    base_url: Option<String>,
    api_key: Option<String>,
    timeout: Option<Duration>,
}

impl RestStore {
    pub fn new(base_url: Option<String>, api_key: Option<String>) -> Self {
        Self {
            base_url,
            api_key,
            timeout: None,
        }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(config.url.clone(), config.key.clone()).with_timeout(config.timeout())
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// URL of the "select all columns" query for `table`.
    pub fn table_url(base_url: &str, table: &str) -> String {
        format!(
            "{}/{}/{}?select=*",
            base_url.trim_end_matches('/'),
            REST_PREFIX,
            table
        )
    }

    fn client(&self) -> Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        builder
            .build()
            .map_err(|e| DashError::fetch(format!("HTTP client error: {e}")))
    }
}

#[async_trait]
impl RemoteStore for RestStore {
    async fn select_all(&self, table: &str) -> Result<Vec<Value>> {
        let base_url = self
            .base_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| DashError::fetch("store URL is not configured"))?;
        let api_key = self
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| DashError::fetch("store key is not configured"))?;

        let url = Self::table_url(base_url, table);
        debug!(%url, "requesting table");

        let response = self
            .client()?
            .get(&url)
            .header("apikey", api_key)
            .bearer_auth(api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(DashError::fetch)?;

        let status = response.status();
        let body = response.text().await.map_err(DashError::fetch)?;

        if !status.is_success() {
            return Err(DashError::Fetch(error_message(status.as_u16(), &body)));
        }

        parse_rows(&body)
    }
}

/// Pick the human-readable message out of a PostgREST error body.
///
/// Falls back to `HTTP <status>` when the body carries no `message`.
pub fn error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .filter(|msg| !msg.is_empty())
        .unwrap_or_else(|| format!("HTTP {status}"))
}

/// Decode a successful response body, which must be a JSON array of rows.
pub fn parse_rows(body: &str) -> Result<Vec<Value>> {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Array(rows)) => Ok(rows),
        Ok(_) => Err(DashError::fetch("unexpected response: expected an array of rows")),
        Err(e) => Err(DashError::fetch(format!("invalid JSON response: {e}"))),
    }
}
