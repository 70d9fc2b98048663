// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use chipdeck_app::{
    Chip, ChipId, ColumnInfo, DatabaseInfo, EngineInfo, NewChip, QueryRequest, ResultSet,
    TableInfo,
};
use reqwest::StatusCode;
use reqwest::blocking::{Client as HttpClient, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:7878";

/// Validates an engine address and normalizes away a trailing slash.
pub fn parse_base_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        bail!("engine URL must not be empty");
    }
    let url = Url::parse(trimmed)
        .with_context(|| format!("invalid engine URL {trimmed:?}; expected http://host:port"))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!(
            "engine URL {trimmed:?} uses unsupported scheme {:?}; use http or https",
            url.scheme()
        );
    }
    if url.cannot_be_a_base() || url.host_str().is_none() {
        bail!("engine URL {trimmed:?} has no host");
    }
    Ok(url)
}

#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    timeout: Duration,
    http: HttpClient,
}

impl Client {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = parse_base_url(base_url)?;
        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self {
            base_url,
            timeout,
            http,
        })
    }

    /// Same transport settings, different engine.
    pub fn with_base_url(&self, base_url: &str) -> Result<Self> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            timeout: self.timeout,
            http: self.http.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn health(&self) -> Result<EngineInfo> {
        self.get_json(&["health"])
    }

    pub fn list_databases(&self) -> Result<Vec<DatabaseInfo>> {
        self.get_json(&["databases"])
    }

    pub fn list_tables(&self, database: &str) -> Result<Vec<TableInfo>> {
        self.get_json(&["databases", database, "tables"])
    }

    pub fn describe_table(&self, database: &str, table: &str) -> Result<Vec<ColumnInfo>> {
        self.get_json(&["databases", database, "tables", table, "columns"])
    }

    pub fn list_chips(&self) -> Result<Vec<Chip>> {
        self.get_json(&["chips"])
    }

    pub fn create_chip(&self, chip: &NewChip) -> Result<Chip> {
        chip.validate()?;
        let url = self.endpoint(&["chips"])?;
        let response = self.send(self.http.post(url).json(chip))?;
        response.json().context("decode created chip")
    }

    pub fn delete_chip(&self, id: ChipId) -> Result<()> {
        let url = self.endpoint(&["chips", &id.to_string()])?;
        self.send(self.http.delete(url))?;
        Ok(())
    }

    pub fn run_query(&self, request: &QueryRequest) -> Result<ResultSet> {
        if request.sql.trim().is_empty() {
            bail!("query text is empty; type a statement before submitting");
        }
        let url = self.endpoint(&["query"])?;
        let response = self.send(self.http.post(url).json(request))?;
        let result: ResultSet = response.json().context("decode query result")?;
        if let Some(row) = result
            .rows
            .iter()
            .position(|row| row.len() != result.columns.len())
        {
            bail!(
                "engine returned row {} with {} cells for {} columns",
                row,
                result.rows[row].len(),
                result.columns.len()
            );
        }
        Ok(result)
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| anyhow!("engine URL {} cannot carry a path", self.base_url))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
        let url = self.endpoint(segments)?;
        let what = segments.join("/");
        let response = self.send(self.http.get(url))?;
        response
            .json()
            .with_context(|| format!("decode {what} response"))
    }

    fn send(&self, request: RequestBuilder) -> Result<Response> {
        let request = request.build().context("build engine request")?;
        let method = request.method().clone();
        let path = request.url().path().to_owned();
        tracing::debug!(%method, %path, "engine request");

        let response = self
            .http
            .execute(request)
            .map_err(|error| connection_error(self.base_url(), error))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            tracing::warn!(%method, %path, status = status.as_u16(), "engine request failed");
            return Err(clean_error_response(status, &body));
        }
        Ok(response)
    }
}

fn connection_error(base_url: &str, error: reqwest::Error) -> anyhow::Error {
    if error.is_timeout() {
        return anyhow!("engine at {base_url} timed out; retry or raise [engine].timeout");
    }
    anyhow!("cannot reach {base_url} -- is the engine running? ({error})")
}

fn clean_error_response(status: StatusCode, body: &str) -> anyhow::Error {
    if let Ok(parsed) = serde_json::from_str::<ErrorEnvelope>(body)
        && let Some(message) = parsed.error.or(parsed.message)
        && !message.is_empty()
    {
        return anyhow!("engine error ({}): {}", status.as_u16(), message);
    }

    let trimmed = body.trim();
    if !trimmed.is_empty() && trimmed.len() < 100 && !trimmed.contains('{') {
        return anyhow!("engine error ({}): {}", status.as_u16(), trimmed);
    }

    anyhow!("engine returned {}", status.as_u16())
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<String>,
    message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::{Client, clean_error_response, parse_base_url};
    use reqwest::StatusCode;
    use std::time::Duration;

    #[test]
    fn parse_base_url_rejects_bad_input() {
        for (raw, needle) in [
            ("", "must not be empty"),
            ("not a url", "invalid engine URL"),
            ("ftp://engine:21", "unsupported scheme"),
        ] {
            let error = parse_base_url(raw).expect_err("should fail");
            assert!(error.to_string().contains(needle), "{raw:?}: {error}");
        }
    }

    #[test]
    fn base_url_is_normalized() {
        let client =
            Client::new("http://engine:7878/", Duration::from_secs(1)).expect("valid client");
        assert_eq!(client.base_url(), "http://engine:7878");
    }

    #[test]
    fn endpoint_escapes_segments_and_keeps_prefix() {
        let client =
            Client::new("http://engine:7878/api/", Duration::from_secs(1)).expect("valid client");
        let url = client
            .endpoint(&["databases", "q3 sales", "tables"])
            .expect("endpoint");
        assert_eq!(
            url.as_str(),
            "http://engine:7878/api/databases/q3%20sales/tables"
        );
    }

    #[test]
    fn error_bodies_are_cleaned() {
        let error = clean_error_response(StatusCode::NOT_FOUND, r#"{"error":"no such chip"}"#);
        assert_eq!(error.to_string(), "engine error (404): no such chip");

        let error = clean_error_response(StatusCode::BAD_REQUEST, r#"{"message":"bad sql"}"#);
        assert_eq!(error.to_string(), "engine error (400): bad sql");

        let error = clean_error_response(StatusCode::BAD_GATEWAY, "upstream down");
        assert_eq!(error.to_string(), "engine error (502): upstream down");

        let error = clean_error_response(StatusCode::INTERNAL_SERVER_ERROR, "{\"odd\":1}");
        assert_eq!(error.to_string(), "engine returned 500");
    }

    #[test]
    fn with_base_url_keeps_timeout() {
        let client = Client::new("http://a:1", Duration::from_millis(250)).expect("client");
        let other = client.with_base_url("https://b:2").expect("other");
        assert_eq!(other.timeout(), Duration::from_millis(250));
        assert_eq!(other.base_url(), "https://b:2");
    }
}
