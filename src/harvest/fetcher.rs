//! HTTP fetcher implementation
//!
//! This module handles every request made to the upstream sources:
//! - Building the shared HTTP client (one connection pool per run)
//! - Merging default headers with per-request overrides
//! - Sending a request and returning the raw body
//!
//! The fetcher does not interpret responses. A non-2xx status is returned like
//! any other body; recognizing malformed content is the collectors' job.

use crate::config::FetchConfig;
use reqwest::{Client, Method};
use std::collections::BTreeMap;
use std::time::Duration;

/// A single request against one upstream source
#[derive(Debug, Clone)]
pub struct SourceRequest {
    pub method: Method,
    pub url: String,
    /// Per-request headers; these win over the client defaults
    pub headers: BTreeMap<String, String>,
    /// Query-string parameters
    pub query: Vec<(String, String)>,
    /// Form-encoded body parameters
    pub form: Vec<(String, String)>,
}

impl SourceRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: BTreeMap::new(),
            query: Vec::new(),
            form: Vec::new(),
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    pub fn form(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.form.push((key.into(), value.to_string()));
        self
    }
}

/// Computes the headers actually sent: defaults overridden by per-request headers
///
/// Header names are compared case-insensitively and returned lowercased.
pub fn effective_headers(
    defaults: &BTreeMap<String, String>,
    overrides: &BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    let mut merged: BTreeMap<String, String> = defaults
        .iter()
        .map(|(name, value)| (name.to_ascii_lowercase(), value.clone()))
        .collect();

    for (name, value) in overrides {
        merged.insert(name.to_ascii_lowercase(), value.clone());
    }

    merged
}

/// Builds an HTTP client with the configured timeouts
///
/// The user agent is not baked into the client; it travels with the default
/// headers so individual requests can override it.
pub fn build_http_client(config: &FetchConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Shared connection context used by every collector
///
/// Cloning is cheap and shares the underlying connection pool.
#[derive(Debug, Clone)]
pub struct FetchClient {
    client: Client,
    default_headers: BTreeMap<String, String>,
}

impl FetchClient {
    /// Builds the client; failure here is a run-level error
    pub fn new(config: &FetchConfig) -> Result<Self, reqwest::Error> {
        let client = build_http_client(config)?;

        let mut default_headers = config.headers.clone();
        default_headers.insert("user-agent".to_string(), config.user_agent.clone());

        Ok(Self {
            client,
            default_headers: effective_headers(&BTreeMap::new(), &default_headers),
        })
    }

    pub fn default_headers(&self) -> &BTreeMap<String, String> {
        &self.default_headers
    }

    /// Performs one round trip and returns the response body
    ///
    /// Transport failures (timeouts, refused connections, invalid headers, body
    /// decoding) are returned unmodified. There is no retry at this layer.
    pub async fn send(&self, request: &SourceRequest) -> Result<String, reqwest::Error> {
        let mut builder = self.client.request(request.method.clone(), &request.url);

        for (name, value) in effective_headers(&self.default_headers, &request.headers) {
            builder = builder.header(name, value);
        }

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        if !request.form.is_empty() {
            builder = builder.form(&request.form);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::debug!("{} {} returned HTTP {}", request.method, request.url, status);
        }

        response.text().await
    }
}
