//! HTTP client for the upstream `search` and `status` endpoints.
//!
//! Every request is bounded by the configured timeout. Non-success responses
//! are classified into `UpstreamRejection` codes here, so callers only need to
//! know that an item failed.

use crate::error::{DomainScoutError, UpstreamRejection};
use crate::types::{zone_of, DomainResult, LookupConfig, UpstreamFlavor};
use crate::upstream::{SearchLookup, StatusLookup};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, RETRY_AFTER};
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct SearchBody {
    #[serde(default)]
    results: Vec<SearchRecord>,
}

#[derive(Debug, Deserialize)]
struct SearchRecord {
    domain: String,
    #[serde(default)]
    zone: String,
}

#[derive(Debug, Deserialize)]
struct StatusBody {
    #[serde(default)]
    status: Vec<StatusRecord>,
}

#[derive(Debug, Deserialize)]
struct StatusRecord {
    domain: String,
    #[serde(default)]
    zone: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    summary: Option<String>,
}

/// Upstream client speaking either the provider or the proxy shape.
#[derive(Clone)]
pub struct HttpUpstream {
    /// HTTP client for upstream requests
    http_client: reqwest::Client,
    /// API root without trailing slash
    endpoint: String,
    /// Response shape of `endpoint`
    flavor: UpstreamFlavor,
    /// Bound on each request
    timeout: Duration,
}

impl HttpUpstream {
    /// Create a client from the lookup configuration.
    pub fn from_config(config: &LookupConfig) -> Result<Self, DomainScoutError> {
        let mut headers = HeaderMap::new();
        if let Some(key) = &config.api_key {
            let value = HeaderValue::from_str(key)
                .map_err(|_| DomainScoutError::config("API key contains invalid characters"))?;
            headers.insert("X-RapidAPI-Key", value);
        }
        if let Some(host) = &config.api_host {
            if config.flavor == UpstreamFlavor::Provider {
                let value = HeaderValue::from_str(host)
                    .map_err(|_| DomainScoutError::config("API host contains invalid characters"))?;
                headers.insert("X-RapidAPI-Host", value);
            }
        }

        let http_client = reqwest::Client::builder()
            .timeout(config.timeout.saturating_add(Duration::from_secs(2))) // Buffer over the per-lookup bound
            .user_agent(concat!("domain-scout/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .map_err(|e| {
                DomainScoutError::network_with_source(
                    "Failed to create upstream HTTP client",
                    e.to_string(),
                )
            })?;

        Ok(Self {
            http_client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            flavor: config.flavor,
            timeout: config.timeout,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn flavor(&self) -> UpstreamFlavor {
        self.flavor
    }

    /// GET `{endpoint}/{path}` with one query parameter, bounded by the timeout.
    async fn fetch(&self, path: &str, param: (&str, &str)) -> Result<String, DomainScoutError> {
        let url = format!("{}/{}", self.endpoint, path);
        let start = Instant::now();
        debug!(%url, param = param.1, "upstream request");

        let request = async {
            let response = self
                .http_client
                .get(&url)
                .query(&[param])
                .send()
                .await
                .map_err(|e| {
                    if e.is_timeout() {
                        DomainScoutError::timeout(format!("{} lookup", path), self.timeout)
                    } else {
                        DomainScoutError::from(e)
                    }
                })?;

            let status = response.status();
            let retry_after = parse_retry_after(response.headers());
            let body = response.text().await?;
            Ok::<_, DomainScoutError>((status, retry_after, body))
        };

        let (status, retry_after, body) = tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|_| DomainScoutError::timeout(format!("{} lookup", path), self.timeout))??;

        debug!(
            %url,
            status = status.as_u16(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "upstream response"
        );

        if status == StatusCode::OK {
            return Ok(body);
        }

        warn!(%url, status = status.as_u16(), "upstream rejected request");
        Err(rejection(status, retry_after, &body))
    }
}

#[async_trait]
impl SearchLookup for HttpUpstream {
    async fn search(&self, query: &str) -> Result<Vec<DomainResult>, DomainScoutError> {
        let body = self.fetch("search", ("query", query)).await?;
        parse_search_body(self.flavor, &body)
    }
}

#[async_trait]
impl StatusLookup for HttpUpstream {
    async fn status(&self, domain: &str) -> Result<DomainResult, DomainScoutError> {
        let body = self.fetch("status", ("domain", domain)).await?;
        parse_status_body(self.flavor, domain, &body)
    }
}

/// Parse a `search` response body into unchecked suggestions.
///
/// Both shapes carry `{"results": [{"domain", "zone", ...}]}`. Proxy records
/// may already carry a status, which is kept.
pub fn parse_search_body(
    flavor: UpstreamFlavor,
    body: &str,
) -> Result<Vec<DomainResult>, DomainScoutError> {
    match flavor {
        UpstreamFlavor::Provider => {
            let parsed: SearchBody = serde_json::from_str(body)?;
            Ok(parsed
                .results
                .into_iter()
                .map(|r| {
                    let zone = if r.zone.is_empty() {
                        zone_of(&r.domain).to_string()
                    } else {
                        r.zone
                    };
                    DomainResult::unchecked(r.domain, zone)
                })
                .collect())
        }
        UpstreamFlavor::Proxy => {
            let parsed: ProxyResults = serde_json::from_str(body)?;
            Ok(parsed.results.into_iter().map(reclassify).collect())
        }
    }
}

/// Parse a `status` response body for `domain`.
///
/// The entry naming `domain` (ASCII case-insensitive) is used, else the
/// first one. The result always carries the requested `domain`. For the
/// provider, its raw status is the `summary` token when present and
/// non-empty, else the `status` string. No entries at all is a
/// `MissingStatus` failure.
pub fn parse_status_body(
    flavor: UpstreamFlavor,
    domain: &str,
    body: &str,
) -> Result<DomainResult, DomainScoutError> {
    let missing = || DomainScoutError::MissingStatus {
        domain: domain.to_string(),
    };

    match flavor {
        UpstreamFlavor::Provider => {
            let parsed: StatusBody = serde_json::from_str(body)?;
            let record =
                pick_entry(parsed.status, domain, |r| r.domain.as_str()).ok_or_else(missing)?;
            let raw = match record.summary {
                Some(summary) if !summary.trim().is_empty() => summary,
                _ => record.status,
            };
            let zone = if record.zone.is_empty() {
                zone_of(domain).to_string()
            } else {
                record.zone
            };
            Ok(DomainResult::with_status(domain, zone, raw.trim()))
        }
        UpstreamFlavor::Proxy => {
            let parsed: ProxyStatus = serde_json::from_str(body)?;
            let mut result =
                pick_entry(parsed.status, domain, |r| r.domain.as_str()).ok_or_else(missing)?;
            result.domain = domain.to_string();
            if result.zone.is_empty() {
                result.zone = zone_of(domain).to_string();
            }
            Ok(reclassify(result))
        }
    }
}

#[derive(Debug, Deserialize)]
struct ProxyResults {
    #[serde(default)]
    results: Vec<DomainResult>,
}

#[derive(Debug, Deserialize)]
struct ProxyStatus {
    #[serde(default)]
    status: Vec<DomainResult>,
}

/// The entry whose name matches `domain`, falling back to the first.
fn pick_entry<T>(entries: Vec<T>, domain: &str, name: impl Fn(&T) -> &str) -> Option<T> {
    let position = entries
        .iter()
        .position(|entry| name(entry).eq_ignore_ascii_case(domain))
        .unwrap_or(0);
    entries.into_iter().nth(position)
}

/// Re-derive the summary from the raw status rather than trusting the wire.
fn reclassify(result: DomainResult) -> DomainResult {
    let mut fresh = DomainResult::with_status(result.domain, result.zone, result.status);
    fresh.error = result.error;
    fresh
}

fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

/// Build the error for a non-200 upstream response.
fn rejection(status: StatusCode, retry_after: Option<Duration>, body: &str) -> DomainScoutError {
    let message = extract_error_message(body)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unexpected status").to_string());

    DomainScoutError::Upstream {
        kind: UpstreamRejection::from_status(status.as_u16()),
        status_code: status.as_u16(),
        message,
        retry_after,
    }
}

/// Pull a human-readable message out of an error body.
///
/// Accepts `{"message": ..}`, `{"error": ".."}`, `{"error": {"message": ..}}`
/// and `{"errors": [{"message": ..}]}`.
fn extract_error_message(body: &str) -> Option<String> {
    let json: serde_json::Value = serde_json::from_str(body).ok()?;
    json.get("message")
        .and_then(|m| m.as_str())
        .or_else(|| json.get("error").and_then(|e| e.as_str()))
        .or_else(|| {
            json.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
        })
        .or_else(|| {
            json.get("errors")
                .and_then(|e| e.as_array())
                .and_then(|a| a.first())
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
        })
        .map(String::from)
}
