//! Core data types for domain lookups.
//!
//! This module defines the result record shared by every front end, the
//! coarse availability classification, and the runtime lookup configuration.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Default upstream API root (Domainr via RapidAPI).
pub const DEFAULT_ENDPOINT: &str = "https://domainr.p.rapidapi.com/v2";

/// Result of a status lookup for one candidate domain.
///
/// Field names are part of the export contract: `domain`, `zone`, `status`
/// and `summary` always exist, even on placeholders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainResult {
    /// The candidate name (e.g. "example.com", or a bare "example")
    pub domain: String,

    /// Registrable zone suffix (e.g. "com"), empty when unknown
    #[serde(default)]
    pub zone: String,

    /// Raw upstream status code, empty when no status is known
    #[serde(default)]
    pub status: String,

    /// Coarse classification derived from `status`
    #[serde(default)]
    pub summary: Summary,

    /// Error message for a lookup that failed (placeholders only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DomainResult {
    /// Build a result from a raw upstream status, deriving the summary.
    pub fn with_status<D, Z, S>(domain: D, zone: Z, status: S) -> Self
    where
        D: Into<String>,
        Z: Into<String>,
        S: Into<String>,
    {
        let status = status.into();
        Self {
            domain: domain.into(),
            zone: zone.into(),
            summary: classify_status(&status),
            status,
            error: None,
        }
    }

    /// A result with no status yet (e.g. an upstream search suggestion).
    pub fn unchecked<D: Into<String>, Z: Into<String>>(domain: D, zone: Z) -> Self {
        Self::with_status(domain, zone, "")
    }

    /// Placeholder for a lookup that failed: status empty, summary unknown.
    pub fn placeholder<D: Into<String>, E: Into<String>>(domain: D, error: E) -> Self {
        let domain = domain.into();
        Self {
            zone: zone_of(&domain).to_string(),
            domain,
            status: String::new(),
            summary: Summary::Unknown,
            error: Some(error.into()),
        }
    }

    pub fn is_available(&self) -> bool {
        self.summary == Summary::Available
    }

    pub fn is_placeholder(&self) -> bool {
        self.error.is_some()
    }
}

/// Coarse availability bucket.
///
/// `Unknown` is deliberately distinct from `Unavailable`: a missing status is
/// never reported as registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Summary {
    /// The registrable / unregistered condition
    Available,
    /// Registered, reserved, or any other non-empty status
    Unavailable,
    /// No status known
    #[default]
    Unknown,
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Summary::Available => write!(f, "available"),
            Summary::Unavailable => write!(f, "unavailable"),
            Summary::Unknown => write!(f, "unknown"),
        }
    }
}

/// Map a raw upstream status to its summary bucket.
///
/// `"inactive"` is the only available condition; empty is unknown;
/// everything else collapses to unavailable.
pub fn classify_status(raw: &str) -> Summary {
    let raw = raw.trim();
    if raw.is_empty() {
        Summary::Unknown
    } else if raw.eq_ignore_ascii_case("inactive") {
        Summary::Available
    } else {
        Summary::Unavailable
    }
}

/// Zone suffix of a candidate name: everything after the first dot.
pub fn zone_of(domain: &str) -> &str {
    domain.split_once('.').map(|(_, zone)| zone).unwrap_or("")
}

/// Which response shape the configured endpoint speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpstreamFlavor {
    /// The third-party provider: raw records with `status`/`summary` tokens
    #[default]
    Provider,
    /// A domain-scout proxy backend: already-reshaped `DomainResult` records
    Proxy,
}

impl std::fmt::Display for UpstreamFlavor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UpstreamFlavor::Provider => write!(f, "provider"),
            UpstreamFlavor::Proxy => write!(f, "proxy"),
        }
    }
}

/// Runtime settings injected into the lookup service at construction.
///
/// Values are constants for the lifetime of the service; nothing re-reads
/// configuration per call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupConfig {
    /// Upstream API root, without a trailing slash
    pub endpoint: String,

    /// Response shape spoken by `endpoint`
    pub flavor: UpstreamFlavor,

    /// API key sent as `X-RapidAPI-Key` when present
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Host header sent as `X-RapidAPI-Host` when present
    pub api_host: Option<String>,

    /// Ordered TLD list used for candidate generation
    pub tlds: Vec<String>,

    /// Bound on each individual upstream lookup
    /// Default: 10 seconds
    #[serde(skip)]
    pub timeout: Duration,

    /// Pause between consecutive lookups in sequential mode
    /// Default: 1 second
    #[serde(skip)]
    pub request_delay: Duration,

    /// Whether results are memoized
    pub cache_enabled: bool,

    /// Maximum number of cached result sets
    /// Default: 100
    pub cache_capacity: usize,

    /// Lifetime of a cached result set
    /// Default: 5 minutes
    #[serde(skip)]
    pub cache_ttl: Duration,

    /// User-defined TLD presets from config files
    #[serde(skip)]
    pub custom_presets: HashMap<String, Vec<String>>,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            flavor: UpstreamFlavor::Provider,
            api_key: None,
            api_host: Some("domainr.p.rapidapi.com".to_string()),
            tlds: crate::presets::default_tlds(),
            timeout: Duration::from_secs(10),
            request_delay: Duration::from_secs(1),
            cache_enabled: true,
            cache_capacity: 100,
            cache_ttl: Duration::from_secs(300),
            custom_presets: HashMap::new(),
        }
    }
}

impl LookupConfig {
    /// Set the upstream endpoint, trimming any trailing slash.
    pub fn with_endpoint<S: Into<String>>(mut self, endpoint: S) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    /// Point at a domain-scout proxy backend instead of the provider.
    pub fn with_proxy<S: Into<String>>(self, endpoint: S) -> Self {
        let mut config = self.with_endpoint(endpoint);
        config.flavor = UpstreamFlavor::Proxy;
        config
    }

    pub fn with_api_key<S: Into<String>>(mut self, api_key: S) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set TLDs used for candidate generation.
    pub fn with_tlds(mut self, tlds: Vec<String>) -> Self {
        self.tlds = tlds;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    /// Configure the result cache; capacity is clamped to at least one entry.
    pub fn with_cache(mut self, enabled: bool, capacity: usize, ttl: Duration) -> Self {
        self.cache_enabled = enabled;
        self.cache_capacity = capacity.max(1);
        self.cache_ttl = ttl;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_boundary() {
        assert_eq!(classify_status("inactive"), Summary::Available);
        assert_eq!(classify_status(" Inactive "), Summary::Available);
        assert_eq!(classify_status("active"), Summary::Unavailable);
        assert_eq!(classify_status("reserved"), Summary::Unavailable);
        assert_eq!(classify_status("undelegated inactive"), Summary::Unavailable);
        assert_eq!(classify_status(""), Summary::Unknown);
        assert_eq!(classify_status("   "), Summary::Unknown);
        assert_ne!(Summary::Unknown, Summary::Unavailable);
        assert_ne!(Summary::Unknown, Summary::Available);
    }

    #[test]
    fn test_placeholder_shape() {
        let result = DomainResult::placeholder("shop.example.io", "timed out");
        assert_eq!(result.domain, "shop.example.io");
        assert_eq!(result.zone, "example.io");
        assert_eq!(result.status, "");
        assert_eq!(result.summary, Summary::Unknown);
        assert!(result.is_placeholder());
        assert!(!result.is_available());
    }

    #[test]
    fn test_zone_of() {
        assert_eq!(zone_of("example.com"), "com");
        assert_eq!(zone_of("example.co.uk"), "co.uk");
        assert_eq!(zone_of("example"), "");
    }

    #[test]
    fn test_summary_serializes_lowercase() {
        let result = DomainResult::with_status("example.com", "com", "inactive");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["summary"], "available");
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_config_defaults() {
        let config = LookupConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.request_delay, Duration::from_secs(1));
        assert_eq!(config.cache_capacity, 100);
        assert!(!config.tlds.is_empty());

        let config = config
            .with_endpoint("http://localhost:3000/api/")
            .with_cache(true, 0, Duration::from_secs(1));
        assert_eq!(config.endpoint, "http://localhost:3000/api");
        assert_eq!(config.flavor, UpstreamFlavor::Provider);
        assert_eq!(config.cache_capacity, 1);

        let config = config.with_proxy("http://127.0.0.1:8080/api");
        assert_eq!(config.flavor, UpstreamFlavor::Proxy);
    }
}
