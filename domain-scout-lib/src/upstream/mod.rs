//! Upstream collaborators.
//!
//! The lookup service only ever talks to the outside world through the two
//! traits below. `HttpUpstream` implements both against the provider API (or
//! a domain-scout proxy); tests substitute in-memory fakes.

use crate::error::DomainScoutError;
use crate::types::DomainResult;
use async_trait::async_trait;

/// HTTP implementation for the provider and proxy endpoints
pub mod http;

pub use http::{parse_search_body, parse_status_body, HttpUpstream};

/// Free-text search: one query in, a list of domain-shaped suggestions out.
#[async_trait]
pub trait SearchLookup: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<DomainResult>, DomainScoutError>;
}

/// Status of one fully-qualified candidate.
///
/// Implementations must bound each call by a timeout and report expiry as a
/// `Timeout` error.
#[async_trait]
pub trait StatusLookup: Send + Sync {
    async fn status(&self, domain: &str) -> Result<DomainResult, DomainScoutError>;
}

/// Anything that provides both lookups.
pub trait Upstream: SearchLookup + StatusLookup {}

impl<T: SearchLookup + StatusLookup> Upstream for T {}
