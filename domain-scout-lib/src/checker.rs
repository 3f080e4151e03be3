//! Lookup orchestration.
//!
//! `LookupService` resolves registration status for candidate domains using
//! one upstream call per domain, in one of two modes:
//!
//! - **sequential-throttled** ([`LookupService::check_sequential`]): strict
//!   input order with a fixed pause between calls; a failed lookup becomes a
//!   placeholder so the output stays aligned 1:1 with the input.
//! - **parallel-tolerant** ([`LookupService::check_parallel`],
//!   [`LookupService::search_parallel`]): every call in flight at once;
//!   failed lookups contribute nothing to the output.
//!
//! The higher-level flows (`search`, `check_candidates`, `expand`) compose
//! these with candidate generation, merging and the result cache.

use crate::cache::{generate_key, ResultCache, SharedCache};
use crate::concurrent::{sequential_throttled, settle_all};
use crate::error::DomainScoutError;
use crate::types::{DomainResult, LookupConfig};
use crate::upstream::{HttpUpstream, Upstream};
use crate::utils::{dedupe_results, generate_candidates, merge_results, validate_query};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Coordinates upstream lookups, failure isolation and caching.
///
/// # Example
///
/// ```rust,no_run
/// use domain_scout_lib::{LookupConfig, LookupService};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = LookupConfig::default().with_api_key("my-rapidapi-key");
///     let service = LookupService::new(config)?;
///
///     for result in service.check_candidates("example").await? {
///         println!("{}: {}", result.domain, result.summary);
///     }
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct LookupService {
    /// Constants injected at construction
    config: LookupConfig,
    /// Search and status collaborator
    upstream: Arc<dyn Upstream>,
    /// Result cache shared with whoever else holds the handle
    cache: SharedCache,
}

impl LookupService {
    /// Create a service backed by the HTTP upstream and a fresh cache.
    pub fn new(config: LookupConfig) -> Result<Self, DomainScoutError> {
        let upstream = HttpUpstream::from_config(&config)?;
        let cache = new_cache(&config);
        Ok(Self::with_upstream(config, Arc::new(upstream), cache))
    }

    /// Create a service from explicit collaborators.
    pub fn with_upstream(config: LookupConfig, upstream: Arc<dyn Upstream>, cache: SharedCache) -> Self {
        Self {
            config,
            upstream,
            cache,
        }
    }

    pub fn config(&self) -> &LookupConfig {
        &self.config
    }

    /// Handle to the result cache.
    pub fn cache(&self) -> &SharedCache {
        &self.cache
    }

    /// Status of a single domain, straight from the upstream (not cached).
    pub async fn status(&self, domain: &str) -> Result<DomainResult, DomainScoutError> {
        let domain = validate_query(domain)?;
        self.upstream.status(&domain).await
    }

    /// Check each domain strictly in order, pausing between lookups.
    ///
    /// The output has exactly one entry per input, in input order. A failed
    /// lookup yields a placeholder carrying the error message with empty
    /// status and unknown summary; it never stops later items.
    pub async fn check_sequential(&self, domains: &[String]) -> Vec<DomainResult> {
        let upstream = &self.upstream;
        let outcomes = sequential_throttled(domains, self.config.request_delay, |domain| async move {
            upstream.status(domain).await
        })
        .await;

        domains
            .iter()
            .zip(outcomes)
            .map(|(domain, outcome)| match outcome {
                Ok(result) => for_requested(result, domain),
                Err(e) => {
                    warn!(%domain, error = %e, "status lookup failed, keeping placeholder");
                    DomainResult::placeholder(domain.as_str(), e.to_string())
                }
            })
            .collect()
    }

    /// Check every domain concurrently, dropping the ones that fail.
    ///
    /// Successful results keep their relative input order.
    pub async fn check_parallel(&self, domains: &[String]) -> Vec<DomainResult> {
        let outcomes = settle_all(domains.iter().map(|domain| self.upstream.status(domain))).await;

        let total = outcomes.len();
        let results: Vec<DomainResult> = domains
            .iter()
            .zip(outcomes)
            .filter_map(|(domain, outcome)| match outcome {
                Ok(result) => Some(for_requested(result, domain)),
                Err(e) => {
                    warn!(%domain, error = %e, "status lookup failed, dropping");
                    None
                }
            })
            .collect();

        debug!(total, succeeded = results.len(), "parallel status batch settled");
        dedupe_results(results)
    }

    /// Run one upstream search per query concurrently.
    ///
    /// Failed batches are dropped; successful batches are flattened in query
    /// order and de-duplicated by domain.
    pub async fn search_parallel(&self, queries: &[String]) -> Vec<DomainResult> {
        let outcomes = settle_all(queries.iter().map(|query| self.upstream.search(query))).await;

        let total = outcomes.len();
        let mut succeeded = 0usize;
        let mut results = Vec::new();
        for (query, outcome) in queries.iter().zip(outcomes) {
            match outcome {
                Ok(batch) => {
                    succeeded += 1;
                    results.extend(batch);
                }
                Err(e) => warn!(%query, error = %e, "search batch failed, dropping"),
            }
        }

        debug!(total, succeeded, "parallel search batch settled");
        dedupe_results(results)
    }

    /// Search flow: upstream suggestions, each verified with a status lookup.
    ///
    /// Verification runs in sequential-throttled mode. The verified list is
    /// cached under the normalized query.
    pub async fn search(&self, query: &str) -> Result<Vec<DomainResult>, DomainScoutError> {
        let base = validate_query(query)?;
        let key = generate_key("search", [("query", Some(base.as_str()))]);

        if let Some(cached) = self.cache_get(&key) {
            return Ok(cached);
        }

        let suggestions = dedupe_results(self.upstream.search(&base).await?);
        let domains: Vec<String> = suggestions.iter().map(|s| s.domain.clone()).collect();
        info!(query = %base, suggestions = domains.len(), "verifying search suggestions");

        let verified = self.check_sequential(&domains).await;
        let results = dedupe_results(
            suggestions
                .into_iter()
                .zip(verified)
                .map(|(suggestion, mut result)| {
                    if result.zone.is_empty() {
                        result.zone = suggestion.zone;
                    }
                    result
                })
                .collect(),
        );

        self.cache_set(key, &results);
        Ok(results)
    }

    /// Candidate flow: `query` x configured TLDs plus the bare query, all
    /// checked in parallel. Failed candidates are left out.
    pub async fn check_candidates(&self, query: &str) -> Result<Vec<DomainResult>, DomainScoutError> {
        let candidates = generate_candidates(query, &self.config.tlds)?;
        let key = self.candidate_key("check", &candidates);

        if let Some(cached) = self.cache_get(&key) {
            return Ok(cached);
        }

        info!(candidates = candidates.len(), "checking candidates");
        let results = self.check_parallel(&candidates).await;
        self.cache_set(key, &results);
        Ok(results)
    }

    /// Expand flow: search every candidate in parallel and merge the
    /// surviving suggestions onto `existing`.
    ///
    /// `existing` is preserved as a prefix; re-running with the same inputs
    /// adds nothing new.
    pub async fn expand(
        &self,
        query: &str,
        existing: &[DomainResult],
    ) -> Result<Vec<DomainResult>, DomainScoutError> {
        let candidates = generate_candidates(query, &self.config.tlds)?;
        let key = self.candidate_key("expand", &candidates);

        let batch = match self.cache_get(&key) {
            Some(cached) => cached,
            None => {
                info!(candidates = candidates.len(), "expanding search");
                let batch = self.search_parallel(&candidates).await;
                self.cache_set(key, &batch);
                batch
            }
        };

        Ok(merge_results(existing, batch))
    }

    /// Cache key for candidate-based flows: the bare query (last candidate)
    /// plus the TLD list, which together determine the candidate set.
    fn candidate_key(&self, base: &str, candidates: &[String]) -> String {
        let query = candidates.last().map(String::as_str);
        let tlds = self.config.tlds.join(",");
        generate_key(base, [("query", query), ("tlds", Some(tlds.as_str()))])
    }

    fn cache_get(&self, key: &str) -> Option<Vec<DomainResult>> {
        let mut cache = self.cache.lock().ok()?;
        cache.get(key)
    }

    fn cache_set(&self, key: String, results: &[DomainResult]) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.set(key, results.to_vec());
        }
    }
}

/// Key a status record by the domain that was asked for, whatever name the
/// upstream echoed back.
fn for_requested(mut result: DomainResult, domain: &str) -> DomainResult {
    if result.domain != domain {
        debug!(requested = %domain, reported = %result.domain, "upstream renamed domain");
        result.domain = domain.to_string();
    }
    result
}

/// Build the shared cache described by `config`.
pub fn new_cache(config: &LookupConfig) -> SharedCache {
    let cache = ResultCache::shared(config.cache_capacity, config.cache_ttl);
    if !config.cache_enabled {
        if let Ok(mut guard) = cache.lock() {
            guard.set_enabled(false);
        }
    }
    cache
}
