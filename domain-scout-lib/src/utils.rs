//! Candidate generation, query validation and result merging.
//!
//! These helpers feed the lookup service and shape what it hands back:
//! candidates are generated deterministically from the configured TLD list,
//! and every result set leaving the library is de-duplicated by domain name.

use crate::error::DomainScoutError;
use crate::types::DomainResult;
use std::collections::HashSet;

/// Strip every whitespace character from a free-text query.
pub fn normalize_query(query: &str) -> String {
    query.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Validate a query before any lookup is issued.
///
/// Returns the normalized query (whitespace removed).
pub fn validate_query(query: &str) -> Result<String, DomainScoutError> {
    let base = normalize_query(query);

    if base.is_empty() {
        return Err(DomainScoutError::invalid_query(query, "Query cannot be empty"));
    }

    if base.len() > 253 {
        return Err(DomainScoutError::invalid_query(
            query,
            "Query is longer than 253 characters",
        ));
    }

    if base.starts_with('.') || base.ends_with('.') || base.contains("..") {
        return Err(DomainScoutError::invalid_query(
            query,
            "Query has an empty label",
        ));
    }

    Ok(base)
}

/// Build the candidate list for a query.
///
/// One `base.tld` per configured TLD, in configured order, followed by the
/// bare base itself. Whitespace inside the query is stripped first.
///
/// # Examples
///
/// ```rust
/// use domain_scout_lib::generate_candidates;
///
/// let tlds = vec!["com".to_string(), "net".to_string()];
/// let candidates = generate_candidates("exam ple", &tlds).unwrap();
/// assert_eq!(candidates, vec!["example.com", "example.net", "example"]);
/// ```
pub fn generate_candidates(query: &str, tlds: &[String]) -> Result<Vec<String>, DomainScoutError> {
    let base = validate_query(query)?;

    if tlds.is_empty() {
        return Err(DomainScoutError::config("TLD list cannot be empty"));
    }

    let mut candidates: Vec<String> = tlds
        .iter()
        .map(|tld| format!("{}.{}", base, tld))
        .collect();
    candidates.push(base);

    Ok(candidates)
}

/// Append `incoming` onto `existing`, dropping any domain already present.
///
/// The existing list is kept as a prefix in its original order. Incoming
/// items are appended in batch order, skipping domains that match an
/// existing one (exact string equality) or an earlier incoming item.
/// Merging the same batch twice therefore changes nothing the second time.
pub fn merge_results(existing: &[DomainResult], incoming: Vec<DomainResult>) -> Vec<DomainResult> {
    let mut seen: HashSet<String> = existing.iter().map(|r| r.domain.clone()).collect();
    let mut merged = existing.to_vec();

    for result in incoming {
        if seen.insert(result.domain.clone()) {
            merged.push(result);
        }
    }

    merged
}

/// Remove duplicate domains from a single list, first-seen wins.
pub fn dedupe_results(results: Vec<DomainResult>) -> Vec<DomainResult> {
    merge_results(&[], results)
}
