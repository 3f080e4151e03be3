//! # Domain Scout Library
//!
//! Domain-availability lookups against a third-party provider API (or a
//! domain-scout proxy), with candidate expansion across TLDs, failure-isolated
//! fan-out and an in-memory LRU + TTL result cache.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use domain_scout_lib::{LookupConfig, LookupService};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = LookupConfig::default().with_api_key("my-rapidapi-key");
//!     let service = LookupService::new(config)?;
//!
//!     let result = service.status("example.com").await?;
//!     println!("{} - {}", result.domain, result.summary);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Search**: upstream suggestions, each verified with a status lookup
//! - **Candidate checks**: one query expanded across a TLD list, in parallel
//! - **Expansion**: parallel searches merged onto an existing result list
//! - **Caching**: bounded LRU with per-entry expiry
//! - **Export**: CSV, plain text and JSON

// Re-export main public API types and functions
pub use cache::{generate_key, CacheStats, ResultCache, SharedCache};
pub use checker::{new_cache, LookupService};
pub use config::{
    env_config_from, load_env_config, parse_duration_string, resolve_lookup_config,
    resolve_preset, resolve_server_settings, ConfigManager, EnvConfig, FileConfig,
    ServerSettings,
};
pub use error::{DomainScoutError, UpstreamRejection};
pub use export::ExportFormat;
pub use presets::{
    get_available_presets, get_preset_tlds, get_preset_tlds_with_custom, normalize_tlds,
    DEFAULT_PRESET,
};
pub use types::{
    classify_status, zone_of, DomainResult, LookupConfig, Summary, UpstreamFlavor,
    DEFAULT_ENDPOINT,
};
pub use upstream::{HttpUpstream, SearchLookup, StatusLookup, Upstream};
pub use utils::{dedupe_results, generate_candidates, merge_results, validate_query};

// Public modules
pub mod concurrent;
pub mod export;
pub mod upstream;

mod cache;
mod checker;
mod config;
mod error;
mod presets;
mod types;
mod utils;

pub type Result<T> = std::result::Result<T, DomainScoutError>;

// Library version and metadata
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const AUTHOR: &str = env!("CARGO_PKG_AUTHORS");

/// Get library information for debugging or display purposes.
pub fn info() -> LibraryInfo {
    LibraryInfo {
        version: VERSION,
        author: AUTHOR,
        default_endpoint: DEFAULT_ENDPOINT,
        presets: get_available_presets(),
    }
}

/// Information about the library build
#[derive(Debug, Clone)]
pub struct LibraryInfo {
    pub version: &'static str,
    pub author: &'static str,
    pub default_endpoint: &'static str,
    pub presets: Vec<&'static str>,
}
