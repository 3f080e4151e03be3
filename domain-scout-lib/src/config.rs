//! Configuration file parsing and management.
//!
//! This module handles loading configuration from TOML files and `DS_*`
//! environment variables, merging them with proper precedence rules, and
//! resolving the result into a [`LookupConfig`] or [`ServerSettings`].
//!
//! Precedence, highest first: CLI flags (applied by the caller), environment
//! variables, `./domain-scout.toml`, `~/.domain-scout.toml`,
//! `$XDG_CONFIG_HOME/domain-scout/config.toml`, built-in defaults.

use crate::error::DomainScoutError;
use crate::presets::{get_preset_tlds_with_custom, is_valid_tld, normalize_tlds};
use crate::types::{LookupConfig, UpstreamFlavor};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Configuration loaded from TOML files.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    /// Where and how to reach the upstream API
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream: Option<UpstreamSection>,

    /// Result cache settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache: Option<CacheSection>,

    /// Candidate generation and pacing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lookup: Option<LookupSection>,

    /// Proxy backend settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<ServerSection>,

    /// User-defined TLD presets
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_presets: Option<HashMap<String, Vec<String>>>,
}

/// `[upstream]` section.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpstreamSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// "provider" (default) or "proxy"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flavor: Option<UpstreamFlavor>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_host: Option<String>,

    /// Per-lookup timeout (as string, e.g. "5s", "1500ms")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,
}

/// `[cache]` section.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CacheSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<usize>,

    /// Entry lifetime (as string, e.g. "5m")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<String>,
}

/// `[lookup]` section.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LookupSection {
    /// TLD preset name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,

    /// Explicit TLD list (alternative to preset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tlds: Option<Vec<String>>,

    /// Pause between sequential lookups (as string, e.g. "1s")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay: Option<String>,
}

/// `[server]` section.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServerSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bind: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_limit_requests: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_limit_window: Option<String>,

    /// Allowed CORS origins; empty or absent means any origin
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cors_origins: Option<Vec<String>>,
}

/// Settings for the proxy backend after precedence has been applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerSettings {
    pub bind: String,
    pub rate_limit_requests: u32,
    pub rate_limit_window: Duration,
    pub cors_origins: Vec<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
            rate_limit_requests: 30,
            rate_limit_window: Duration::from_secs(60),
            cors_origins: Vec::new(),
        }
    }
}

/// Configuration discovery and loading functionality.
pub struct ConfigManager {
    /// Whether to report which config files were picked up
    pub verbose: bool,
}

impl ConfigManager {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Load and validate configuration from a specific file.
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<FileConfig, DomainScoutError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(DomainScoutError::file_error(
                path.to_string_lossy(),
                "Configuration file not found",
            ));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            DomainScoutError::file_error(
                path.to_string_lossy(),
                format!("Failed to read configuration file: {}", e),
            )
        })?;

        let config: FileConfig = toml::from_str(&content).map_err(|e| {
            DomainScoutError::config(format!(
                "Failed to parse TOML configuration {}: {}",
                path.display(),
                e
            ))
        })?;

        self.validate_config(&config)?;
        debug!(path = %path.display(), "loaded configuration file");

        Ok(config)
    }

    /// Discover and load configuration files in precedence order.
    ///
    /// A file that exists but fails to parse or validate is an error; missing
    /// files are skipped.
    pub fn discover_and_load(&self) -> Result<FileConfig, DomainScoutError> {
        let mut merged_config = FileConfig::default();
        let mut loaded_files = Vec::new();

        // Lowest precedence first so later files override earlier ones
        let candidates = [
            self.get_xdg_config_path(),
            self.get_global_config_path(),
            self.get_local_config_path(),
        ];

        for path in candidates.into_iter().flatten() {
            let config = self.load_file(&path)?;
            merged_config = self.merge_configs(merged_config, config);
            loaded_files.push(path);
        }

        if self.verbose && loaded_files.len() > 1 {
            let order: Vec<String> = loaded_files.iter().map(|p| p.display().to_string()).collect();
            info!(files = ?order, "multiple config files merged, later entries win");
        }

        Ok(merged_config)
    }

    fn get_local_config_path(&self) -> Option<PathBuf> {
        let candidates = ["./domain-scout.toml", "./.domain-scout.toml"];

        candidates
            .iter()
            .map(Path::new)
            .find(|path| path.exists())
            .map(Path::to_path_buf)
    }

    fn get_global_config_path(&self) -> Option<PathBuf> {
        let home = env::var_os("HOME")?;
        [".domain-scout.toml", "domain-scout.toml"]
            .iter()
            .map(|candidate| Path::new(&home).join(candidate))
            .find(|path| path.exists())
    }

    /// Follows the XDG Base Directory Specification.
    fn get_xdg_config_path(&self) -> Option<PathBuf> {
        let config_dir = env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| env::var_os("HOME").map(|home| Path::new(&home).join(".config")))?;

        let path = config_dir.join("domain-scout").join("config.toml");
        path.exists().then_some(path)
    }

    /// Merge two configurations; values from `higher` win field by field.
    pub fn merge_configs(&self, lower: FileConfig, higher: FileConfig) -> FileConfig {
        FileConfig {
            upstream: merge_section(lower.upstream, higher.upstream, |low, high| UpstreamSection {
                endpoint: high.endpoint.or(low.endpoint),
                flavor: high.flavor.or(low.flavor),
                api_key: high.api_key.or(low.api_key),
                api_host: high.api_host.or(low.api_host),
                timeout: high.timeout.or(low.timeout),
            }),
            cache: merge_section(lower.cache, higher.cache, |low, high| CacheSection {
                enabled: high.enabled.or(low.enabled),
                capacity: high.capacity.or(low.capacity),
                ttl: high.ttl.or(low.ttl),
            }),
            lookup: merge_section(lower.lookup, higher.lookup, |low, high| {
                // A TLD source chosen at the higher level replaces both at the lower level
                let (preset, tlds) = if high.preset.is_some() || high.tlds.is_some() {
                    (high.preset, high.tlds)
                } else {
                    (low.preset, low.tlds)
                };
                LookupSection {
                    preset,
                    tlds,
                    delay: high.delay.or(low.delay),
                }
            }),
            server: merge_section(lower.server, higher.server, |low, high| ServerSection {
                bind: high.bind.or(low.bind),
                rate_limit_requests: high.rate_limit_requests.or(low.rate_limit_requests),
                rate_limit_window: high.rate_limit_window.or(low.rate_limit_window),
                cors_origins: high.cors_origins.or(low.cors_origins),
            }),
            custom_presets: match (lower.custom_presets, higher.custom_presets) {
                (Some(mut lower_presets), Some(higher_presets)) => {
                    lower_presets.extend(higher_presets);
                    Some(lower_presets)
                }
                (lower_presets, higher_presets) => higher_presets.or(lower_presets),
            },
        }
    }

    /// Validate a configuration for common issues.
    pub fn validate_config(&self, config: &FileConfig) -> Result<(), DomainScoutError> {
        if let Some(upstream) = &config.upstream {
            validate_duration("upstream.timeout", upstream.timeout.as_deref())?;
            if upstream.timeout.as_deref().and_then(parse_duration_string) == Some(Duration::ZERO) {
                return Err(DomainScoutError::config("upstream.timeout must be greater than zero"));
            }
            if let Some(endpoint) = &upstream.endpoint {
                if endpoint.trim().is_empty() {
                    return Err(DomainScoutError::config("upstream.endpoint cannot be empty"));
                }
            }
        }

        if let Some(cache) = &config.cache {
            if cache.capacity == Some(0) {
                return Err(DomainScoutError::config("cache.capacity must be at least 1"));
            }
            validate_duration("cache.ttl", cache.ttl.as_deref())?;
        }

        if let Some(lookup) = &config.lookup {
            if lookup.preset.is_some() && lookup.tlds.is_some() {
                return Err(DomainScoutError::config(
                    "Cannot specify both 'preset' and 'tlds' in [lookup]",
                ));
            }
            if let Some(tlds) = &lookup.tlds {
                validate_tld_list("lookup.tlds", tlds)?;
            }
            validate_duration("lookup.delay", lookup.delay.as_deref())?;
        }

        if let Some(server) = &config.server {
            if server.rate_limit_requests == Some(0) {
                return Err(DomainScoutError::config(
                    "server.rate_limit_requests must be at least 1",
                ));
            }
            validate_duration("server.rate_limit_window", server.rate_limit_window.as_deref())?;
        }

        if let Some(presets) = &config.custom_presets {
            for (name, tlds) in presets {
                if name.is_empty() {
                    return Err(DomainScoutError::config("Custom preset names cannot be empty"));
                }
                validate_tld_list(&format!("custom preset '{}'", name), tlds)?;
            }
        }

        Ok(())
    }
}

fn merge_section<T, F>(lower: Option<T>, higher: Option<T>, merge: F) -> Option<T>
where
    F: FnOnce(T, T) -> T,
{
    match (lower, higher) {
        (Some(low), Some(high)) => Some(merge(low, high)),
        (low, high) => high.or(low),
    }
}

fn validate_duration(field: &str, value: Option<&str>) -> Result<(), DomainScoutError> {
    match value {
        Some(raw) if parse_duration_string(raw).is_none() => Err(DomainScoutError::config(
            format!(
                "Invalid duration '{}' for {}. Use format like '500ms', '5s', '2m' (at most one year)",
                raw, field
            ),
        )),
        _ => Ok(()),
    }
}

fn validate_tld_list(context: &str, tlds: &[String]) -> Result<(), DomainScoutError> {
    if tlds.is_empty() {
        return Err(DomainScoutError::config(format!(
            "{} cannot have an empty TLD list",
            context
        )));
    }
    for tld in normalize_tlds(tlds) {
        if !is_valid_tld(&tld) {
            return Err(DomainScoutError::config(format!(
                "Invalid TLD '{}' in {}",
                tld, context
            )));
        }
    }
    Ok(())
}

/// Environment variable configuration that mirrors CLI options.
///
/// Values come from `DS_*` variables; invalid values are reported and
/// ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvConfig {
    pub endpoint: Option<String>,
    pub flavor: Option<UpstreamFlavor>,
    pub api_key: Option<String>,
    pub api_host: Option<String>,
    pub timeout: Option<Duration>,
    pub delay: Option<Duration>,
    pub preset: Option<String>,
    pub tlds: Option<Vec<String>>,
    pub cache_enabled: Option<bool>,
    pub cache_capacity: Option<usize>,
    pub cache_ttl: Option<Duration>,
    pub config: Option<String>,
    pub bind: Option<String>,
    pub rate_limit_requests: Option<u32>,
    pub rate_limit_window: Option<Duration>,
}

/// Load configuration from the process environment.
pub fn load_env_config() -> EnvConfig {
    env_config_from(|name| env::var(name).ok())
}

/// Build an [`EnvConfig`] from any variable source.
pub fn env_config_from<F>(lookup: F) -> EnvConfig
where
    F: Fn(&str) -> Option<String>,
{
    let text = |name: &str| {
        lookup(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .inspect(|v| {
                if name != "DS_API_KEY" {
                    debug!(variable = name, value = %v, "using environment override");
                }
            })
    };

    let duration = |name: &str| {
        let raw = text(name)?;
        let parsed = parse_duration_string(&raw);
        if parsed.is_none() {
            warn!(variable = name, value = %raw, "invalid duration, use format like '500ms', '5s', '2m'");
        }
        parsed
    };

    let flag = |name: &str| {
        let raw = text(name)?;
        let parsed = parse_bool(&raw);
        if parsed.is_none() {
            warn!(variable = name, value = %raw, "invalid boolean, use true/false");
        }
        parsed
    };

    let positive = |name: &str| {
        let raw = text(name)?;
        match raw.parse::<usize>() {
            Ok(n) if n > 0 => Some(n),
            _ => {
                warn!(variable = name, value = %raw, "must be a positive integer");
                None
            }
        }
    };

    let flavor = text("DS_FLAVOR").and_then(|raw| match raw.to_lowercase().as_str() {
        "provider" => Some(UpstreamFlavor::Provider),
        "proxy" => Some(UpstreamFlavor::Proxy),
        _ => {
            warn!(variable = "DS_FLAVOR", value = %raw, "expected 'provider' or 'proxy'");
            None
        }
    });

    let tlds = text("DS_TLD")
        .map(|list| normalize_tlds(&list.split(',').collect::<Vec<_>>()))
        .filter(|tlds| !tlds.is_empty());

    EnvConfig {
        endpoint: text("DS_ENDPOINT"),
        flavor,
        api_key: text("DS_API_KEY"),
        api_host: text("DS_API_HOST"),
        timeout: duration("DS_TIMEOUT").filter(|timeout| {
            if timeout.is_zero() {
                warn!(variable = "DS_TIMEOUT", "timeout must be greater than zero, ignoring");
            }
            !timeout.is_zero()
        }),
        delay: duration("DS_DELAY"),
        preset: text("DS_PRESET"),
        tlds,
        cache_enabled: flag("DS_CACHE"),
        cache_capacity: positive("DS_CACHE_CAPACITY"),
        cache_ttl: duration("DS_CACHE_TTL"),
        config: text("DS_CONFIG"),
        bind: text("DS_BIND"),
        rate_limit_requests: positive("DS_RATE_LIMIT").and_then(|n| u32::try_from(n).ok()),
        rate_limit_window: duration("DS_RATE_WINDOW"),
    }
}

impl EnvConfig {
    /// Explicit TLDs win over a preset set at the same level.
    pub fn get_effective_preset(&self) -> Option<String> {
        if self.tlds.is_some() {
            None
        } else {
            self.preset.clone()
        }
    }
}

/// Resolve file and environment layers into a [`LookupConfig`].
///
/// Environment values override file values; anything unset falls back to the
/// built-in defaults.
pub fn resolve_lookup_config(
    file: &FileConfig,
    env: &EnvConfig,
) -> Result<LookupConfig, DomainScoutError> {
    let mut config = LookupConfig::default();
    let custom_presets = file.custom_presets.clone().unwrap_or_default();

    let upstream = file.upstream.clone().unwrap_or_default();
    let cache = file.cache.clone().unwrap_or_default();
    let lookup = file.lookup.clone().unwrap_or_default();

    if let Some(endpoint) = env.endpoint.clone().or(upstream.endpoint) {
        config = config.with_endpoint(endpoint);
    }
    if let Some(flavor) = env.flavor.or(upstream.flavor) {
        config.flavor = flavor;
    }
    if let Some(api_key) = env.api_key.clone().or(upstream.api_key) {
        config.api_key = Some(api_key);
    }
    if let Some(api_host) = env.api_host.clone().or(upstream.api_host) {
        config.api_host = Some(api_host);
    }
    if let Some(timeout) = env.timeout.or(file_duration(upstream.timeout.as_deref())?) {
        config.timeout = timeout;
    }
    if let Some(delay) = env.delay.or(file_duration(lookup.delay.as_deref())?) {
        config.request_delay = delay;
    }

    let capacity = env.cache_capacity.or(cache.capacity).unwrap_or(config.cache_capacity);
    if capacity == 0 {
        return Err(DomainScoutError::config("cache capacity must be at least 1"));
    }
    let ttl = match env.cache_ttl {
        Some(ttl) => ttl,
        None => file_duration(cache.ttl.as_deref())?.unwrap_or(config.cache_ttl),
    };
    let enabled = env.cache_enabled.or(cache.enabled).unwrap_or(config.cache_enabled);
    config = config.with_cache(enabled, capacity, ttl);

    // Environment TLD source replaces the file's, whichever form either uses
    let (preset, tlds) = if env.tlds.is_some() || env.preset.is_some() {
        (env.get_effective_preset(), env.tlds.clone())
    } else {
        (lookup.preset, lookup.tlds)
    };
    if let Some(tlds) = tlds {
        config.tlds = normalize_tlds(&tlds);
    } else if let Some(preset) = preset {
        config.tlds = resolve_preset(&preset, &custom_presets)?;
    }
    if config.tlds.is_empty() {
        return Err(DomainScoutError::config("TLD list cannot be empty"));
    }

    config.custom_presets = custom_presets;
    Ok(config)
}

/// Resolve file and environment layers into [`ServerSettings`].
pub fn resolve_server_settings(
    file: &FileConfig,
    env: &EnvConfig,
) -> Result<ServerSettings, DomainScoutError> {
    let defaults = ServerSettings::default();
    let server = file.server.clone().unwrap_or_default();

    let window = match env.rate_limit_window {
        Some(window) => window,
        None => file_duration(server.rate_limit_window.as_deref())?
            .unwrap_or(defaults.rate_limit_window),
    };

    Ok(ServerSettings {
        bind: env.bind.clone().or(server.bind).unwrap_or(defaults.bind),
        rate_limit_requests: env
            .rate_limit_requests
            .or(server.rate_limit_requests)
            .unwrap_or(defaults.rate_limit_requests)
            .max(1),
        rate_limit_window: window,
        cors_origins: server.cors_origins.unwrap_or(defaults.cors_origins),
    })
}

/// Look up a preset (custom first, then built-in) or fail with a config error.
pub fn resolve_preset(
    preset: &str,
    custom_presets: &HashMap<String, Vec<String>>,
) -> Result<Vec<String>, DomainScoutError> {
    get_preset_tlds_with_custom(preset, Some(custom_presets))
        .map(|tlds| normalize_tlds(&tlds))
        .ok_or_else(|| {
            DomainScoutError::config(format!(
                "Unknown preset '{}'. Available presets: {}",
                preset,
                crate::presets::get_available_presets().join(", ")
            ))
        })
}

fn file_duration(raw: Option<&str>) -> Result<Option<Duration>, DomainScoutError> {
    raw.map(|value| {
        parse_duration_string(value).ok_or_else(|| {
            DomainScoutError::config(format!(
                "Invalid duration '{}'. Use format like '500ms', '5s', '2m'",
                value
            ))
        })
    })
    .transpose()
}

/// Longest duration any setting accepts.
pub const MAX_DURATION: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Parse a duration string like "500ms", "5s", "2m". A bare number is seconds.
///
/// Values above [`MAX_DURATION`] are rejected.
pub fn parse_duration_string(raw: &str) -> Option<Duration> {
    parse_duration_unbounded(raw).filter(|d| *d <= MAX_DURATION)
}

fn parse_duration_unbounded(raw: &str) -> Option<Duration> {
    let raw = raw.trim().to_lowercase();

    if let Some(ms) = raw.strip_suffix("ms") {
        ms.trim().parse::<u64>().ok().map(Duration::from_millis)
    } else if let Some(secs) = raw.strip_suffix('s') {
        secs.trim().parse::<u64>().ok().map(Duration::from_secs)
    } else if let Some(mins) = raw.strip_suffix('m') {
        mins.trim()
            .parse::<u64>()
            .ok()
            .and_then(|m| m.checked_mul(60))
            .map(Duration::from_secs)
    } else {
        raw.parse::<u64>().ok().map(Duration::from_secs)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(content.as_bytes()).unwrap();
        temp_file.flush().unwrap();
        temp_file
    }

    fn env_from(pairs: &[(&str, &str)]) -> EnvConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        env_config_from(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_parse_duration_string() {
        assert_eq!(parse_duration_string("500ms"), Some(Duration::from_millis(500)));
        assert_eq!(parse_duration_string("5s"), Some(Duration::from_secs(5)));
        assert_eq!(parse_duration_string("2m"), Some(Duration::from_secs(120)));
        assert_eq!(parse_duration_string(" 30 "), Some(Duration::from_secs(30)));
        assert_eq!(parse_duration_string("invalid"), None);
        assert_eq!(parse_duration_string("5h"), None);
    }

    #[test]
    fn test_parse_duration_upper_bound() {
        assert_eq!(parse_duration_string("31536000s"), Some(MAX_DURATION));
        assert_eq!(parse_duration_string("31536001"), None);
        assert_eq!(parse_duration_string("18446744073709551615s"), None);
        assert_eq!(parse_duration_string("18446744073709551615ms"), None);
    }

    #[test]
    fn test_load_valid_config() {
        let temp_file = write_config(
            r#"
[upstream]
endpoint = "http://localhost:8080/api/"
flavor = "proxy"
timeout = "3s"

[cache]
capacity = 50
ttl = "2m"

[lookup]
preset = "startup"
delay = "250ms"

[custom_presets]
mine = ["com", "org", "io"]
"#,
        );

        let manager = ConfigManager::new(false);
        let config = manager.load_file(temp_file.path()).unwrap();

        let upstream = config.upstream.as_ref().unwrap();
        assert_eq!(upstream.flavor, Some(UpstreamFlavor::Proxy));
        assert_eq!(config.cache.as_ref().unwrap().capacity, Some(50));
        assert_eq!(
            config.custom_presets.as_ref().unwrap().get("mine"),
            Some(&vec!["com".to_string(), "org".to_string(), "io".to_string()])
        );

        let lookup = resolve_lookup_config(&config, &EnvConfig::default()).unwrap();
        assert_eq!(lookup.endpoint, "http://localhost:8080/api");
        assert_eq!(lookup.flavor, UpstreamFlavor::Proxy);
        assert_eq!(lookup.timeout, Duration::from_secs(3));
        assert_eq!(lookup.request_delay, Duration::from_millis(250));
        assert_eq!(lookup.cache_capacity, 50);
        assert_eq!(lookup.cache_ttl, Duration::from_secs(120));
        assert_eq!(lookup.tlds[0], "com");
        assert_eq!(lookup.tlds[1], "io");
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let manager = ConfigManager::new(false);
        let cases = [
            "[cache]\ncapacity = 0\n",
            "[cache]\nttl = \"forever\"\n",
            "[lookup]\ntlds = []\n",
            "[lookup]\npreset = \"startup\"\ntlds = [\"com\"]\n",
            "[upstream]\ntimeout = \"fast\"\n",
            "[upstream]\ntimeout = \"0s\"\n",
            "[cache]\nttl = \"18446744073709551615s\"\n",
            "[custom_presets]\nbad = [\"not a tld\"]\n",
            "[server]\nrate_limit_requests = 0\n",
        ];

        for content in cases {
            let temp_file = write_config(content);
            let result = manager.load_file(temp_file.path());
            assert!(
                matches!(result, Err(DomainScoutError::Config { .. })),
                "expected config error for {:?}",
                content
            );
        }
    }

    #[test]
    fn test_missing_file() {
        let manager = ConfigManager::new(false);
        let result = manager.load_file("/definitely/not/here/domain-scout.toml");
        assert!(matches!(result, Err(DomainScoutError::File { .. })));
    }

    #[test]
    fn test_merge_configs() {
        let manager = ConfigManager::new(false);

        let lower = FileConfig {
            upstream: Some(UpstreamSection {
                endpoint: Some("http://low".to_string()),
                api_key: Some("low-key".to_string()),
                ..Default::default()
            }),
            lookup: Some(LookupSection {
                preset: Some("classic".to_string()),
                delay: Some("2s".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };

        let higher = FileConfig {
            upstream: Some(UpstreamSection {
                endpoint: Some("http://high".to_string()),
                ..Default::default()
            }),
            lookup: Some(LookupSection {
                tlds: Some(vec!["dev".to_string()]),
                ..Default::default()
            }),
            ..Default::default()
        };

        let merged = manager.merge_configs(lower, higher);
        let upstream = merged.upstream.unwrap();
        assert_eq!(upstream.endpoint.as_deref(), Some("http://high"));
        assert_eq!(upstream.api_key.as_deref(), Some("low-key"));

        let lookup = merged.lookup.unwrap();
        assert_eq!(lookup.preset, None);
        assert_eq!(lookup.tlds, Some(vec!["dev".to_string()]));
        assert_eq!(lookup.delay.as_deref(), Some("2s"));
    }

    #[test]
    fn test_env_overrides_file() {
        let file = FileConfig {
            lookup: Some(LookupSection {
                preset: Some("classic".to_string()),
                ..Default::default()
            }),
            cache: Some(CacheSection {
                enabled: Some(true),
                ..Default::default()
            }),
            ..Default::default()
        };
        let env = env_from(&[
            ("DS_TLD", "IO, .dev,io"),
            ("DS_CACHE", "off"),
            ("DS_TIMEOUT", "1500ms"),
            ("DS_API_KEY", "secret"),
        ]);

        let config = resolve_lookup_config(&file, &env).unwrap();
        assert_eq!(config.tlds, vec!["io".to_string(), "dev".to_string()]);
        assert!(!config.cache_enabled);
        assert_eq!(config.timeout, Duration::from_millis(1500));
        assert_eq!(config.api_key.as_deref(), Some("secret"));
    }

    #[test]
    fn test_invalid_env_values_ignored() {
        let env = env_from(&[
            ("DS_TIMEOUT", "soon"),
            ("DS_CACHE", "maybe"),
            ("DS_CACHE_CAPACITY", "0"),
            ("DS_FLAVOR", "other"),
            ("DS_ENDPOINT", "   "),
        ]);
        assert_eq!(env, EnvConfig::default());
    }

    #[test]
    fn test_out_of_range_env_durations_ignored() {
        let env = env_from(&[
            ("DS_TIMEOUT", "0ms"),
            ("DS_CACHE_TTL", "18446744073709551615s"),
            ("DS_DELAY", "0s"),
        ]);
        assert_eq!(env.timeout, None);
        assert_eq!(env.cache_ttl, None);
        // A zero delay just disables throttling
        assert_eq!(env.delay, Some(Duration::ZERO));
    }

    #[test]
    fn test_unknown_preset_rejected() {
        let file = FileConfig {
            lookup: Some(LookupSection {
                preset: Some("nope".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let err = resolve_lookup_config(&file, &EnvConfig::default()).unwrap_err();
        assert!(err.to_string().contains("nope"));
    }

    #[test]
    fn test_custom_preset_resolution() {
        let mut presets = HashMap::new();
        presets.insert("mine".to_string(), vec!["ai".to_string(), "dev".to_string()]);
        let file = FileConfig {
            custom_presets: Some(presets),
            ..Default::default()
        };
        let env = env_from(&[("DS_PRESET", "mine")]);

        let config = resolve_lookup_config(&file, &env).unwrap();
        assert_eq!(config.tlds, vec!["ai".to_string(), "dev".to_string()]);
    }

    #[test]
    fn test_server_settings() {
        let file = FileConfig {
            server: Some(ServerSection {
                bind: Some("0.0.0.0:9000".to_string()),
                rate_limit_window: Some("30s".to_string()),
                cors_origins: Some(vec!["http://localhost:5173".to_string()]),
                ..Default::default()
            }),
            ..Default::default()
        };
        let env = env_from(&[("DS_RATE_LIMIT", "5")]);

        let settings = resolve_server_settings(&file, &env).unwrap();
        assert_eq!(settings.bind, "0.0.0.0:9000");
        assert_eq!(settings.rate_limit_requests, 5);
        assert_eq!(settings.rate_limit_window, Duration::from_secs(30));
        assert_eq!(settings.cors_origins.len(), 1);

        let defaults = resolve_server_settings(&FileConfig::default(), &EnvConfig::default()).unwrap();
        assert_eq!(defaults, ServerSettings::default());
    }
}
