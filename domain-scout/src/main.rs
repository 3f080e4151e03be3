//! Domain Scout CLI Application
//!
//! A command-line interface for searching and checking domain availability
//! through the Domainr API, or through a domain-scout proxy backend.
//! This CLI application provides a user-friendly interface to the domain-scout-lib library.

mod ui;

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::Parser;
use console::Term;
use domain_scout_lib::export::{self, ExportFormat};
use domain_scout_lib::{
    get_available_presets, get_preset_tlds, load_env_config, normalize_tlds,
    parse_duration_string, resolve_lookup_config, resolve_preset, ConfigManager, DomainResult,
    DomainScoutError, LookupConfig, LookupService, UpstreamFlavor,
};
use std::process;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

/// CLI arguments for domain-scout
#[derive(Parser, Debug)]
#[command(name = "domain-scout")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "Sai Dutt G.V <gvs46@protonmail.com>")]
#[command(about = "Search and check domain availability through the Domainr API")]
#[command(
    long_about = "Search for domain names and check their registration status through the Domainr API.\n\nSupports TLD presets, parallel candidate checks, search expansion, result caching, and CSV/TXT/JSON export."
)]
#[command(styles = STYLES)]
pub struct Args {
    /// Search query or base name (e.g. "example")
    #[arg(value_name = "QUERY", help_heading = "Lookup")]
    pub query: Option<String>,

    /// Check QUERY across the TLD list instead of searching
    #[arg(long = "check", conflicts_with = "expand", help_heading = "Lookup")]
    pub check: bool,

    /// Search, then expand every TLD candidate and merge the suggestions
    #[arg(long = "expand", help_heading = "Lookup")]
    pub expand: bool,

    /// TLDs to use (comma-separated or multiple -t flags)
    #[arg(short = 't', long = "tld", value_name = "TLD", value_delimiter = ',', action = clap::ArgAction::Append, help_heading = "Lookup")]
    pub tlds: Option<Vec<String>>,

    /// Use a predefined TLD preset (use --list-presets to see all)
    #[arg(long = "preset", value_name = "NAME", help_heading = "Lookup")]
    pub preset: Option<String>,

    /// List all available TLD presets and exit
    #[arg(long = "list-presets", help_heading = "Lookup")]
    pub list_presets: bool,

    /// Upstream API root (default: Domainr on RapidAPI)
    #[arg(long = "endpoint", value_name = "URL", help_heading = "Upstream")]
    pub endpoint: Option<String>,

    /// Treat the endpoint as a domain-scout proxy backend
    #[arg(long = "proxy", help_heading = "Upstream")]
    pub proxy: bool,

    /// RapidAPI key sent as X-RapidAPI-Key
    #[arg(long = "api-key", value_name = "KEY", help_heading = "Upstream")]
    pub api_key: Option<String>,

    /// Per-lookup timeout (e.g. "5s", "1500ms")
    #[arg(long = "timeout", value_name = "DURATION", help_heading = "Upstream")]
    pub timeout: Option<String>,

    /// Pause between sequential status lookups (e.g. "1s", "250ms")
    #[arg(long = "delay", value_name = "DURATION", help_heading = "Upstream")]
    pub delay: Option<String>,

    /// Disable the in-memory result cache
    #[arg(long = "no-cache", help_heading = "Upstream")]
    pub no_cache: bool,

    /// Output results in JSON format
    #[arg(short = 'j', long = "json", help_heading = "Output Format")]
    pub json: bool,

    /// Output results in CSV format
    #[arg(long = "csv", help_heading = "Output Format")]
    pub csv: bool,

    /// Output one domain per line
    #[arg(long = "txt", help_heading = "Output Format")]
    pub txt: bool,

    /// Only show or export available domains
    #[arg(short = 'a', long = "available-only", help_heading = "Output Format")]
    pub available_only: bool,

    /// Write the export to FILE (format from flag or extension)
    #[arg(short = 'o', long = "output", value_name = "FILE", help_heading = "Output Format")]
    pub output: Option<String>,

    /// Group results by status with section headers
    #[arg(short = 'p', long = "pretty", help_heading = "Output Format")]
    pub pretty: bool,

    /// Use specific config file instead of automatic discovery
    #[arg(long = "config", value_name = "FILE", help_heading = "Configuration")]
    pub config: Option<String>,

    /// Show debug logs on stderr
    #[arg(short = 'd', long = "debug", help_heading = "Configuration")]
    pub debug: bool,

    /// Verbose logging
    #[arg(short = 'v', long = "verbose", help_heading = "Configuration")]
    pub verbose: bool,
}

/// Which lookup flow a run performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    Search,
    Check,
    Expand,
}

impl Mode {
    fn from_args(args: &Args) -> Self {
        if args.check {
            Mode::Check
        } else if args.expand {
            Mode::Expand
        } else {
            Mode::Search
        }
    }

    pub(crate) fn progress_label(&self) -> &'static str {
        match self {
            Mode::Search => "Searching",
            Mode::Check => "Checking",
            Mode::Expand => "Expanding",
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = validate_args(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    if args.list_presets {
        print_presets();
        return;
    }

    init_logging(&args);
    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "domain-scout starting");

    if let Err(e) = run(args).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Route library logs to stderr so stdout stays clean for exports.
fn init_logging(args: &Args) {
    let default_level = if args.debug {
        "debug"
    } else if args.verbose {
        "info"
    } else {
        "warn"
    };

    let filter = if args.debug {
        EnvFilter::new(default_level)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Validate command line arguments
fn validate_args(args: &Args) -> Result<(), String> {
    // --list-presets is self-contained, skip other validation
    if args.list_presets {
        return Ok(());
    }

    match &args.query {
        Some(query) if !query.trim().is_empty() => {}
        _ => return Err("You must specify a search query".to_string()),
    }

    let output_formats = [args.json, args.csv, args.txt].iter().filter(|&&x| x).count();
    if output_formats > 1 {
        return Err("Cannot specify multiple output formats (--json, --csv, --txt)".to_string());
    }

    if args.tlds.is_some() && args.preset.is_some() {
        return Err(
            "Cannot specify multiple TLD sources. Use only one of: -t/--tld or --preset".to_string(),
        );
    }

    for (flag, value) in [("--timeout", &args.timeout), ("--delay", &args.delay)] {
        if let Some(raw) = value {
            if parse_duration_string(raw).is_none() {
                return Err(format!(
                    "Invalid {} '{}'. Use format like '500ms', '5s', '2m'",
                    flag, raw
                ));
            }
        }
    }

    if args.timeout.as_deref().and_then(parse_duration_string) == Some(Duration::ZERO) {
        return Err("--timeout must be greater than zero".to_string());
    }

    Ok(())
}

/// Print all available TLD presets with their TLDs, then exit.
fn print_presets() {
    use console::Style;

    let heading = Style::new().yellow().bold();
    let name_style = Style::new().green().bold();
    let count_style = Style::new().cyan();

    println!();
    println!("{}", heading.apply_to("Available TLD Presets:"));
    println!();

    for preset_name in get_available_presets() {
        if let Some(tlds) = get_preset_tlds(preset_name) {
            println!(
                "  {} {}  {}",
                name_style.apply_to(format!("{:<12}", preset_name)),
                count_style.apply_to(format!("({})", tlds.len())),
                tlds.join(", "),
            );
        }
    }

    println!();
    println!("Use: domain-scout <query> --check --preset <preset>");
}

/// Structured format requested on the command line, if any.
fn output_format(args: &Args) -> Option<ExportFormat> {
    if args.json {
        Some(ExportFormat::Json)
    } else if args.csv {
        Some(ExportFormat::Csv)
    } else if args.txt {
        Some(ExportFormat::Txt)
    } else {
        None
    }
}

/// Main lookup logic
async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = build_config(&args)?;
    let query = args.query.clone().unwrap_or_default();
    let mode = Mode::from_args(&args);
    let format = output_format(&args);
    let structured_stdout = format.is_some() && args.output.is_none();

    if args.verbose && !structured_stdout {
        ui::print_header(&query, mode, &config);
    }

    let service = LookupService::new(config)?;

    let spinner = (!structured_stdout && Term::stderr().is_term())
        .then(|| ui::Spinner::start(format!("{} '{}'...", mode.progress_label(), query)));
    let start = Instant::now();
    let outcome = run_mode(&service, mode, &query).await;
    if let Some(spinner) = spinner {
        spinner.stop().await;
    }
    let results = outcome?;
    let duration = start.elapsed();

    if let Some(path) = &args.output {
        let file_format = format
            .or_else(|| ExportFormat::from_path(path))
            .unwrap_or(ExportFormat::Txt);
        let content = export::render(&results, file_format, args.available_only)?;
        export::write_to_file(path, &content)?;
        display_text_results(&results, &args, duration);
        ui::print_export_notice(path, content.lines().count());
    } else if let Some(format) = format {
        let content = export::render(&results, format, args.available_only)?;
        if content.ends_with('\n') {
            print!("{}", content);
        } else {
            println!("{}", content);
        }
    } else {
        display_text_results(&results, &args, duration);
    }

    Ok(())
}

async fn run_mode(
    service: &LookupService,
    mode: Mode,
    query: &str,
) -> Result<Vec<DomainResult>, DomainScoutError> {
    match mode {
        Mode::Search => service.search(query).await,
        Mode::Check => service.check_candidates(query).await,
        Mode::Expand => {
            let initial = service.search(query).await?;
            service.expand(query, &initial).await
        }
    }
}

/// Build configuration with precedence: CLI > env > config files > defaults
fn build_config(args: &Args) -> Result<LookupConfig, Box<dyn std::error::Error>> {
    let manager = ConfigManager::new(args.verbose);
    let env_config = load_env_config();

    // Explicit config file (CLI, then DS_CONFIG) replaces discovery
    let file_config = match args.config.as_ref().or(env_config.config.as_ref()) {
        Some(path) => manager.load_file(path)?,
        None => manager.discover_and_load()?,
    };

    let config = resolve_lookup_config(&file_config, &env_config)?;
    apply_cli_args_to_config(config, args)
}

/// Apply CLI arguments to config (highest precedence).
fn apply_cli_args_to_config(
    mut config: LookupConfig,
    args: &Args,
) -> Result<LookupConfig, Box<dyn std::error::Error>> {
    if let Some(endpoint) = &args.endpoint {
        config = config.with_endpoint(endpoint.as_str());
    }
    if args.proxy {
        config.flavor = UpstreamFlavor::Proxy;
    }
    if let Some(api_key) = &args.api_key {
        config = config.with_api_key(api_key.as_str());
    }

    if let Some(raw) = &args.timeout {
        let timeout = parse_duration_string(raw).ok_or_else(|| format!("Invalid --timeout '{}'", raw))?;
        config = config.with_timeout(timeout);
    }
    if let Some(raw) = &args.delay {
        let delay = parse_duration_string(raw).ok_or_else(|| format!("Invalid --delay '{}'", raw))?;
        config = config.with_request_delay(delay);
    }

    if let Some(tlds) = &args.tlds {
        let tlds = normalize_tlds(tlds);
        if tlds.is_empty() {
            return Err("TLD list cannot be empty".into());
        }
        config = config.with_tlds(tlds);
    } else if let Some(preset) = &args.preset {
        let tlds = resolve_preset(preset, &config.custom_presets)?;
        config = config.with_tlds(tlds);
    }

    if args.no_cache {
        config.cache_enabled = false;
    }

    Ok(config)
}

/// Count results per summary bucket: (available, unavailable, unknown).
fn summary_counts(results: &[DomainResult]) -> (usize, usize, usize) {
    use domain_scout_lib::Summary;

    results.iter().fold((0, 0, 0), |(a, u, k), r| match r.summary {
        Summary::Available => (a + 1, u, k),
        Summary::Unavailable => (a, u + 1, k),
        Summary::Unknown => (a, u, k + 1),
    })
}

/// Display results in human-readable text format
fn display_text_results(results: &[DomainResult], args: &Args, duration: Duration) {
    let shown: Vec<DomainResult> = if args.available_only {
        results.iter().filter(|r| r.is_available()).cloned().collect()
    } else {
        results.to_vec()
    };

    if shown.is_empty() {
        ui::print_no_results(args.available_only);
    } else if args.pretty {
        ui::print_grouped_results(&shown, args.debug);
    } else {
        for result in &shown {
            ui::print_result(result, args.debug);
        }
    }

    let (available, unavailable, unknown) = summary_counts(results);
    println!();
    ui::print_summary(results.len(), available, unavailable, unknown, duration);
}

// domain-scout/src/main.rs tests module

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        let mut full = vec!["domain-scout"];
        full.extend_from_slice(argv);
        Args::try_parse_from(full).unwrap()
    }

    #[test]
    fn test_validate_args_requires_query() {
        assert!(validate_args(&parse(&[])).is_err());
        assert!(validate_args(&parse(&["  "])).is_err());
        assert!(validate_args(&parse(&["example"])).is_ok());
        assert!(validate_args(&parse(&["--list-presets"])).is_ok());
    }

    #[test]
    fn test_validate_args_multiple_formats_rejected() {
        let args = parse(&["example", "--json", "--csv"]);
        assert!(validate_args(&args).is_err());

        let args = parse(&["example", "--txt", "-o", "out.txt"]);
        assert!(validate_args(&args).is_ok());
    }

    #[test]
    fn test_validate_args_tld_and_preset_rejected() {
        let args = parse(&["example", "-t", "com", "--preset", "startup"]);
        assert!(validate_args(&args)
            .unwrap_err()
            .contains("multiple TLD sources"));
    }

    #[test]
    fn test_validate_args_bad_duration() {
        let args = parse(&["example", "--timeout", "soon"]);
        assert!(validate_args(&args).unwrap_err().contains("--timeout"));

        let args = parse(&["example", "--delay", "250ms"]);
        assert!(validate_args(&args).is_ok());
    }

    #[test]
    fn test_validate_args_zero_timeout() {
        let args = parse(&["example", "--timeout", "0s"]);
        assert!(validate_args(&args)
            .unwrap_err()
            .contains("greater than zero"));

        // A zero delay is fine: it just disables throttling
        let args = parse(&["example", "--delay", "0ms"]);
        assert!(validate_args(&args).is_ok());
    }

    #[test]
    fn test_check_and_expand_conflict() {
        let full = ["domain-scout", "example", "--check", "--expand"];
        assert!(Args::try_parse_from(full).is_err());
    }

    #[test]
    fn test_mode_from_args() {
        assert_eq!(Mode::from_args(&parse(&["example"])), Mode::Search);
        assert_eq!(Mode::from_args(&parse(&["example", "--check"])), Mode::Check);
        assert_eq!(Mode::from_args(&parse(&["example", "--expand"])), Mode::Expand);
    }

    #[test]
    fn test_cli_overrides_config() {
        let args = parse(&[
            "example",
            "-t",
            "COM,.io",
            "-t",
            "dev",
            "--timeout",
            "1500ms",
            "--delay",
            "0s",
            "--no-cache",
            "--endpoint",
            "http://localhost:8080/api/",
            "--proxy",
            "--api-key",
            "k",
        ]);

        let config = apply_cli_args_to_config(LookupConfig::default(), &args).unwrap();
        assert_eq!(config.tlds, vec!["com", "io", "dev"]);
        assert_eq!(config.timeout, Duration::from_millis(1500));
        assert_eq!(config.request_delay, Duration::ZERO);
        assert!(!config.cache_enabled);
        assert_eq!(config.endpoint, "http://localhost:8080/api");
        assert_eq!(config.flavor, UpstreamFlavor::Proxy);
        assert_eq!(config.api_key.as_deref(), Some("k"));
    }

    #[test]
    fn test_cli_preset_resolution() {
        let args = parse(&["example", "--preset", "startup"]);
        let config = apply_cli_args_to_config(LookupConfig::default(), &args).unwrap();
        assert_eq!(config.tlds, get_preset_tlds("startup").unwrap());

        let args = parse(&["example", "--preset", "missing"]);
        assert!(apply_cli_args_to_config(LookupConfig::default(), &args).is_err());
    }

    #[test]
    fn test_output_format() {
        assert_eq!(output_format(&parse(&["x"])), None);
        assert_eq!(output_format(&parse(&["x", "--json"])), Some(ExportFormat::Json));
        assert_eq!(output_format(&parse(&["x", "--csv"])), Some(ExportFormat::Csv));
        assert_eq!(output_format(&parse(&["x", "--txt"])), Some(ExportFormat::Txt));
    }

    #[test]
    fn test_summary_counts() {
        let results = vec![
            DomainResult::with_status("example.com", "com", "inactive"),
            DomainResult::with_status("example.net", "net", "active"),
            DomainResult::with_status("example", "", "active"),
            DomainResult::placeholder("example.io", "timed out"),
        ];
        assert_eq!(summary_counts(&results), (1, 2, 1));
    }
}
