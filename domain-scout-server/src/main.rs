//! # Domain Scout Proxy Server
//!
//! Forwards search and status lookups to the upstream API with the key kept
//! server-side, caching results and rate-limiting clients.

use anyhow::Context;
use clap::Parser;
use domain_scout_lib::{
    load_env_config, resolve_lookup_config, resolve_server_settings, ConfigManager,
    LookupService,
};
use domain_scout_server::{create_app, AppState, RateLimitConfig, RateLimiter};
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "domain-scout-server")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Caching, rate-limited proxy for the Domainr availability API")]
struct Cli {
    /// Bind address (overrides [server] bind and DS_BIND)
    #[arg(short = 'b', long)]
    bind: Option<String>,

    /// Use specific config file instead of automatic discovery
    #[arg(long, value_name = "FILE")]
    config: Option<String>,

    /// Upstream API root
    #[arg(long, value_name = "URL")]
    endpoint: Option<String>,

    /// RapidAPI key (prefer DS_API_KEY so it stays out of the process list)
    #[arg(long, value_name = "KEY")]
    api_key: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let manager = ConfigManager::new(true);
    let env_config = load_env_config();
    let file_config = match cli.config.as_ref().or(env_config.config.as_ref()) {
        Some(path) => manager.load_file(path)?,
        None => manager.discover_and_load()?,
    };

    let mut lookup = resolve_lookup_config(&file_config, &env_config)?;
    if let Some(endpoint) = cli.endpoint {
        lookup = lookup.with_endpoint(endpoint);
    }
    if let Some(api_key) = cli.api_key {
        lookup = lookup.with_api_key(api_key);
    }
    if lookup.api_key.is_none() {
        tracing::warn!("no API key configured; upstream requests will likely be rejected");
    }

    let mut settings = resolve_server_settings(&file_config, &env_config)?;
    if let Some(bind) = cli.bind {
        settings.bind = bind;
    }
    let addr: SocketAddr = settings
        .bind
        .parse()
        .with_context(|| format!("invalid bind address '{}'", settings.bind))?;

    tracing::info!(
        endpoint = %lookup.endpoint,
        tlds = lookup.tlds.len(),
        cache_capacity = lookup.cache_capacity,
        cache_ttl_secs = lookup.cache_ttl.as_secs(),
        "lookup service configured"
    );

    let rate_limiter = RateLimiter::with_config(RateLimitConfig {
        max_requests: settings.rate_limit_requests as usize,
        window: settings.rate_limit_window,
    });
    let cleanup = rate_limiter.start_cleanup_task();

    let service = LookupService::new(lookup)?;
    let app = create_app(AppState::new(service, rate_limiter), &settings.cors_origins);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("listening on http://{}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    cleanup.abort();
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
