use crate::handlers;
use crate::middleware::rate_limit;
use crate::state::AppState;
use axum::http::{HeaderValue, Method};
use axum::{middleware, routing::get, Router};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Creates the application router.
///
/// `/health` is unthrottled; everything under `/api` passes through the
/// per-IP rate limiter.
pub fn create_app(state: AppState, cors_origins: &[String]) -> Router {
    let api = Router::new()
        .route("/search", get(handlers::search))
        .route("/status", get(handlers::status))
        .route("/expand", get(handlers::expand))
        .route(
            "/cache",
            get(handlers::cache_stats).delete(handlers::clear_cache),
        )
        .route_layer(middleware::from_fn_with_state(
            state.rate_limiter.clone(),
            rate_limit,
        ));

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api", api)
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS for the configured origins, or any origin when none are configured.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any);

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if parsed.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(parsed))
    }
}
