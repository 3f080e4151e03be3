//! HTTP proxy backend for domain-scout.
//!
//! Exposes the lookup flows of `domain-scout-lib` over a small JSON API so a
//! browser client never sees the upstream API key.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use middleware::rate_limiter::{RateLimitConfig, RateLimiter};
pub use routes::create_app;
pub use state::AppState;
