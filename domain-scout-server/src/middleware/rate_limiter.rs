//! Per-client-IP rate limiting for the API routes.
//!
//! Sliding window: a client may make at most `max_requests` requests in any
//! `window`-long span. The limiter is injected through router state rather
//! than held globally.

use crate::error::ApiError;
use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

/// Configuration for rate limiting
#[derive(Clone, Debug)]
pub struct RateLimitConfig {
    /// Maximum requests within the window
    pub max_requests: usize,
    /// Length of the sliding window
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 30,
            window: Duration::from_secs(60),
        }
    }
}

/// Rate limiter that can be injected as a dependency
#[derive(Clone)]
pub struct RateLimiter {
    config: RateLimitConfig,
    /// Request timestamps per client, oldest first
    state: Arc<RwLock<HashMap<String, VecDeque<Instant>>>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::with_config(RateLimitConfig::default())
    }

    pub fn with_config(config: RateLimitConfig) -> Self {
        Self {
            config: RateLimitConfig {
                max_requests: config.max_requests.max(1),
                ..config
            },
            state: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Record a request from `client` if it is within budget.
    ///
    /// On rejection, returns how long until the oldest request in the window
    /// expires. Rejected requests are not recorded.
    pub async fn check(&self, client: &str) -> Result<(), Duration> {
        let now = Instant::now();
        let window = self.config.window;

        let mut state = self.state.write().await;
        let hits = state.entry(client.to_string()).or_default();

        while hits
            .front()
            .is_some_and(|&t| now.duration_since(t) >= window)
        {
            hits.pop_front();
        }

        if hits.len() >= self.config.max_requests {
            let retry_after = hits
                .front()
                .map(|&oldest| window.saturating_sub(now.duration_since(oldest)))
                .unwrap_or(window);
            tracing::warn!(
                client,
                requests = hits.len(),
                limit = self.config.max_requests,
                "rate limit exceeded"
            );
            return Err(retry_after);
        }

        hits.push_back(now);
        Ok(())
    }

    /// Drop clients with no requests inside the window.
    pub async fn cleanup(&self) {
        let now = Instant::now();
        let window = self.config.window;

        let mut state = self.state.write().await;
        state.retain(|_, hits| {
            hits.retain(|&t| now.duration_since(t) < window);
            !hits.is_empty()
        });

        let remaining = state.len();
        drop(state);

        if remaining > 0 {
            tracing::debug!(tracked_clients = remaining, "rate limiter cleanup");
        }
    }

    /// Start background cleanup task
    pub fn start_cleanup_task(&self) -> tokio::task::JoinHandle<()> {
        let limiter = self.clone();
        let period = self.config.window.max(Duration::from_secs(1));
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                limiter.cleanup().await;
            }
        })
    }

    pub async fn tracked_clients(&self) -> usize {
        self.state.read().await.len()
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

/// Client key for a request: the peer IP when the server exposes connect info.
pub fn client_ip(request: &Request) -> String {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Axum middleware enforcing the limiter in state.
pub async fn rate_limit(
    State(limiter): State<RateLimiter>,
    request: Request,
    next: Next,
) -> Response {
    let client = client_ip(&request);
    match limiter.check(&client).await {
        Ok(()) => next.run(request).await,
        Err(retry_after) => ApiError::rate_limited(retry_after).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(max_requests: usize, window_secs: u64) -> RateLimiter {
        RateLimiter::with_config(RateLimitConfig {
            max_requests,
            window: Duration::from_secs(window_secs),
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limiter() {
        let limiter = limiter(3, 60);

        for i in 0..3 {
            assert!(limiter.check("10.0.0.1").await.is_ok(), "request {} should pass", i);
        }
        assert!(limiter.check("10.0.0.1").await.is_err(), "4th request should fail");

        // Other clients have their own budget
        assert!(limiter.check("10.0.0.2").await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_window_slides() {
        let limiter = limiter(2, 60);

        limiter.check("a").await.unwrap();
        tokio::time::advance(Duration::from_secs(30)).await;
        limiter.check("a").await.unwrap();

        let retry_after = limiter.check("a").await.unwrap_err();
        assert_eq!(retry_after, Duration::from_secs(30));

        // The first request leaves the window; the second is still inside it
        tokio::time::advance(Duration::from_secs(30)).await;
        assert!(limiter.check("a").await.is_ok());
        assert!(limiter.check("a").await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cleanup_drops_idle_clients() {
        let limiter = limiter(5, 10);
        limiter.check("a").await.unwrap();
        limiter.check("b").await.unwrap();
        assert_eq!(limiter.tracked_clients().await, 2);

        tokio::time::advance(Duration::from_secs(11)).await;
        limiter.check("b").await.unwrap();
        limiter.cleanup().await;
        assert_eq!(limiter.tracked_clients().await, 1);
    }

    #[test]
    fn test_zero_budget_clamped() {
        let limiter = limiter(0, 60);
        assert_eq!(limiter.config().max_requests, 1);
    }
}
