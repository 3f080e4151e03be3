use crate::middleware::rate_limiter::RateLimiter;
use domain_scout_lib::LookupService;
use std::sync::Arc;

/// Shared handler state: one lookup service (and so one cache) per process.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<LookupService>,
    pub rate_limiter: RateLimiter,
}

impl AppState {
    pub fn new(service: LookupService, rate_limiter: RateLimiter) -> Self {
        Self {
            service: Arc::new(service),
            rate_limiter,
        }
    }
}
