//! Rate limiting for the authentication endpoints.
//!
//! Register and login are the only unauthenticated write endpoints, so they
//! get a per-client limiter keyed by source address.

use std::{
    collections::HashMap,
    num::NonZeroU32,
    sync::{Arc, RwLock},
};

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter as GovRateLimiter,
};

use crate::app::AppState;
use crate::error::ApiError;

type ClientRateLimiter = GovRateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Shared limiter state. One independent limiter per client key.
pub struct RateLimiterState {
    limiters: RwLock<HashMap<String, Arc<ClientRateLimiter>>>,
    per_minute: u32,
    burst: u32,
}

impl RateLimiterState {
    pub fn new(per_minute: u32, burst: u32) -> Self {
        Self {
            limiters: RwLock::new(HashMap::new()),
            per_minute,
            burst,
        }
    }

    fn get_or_create_limiter(&self, key: &str) -> Arc<ClientRateLimiter> {
        {
            let limiters = self.limiters.read().unwrap();
            if let Some(limiter) = limiters.get(key) {
                return limiter.clone();
            }
        }

        let mut limiters = self.limiters.write().unwrap();

        // Another thread may have created it between the locks.
        if let Some(limiter) = limiters.get(key) {
            return limiter.clone();
        }

        let rate = NonZeroU32::new(self.per_minute).unwrap_or(NonZeroU32::new(10).unwrap());
        let burst = NonZeroU32::new(self.per_minute.saturating_add(self.burst))
            .unwrap_or(NonZeroU32::new(10).unwrap());
        let quota = Quota::per_minute(rate).allow_burst(burst);
        let limiter = Arc::new(GovRateLimiter::direct(quota));
        limiters.insert(key.to_string(), limiter.clone());
        limiter
    }

    /// Ok when the request is allowed, Err with retry-after seconds when not.
    pub fn check(&self, key: &str) -> Result<(), u64> {
        let limiter = self.get_or_create_limiter(key);

        match limiter.check() {
            Ok(_) => Ok(()),
            Err(not_until) => {
                let wait_time = not_until.wait_time_from(governor::clock::Clock::now(
                    &governor::clock::DefaultClock::default(),
                ));
                Err(wait_time.as_secs().max(1))
            }
        }
    }
}

impl std::fmt::Debug for RateLimiterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiterState")
            .field("per_minute", &self.per_minute)
            .field("burst", &self.burst)
            .field("active_limiters", &self.limiters.read().unwrap().len())
            .finish()
    }
}

/// Middleware applied to register and login routes.
pub async fn auth_rate_limit(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(ref limiter) = state.auth_rate_limiter {
        let key = client_key(req.headers());
        if let Err(retry_after) = limiter.check(&key) {
            tracing::warn!(client = %key, retry_after, "auth rate limit exceeded");
            return ApiError::RateLimited {
                retry_after_secs: retry_after,
            }
            .into_response();
        }
    }

    next.run(req).await
}

/// Client key for limiting: the first X-Forwarded-For hop when present.
fn client_key(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_first_request_allowed() {
        let state = RateLimiterState::new(10, 0);
        assert!(state.check("10.0.0.1").is_ok());
    }

    #[test]
    fn test_exhaustion_returns_retry_after() {
        let state = RateLimiterState::new(1, 0);
        assert!(state.check("10.0.0.1").is_ok());

        let result = state.check("10.0.0.1");
        assert!(result.is_err());
        assert!(result.unwrap_err() >= 1);
    }

    #[test]
    fn test_clients_are_independent() {
        let state = RateLimiterState::new(1, 0);
        assert!(state.check("10.0.0.1").is_ok());
        assert!(state.check("10.0.0.2").is_ok());
        assert!(state.check("10.0.0.1").is_err());
    }

    #[test]
    fn test_burst_allows_extra_requests() {
        let state = RateLimiterState::new(1, 2);
        // Burst capacity of rate + burst = 3 immediate requests.
        assert!(state.check("10.0.0.1").is_ok());
        assert!(state.check("10.0.0.1").is_ok());
        assert!(state.check("10.0.0.1").is_ok());
        assert!(state.check("10.0.0.1").is_err());
    }

    #[test]
    fn test_get_or_create_idempotent() {
        let state = RateLimiterState::new(10, 0);
        let a = state.get_or_create_limiter("k");
        let b = state.get_or_create_limiter("k");
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_client_key_from_forwarded_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.9, 10.0.0.1"),
        );
        assert_eq!(client_key(&headers), "203.0.113.9");
    }

    #[test]
    fn test_client_key_fallback() {
        let headers = HeaderMap::new();
        assert_eq!(client_key(&headers), "unknown");
    }

    #[test]
    fn test_debug_format() {
        let state = RateLimiterState::new(10, 5);
        state.check("a").unwrap();
        let debug = format!("{:?}", state);
        assert!(debug.contains("per_minute"));
        assert!(debug.contains("active_limiters"));
    }
}
