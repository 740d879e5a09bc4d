//! Rate limiting middleware using Governor.
//!
//! Implements per-client rate limiting with a token bucket algorithm. Clients
//! are identified by the first `X-Forwarded-For` hop.

use axum::{
    Json,
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{
    DefaultKeyedRateLimiter, Quota, RateLimiter,
    clock::{Clock, DefaultClock},
};
use serde_json::json;
use std::{
    num::NonZeroU32,
    sync::{Arc, Weak},
    time::Duration,
};
use tokio::task::JoinHandle;

/// How often idle client entries are dropped from the limiter.
pub const PRUNE_INTERVAL: Duration = Duration::from_secs(60);

/// Rate limiter state shared across requests.
pub struct RateLimiterState {
    /// One bucket per client key
    limiter: DefaultKeyedRateLimiter<String>,
    clock: DefaultClock,
}

impl Default for RateLimiterState {
    fn default() -> Self {
        Self::per_minute(100)
    }
}

impl RateLimiterState {
    /// Allows a burst of `requests`, refilled evenly over a minute.
    /// Zero is treated as one.
    pub fn per_minute(requests: u32) -> Self {
        let burst = NonZeroU32::new(requests).unwrap_or(NonZeroU32::MIN);
        Self::with_quota(Quota::per_minute(burst))
    }

    pub fn with_quota(quota: Quota) -> Self {
        Self {
            limiter: RateLimiter::keyed(quota),
            clock: DefaultClock::default(),
        }
    }

    /// Checks if a request should be rate limited.
    /// Returns how long the client must wait when it is.
    pub fn check(&self, key: &str) -> Result<(), Duration> {
        self.limiter
            .check_key(&key.to_string())
            .map_err(|not_until| not_until.wait_time_from(self.clock.now()))
    }

    /// Number of clients currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.limiter.len()
    }

    /// Drops clients whose bucket has refilled completely; they are
    /// indistinguishable from clients never seen.
    pub fn prune(&self) {
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
    }

    /// Prunes every `every` until the state is dropped.
    pub fn spawn_pruner(self: &Arc<Self>, every: Duration) -> JoinHandle<()> {
        let state: Weak<Self> = Arc::downgrade(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(state) = state.upgrade() else { break };
                state.prune();
                tracing::debug!(clients = state.tracked_clients(), "Rate limiter pruned");
            }
        })
    }
}

/// Client identity used as the limiter key.
fn client_key(request: &Request<Body>) -> String {
    request
        .headers()
        .get("X-Forwarded-For")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("anonymous")
        .to_string()
}

/// Rate limiting middleware.
pub async fn rate_limit_middleware(
    State(limiter): State<Arc<RateLimiterState>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    // Skip rate limiting for health endpoint
    if request.uri().path() == "/health" {
        return next.run(request).await;
    }

    let key = client_key(&request);

    if let Err(wait) = limiter.check(&key) {
        tracing::warn!(client = %key, "Rate limit exceeded");
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({
                "error": "Rate limit exceeded. Please try again later.",
                "retry_after_seconds": wait.as_secs().max(1)
            })),
        )
            .into_response();
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_burst_then_limited() {
        let state = RateLimiterState::per_minute(2);

        assert!(state.check("10.0.0.1").is_ok());
        assert!(state.check("10.0.0.1").is_ok());

        let wait = state.check("10.0.0.1").unwrap_err();
        assert!(wait <= Duration::from_secs(30));
    }

    #[test]
    fn test_clients_are_independent() {
        let state = RateLimiterState::per_minute(1);

        assert!(state.check("10.0.0.1").is_ok());
        assert!(state.check("10.0.0.1").is_err());
        assert!(state.check("10.0.0.2").is_ok());
    }

    #[test]
    fn test_client_key_uses_first_forwarded_hop() {
        let request = Request::builder()
            .header("X-Forwarded-For", " 203.0.113.7 , 10.0.0.1")
            .body(Body::empty())
            .unwrap();
        assert_eq!(client_key(&request), "203.0.113.7");

        let request = Request::builder().body(Body::empty()).unwrap();
        assert_eq!(client_key(&request), "anonymous");
    }

    #[test]
    fn test_prune_evicts_refilled_clients() {
        let quota = Quota::with_period(Duration::from_millis(1)).unwrap();
        let state = RateLimiterState::with_quota(quota);

        for i in 0..50 {
            let _ = state.check(&format!("10.0.0.{i}"));
        }
        assert_eq!(state.tracked_clients(), 50);

        std::thread::sleep(Duration::from_millis(20));
        state.prune();

        assert_eq!(state.tracked_clients(), 0);
    }

    #[test]
    fn test_prune_keeps_throttled_clients() {
        let state = RateLimiterState::per_minute(1);

        assert!(state.check("10.0.0.1").is_ok());
        state.prune();

        assert_eq!(state.tracked_clients(), 1);
        assert!(state.check("10.0.0.1").is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_pruner_stops_with_state() {
        let state = Arc::new(RateLimiterState::with_quota(
            Quota::with_period(Duration::from_millis(1)).unwrap(),
        ));
        let pruner = state.spawn_pruner(Duration::from_secs(1));

        drop(state);
        tokio::time::advance(Duration::from_secs(2)).await;

        tokio::time::timeout(Duration::from_secs(5), pruner)
            .await
            .unwrap()
            .unwrap();
    }
}
