// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Per-client request rate limiting for the API routes

use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::clock::{Clock, DefaultClock};
use governor::middleware::StateInformationMiddleware;
use governor::state::keyed::DefaultKeyedStateStore;
use governor::{Quota, RateLimiter as GovRateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::errors::ApiError;

/// Client key used when no forwarding header is present
pub const DEFAULT_CLIENT_KEY: &str = "127.0.0.1";

type KeyedLimiter = GovRateLimiter<
    String,
    DefaultKeyedStateStore<String>,
    DefaultClock,
    StateInformationMiddleware,
>;

/// Outcome of one rate-limit check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateDecision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    /// Seconds until the client's budget is replenished (allowed) or until
    /// the next request will be accepted (rejected)
    pub reset_secs: u64,
}

impl RateDecision {
    /// Set the `X-RateLimit-*` headers
    pub fn apply_headers(&self, headers: &mut HeaderMap) {
        headers.insert("x-ratelimit-limit", HeaderValue::from(self.limit));
        headers.insert("x-ratelimit-remaining", HeaderValue::from(self.remaining));
        headers.insert("x-ratelimit-reset", HeaderValue::from(self.reset_secs));
    }
}

/// Allows `limit` requests per window per client, replenished continuously
pub struct ClientRateLimiter {
    limiter: KeyedLimiter,
    clock: DefaultClock,
    limit: u32,
    window: Duration,
}

impl ClientRateLimiter {
    /// Create a limiter
    ///
    /// # Arguments
    /// * `requests` - Requests allowed per window (0 is treated as 1)
    /// * `window` - Window length
    pub fn new(requests: u32, window: Duration) -> Self {
        let limit = NonZeroU32::new(requests).unwrap_or(NonZeroU32::MIN);
        let quota = Quota::with_period(window / limit.get())
            .unwrap_or_else(|| Quota::per_minute(limit))
            .allow_burst(limit);

        Self {
            limiter: GovRateLimiter::keyed(quota).with_middleware::<StateInformationMiddleware>(),
            clock: DefaultClock::default(),
            limit: limit.get(),
            window,
        }
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Record a request from `key` and decide whether it may proceed
    pub fn check(&self, key: &str) -> RateDecision {
        match self.limiter.check_key(&key.to_string()) {
            Ok(snapshot) => {
                let remaining = snapshot.remaining_burst_capacity();
                RateDecision {
                    allowed: true,
                    limit: self.limit,
                    remaining,
                    reset_secs: self.replenish_secs(remaining),
                }
            }
            Err(not_until) => {
                let wait = not_until.wait_time_from(self.clock.now());
                RateDecision {
                    allowed: false,
                    limit: self.limit,
                    remaining: 0,
                    reset_secs: ceil_secs(wait).max(1),
                }
            }
        }
    }

    /// Seconds until a client with `remaining` budget is back to full
    fn replenish_secs(&self, remaining: u32) -> u64 {
        let used = self.limit.saturating_sub(remaining);
        ceil_secs(self.window * used / self.limit)
    }

    /// Drop state for clients whose budget is fully replenished
    pub fn retain_recent(&self) {
        self.limiter.retain_recent();
        debug!("Rate limiter tracking {} clients", self.limiter.len());
    }
}

fn ceil_secs(d: Duration) -> u64 {
    d.as_secs() + u64::from(d.subsec_nanos() > 0)
}

/// Identify the client: first `x-forwarded-for` address, else loopback
pub fn client_key(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(DEFAULT_CLIENT_KEY)
        .to_string()
}

/// Axum middleware enforcing the limiter and stamping rate-limit headers
pub async fn rate_limit(
    State(limiter): State<Arc<ClientRateLimiter>>,
    request: Request,
    next: Next,
) -> Response {
    let key = client_key(request.headers());
    let decision = limiter.check(&key);

    let mut response = if decision.allowed {
        next.run(request).await
    } else {
        warn!("Rate limit exceeded for {}", key);
        ApiError::RateLimitExceeded {
            retry_after: decision.reset_secs,
        }
        .into_response()
    };

    decision.apply_headers(response.headers_mut());
    response
}
