//! Client configuration types.

use governor::{Quota, RateLimiter};
use std::num::NonZeroU32;

/// Limiter type used to pace outbound API calls
pub(crate) type DirectLimiter = RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// Outbound rate limit for Cloudflare API calls
///
/// Cloudflare allows 1200 requests per five minutes per user; the default
/// stays well below that so background cache refreshes never starve
/// user-triggered updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Sustained requests per minute
    pub requests_per_minute: u32,

    /// Requests allowed in a burst
    pub burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl RateLimitConfig {
    /// Create the default rate limit (200/min, burst of 10)
    #[must_use]
    pub const fn new() -> Self {
        Self {
            requests_per_minute: 200,
            burst_size: 10,
        }
    }

    /// Set the sustained rate
    #[must_use]
    pub const fn requests_per_minute(mut self, rpm: u32) -> Self {
        self.requests_per_minute = rpm;
        self
    }

    /// Set the burst size
    #[must_use]
    pub const fn burst_size(mut self, burst: u32) -> Self {
        self.burst_size = burst;
        self
    }

    pub(crate) fn limiter(&self) -> DirectLimiter {
        let rate = NonZeroU32::new(self.requests_per_minute).unwrap_or(NonZeroU32::MIN);
        let burst = NonZeroU32::new(self.burst_size).unwrap_or(NonZeroU32::MIN);
        RateLimiter::direct(Quota::per_minute(rate).allow_burst(burst))
    }
}
