use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;

use crate::constants::{RATE_LIMIT_MAX_REQUESTS, RATE_LIMIT_WINDOW_SECS};

/// Per-key counter for the current fixed window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitBucket {
    pub count: u32,
    pub window_reset_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allowed { remaining: u32 },
    Limited { retry_after_secs: u64 },
}

impl RateLimitDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitDecision::Allowed { .. })
    }
}

/// Fixed-window limiter keyed by client identifier.
///
/// Each key gets `max_requests` per `window`. The window starts at the first
/// request after the previous one expired, so a burst straddling a boundary
/// can reach twice the nominal limit. Over-limit requests still increment the
/// counter. Buckets are never evicted; the map lives as long as the process.
///
/// DashMap's entry API locks the key's shard for the read-modify-write, so
/// concurrent requests from one client never lose updates and requests from
/// different clients do not contend on a global lock.
#[derive(Debug)]
pub struct FixedWindowLimiter {
    buckets: DashMap<String, RateLimitBucket>,
    max_requests: u32,
    window: Duration,
}

impl FixedWindowLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            buckets: DashMap::new(),
            max_requests,
            window,
        }
    }

    /// Counts one request for `key` at `now` and says whether it may proceed.
    pub fn check(&self, key: &str, now: DateTime<Utc>) -> RateLimitDecision {
        let mut bucket = self
            .buckets
            .entry(key.to_string())
            .or_insert_with(|| RateLimitBucket {
                count: 0,
                window_reset_at: now,
            });

        if now >= bucket.window_reset_at {
            *bucket = RateLimitBucket {
                count: 1,
                window_reset_at: now + self.window,
            };
            return RateLimitDecision::Allowed {
                remaining: self.max_requests.saturating_sub(1),
            };
        }

        bucket.count = bucket.count.saturating_add(1);

        if bucket.count > self.max_requests {
            let wait = (bucket.window_reset_at - now).num_milliseconds();
            RateLimitDecision::Limited {
                retry_after_secs: ((wait + 999) / 1000).max(1) as u64,
            }
        } else {
            RateLimitDecision::Allowed {
                remaining: self.max_requests - bucket.count,
            }
        }
    }

    pub fn bucket(&self, key: &str) -> Option<RateLimitBucket> {
        self.buckets.get(key).map(|b| *b)
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

impl Default for FixedWindowLimiter {
    fn default() -> Self {
        Self::new(
            RATE_LIMIT_MAX_REQUESTS,
            Duration::seconds(RATE_LIMIT_WINDOW_SECS),
        )
    }
}
