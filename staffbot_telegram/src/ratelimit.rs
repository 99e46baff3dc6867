//! Per-user sliding-window rate limiter.
//!
//! This gate runs before classification and before any session or store
//! access; a rejected request must touch neither. Timestamps are pruned
//! lazily on each check, and a periodic sweep evicts keys whose whole
//! window has gone stale so the table stays bounded.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use staffbot_core::AppError;
use staffbot_config::RateLimitConfig;
use tokio::sync::Mutex;
use tracing::debug;

/// Key used when the sender's identity is unknown.
pub const ANONYMOUS_KEY: &str = "anonymous";

pub struct RateLimiter {
    enabled: bool,
    max_requests: usize,
    window: Duration,
    requests: Mutex<HashMap<String, Vec<Instant>>>,
}

impl RateLimiter {
    #[must_use]
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            enabled: config.enabled,
            max_requests: config.max_requests,
            window: Duration::from_millis(config.window_ms),
            requests: Mutex::new(HashMap::new()),
        }
    }

    /// Admit or reject a request for `key` right now.
    pub async fn check(&self, key: &str) -> Result<(), AppError> {
        self.check_at(key, Instant::now()).await
    }

    /// Clock-injected variant of [`check`](Self::check), used by tests.
    pub async fn check_at(&self, key: &str, now: Instant) -> Result<(), AppError> {
        if !self.enabled {
            return Ok(());
        }

        let mut requests = self.requests.lock().await;
        let entries = requests.entry(key.to_string()).or_default();
        entries.retain(|ts| now.duration_since(*ts) < self.window);

        if entries.len() >= self.max_requests {
            let retry_after = entries
                .first()
                .map_or(1, |oldest| retry_after_secs(*oldest, self.window, now));
            debug!("Rate limit hit for key {key}, retry after {retry_after}s");
            return Err(AppError::RateLimit { retry_after });
        }

        entries.push(now);
        Ok(())
    }

    /// Evict keys whose entire window is stale.
    pub async fn sweep(&self) {
        self.sweep_at(Instant::now()).await;
    }

    pub async fn sweep_at(&self, now: Instant) {
        let mut requests = self.requests.lock().await;
        requests.retain(|_, entries| {
            entries.retain(|ts| now.duration_since(*ts) < self.window);
            !entries.is_empty()
        });
    }

    #[cfg(test)]
    async fn tracked_keys(&self) -> usize {
        self.requests.lock().await.len()
    }
}

/// Seconds until the oldest in-window entry falls out, rounded up.
fn retry_after_secs(oldest: Instant, window: Duration, now: Instant) -> u64 {
    let remaining = (oldest + window).saturating_duration_since(now);
    u64::try_from(remaining.as_millis().div_ceil(1000)).unwrap_or(u64::MAX)
}
