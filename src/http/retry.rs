//! Retry policies for market-data requests.

use std::time::Duration;

/// Retry policy applied to every REST call of an `ExchangeHttp`.
///
/// All endpoints used here are idempotent GETs, so retrying is the default.
#[derive(Debug, Clone, Default)]
pub enum RetryPolicy {
    /// Single attempt; failures surface immediately.
    None,
    /// Retry on transport failures + 502/503/504, with backoff on 429/418.
    #[default]
    Idempotent,
    /// User-provided retry logic.
    Custom(RetryConfig),
}

impl RetryPolicy {
    /// The effective config, or `None` when requests are never retried.
    pub fn config(&self) -> Option<RetryConfig> {
        match self {
            RetryPolicy::None => None,
            RetryPolicy::Idempotent => Some(RetryConfig::default()),
            RetryPolicy::Custom(c) => Some(c.clone()),
        }
    }

    /// Upper bound on requests issued for one call, including the first.
    pub fn max_attempts(&self) -> u32 {
        self.config().map_or(1, |c| c.max_retries + 1)
    }
}

/// Exponential backoff with proportional jitter.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Retries after the initial request.
    pub max_retries: u32,
    pub initial_delay: Duration,
    /// Ceiling for both computed delays and server `Retry-After` hints.
    pub max_delay: Duration,
    pub backoff_factor: f64,
    /// Fraction of the delay randomised either way; `0.0` disables jitter.
    pub jitter: f64,
    /// 5xx statuses worth another attempt. Rate limits are always retried.
    pub retryable_statuses: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(10),
            backoff_factor: 2.0,
            jitter: 0.25,
            retryable_statuses: vec![502, 503, 504],
        }
    }
}

impl RetryConfig {
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn without_jitter(mut self) -> Self {
        self.jitter = 0.0;
        self
    }

    pub fn retries_status(&self, status: u16) -> bool {
        self.retryable_statuses.contains(&status)
    }

    /// Delay before retry number `attempt + 1` (0-indexed).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let ceiling = self.max_delay.as_millis() as f64;
        let base = (self.initial_delay.as_millis() as f64
            * self.backoff_factor.powi(attempt.min(30) as i32))
        .min(ceiling);

        let spread = base * self.jitter.clamp(0.0, 1.0);
        let ms = if spread > 0.0 {
            base + (rand::random::<f64>() * 2.0 - 1.0) * spread
        } else {
            base
        };
        Duration::from_millis(ms.max(0.0) as u64)
    }

    /// Server-provided wait, capped at `max_delay`.
    pub fn clamp_hint(&self, hint_ms: u64) -> Duration {
        Duration::from_millis(hint_ms).min(self.max_delay)
    }
}
