//! Bounded, fixed-interval retry around transient provisioning failures.
//!
//! Cloud provisioning fails for reasons that clear themselves: API rate
//! limits, eventual-consistency lag, connection drops mid-download. The
//! policy classifies a failure by matching the captured stderr against a
//! pluggable set of patterns and replays the operation on a fixed interval
//! until the budget is spent. Anything that does not match propagates on the
//! first attempt.

use crate::config::ScenarioConfig;
use crate::driver::CommandResult;
use crate::error::{HarnessError, Result};
use regex::Regex;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

/// Stock transient-failure signatures, matched against captured stderr.
///
/// Sourced from failure modes seen against the DigitalOcean API and the
/// tool's own plugin handling; extend per-policy with [`RetryPolicy::with_matchers`].
const DEFAULT_TRANSIENT_PATTERNS: &[&str] = &[
    r"(?i)rate limit",
    r"429 Too Many Requests",
    r"connection reset by peer",
    r"TLS handshake timeout",
    r"(?i)temporary failure",
    r"timeout while waiting for state",
    r"(?i)please try again",
    r"Error installing provider",
];

/// Classifies failures and replays an operation with a bounded budget.
pub struct RetryPolicy {
    max_retries: u32,
    interval: Duration,
    matchers: Vec<Regex>,
}

impl RetryPolicy {
    /// Policy with the stock transient-failure patterns.
    pub fn new(max_retries: u32, interval: Duration) -> Self {
        // The stock patterns are constants; compilation is checked by tests.
        let matchers = DEFAULT_TRANSIENT_PATTERNS
            .iter()
            .filter_map(|pattern| Regex::new(pattern).ok())
            .collect();
        Self {
            max_retries,
            interval,
            matchers,
        }
    }

    /// Policy that never retries.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            interval: Duration::ZERO,
            matchers: Vec::new(),
        }
    }

    /// Policy configured from a scenario's retry settings.
    pub fn from_config(config: &ScenarioConfig) -> Self {
        Self::new(config.max_retries, config.retry_interval)
    }

    /// Replace the matcher set. New transient-failure signatures plug in
    /// here without touching the retry loop.
    pub fn with_matchers(mut self, matchers: Vec<Regex>) -> Self {
        self.matchers = matchers;
        self
    }

    pub fn matcher_count(&self) -> usize {
        self.matchers.len()
    }

    /// Whether a failure is expected to resolve itself on retry.
    pub fn is_transient(&self, error: &HarnessError) -> bool {
        match error {
            HarnessError::Execution { stderr, .. } => {
                self.matchers.iter().any(|matcher| matcher.is_match(stderr))
            }
            _ => false,
        }
    }

    /// Run `operation` until it succeeds, a non-transient failure surfaces,
    /// or the budget is spent. At most `max_retries + 1` attempts; the
    /// interval is fixed, not exponential. On exhaustion the last error is
    /// returned unchanged so its diagnostic text survives.
    pub async fn execute<F, Fut>(&self, mut operation: F) -> Result<CommandResult>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<CommandResult>>,
    {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match operation().await {
                Ok(result) => return Ok(result),
                Err(error) if attempt <= self.max_retries && self.is_transient(&error) => {
                    warn!(
                        attempt,
                        max_retries = self.max_retries,
                        interval_ms = self.interval.as_millis() as u64,
                        %error,
                        "transient failure, retrying"
                    );
                    sleep(self.interval).await;
                }
                Err(error) => return Err(error),
            }
        }
    }
}
