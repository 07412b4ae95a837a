//! Opt-in retry of whole pipeline runs with exponential backoff.
//!
//! `AgentPipeline::run` never retries on its own. Callers that want
//! resilience against a flaky backend wrap it with [`run_with_retry`].

use std::time::Duration;

use rand::Rng;
use tracing::{debug, warn};

use crate::error::PipelineError;
use crate::profile::UserProfile;

use super::pipeline::{AgentPipeline, Recommendation};

/// Backoff schedule for [`run_with_retry`].
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Re-runs after the first attempt.
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub multiplier: f64,
    pub max_delay: Duration,
    /// Scale each delay by a random factor in [0.8, 1.2).
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_secs(1),
            multiplier: 2.0,
            max_delay: Duration::from_secs(30),
            jitter: true,
        }
    }
}

impl RetryPolicy {
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    pub fn with_max_retries(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Default::default()
        }
    }

    /// Delay before re-run number `attempt + 1` (0-indexed).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let base = self.initial_delay.as_secs_f64() * self.multiplier.powi(attempt as i32);
        let capped = base.min(self.max_delay.as_secs_f64());
        let delay = if self.jitter {
            capped * rand::thread_rng().gen_range(0.8..1.2)
        } else {
            capped
        };
        Duration::from_secs_f64(delay.max(0.0))
    }
}

/// Run the pipeline, re-running it from scratch on provider failures.
///
/// Validation failures are returned immediately; fixing them needs new
/// input, not another attempt.
pub async fn run_with_retry(
    pipeline: &mut AgentPipeline,
    profile: &UserProfile,
    policy: &RetryPolicy,
) -> Result<Recommendation, PipelineError> {
    let mut attempt = 0;
    loop {
        match pipeline.run(profile).await {
            Ok(recommendation) => return Ok(recommendation),
            Err(e) if !e.is_retryable() => {
                debug!(attempt = attempt + 1, error = %e, "Non-retryable pipeline error");
                return Err(e);
            }
            Err(e) if attempt >= policy.max_retries => {
                warn!(max_retries = policy.max_retries, error = %e, "Pipeline retries exhausted");
                return Err(e);
            }
            Err(e) => {
                let delay = policy.delay_for_attempt(attempt);
                warn!(
                    attempt = attempt + 1,
                    delay = ?delay,
                    error = %e,
                    "Pipeline run failed, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
