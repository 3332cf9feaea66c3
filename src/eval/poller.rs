//! Bounded evaluation job polling
//!
//! After submitting a job the poller queries its status on a fixed
//! interval until the server reports `completed` or `failed`, or the
//! attempt budget runs out — a client-side timeout kept distinct from a
//! server-reported failure. The first query is delayed by one interval so
//! the poll never races the job's own startup. Transport errors anywhere
//! in the loop are terminal; there is no unbounded retry.

use crate::api::client::EvalBackend;
use crate::api::types::EvalMode;
use crate::error::{Result, ShopchatError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Fallback text when the server reports a failure without detail
const GENERIC_FAILURE: &str = "evaluation failed without detail";

/// Terminal result of one polled job
#[derive(Debug)]
pub enum JobOutcome {
    /// The job finished; summary and history were reloaded exactly once
    Completed {
        /// Latest evaluation summary
        summary: serde_json::Value,
        /// Evaluation run history
        history: serde_json::Value,
    },
    /// The server reported the job as failed
    Failed {
        /// Server-reported error text, or a generic fallback
        error: String,
    },
    /// The client gave up after the attempt budget was exhausted
    TimedOut {
        /// How long the client waited before giving up
        waited: Duration,
    },
}

/// One non-terminal poll observation, for progress display
#[derive(Debug, Clone)]
pub struct PollUpdate {
    /// Raw status string from the server
    pub status: String,
    /// Attempt counter, 1-based
    pub attempt: u32,
}

/// Polls one evaluation job at a time to a terminal state
///
/// Only one job may be active per poller: there is no job cancellation
/// primitive, so an abandoned loop would keep running against a superseded
/// job. A second `run` while one is active fails fast.
///
/// # Examples
///
/// ```no_run
/// use shopchat::api::{BackendClient, EvalMode};
/// use shopchat::config::Config;
/// use shopchat::eval::JobPoller;
///
/// # async fn example() -> shopchat::error::Result<()> {
/// let config = Config::default();
/// let client = BackendClient::new(&config.backend)?;
/// let poller = JobPoller::from_config(&config.eval);
/// let outcome = poller.run(&client, EvalMode::Quick).await?;
/// println!("{:?}", outcome);
/// # Ok(())
/// # }
/// ```
pub struct JobPoller {
    interval: Duration,
    max_attempts: u32,
    active: AtomicBool,
}

impl JobPoller {
    /// Creates a poller with an explicit interval and attempt budget
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
            active: AtomicBool::new(false),
        }
    }

    /// Creates a poller from configuration
    pub fn from_config(config: &crate::config::EvalConfig) -> Self {
        Self::new(
            Duration::from_secs(config.poll_interval_seconds),
            config.max_poll_attempts,
        )
    }

    /// True while a job is being polled
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Total wait the attempt budget allows
    pub fn budget(&self) -> Duration {
        self.interval * self.max_attempts
    }

    /// Submits a job and polls it to a terminal state
    ///
    /// # Errors
    ///
    /// Returns `ShopchatError::JobAlreadyRunning` when a job is already
    /// active, or the transport error that ended the loop. Server-side
    /// failure and client timeout are not errors; they are `JobOutcome`
    /// variants.
    pub async fn run(&self, backend: &dyn EvalBackend, mode: EvalMode) -> Result<JobOutcome> {
        self.run_with_progress(backend, mode, |_| {}).await
    }

    /// Like `run`, reporting each non-terminal poll to `on_update`
    pub async fn run_with_progress(
        &self,
        backend: &dyn EvalBackend,
        mode: EvalMode,
        on_update: impl FnMut(&PollUpdate),
    ) -> Result<JobOutcome> {
        if self.active.swap(true, Ordering::SeqCst) {
            return Err(ShopchatError::JobAlreadyRunning.into());
        }
        let result = self.poll_to_completion(backend, mode, on_update).await;
        self.active.store(false, Ordering::SeqCst);
        result
    }

    async fn poll_to_completion(
        &self,
        backend: &dyn EvalBackend,
        mode: EvalMode,
        mut on_update: impl FnMut(&PollUpdate),
    ) -> Result<JobOutcome> {
        let job_id = backend.run_eval(mode).await?;
        tracing::info!("Submitted evaluation job {} (mode={})", job_id, mode);

        let mut attempt: u32 = 0;
        loop {
            // Delay before the first query too, to let the job start up
            tokio::time::sleep(self.interval).await;

            let status = backend.eval_status(&job_id).await?;
            match status.status.as_str() {
                "completed" => {
                    tracing::info!("Evaluation job {} completed", job_id);
                    let summary = backend.eval_summary().await?;
                    let history = backend.eval_history().await?;
                    return Ok(JobOutcome::Completed { summary, history });
                }
                "failed" => {
                    let error = status
                        .error
                        .filter(|e| !e.trim().is_empty())
                        .unwrap_or_else(|| GENERIC_FAILURE.to_string());
                    tracing::warn!("Evaluation job {} failed: {}", job_id, error);
                    return Ok(JobOutcome::Failed { error });
                }
                other => {
                    attempt += 1;
                    if attempt > self.max_attempts {
                        let waited = self.budget();
                        tracing::warn!(
                            "Evaluation job {} still '{}' after {} polls, giving up",
                            job_id,
                            other,
                            attempt
                        );
                        return Ok(JobOutcome::TimedOut { waited });
                    }
                    let update = PollUpdate {
                        status: other.to_string(),
                        attempt,
                    };
                    tracing::debug!(
                        "Evaluation job {}: status={} attempt={}/{}",
                        job_id,
                        update.status,
                        update.attempt,
                        self.max_attempts
                    );
                    on_update(&update);
                }
            }
        }
    }
}
