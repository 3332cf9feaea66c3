//! Evaluation job poller tests
//!
//! Drives `JobPoller` against a scripted fake `EvalBackend` with
//! millisecond intervals: exact query counts per terminal outcome, the
//! attempt budget, the delayed first poll, terminal transport errors, and
//! the one-job-at-a-time guard.

use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use shopchat::api::{EvalBackend, EvalMode, EvalStatusResponse};
use shopchat::error::{Result, ShopchatError};
use shopchat::eval::{JobOutcome, JobPoller};

// ---------------------------------------------------------------------------
// Fake backend
// ---------------------------------------------------------------------------

/// Scripted result of one status query.
#[derive(Clone, Copy)]
enum Step {
    Status(&'static str),
    StatusWithError(&'static str, &'static str),
    TransportError,
}

/// Fake `EvalBackend` that plays back a status script and counts every
/// query. The last step repeats once the script runs out.
struct FakeEvalBackend {
    steps: Vec<Step>,
    next_step: AtomicUsize,
    run_calls: AtomicU32,
    status_calls: AtomicU32,
    summary_calls: AtomicU32,
    history_calls: AtomicU32,
    submitted_at: Mutex<Option<Instant>>,
    first_status_at: Mutex<Option<Instant>>,
}

impl FakeEvalBackend {
    fn new(steps: Vec<Step>) -> Self {
        assert!(!steps.is_empty());
        Self {
            steps,
            next_step: AtomicUsize::new(0),
            run_calls: AtomicU32::new(0),
            status_calls: AtomicU32::new(0),
            summary_calls: AtomicU32::new(0),
            history_calls: AtomicU32::new(0),
            submitted_at: Mutex::new(None),
            first_status_at: Mutex::new(None),
        }
    }

    fn status_calls(&self) -> u32 {
        self.status_calls.load(Ordering::SeqCst)
    }

    /// Wall time between job submission and the first status query.
    fn first_poll_delay(&self) -> Duration {
        let submitted = self.submitted_at.lock().unwrap().expect("job submitted");
        let first = self.first_status_at.lock().unwrap().expect("status queried");
        first.duration_since(submitted)
    }
}

#[async_trait]
impl EvalBackend for FakeEvalBackend {
    async fn run_eval(&self, _mode: EvalMode) -> Result<String> {
        self.run_calls.fetch_add(1, Ordering::SeqCst);
        *self.submitted_at.lock().unwrap() = Some(Instant::now());
        Ok("job-1".to_string())
    }

    async fn eval_status(&self, job_id: &str) -> Result<EvalStatusResponse> {
        assert_eq!(job_id, "job-1");
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        self.first_status_at
            .lock()
            .unwrap()
            .get_or_insert_with(Instant::now);

        let index = self.next_step.fetch_add(1, Ordering::SeqCst);
        match self.steps[index.min(self.steps.len() - 1)] {
            Step::Status(status) => Ok(EvalStatusResponse {
                status: status.to_string(),
                error: None,
            }),
            Step::StatusWithError(status, error) => Ok(EvalStatusResponse {
                status: status.to_string(),
                error: Some(error.to_string()),
            }),
            Step::TransportError => Err(anyhow::anyhow!("connection reset")),
        }
    }

    async fn eval_summary(&self) -> Result<serde_json::Value> {
        self.summary_calls.fetch_add(1, Ordering::SeqCst);
        Ok(serde_json::json!({"key_metrics": {"ndcg@5": 0.82}}))
    }

    async fn eval_history(&self) -> Result<serde_json::Value> {
        self.history_calls.fetch_add(1, Ordering::SeqCst);
        Ok(serde_json::json!({"evaluations": []}))
    }
}

fn fast_poller(max_attempts: u32) -> JobPoller {
    JobPoller::new(Duration::from_millis(1), max_attempts)
}

// ---------------------------------------------------------------------------
// Terminal outcomes
// ---------------------------------------------------------------------------

/// A completing job is queried exactly once per status transition, and the
/// summary and history are reloaded exactly once.
#[tokio::test]
async fn test_completion_query_counts() {
    let backend = FakeEvalBackend::new(vec![
        Step::Status("pending"),
        Step::Status("running"),
        Step::Status("running"),
        Step::Status("completed"),
    ]);
    let poller = fast_poller(300);

    let outcome = poller.run(&backend, EvalMode::Quick).await.unwrap();

    match outcome {
        JobOutcome::Completed { summary, history } => {
            assert_eq!(summary["key_metrics"]["ndcg@5"], 0.82);
            assert!(history["evaluations"].as_array().unwrap().is_empty());
        }
        other => panic!("expected completion, got {:?}", other),
    }
    assert_eq!(backend.run_calls.load(Ordering::SeqCst), 1);
    assert_eq!(backend.status_calls(), 4);
    assert_eq!(backend.summary_calls.load(Ordering::SeqCst), 1);
    assert_eq!(backend.history_calls.load(Ordering::SeqCst), 1);
    assert!(!poller.is_active());
}

/// A job that never terminates is queried max_attempts + 1 times, then the
/// client gives up with its wait budget; the summary is never fetched.
#[tokio::test]
async fn test_timeout_exhausts_attempt_budget() {
    let backend = FakeEvalBackend::new(vec![Step::Status("running")]);
    let poller = fast_poller(5);

    let outcome = poller.run(&backend, EvalMode::All).await.unwrap();

    match outcome {
        JobOutcome::TimedOut { waited } => {
            assert_eq!(waited, Duration::from_millis(5));
        }
        other => panic!("expected timeout, got {:?}", other),
    }
    assert_eq!(backend.status_calls(), 6);
    assert_eq!(backend.summary_calls.load(Ordering::SeqCst), 0);
    assert_eq!(backend.history_calls.load(Ordering::SeqCst), 0);
}

/// A failed job surfaces the server-reported error text.
#[tokio::test]
async fn test_failure_carries_server_error() {
    let backend = FakeEvalBackend::new(vec![
        Step::Status("running"),
        Step::StatusWithError("failed", "catalog missing"),
    ]);
    let poller = fast_poller(300);

    let outcome = poller.run(&backend, EvalMode::Quick).await.unwrap();

    match outcome {
        JobOutcome::Failed { error } => assert_eq!(error, "catalog missing"),
        other => panic!("expected failure, got {:?}", other),
    }
    assert_eq!(backend.status_calls(), 2);
    assert_eq!(backend.summary_calls.load(Ordering::SeqCst), 0);
}

/// A failed job without error text falls back to a generic message.
#[tokio::test]
async fn test_failure_without_detail_uses_fallback() {
    let backend = FakeEvalBackend::new(vec![Step::Status("failed")]);
    let poller = fast_poller(300);

    let outcome = poller.run(&backend, EvalMode::Quick).await.unwrap();

    match outcome {
        JobOutcome::Failed { error } => {
            assert_eq!(error, "evaluation failed without detail");
        }
        other => panic!("expected failure, got {:?}", other),
    }
}

/// An unrecognized status string counts against the budget but keeps the
/// loop polling.
#[tokio::test]
async fn test_unrecognized_status_keeps_polling() {
    let backend = FakeEvalBackend::new(vec![
        Step::Status("warming_up"),
        Step::Status("completed"),
    ]);
    let poller = fast_poller(300);

    let outcome = poller.run(&backend, EvalMode::Quick).await.unwrap();
    assert!(matches!(outcome, JobOutcome::Completed { .. }));
    assert_eq!(backend.status_calls(), 2);
}

/// A transport error anywhere in the loop is terminal; there is no retry.
#[tokio::test]
async fn test_transport_error_is_terminal() {
    let backend = FakeEvalBackend::new(vec![Step::TransportError]);
    let poller = fast_poller(300);

    let error = poller.run(&backend, EvalMode::Quick).await.unwrap_err();
    assert!(error.to_string().contains("connection reset"));
    assert_eq!(backend.status_calls(), 1);
    assert!(!poller.is_active());
}

// ---------------------------------------------------------------------------
// Pacing and concurrency
// ---------------------------------------------------------------------------

/// The first status query happens a full interval after submission, not
/// immediately.
#[tokio::test]
async fn test_first_poll_is_delayed_one_interval() {
    let backend = FakeEvalBackend::new(vec![Step::Status("completed")]);
    let poller = JobPoller::new(Duration::from_millis(50), 300);

    poller.run(&backend, EvalMode::Quick).await.unwrap();
    assert!(backend.first_poll_delay() >= Duration::from_millis(50));
}

/// Non-terminal polls report status and attempt to the progress callback.
#[tokio::test]
async fn test_progress_updates_sequence() {
    let backend = FakeEvalBackend::new(vec![
        Step::Status("pending"),
        Step::Status("running"),
        Step::Status("completed"),
    ]);
    let poller = fast_poller(300);

    let mut updates: Vec<(String, u32)> = Vec::new();
    poller
        .run_with_progress(&backend, EvalMode::Quick, |update| {
            updates.push((update.status.clone(), update.attempt));
        })
        .await
        .unwrap();

    assert_eq!(
        updates,
        vec![("pending".to_string(), 1), ("running".to_string(), 2)]
    );
}

/// A second run while a job is active fails fast; the poller is reusable
/// once the first job reaches a terminal state.
#[tokio::test]
async fn test_one_job_at_a_time() {
    let backend = Arc::new(FakeEvalBackend::new(vec![Step::Status("running")]));
    let poller = Arc::new(JobPoller::new(Duration::from_millis(20), 5));

    let first = {
        let backend = Arc::clone(&backend);
        let poller = Arc::clone(&poller);
        tokio::spawn(async move { poller.run(backend.as_ref(), EvalMode::Quick).await })
    };

    // Let the first run claim the slot (its first poll waits an interval)
    tokio::time::sleep(Duration::from_millis(5)).await;
    assert!(poller.is_active());

    let error = poller
        .run(backend.as_ref(), EvalMode::Quick)
        .await
        .unwrap_err();
    match error.downcast_ref::<ShopchatError>() {
        Some(ShopchatError::JobAlreadyRunning) => {}
        other => panic!("expected job-already-running, got {:?}", other),
    }

    // The first run times out on its own and releases the slot
    let outcome = first.await.unwrap().unwrap();
    assert!(matches!(outcome, JobOutcome::TimedOut { .. }));
    assert!(!poller.is_active());

    let backend = FakeEvalBackend::new(vec![Step::Status("completed")]);
    let outcome = poller.run(&backend, EvalMode::Quick).await.unwrap();
    assert!(matches!(outcome, JobOutcome::Completed { .. }));
}
