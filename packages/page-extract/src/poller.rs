//! Status checks and the delayed follow-up schedule.
//!
//! # Retry policy
//!
//! A check is a single request. Whoever observes a `Queued` status asks the
//! [`PollScheduler`] for exactly one follow-up after a fixed delay. There is
//! no backoff and no retry cap, and no other status (`Processing` included)
//! schedules anything.
//!
//! Scheduled checks are never cancelled by later user actions, so several can
//! be in flight at once. They are all cancelled when the session shuts down.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use crate::error::PollError;
use crate::traits::ExtractionService;
use crate::types::{CheckOutcome, JobStatusReport};

/// Check the job status for a document and ranges.
///
/// Returns [`CheckOutcome::Skipped`] without touching the network when either
/// input is missing or blank.
pub async fn check(
    service: &dyn ExtractionService,
    content_document_id: Option<&str>,
    ranges: &str,
) -> Result<CheckOutcome, PollError> {
    let content_document_id = match content_document_id {
        Some(id) if !id.is_empty() => id,
        _ => return Ok(CheckOutcome::Skipped),
    };
    if ranges.trim().is_empty() {
        return Ok(CheckOutcome::Skipped);
    }

    let resp = service
        .check_status(content_document_id, ranges)
        .await
        .map_err(PollError::Service)?;

    match resp.status.as_deref() {
        Some(label) if !label.is_empty() => {
            let report = JobStatusReport::from_response(resp);
            tracing::debug!(content_document_id, status = %report.status, "Status checked");
            Ok(CheckOutcome::Status(report))
        }
        _ => {
            tracing::debug!(content_document_id, "Status check returned no status");
            Ok(CheckOutcome::NoStatus)
        }
    }
}

/// One-shot delayed tasks bound to a session's lifetime.
#[derive(Debug, Clone)]
pub struct PollScheduler {
    delay: Duration,
    tracker: TaskTracker,
    shutdown: CancellationToken,
}

impl PollScheduler {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            tracker: TaskTracker::new(),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Run `poll` once after the delay unless the session shuts down first.
    pub fn schedule<F, Fut>(&self, poll: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let shutdown = self.shutdown.clone();
        let delay = self.delay;
        self.tracker.spawn(async move {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    tracing::debug!("Scheduled status check cancelled");
                }
                _ = tokio::time::sleep(delay) => poll().await,
            }
        });
    }

    /// Number of scheduled checks still waiting or running.
    pub fn pending(&self) -> usize {
        self.tracker.len()
    }

    pub fn is_cancelled(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    /// Wait until every scheduled check, including follow-ups they schedule, is done.
    pub async fn settled(&self) {
        self.tracker.close();
        self.tracker.wait().await;
        self.tracker.reopen();
    }

    /// Cancel every pending check and wait for the tasks to exit.
    pub async fn shutdown(&self) {
        self.cancel();
        self.settled().await;
    }

    pub fn cancel(&self) {
        self.shutdown.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockExtractionService;
    use crate::types::JobStatus;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn skips_without_document_or_ranges() {
        let service = MockExtractionService::new();

        for (id, ranges) in [(None, "1-2"), (Some(""), "1-2"), (Some("DOC1"), ""), (Some("DOC1"), "  ")] {
            let outcome = check(&service, id, ranges).await.unwrap();
            assert_eq!(outcome, CheckOutcome::Skipped);
        }
        assert_eq!(service.check_calls(), 0);
    }

    #[tokio::test]
    async fn returns_reported_status() {
        let service = MockExtractionService::new().with_check_status("Processing");

        let outcome = check(&service, Some("DOC1"), "1-2").await.unwrap();

        assert_eq!(outcome.report().unwrap().status, JobStatus::Processing);
        assert_eq!(service.check_calls(), 1);
    }

    #[tokio::test]
    async fn missing_label_is_no_status() {
        let service = MockExtractionService::new().with_empty_check();

        let outcome = check(&service, Some("DOC1"), "1-2").await.unwrap();

        assert_eq!(outcome, CheckOutcome::NoStatus);
    }

    #[tokio::test]
    async fn failure_is_poll_error() {
        let service = MockExtractionService::new().failing_check("Service Unavailable");

        let err = check(&service, Some("DOC1"), "1-2").await.unwrap_err();

        assert_eq!(err.user_message(), "Service Unavailable");
    }

    #[tokio::test(start_paused = true)]
    async fn scheduled_poll_runs_after_delay() {
        let scheduler = PollScheduler::new(Duration::from_millis(1500));
        let runs = Arc::new(AtomicUsize::new(0));

        let counter = runs.clone();
        scheduler.schedule(move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(scheduler.pending(), 1);

        tokio::time::sleep(Duration::from_millis(1499)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 0);

        scheduler.settled().await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert_eq!(scheduler.pending(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_cancels_pending_polls() {
        let scheduler = PollScheduler::new(Duration::from_millis(1500));
        let runs = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let counter = runs.clone();
            scheduler.schedule(move || async move {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }

        scheduler.shutdown().await;
        tokio::time::sleep(Duration::from_secs(5)).await;

        assert_eq!(runs.load(Ordering::SeqCst), 0);
        assert_eq!(scheduler.pending(), 0);
    }
}
