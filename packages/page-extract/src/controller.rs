//! Workflow controller: one instance per session.
//!
//! ```text
//! Uninitialized ──init()──► Loading ──► Ready ◄──┐  extract() / check_status()
//!                              │          │      │  scheduled follow-up checks
//!                              │          └──────┘
//!                              └──► InitFailed (terminal)
//! ```
//!
//! Every remote failure is converted into a [`Notification`] on the event bus
//! before the typed error is returned to the caller.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::bus::EventBus;
use crate::config::WorkflowConfig;
use crate::error::{PollError, Result, WorkflowError};
use crate::poller::{self, PollScheduler};
use crate::traits::ExtractionService;
use crate::types::{
    CheckOutcome, DocumentRef, ExtractionRequest, JobStatusReport, Notification, Phase,
    WorkflowEvent, WorkflowState, WorkflowView,
};
use crate::{loader, ranges, requester};

const LOAD_FAILED_PREFIX: &str = "Failed to load required resources: ";
const RANGES_HINT: &str = "Enter page ranges (e.g., 1-2,6-7)";

/// Drives the extraction lifecycle for one parent record.
///
/// Dropping the controller ends the session: scheduled status checks are
/// cancelled and late responses are discarded.
pub struct WorkflowController {
    session: Arc<Session>,
}

/// State shared with scheduled checks.
struct Session {
    id: Uuid,
    parent_id: String,
    service: Arc<dyn ExtractionService>,
    state: Mutex<WorkflowState>,
    bus: EventBus,
    polls: PollScheduler,
}

impl WorkflowController {
    pub fn new(
        parent_id: impl Into<String>,
        service: Arc<dyn ExtractionService>,
        config: WorkflowConfig,
    ) -> Self {
        let session = Session {
            id: Uuid::new_v4(),
            parent_id: parent_id.into(),
            service,
            state: Mutex::new(WorkflowState::new("")),
            bus: EventBus::with_capacity(config.event_capacity),
            polls: PollScheduler::new(config.poll_delay),
        };
        Self {
            session: Arc::new(session),
        }
    }

    /// Start with ranges carried over from an earlier session.
    ///
    /// `init()` then checks their status once the document is loaded.
    pub fn with_ranges(self, ranges: impl Into<String>) -> Self {
        self.session.lock().current_ranges = ranges.into();
        self
    }

    pub fn session_id(&self) -> Uuid {
        self.session.id
    }

    pub fn parent_id(&self) -> &str {
        &self.session.parent_id
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WorkflowEvent> {
        self.session.bus.subscribe()
    }

    pub fn view(&self) -> WorkflowView {
        self.session.lock().view()
    }

    pub fn phase(&self) -> Phase {
        self.session.lock().phase
    }

    pub fn last_status(&self) -> Option<JobStatusReport> {
        self.session.lock().last_status.clone()
    }

    pub fn is_busy(&self) -> bool {
        self.session.lock().busy
    }

    /// Scheduled status checks not yet finished.
    pub fn pending_polls(&self) -> usize {
        self.session.polls.pending()
    }

    /// Wait for all scheduled status checks, including the follow-ups they schedule.
    pub async fn settled(&self) {
        self.session.polls.settled().await
    }

    /// End the session, cancelling scheduled checks and waiting for them to exit.
    pub async fn close(self) {
        info!(session = %self.session.id, "Closing workflow session");
        self.session.polls.shutdown().await;
    }

    /// Load the document, then check the status of any carried-over ranges.
    ///
    /// A failed lookup is terminal for the session. The status check is best
    /// effort and never fails initialization.
    pub async fn init(&self) -> Result<DocumentRef> {
        let session = &self.session;
        {
            let mut state = session.lock();
            if state.phase != Phase::Uninitialized {
                return Err(WorkflowError::AlreadyInitialized);
            }
            state.phase = Phase::Loading;
        }

        info!(session = %session.id, parent_id = %session.parent_id, "Loading document");

        let document = match loader::load(session.service.as_ref(), &session.parent_id).await {
            Ok(document) => document,
            Err(e) => {
                error!(session = %session.id, parent_id = %session.parent_id, error = %e, "Document load failed");
                session.lock().phase = Phase::InitFailed;
                session.bus.notify(Notification::error(
                    "Error",
                    format!("{}{}", LOAD_FAILED_PREFIX, e.user_message()),
                ));
                return Err(e.into());
            }
        };

        {
            let mut state = session.lock();
            state.document = Some(document.clone());
            state.phase = Phase::Ready;
        }
        session.bus.emit(WorkflowEvent::DocumentLoaded(document.clone()));
        info!(
            session = %session.id,
            file_name = %document.file_name,
            content_document_id = %document.content_document_id,
            "Document ready"
        );

        if let Err(e) = session.refresh_status().await {
            warn!(session = %session.id, error = %e, "Initial status check failed");
        }

        Ok(document)
    }

    /// Replace the ranges text. Not validated until `extract()`.
    pub fn set_ranges(&self, ranges: impl Into<String>) {
        let ranges = ranges.into();
        self.session.lock().current_ranges = ranges.clone();
        self.session.bus.emit(WorkflowEvent::RangesChanged(ranges));
    }

    /// Submit the current ranges for extraction.
    ///
    /// `busy` is held for exactly the duration of the submission call. A
    /// `Queued` answer schedules one follow-up status check.
    pub async fn extract(&self) -> Result<JobStatusReport> {
        let session = &self.session;
        let ranges_text = session.lock().current_ranges.clone();

        let ranges = match ranges::validate(&ranges_text) {
            Ok(ranges) => ranges,
            Err(e) => {
                session.bus.notify(Notification::warning("Validation", RANGES_HINT));
                return Err(e.into());
            }
        };

        let ready = {
            let state = session.lock();
            let ready = match (state.phase, &state.document) {
                (Phase::Ready, Some(document)) => Ok(document.clone()),
                (phase, _) => Err(phase),
            };
            ready
        };
        let document = match ready {
            Ok(document) => document,
            Err(phase) => {
                session.bus.notify(Notification::warning(
                    "Not ready",
                    "The document has not been loaded",
                ));
                return Err(WorkflowError::NotReady(phase));
            }
        };

        let Some(busy) = BusyGuard::acquire(session) else {
            session.bus.notify(Notification::warning(
                "Busy",
                "An extraction request is already in progress",
            ));
            return Err(WorkflowError::Busy);
        };

        let request = ExtractionRequest::new(&document, ranges);
        let result = requester::submit(session.service.as_ref(), &request).await;
        drop(busy);

        match result {
            Ok(report) => {
                session.settle(report.clone());
                Ok(report)
            }
            Err(e) => {
                error!(session = %session.id, error = %e, "Extraction request failed");
                session.bus.notify(Notification::error("Error", e.user_message()));
                Err(e.into())
            }
        }
    }

    /// Check the job status on demand.
    pub async fn check_status(&self) -> Result<CheckOutcome> {
        match self.session.refresh_status().await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                warn!(session = %self.session.id, error = %e, "Status check failed");
                self.session
                    .bus
                    .notify(Notification::error("Error", e.user_message()));
                Err(e.into())
            }
        }
    }
}

impl Drop for WorkflowController {
    fn drop(&mut self) {
        self.session.polls.cancel();
    }
}

impl std::fmt::Debug for WorkflowController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowController")
            .field("session", &self.session.id)
            .field("parent_id", &self.session.parent_id)
            .field("pending_polls", &self.pending_polls())
            .finish()
    }
}

impl Session {
    fn lock(&self) -> MutexGuard<'_, WorkflowState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// One status check against the current document and ranges.
    ///
    /// Ranges are trimmed the same way a submission trims them, so the check
    /// asks about the job that was actually requested.
    async fn refresh_status(self: &Arc<Self>) -> std::result::Result<CheckOutcome, PollError> {
        let (content_document_id, ranges) = {
            let state = self.lock();
            (
                state.content_document_id().map(str::to_string),
                state.current_ranges.trim().to_string(),
            )
        };

        let outcome =
            poller::check(self.service.as_ref(), content_document_id.as_deref(), &ranges).await?;
        if let CheckOutcome::Status(report) = &outcome {
            self.settle(report.clone());
        }
        Ok(outcome)
    }

    /// Record a status and schedule the follow-up a queued job gets.
    ///
    /// Last write wins: overlapping checks overwrite each other in the order
    /// their responses arrive.
    fn settle(self: &Arc<Self>, report: JobStatusReport) {
        if self.polls.is_cancelled() {
            debug!(session = %self.id, status = %report.status, "Discarding status for closed session");
            return;
        }

        let follow_up = report.status.schedules_follow_up();
        self.lock().last_status = Some(report.clone());
        info!(session = %self.id, status = %report.status, "{}", report.status_text());
        self.bus.emit(WorkflowEvent::StatusChanged(report));

        if follow_up {
            self.schedule_follow_up();
        }
    }

    fn schedule_follow_up(self: &Arc<Self>) {
        debug!(
            session = %self.id,
            delay_ms = self.polls.delay().as_millis() as u64,
            "Scheduling follow-up status check"
        );
        let session = Arc::clone(self);
        self.polls.schedule(move || async move {
            if let Err(e) = session.refresh_status().await {
                warn!(session = %session.id, error = %e, "Scheduled status check failed");
            }
        });
    }
}

/// Holds `busy` for the lifetime of one submission, including when the
/// submitting future is dropped mid-call.
struct BusyGuard<'a> {
    session: &'a Session,
}

impl<'a> BusyGuard<'a> {
    fn acquire(session: &'a Session) -> Option<Self> {
        {
            let mut state = session.lock();
            if state.busy {
                return None;
            }
            state.busy = true;
        }
        session.bus.emit(WorkflowEvent::BusyChanged(true));
        Some(Self { session })
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.session.lock().busy = false;
        self.session.bus.emit(WorkflowEvent::BusyChanged(false));
    }
}
