//! Page-range extraction workflow.
//!
//! Client-side lifecycle controller for asynchronous page extraction jobs:
//! load the document attached to a record, submit page ranges to the remote
//! extraction service, and follow the job's status until it settles.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use page_extract::{WorkflowConfig, WorkflowController};
//! use page_extract_client::ExtractServiceClient;
//!
//! let service = Arc::new(ExtractServiceClient::from_env()?);
//! let controller = WorkflowController::new("REC1", service, WorkflowConfig::default());
//!
//! let mut events = controller.subscribe();
//! controller.init().await?;
//! controller.set_ranges("1-2,6-7");
//! controller.extract().await?;   // "Status: Queued", follow-up check scheduled
//! controller.settled().await;     // follow-up ran
//! println!("{:?}", controller.view().status_text);
//! ```
//!
//! # Modules
//!
//! - [`loader`] - Document lookup
//! - [`ranges`] - Ranges validation
//! - [`requester`] - Extraction job submission
//! - [`poller`] - Status checks and the follow-up schedule
//! - [`controller`] - Session state machine tying the above together
//! - [`bus`] - Events for the presentation layer
//! - [`testing`] - Mock service for tests

pub mod bus;
pub mod config;
pub mod controller;
pub mod error;
pub mod loader;
pub mod poller;
pub mod ranges;
pub mod requester;
pub mod testing;
pub mod traits;
pub mod types;

pub use bus::EventBus;
pub use config::{Config, WorkflowConfig, DEFAULT_POLL_DELAY};
pub use controller::WorkflowController;
pub use error::{LoadError, PollError, Result, SubmissionError, ValidationError, WorkflowError};
pub use poller::PollScheduler;
pub use ranges::ValidRanges;
pub use traits::ExtractionService;
pub use types::{
    CheckOutcome, DocumentRef, ExtractionRequest, JobStatus, JobStatusReport, Notification, Phase,
    Severity, WorkflowEvent, WorkflowState, WorkflowView,
};
