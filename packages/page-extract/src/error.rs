//! Typed errors for the extraction workflow.
//!
//! One enum per component, folded into [`WorkflowError`] at the controller
//! boundary. The controller also turns every one of them into a
//! [`Notification`](crate::types::Notification) before returning it.

use page_extract_client::ServiceError;
use thiserror::Error;

use crate::types::Phase;

/// Document lookup failed. Fatal to initialization.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("document lookup failed: {0}")]
    Service(#[source] ServiceError),

    /// The service answered but has no document for the record
    #[error("no document attached to record {parent_id}")]
    NoDocument { parent_id: String },
}

/// Ranges input rejected before any network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("page ranges are empty")]
    EmptyInput,
}

/// Extraction request rejected or not delivered.
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("extraction request failed: {0}")]
    Service(#[source] ServiceError),
}

/// Status lookup failed.
#[derive(Debug, Error)]
pub enum PollError {
    #[error("status check failed: {0}")]
    Service(#[source] ServiceError),
}

impl LoadError {
    pub fn user_message(&self) -> String {
        match self {
            LoadError::Service(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}

impl SubmissionError {
    pub fn user_message(&self) -> String {
        match self {
            SubmissionError::Service(e) => e.user_message(),
        }
    }
}

impl PollError {
    pub fn user_message(&self) -> String {
        match self {
            PollError::Service(e) => e.user_message(),
        }
    }
}

/// Errors returned by [`WorkflowController`](crate::WorkflowController) operations.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Submission(#[from] SubmissionError),

    #[error(transparent)]
    Poll(#[from] PollError),

    /// An extraction request is still in flight
    #[error("an extraction request is already in progress")]
    Busy,

    #[error("workflow is not ready (phase: {0})")]
    NotReady(Phase),

    #[error("workflow already initialized")]
    AlreadyInitialized,
}

/// Result type alias for workflow operations.
pub type Result<T> = std::result::Result<T, WorkflowError>;
