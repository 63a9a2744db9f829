//! Data types shared by the workflow components.

pub mod document;
pub mod event;
pub mod state;
pub mod status;

pub use document::{DocumentRef, ExtractionRequest};
pub use event::{Notification, Severity, WorkflowEvent};
pub use state::{Phase, WorkflowState, WorkflowView};
pub use status::{CheckOutcome, JobStatus, JobStatusReport};
