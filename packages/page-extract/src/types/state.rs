use std::fmt;

use serde::Serialize;

use super::{DocumentRef, JobStatusReport};

/// Lifecycle phase of a workflow session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Uninitialized,
    /// Document lookup in flight
    Loading,
    Ready,
    /// Document lookup failed; terminal for the session
    InitFailed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Uninitialized => "uninitialized",
            Phase::Loading => "loading",
            Phase::Ready => "ready",
            Phase::InitFailed => "init_failed",
        };
        f.write_str(name)
    }
}

/// Mutable state of one workflow session.
#[derive(Debug, Clone)]
pub struct WorkflowState {
    pub phase: Phase,
    pub document: Option<DocumentRef>,
    pub current_ranges: String,
    pub last_status: Option<JobStatusReport>,
    pub busy: bool,
}

impl WorkflowState {
    pub fn new(ranges: impl Into<String>) -> Self {
        Self {
            phase: Phase::Uninitialized,
            document: None,
            current_ranges: ranges.into(),
            last_status: None,
            busy: false,
        }
    }

    pub fn content_document_id(&self) -> Option<&str> {
        self.document.as_ref().map(|d| d.content_document_id.as_str())
    }

    pub fn view(&self) -> WorkflowView {
        let doc = self.document.as_ref();
        WorkflowView {
            phase: self.phase,
            init_loaded: doc.is_some(),
            file_name: doc.map(|d| d.file_name.clone()),
            file_download_url: doc.map(|d| d.file_download_url.clone()),
            content_document_id: doc.map(|d| d.content_document_id.clone()),
            ranges: self.current_ranges.clone(),
            status_text: self.last_status.as_ref().map(JobStatusReport::status_text),
            busy: self.busy,
        }
    }
}

/// Read-only snapshot for display binding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowView {
    pub phase: Phase,
    pub init_loaded: bool,
    pub file_name: Option<String>,
    pub file_download_url: Option<String>,
    pub content_document_id: Option<String>,
    pub ranges: String,
    pub status_text: Option<String>,
    pub busy: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loading_view_has_no_document_yet() {
        let mut state = WorkflowState::new("1-2");
        state.phase = Phase::Loading;

        let view = state.view();
        assert_eq!(view.phase, Phase::Loading);
        assert!(!view.init_loaded);
        assert_eq!(view.file_name, None);

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["phase"], "loading");
        assert_eq!(Phase::Loading.to_string(), "loading");
    }
}
