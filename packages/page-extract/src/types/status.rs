//! Job status as observed from the extraction service.

use std::fmt;

use chrono::{DateTime, Utc};
use page_extract_client::StatusResponse;
use serde::{Deserialize, Serialize};

/// Status label of a server-side extraction job.
///
/// Labels are matched exactly; anything the service invents beyond the known
/// set is kept verbatim in [`JobStatus::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobStatus {
    Unknown,
    Queued,
    Processing,
    Complete,
    Failed,
    Other(String),
}

impl JobStatus {
    pub fn from_label(label: &str) -> Self {
        match label {
            "" | "Unknown" => JobStatus::Unknown,
            "Queued" => JobStatus::Queued,
            "Processing" => JobStatus::Processing,
            "Complete" => JobStatus::Complete,
            "Failed" => JobStatus::Failed,
            other => JobStatus::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            JobStatus::Unknown => "Unknown",
            JobStatus::Queued => "Queued",
            JobStatus::Processing => "Processing",
            JobStatus::Complete => "Complete",
            JobStatus::Failed => "Failed",
            JobStatus::Other(label) => label,
        }
    }

    /// Only a queued job gets an automatic follow-up check.
    pub fn schedules_follow_up(&self) -> bool {
        matches!(self, JobStatus::Queued)
    }

    pub fn is_settled(&self) -> bool {
        matches!(self, JobStatus::Complete | JobStatus::Failed)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<String> for JobStatus {
    fn from(label: String) -> Self {
        JobStatus::from_label(&label)
    }
}

impl From<JobStatus> for String {
    fn from(status: JobStatus) -> Self {
        status.label().to_string()
    }
}

/// A status observation plus whatever detail the service attached to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobStatusReport {
    pub status: JobStatus,
    pub detail: Option<serde_json::Value>,
    pub received_at: DateTime<Utc>,
}

impl JobStatusReport {
    pub fn new(status: JobStatus) -> Self {
        Self {
            status,
            detail: None,
            received_at: Utc::now(),
        }
    }

    /// Convert a service response. A missing label reads as `Unknown`.
    pub fn from_response(resp: StatusResponse) -> Self {
        Self {
            status: JobStatus::from_label(resp.status.as_deref().unwrap_or_default()),
            detail: resp.detail,
            received_at: Utc::now(),
        }
    }

    /// Text shown to the user for this status.
    pub fn status_text(&self) -> String {
        format!("Status: {}", self.status)
    }
}

/// Result of a status check.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckOutcome {
    /// No document or no ranges yet; no call was made
    Skipped,
    /// The service answered without a status label
    NoStatus,
    Status(JobStatusReport),
}

impl CheckOutcome {
    pub fn report(&self) -> Option<&JobStatusReport> {
        match self {
            CheckOutcome::Status(report) => Some(report),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_labels_parse_exactly() {
        assert_eq!(JobStatus::from_label("Queued"), JobStatus::Queued);
        assert_eq!(JobStatus::from_label("Complete"), JobStatus::Complete);
        assert_eq!(
            JobStatus::from_label("queued"),
            JobStatus::Other("queued".into())
        );
    }

    #[test]
    fn unknown_labels_are_kept() {
        let status = JobStatus::from_label("Waiting for OCR");
        assert_eq!(status, JobStatus::Other("Waiting for OCR".into()));
        assert_eq!(status.to_string(), "Waiting for OCR");
    }

    #[test]
    fn only_queued_schedules_follow_up() {
        assert!(JobStatus::Queued.schedules_follow_up());
        for status in [
            JobStatus::Unknown,
            JobStatus::Processing,
            JobStatus::Complete,
            JobStatus::Failed,
            JobStatus::Other("Retrying".into()),
        ] {
            assert!(!status.schedules_follow_up(), "{status} must not re-poll");
        }
    }

    #[test]
    fn serializes_as_label() {
        let json = serde_json::to_string(&JobStatus::Other("Paused".into())).unwrap();
        assert_eq!(json, r#""Paused""#);
        let status: JobStatus = serde_json::from_str(r#""Failed""#).unwrap();
        assert_eq!(status, JobStatus::Failed);
    }

    #[test]
    fn report_without_label_is_unknown() {
        let report = JobStatusReport::from_response(StatusResponse::default());
        assert_eq!(report.status, JobStatus::Unknown);
        assert_eq!(report.status_text(), "Status: Unknown");
    }
}
