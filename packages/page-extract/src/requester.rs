//! Extraction job submission.

use crate::error::SubmissionError;
use crate::traits::ExtractionService;
use crate::types::{ExtractionRequest, JobStatusReport};

/// Submit `request` with exactly one service call.
pub async fn submit(
    service: &dyn ExtractionService,
    request: &ExtractionRequest,
) -> Result<JobStatusReport, SubmissionError> {
    let resp = service
        .request_extraction(&request.to_input())
        .await
        .map_err(SubmissionError::Service)?;

    let report = JobStatusReport::from_response(resp);
    tracing::info!(
        content_document_id = %request.content_document_id,
        ranges = %request.ranges,
        status = %report.status,
        "Extraction requested"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranges;
    use crate::testing::{MockExtractionService, MockServiceCall};
    use crate::types::{DocumentRef, JobStatus};

    fn document() -> DocumentRef {
        DocumentRef {
            parent_id: "REC1".into(),
            file_name: "fax.pdf".into(),
            file_download_url: "/download/DOC1".into(),
            content_document_id: "DOC1".into(),
        }
    }

    #[tokio::test]
    async fn sends_one_request_with_trimmed_ranges() {
        let service = MockExtractionService::new().with_extraction_status("Queued");
        let request = ExtractionRequest::new(&document(), ranges::validate(" 1-2,6-7 ").unwrap());

        let report = submit(&service, &request).await.unwrap();

        assert_eq!(report.status, JobStatus::Queued);
        assert_eq!(
            service.calls(),
            vec![MockServiceCall::RequestExtraction {
                parent_id: "REC1".into(),
                content_document_id: "DOC1".into(),
                ranges: "1-2,6-7".into(),
            }]
        );
    }

    #[tokio::test]
    async fn rejection_carries_service_message() {
        let service = MockExtractionService::new().failing_extraction("Page 40 is out of range");
        let request = ExtractionRequest::new(&document(), ranges::validate("40").unwrap());

        let err = submit(&service, &request).await.unwrap_err();

        assert_eq!(err.user_message(), "Page 40 is out of range");
        assert_eq!(service.extraction_calls(), 1);
    }
}
