//! Remote service abstraction.
//!
//! The workflow only needs the three calls below. [`ExtractServiceClient`]
//! implements them over HTTP; [`MockExtractionService`](crate::testing::MockExtractionService)
//! implements them for tests.

use async_trait::async_trait;
use page_extract_client::{
    DocumentInfo, ExtractServiceClient, ExtractionInput, Result as ServiceResult, StatusResponse,
};

#[async_trait]
pub trait ExtractionService: Send + Sync {
    /// Fetch document metadata for a parent record.
    async fn init_document(&self, parent_id: &str) -> ServiceResult<DocumentInfo>;

    /// Submit an extraction job. Returns the initial status.
    async fn request_extraction(&self, input: &ExtractionInput) -> ServiceResult<StatusResponse>;

    /// Look up the status of the job for a document and ranges.
    async fn check_status(
        &self,
        content_document_id: &str,
        ranges: &str,
    ) -> ServiceResult<StatusResponse>;
}

#[async_trait]
impl ExtractionService for ExtractServiceClient {
    async fn init_document(&self, parent_id: &str) -> ServiceResult<DocumentInfo> {
        ExtractServiceClient::init_document(self, parent_id).await
    }

    async fn request_extraction(&self, input: &ExtractionInput) -> ServiceResult<StatusResponse> {
        ExtractServiceClient::request_extraction(self, input).await
    }

    async fn check_status(
        &self,
        content_document_id: &str,
        ranges: &str,
    ) -> ServiceResult<StatusResponse> {
        ExtractServiceClient::check_status(self, content_document_id, ranges).await
    }
}
