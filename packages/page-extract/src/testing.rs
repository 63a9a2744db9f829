//! Testing utilities including a mock extraction service.
//!
//! The mock replays scripted responses in order and records every call, so
//! tests can assert on exactly which network calls a workflow made.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

use page_extract_client::{
    DocumentInfo, ExtractionInput, Result as ServiceResult, ServiceError, StatusResponse,
};

use crate::traits::ExtractionService;

/// Scripted reply: a value, or an API failure `(status, message)`.
type Scripted<T> = std::result::Result<T, (u16, String)>;

/// Record of a call made to the mock service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockServiceCall {
    InitDocument {
        parent_id: String,
    },
    RequestExtraction {
        parent_id: String,
        content_document_id: String,
        ranges: String,
    },
    CheckStatus {
        content_document_id: String,
        ranges: String,
    },
}

/// Mock extraction service.
///
/// With nothing scripted it answers like a healthy service: the document is
/// `DOC-<parentId>`, new jobs are `Queued` and status checks say `Complete`.
#[derive(Default)]
pub struct MockExtractionService {
    documents: Mutex<VecDeque<Scripted<DocumentInfo>>>,
    extractions: Mutex<VecDeque<Scripted<StatusResponse>>>,
    statuses: Mutex<VecDeque<Scripted<StatusResponse>>>,
    calls: Mutex<Vec<MockServiceCall>>,
    extraction_gate: Option<Arc<Semaphore>>,
}

impl MockExtractionService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer the next document lookup with this document.
    pub fn with_document(self, file_name: &str, content_document_id: &str) -> Self {
        let info = DocumentInfo {
            file_name: Some(file_name.to_string()),
            file_download_url: Some(format!(
                "/sfc/servlet.shepherd/document/download/{}",
                content_document_id
            )),
            content_document_id: Some(content_document_id.to_string()),
        };
        self.documents.lock().unwrap().push_back(Ok(info));
        self
    }

    /// Answer the next document lookup with an empty record.
    pub fn with_missing_document(self) -> Self {
        self.documents
            .lock()
            .unwrap()
            .push_back(Ok(DocumentInfo::default()));
        self
    }

    pub fn failing_document(self, message: &str) -> Self {
        self.documents
            .lock()
            .unwrap()
            .push_back(Err((500, message.to_string())));
        self
    }

    /// Answer the next extraction request with this status label.
    pub fn with_extraction_status(self, status: &str) -> Self {
        self.extractions
            .lock()
            .unwrap()
            .push_back(Ok(StatusResponse::with_status(status)));
        self
    }

    pub fn failing_extraction(self, message: &str) -> Self {
        self.extractions
            .lock()
            .unwrap()
            .push_back(Err((400, message.to_string())));
        self
    }

    /// Answer the next status check with this status label.
    pub fn with_check_status(self, status: &str) -> Self {
        self.statuses
            .lock()
            .unwrap()
            .push_back(Ok(StatusResponse::with_status(status)));
        self
    }

    /// Answer the next status check without any status label.
    pub fn with_empty_check(self) -> Self {
        self.statuses
            .lock()
            .unwrap()
            .push_back(Ok(StatusResponse::default()));
        self
    }

    pub fn failing_check(self, message: &str) -> Self {
        self.statuses
            .lock()
            .unwrap()
            .push_back(Err((503, message.to_string())));
        self
    }

    /// Hold every extraction request open until [`release_extraction`](Self::release_extraction).
    pub fn gated_extractions(mut self) -> Self {
        self.extraction_gate = Some(Arc::new(Semaphore::new(0)));
        self
    }

    pub fn release_extraction(&self) {
        if let Some(gate) = &self.extraction_gate {
            gate.add_permits(1);
        }
    }

    /// All calls made, in order.
    pub fn calls(&self) -> Vec<MockServiceCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn extraction_calls(&self) -> usize {
        self.count(|c| matches!(c, MockServiceCall::RequestExtraction { .. }))
    }

    pub fn check_calls(&self) -> usize {
        self.count(|c| matches!(c, MockServiceCall::CheckStatus { .. }))
    }

    pub fn init_calls(&self) -> usize {
        self.count(|c| matches!(c, MockServiceCall::InitDocument { .. }))
    }

    fn count(&self, pred: impl Fn(&MockServiceCall) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|&c| pred(c)).count()
    }

    fn record(&self, call: MockServiceCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn next<T>(queue: &Mutex<VecDeque<Scripted<T>>>, default: T) -> ServiceResult<T> {
        match queue.lock().unwrap().pop_front() {
            Some(Ok(value)) => Ok(value),
            Some(Err((status, message))) => Err(ServiceError::Api { status, message }),
            None => Ok(default),
        }
    }
}

#[async_trait]
impl ExtractionService for MockExtractionService {
    async fn init_document(&self, parent_id: &str) -> ServiceResult<DocumentInfo> {
        self.record(MockServiceCall::InitDocument {
            parent_id: parent_id.to_string(),
        });

        let content_document_id = format!("DOC-{}", parent_id);
        Self::next(
            &self.documents,
            DocumentInfo {
                file_name: Some("document.pdf".to_string()),
                file_download_url: Some(format!("/download/{}", content_document_id)),
                content_document_id: Some(content_document_id),
            },
        )
    }

    async fn request_extraction(&self, input: &ExtractionInput) -> ServiceResult<StatusResponse> {
        self.record(MockServiceCall::RequestExtraction {
            parent_id: input.parent_id.clone(),
            content_document_id: input.content_document_id.clone(),
            ranges: input.ranges.clone(),
        });

        if let Some(gate) = &self.extraction_gate {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }

        Self::next(&self.extractions, StatusResponse::with_status("Queued"))
    }

    async fn check_status(
        &self,
        content_document_id: &str,
        ranges: &str,
    ) -> ServiceResult<StatusResponse> {
        self.record(MockServiceCall::CheckStatus {
            content_document_id: content_document_id.to_string(),
            ranges: ranges.to_string(),
        });

        Self::next(&self.statuses, StatusResponse::with_status("Complete"))
    }
}
