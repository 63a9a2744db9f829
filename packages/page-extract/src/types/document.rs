use page_extract_client::ExtractionInput;
use serde::Serialize;

use crate::ranges::ValidRanges;

/// The document a workflow session operates on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentRef {
    pub parent_id: String,
    pub file_name: String,
    pub file_download_url: String,
    pub content_document_id: String,
}

/// A single extraction submission. Built fresh for every attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRequest {
    pub parent_id: String,
    pub content_document_id: String,
    pub ranges: ValidRanges,
}

impl ExtractionRequest {
    pub fn new(document: &DocumentRef, ranges: ValidRanges) -> Self {
        Self {
            parent_id: document.parent_id.clone(),
            content_document_id: document.content_document_id.clone(),
            ranges,
        }
    }

    pub fn to_input(&self) -> ExtractionInput {
        ExtractionInput {
            parent_id: self.parent_id.clone(),
            content_document_id: self.content_document_id.clone(),
            ranges: self.ranges.as_str().to_string(),
        }
    }
}
