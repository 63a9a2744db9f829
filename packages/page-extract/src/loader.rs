//! Document lookup for a parent record.

use crate::error::LoadError;
use crate::traits::ExtractionService;
use crate::types::DocumentRef;

/// Fetch the document attached to `parent_id`.
///
/// A response without a content document id counts as "no document".
pub async fn load(
    service: &dyn ExtractionService,
    parent_id: &str,
) -> Result<DocumentRef, LoadError> {
    let info = service
        .init_document(parent_id)
        .await
        .map_err(LoadError::Service)?;

    let content_document_id = match info.content_document_id {
        Some(id) if !id.trim().is_empty() => id,
        _ => {
            return Err(LoadError::NoDocument {
                parent_id: parent_id.to_string(),
            })
        }
    };

    tracing::debug!(parent_id, content_document_id = %content_document_id, "Document loaded");

    Ok(DocumentRef {
        parent_id: parent_id.to_string(),
        file_name: info.file_name.unwrap_or_default(),
        file_download_url: info.file_download_url.unwrap_or_default(),
        content_document_id,
    })
}
