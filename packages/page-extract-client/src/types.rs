use serde::{Deserialize, Serialize};

/// Body of the document lookup call.
#[derive(Debug, Clone, Serialize)]
pub struct InitDocumentInput {
    #[serde(rename = "parentId")]
    pub parent_id: String,
}

/// Document metadata returned for a parent record.
///
/// Every field is optional on the wire: a lookup that finds no attached
/// document answers with nulls rather than an error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentInfo {
    #[serde(rename = "fileName")]
    pub file_name: Option<String>,
    #[serde(rename = "fileDownloadUrl")]
    pub file_download_url: Option<String>,
    #[serde(rename = "contentDocumentId")]
    pub content_document_id: Option<String>,
}

/// Body of an extraction request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionInput {
    #[serde(rename = "parentId")]
    pub parent_id: String,
    #[serde(rename = "contentDocumentId")]
    pub content_document_id: String,
    pub ranges: String,
}

/// Body of a status lookup.
#[derive(Debug, Clone, Serialize)]
pub struct StatusInput {
    #[serde(rename = "contentDocumentId")]
    pub content_document_id: String,
    pub ranges: String,
}

/// Job status as reported by the service.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusResponse {
    pub status: Option<String>,
    /// Service-defined structured detail, passed through untouched.
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl StatusResponse {
    pub fn with_status(status: impl Into<String>) -> Self {
        Self {
            status: Some(status.into()),
            detail: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extraction_input_uses_camel_case() {
        let input = ExtractionInput {
            parent_id: "REC1".into(),
            content_document_id: "DOC1".into(),
            ranges: "1-2,6-7".into(),
        };
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "parentId": "REC1",
                "contentDocumentId": "DOC1",
                "ranges": "1-2,6-7"
            })
        );
    }

    #[test]
    fn document_info_tolerates_nulls() {
        let info: DocumentInfo =
            serde_json::from_str(r#"{"fileName": null, "contentDocumentId": null}"#).unwrap();
        assert!(info.content_document_id.is_none());
        assert!(info.file_download_url.is_none());
    }

    #[test]
    fn status_response_keeps_detail() {
        let resp: StatusResponse = serde_json::from_str(
            r#"{"status": "Processing", "detail": {"pagesDone": 2, "pagesTotal": 4}}"#,
        )
        .unwrap();
        assert_eq!(resp.status.as_deref(), Some("Processing"));
        assert_eq!(resp.detail.unwrap()["pagesTotal"], 4);
    }
}
