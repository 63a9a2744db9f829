//! Pure REST client for the page-range extraction service.
//!
//! The service owns document lookup, extraction jobs and their status. This
//! client only speaks its wire format; polling and workflow state live in the
//! `page-extract` crate.
//!
//! # Example
//!
//! ```rust,ignore
//! use page_extract_client::{ExtractServiceClient, ExtractionInput};
//!
//! let client = ExtractServiceClient::new("https://records.example.com/services/apexrest/fax-pdf")
//!     .with_token("session-token");
//!
//! let doc = client.init_document("REC1").await?;
//! let status = client
//!     .request_extraction(&ExtractionInput {
//!         parent_id: "REC1".into(),
//!         content_document_id: doc.content_document_id.unwrap_or_default(),
//!         ranges: "1-2,6-7".into(),
//!     })
//!     .await?;
//! println!("{:?}", status.status);
//! ```

pub mod error;
pub mod types;

pub use error::{Result, ServiceError};
pub use types::{DocumentInfo, ExtractionInput, InitDocumentInput, StatusInput, StatusResponse};

use serde::de::DeserializeOwned;
use serde::Serialize;

const INIT_PATH: &str = "/init";
const EXTRACTIONS_PATH: &str = "/extractions";
const STATUS_PATH: &str = "/extractions/status";

#[derive(Clone)]
pub struct ExtractServiceClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ExtractServiceClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Create from `PAGE_EXTRACT_SERVICE_URL` and optional `PAGE_EXTRACT_SERVICE_TOKEN`.
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("PAGE_EXTRACT_SERVICE_URL")
            .map_err(|_| ServiceError::Config("PAGE_EXTRACT_SERVICE_URL not set".into()))?;
        let client = Self::new(base_url);
        Ok(match std::env::var("PAGE_EXTRACT_SERVICE_TOKEN") {
            Ok(token) if !token.is_empty() => client.with_token(token),
            _ => client,
        })
    }

    /// Authenticate every call with a bearer token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post<I, O>(&self, path: &str, input: &I) -> Result<O>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        let url = self.url(path);
        let mut request = self.client.post(&url).json(input);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let resp = request.send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::debug!(%url, status = status.as_u16(), "Extraction service returned an error");
            return Err(error::api_error(status.as_u16(), &body));
        }

        Ok(resp.json().await?)
    }

    /// Look up the document attached to a parent record.
    pub async fn init_document(&self, parent_id: &str) -> Result<DocumentInfo> {
        let input = InitDocumentInput {
            parent_id: parent_id.to_string(),
        };
        self.post(INIT_PATH, &input).await
    }

    /// Ask the service to extract page ranges. Returns the job's initial status.
    pub async fn request_extraction(&self, input: &ExtractionInput) -> Result<StatusResponse> {
        tracing::debug!(
            parent_id = %input.parent_id,
            content_document_id = %input.content_document_id,
            ranges = %input.ranges,
            "Requesting extraction"
        );
        self.post(EXTRACTIONS_PATH, input).await
    }

    /// Look up the status of the extraction job for a document and ranges.
    pub async fn check_status(
        &self,
        content_document_id: &str,
        ranges: &str,
    ) -> Result<StatusResponse> {
        let input = StatusInput {
            content_document_id: content_document_id.to_string(),
            ranges: ranges.to_string(),
        };
        self.post(STATUS_PATH, &input).await
    }
}

impl std::fmt::Debug for ExtractServiceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractServiceClient")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.token.is_some())
            .finish()
    }
}
