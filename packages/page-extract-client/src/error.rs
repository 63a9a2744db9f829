//! Error types for the extraction service client.

use thiserror::Error;

/// Result type for extraction service operations.
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Extraction service client errors.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Configuration error (missing base URL, invalid settings)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport error (connection failed, timeout, undecodable body)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response from the service
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
}

impl ServiceError {
    /// Message suitable for showing to a user.
    ///
    /// For API errors this is the service's own message rather than the
    /// formatted error with its status code.
    pub fn user_message(&self) -> String {
        match self {
            ServiceError::Api { message, .. } if !message.is_empty() => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Build an [`ServiceError::Api`] from a failed response body.
///
/// The service reports errors either as `{"message": "..."}` or as an array
/// of such objects; anything else is passed through verbatim.
pub(crate) fn api_error(status: u16, body: &str) -> ServiceError {
    let message = match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => message_from_value(&value).unwrap_or_else(|| body.to_string()),
        Err(_) => body.trim().to_string(),
    };
    ServiceError::Api { status, message }
}

fn message_from_value(value: &serde_json::Value) -> Option<String> {
    let object = match value {
        serde_json::Value::Array(items) => items.first()?,
        other => other,
    };
    object
        .get("message")
        .and_then(|m| m.as_str())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_reads_message_field() {
        let err = api_error(400, r#"{"message": "Invalid page range: 9-2"}"#);
        assert_eq!(err.user_message(), "Invalid page range: 9-2");
        assert!(matches!(err, ServiceError::Api { status: 400, .. }));
    }

    #[test]
    fn api_error_reads_first_entry_of_error_array() {
        let err = api_error(
            500,
            r#"[{"errorCode": "APEX_ERROR", "message": "Document locked"}, {"message": "ignored"}]"#,
        );
        assert_eq!(err.user_message(), "Document locked");
    }

    #[test]
    fn api_error_falls_back_to_raw_body() {
        let err = api_error(502, "Bad Gateway\n");
        assert_eq!(err.user_message(), "Bad Gateway");

        let err = api_error(404, r#"{"error": "not found"}"#);
        assert_eq!(err.user_message(), r#"{"error": "not found"}"#);
    }

    #[test]
    fn empty_api_message_uses_display() {
        let err = api_error(503, "");
        assert_eq!(err.user_message(), "API error (503): ");
    }
}
