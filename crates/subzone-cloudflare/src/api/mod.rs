//! API endpoint modules and the shared response envelope.

mod records;
mod zone;

pub use records::{ListRecordsBuilder, RecordsApi};
pub use zone::{Zone, ZoneApi};

use serde::Deserialize;
use subzone_core::{Result, SubzoneError};

/// A message in the `errors` or `messages` array of a response
#[derive(Debug, Clone, Deserialize)]
pub struct ApiMessage {
    /// Cloudflare error or message code
    #[serde(default)]
    pub code: i64,

    /// Human-readable text
    #[serde(default)]
    pub message: String,
}

/// Pagination block of list responses
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ResultInfo {
    /// Current page (1-indexed)
    #[serde(default)]
    pub page: u32,

    /// Items per page
    #[serde(default)]
    pub per_page: u32,

    /// Items on this page
    #[serde(default)]
    pub count: u32,

    /// Items across all pages
    #[serde(default)]
    pub total_count: u32,

    /// Number of pages
    #[serde(default)]
    pub total_pages: u32,
}

/// Envelope wrapping every Cloudflare API v4 response
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    /// Whether the call succeeded
    pub success: bool,

    /// Errors reported by the API
    #[serde(default)]
    pub errors: Vec<ApiMessage>,

    /// Informational messages
    #[serde(default)]
    pub messages: Vec<ApiMessage>,

    /// Payload
    pub result: Option<T>,

    /// Pagination, for list endpoints
    #[serde(default)]
    pub result_info: Option<ResultInfo>,
}

impl<T> Envelope<T> {
    /// First error message, if any
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        self.errors.first().map(|e| {
            if e.code == 0 {
                e.message.clone()
            } else {
                format!("{} ({})", e.message, e.code)
            }
        })
    }

    /// Unwrap the payload, treating `success: false` as a rejection
    pub fn into_result(self) -> Result<T> {
        if !self.success {
            let message = self
                .error_message()
                .unwrap_or_else(|| "unsuccessful response".to_string());
            return Err(SubzoneError::Rejected(message));
        }
        self.result
            .ok_or_else(|| SubzoneError::Rejected("response carried no result".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsuccessful_envelope_is_rejected() {
        let envelope: Envelope<serde_json::Value> = serde_json::from_str(
            r#"{"success":false,"errors":[{"code":9005,"message":"Content for NS record is invalid."}],"messages":[],"result":null}"#,
        )
        .unwrap();
        match envelope.into_result() {
            Err(SubzoneError::Rejected(msg)) => {
                assert_eq!(msg, "Content for NS record is invalid. (9005)");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_successful_envelope() {
        let envelope: Envelope<serde_json::Value> = serde_json::from_str(
            r#"{"success":true,"errors":[],"messages":[],"result":{"id":"abc"}}"#,
        )
        .unwrap();
        assert_eq!(envelope.into_result().unwrap()["id"], "abc");
    }
}
