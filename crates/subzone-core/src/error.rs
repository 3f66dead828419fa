use std::time::Duration;
use thiserror::Error;

/// Result type alias for subzone operations
pub type Result<T> = std::result::Result<T, SubzoneError>;

/// Broad classification of a [`SubzoneError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input, rejected before any provider call
    Validation,
    /// The request conflicts with existing claims or limits
    Conflict,
    /// The DNS provider failed or refused the call
    Provider,
    /// Claim storage failed
    Persistence,
    /// Configuration problems and partial releases
    Other,
}

/// Errors that can occur while managing subdomain claims and NS records
#[derive(Error, Debug)]
pub enum SubzoneError {
    /// Label is not an acceptable single-level subdomain
    #[error("invalid subdomain label: {0:?}")]
    InvalidLabel(String),

    /// Value is not an acceptable nameserver host name
    #[error("invalid nameserver: {0:?}")]
    InvalidNameserver(String),

    /// Label already has provider records or belongs to another owner
    #[error("subdomain {0:?} is not available")]
    LabelUnavailable(String),

    /// Owner already holds a claim
    #[error("owner already holds subdomain {label:?}")]
    AlreadyClaimed {
        /// The label the owner currently holds
        label: String,
    },

    /// Owner has no claim to operate on
    #[error("no registered subdomain for owner {0:?}")]
    NoClaim(String),

    /// Nameserver count above the per-subdomain cap
    #[error("too many nameservers: {count} given, at most {max} allowed")]
    TooManyNameservers {
        /// Number of nameservers supplied
        count: usize,
        /// Maximum allowed
        max: usize,
    },

    /// Authentication failed - invalid or missing API token
    #[error("authentication failed: invalid API token")]
    Unauthorized,

    /// Rate limit exceeded
    #[error("rate limit exceeded, retry after {retry_after:?} seconds")]
    RateLimited {
        /// Seconds to wait before retrying
        retry_after: Option<u64>,
    },

    /// Resource not found
    #[error("resource not found: {resource}")]
    NotFound {
        /// Description of the resource that wasn't found
        resource: String,
    },

    /// API returned an error response
    #[error("API error ({code}): {message}")]
    Api {
        /// HTTP status code
        code: u16,
        /// Error message from the API
        message: String,
    },

    /// API answered 2xx but reported `success: false`
    #[error("provider rejected the request: {0}")]
    Rejected(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Request timed out
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// JSON parsing/serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Claim storage failed
    #[error("persistence error: {0}")]
    Persistence(String),

    /// The claim was released but some NS records could not be deleted
    #[error("released {label:?} but {} record(s) could not be deleted: {}", orphaned.len(), orphaned.join(", "))]
    PartialRelease {
        /// Label that was released
        label: String,
        /// Provider ids of the records left behind
        orphaned: Vec<String>,
    },

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl SubzoneError {
    /// Classify the error
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidLabel(_) | Self::InvalidNameserver(_) => ErrorKind::Validation,
            Self::LabelUnavailable(_)
            | Self::AlreadyClaimed { .. }
            | Self::NoClaim(_)
            | Self::TooManyNameservers { .. } => ErrorKind::Conflict,
            Self::Unauthorized
            | Self::RateLimited { .. }
            | Self::NotFound { .. }
            | Self::Api { .. }
            | Self::Rejected(_)
            | Self::Http(_)
            | Self::Timeout(_)
            | Self::Json(_) => ErrorKind::Provider,
            Self::Persistence(_) => ErrorKind::Persistence,
            Self::PartialRelease { .. } | Self::Config(_) => ErrorKind::Other,
        }
    }

    /// Returns true if the error is retryable
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited { .. } | Self::Timeout(_) | Self::Http(_))
    }

    /// Returns true if the error is due to authentication
    #[must_use]
    pub const fn is_auth_error(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// Returns the HTTP status code if this is an API error
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Unauthorized => Some(401),
            Self::RateLimited { .. } => Some(429),
            Self::NotFound { .. } => Some(404),
            Self::Api { code, .. } => Some(*code),
            _ => None,
        }
    }
}
