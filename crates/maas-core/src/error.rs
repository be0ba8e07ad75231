//! Error types for MAAS operations.
//!
//! Every failure is returned to the immediate caller. Non-2xx responses are
//! not transport failures: they carry the status line and the raw body the
//! server sent so callers can inspect machine-readable error payloads.

use thiserror::Error;

/// Main error type for MAAS operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Malformed base address, resource reference or API key
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Caller-supplied arguments conflict with reserved values or are missing
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Network or connection failure (DNS, refused connection, TLS, timeout)
    #[error("Transport error: {0}")]
    TransportError(String),

    /// The server answered with a non-2xx status
    #[error("Error requesting the MAAS server: {status_line}.")]
    ApiError {
        /// Numeric HTTP status code
        status: u16,
        /// Status line, e.g. `404 Not Found`
        status_line: String,
        /// Raw response body
        body: Vec<u8>,
    },

    /// A response body could not be decoded
    #[error("Failed to decode MAAS response: {0}")]
    DecodeError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Specialized result type for MAAS operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns the error code for this error type.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ParseError(_) => "PARSE_ERROR",
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
            Self::TransportError(_) => "TRANSPORT_ERROR",
            Self::ApiError { .. } => "API_ERROR",
            Self::DecodeError(_) => "DECODE_ERROR",
            Self::ConfigError(_) => "CONFIG_ERROR",
        }
    }

    /// Body returned by the server alongside a non-2xx status.
    #[must_use]
    pub fn body(&self) -> Option<&[u8]> {
        match self {
            Self::ApiError { body, .. } => Some(body),
            _ => None,
        }
    }

    /// HTTP status code of an [`Error::ApiError`].
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::ApiError { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if the server was reached and answered with an error status.
    #[must_use]
    pub const fn is_api_error(&self) -> bool {
        matches!(self, Self::ApiError { .. })
    }
}

// Conversions from external error types
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::TransportError(format!("request timed out: {err}"))
        } else if err.is_connect() {
            Self::TransportError(format!("connection failed: {err}"))
        } else {
            Self::TransportError(err.to_string())
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::ParseError(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::DecodeError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::ConfigError(err.to_string())
    }
}

impl From<reqwest::header::InvalidHeaderValue> for Error {
    fn from(err: reqwest::header::InvalidHeaderValue) -> Self {
        Self::InvalidArgument(format!("invalid header value: {err}"))
    }
}
