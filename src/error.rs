//! Client error types.
//!
//! Every failure the client can produce collapses into one [`Error`] whose
//! `Display` text is safe to show to an end user as-is.

use thiserror::Error;

/// Client result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Client error types with specific context for actionable debugging
#[derive(Debug, Error)]
pub enum Error {
    /// No endpoint could be reached (connection refused, DNS, TLS, timeout)
    #[error("Network error: Unable to connect to the API. Please check your internet connection and try again.")]
    Network {
        /// The last transport error observed across all endpoints.
        detail: String,
    },

    /// The backend rejected the bearer token; the stored credential was cleared
    #[error("Session expired. Please login again.")]
    SessionExpired,

    /// The backend answered with a non-success status
    #[error("{message}")]
    Api {
        /// Human-readable error description, extracted from the response body.
        message: String,
        /// HTTP status code, if from an HTTP response.
        status: Option<u16>,
        /// Actionable suggestion for resolving the error.
        hint: Option<&'static str>,
    },

    /// The request could not be built (bad header name or value)
    #[error("Invalid request: {0}")]
    Request(String),

    /// Configuration error with guidance
    #[error("Configuration error: {message}. {hint}")]
    Config {
        /// Description of the configuration problem.
        message: String,
        /// Actionable guidance for fixing the issue.
        hint: &'static str,
    },

    /// IO error with path context
    #[error("IO error at {path:?}: {source}")]
    Io {
        /// The underlying IO error.
        source: std::io::Error,
        /// File path where the error occurred, if known.
        path: Option<std::path::PathBuf>,
    },

    /// File or payload parsing error
    #[error("Parse error in {file:?}: {message}")]
    Parse {
        /// File that failed to parse, if known.
        file: Option<std::path::PathBuf>,
        /// Description of the parse failure.
        message: String,
    },

    /// Generic message error (escape hatch)
    #[error("{0}")]
    Msg(String),
}

impl Error {
    /// Create an IO error with path context
    pub fn io(source: std::io::Error, path: impl Into<Option<std::path::PathBuf>>) -> Self {
        Self::Io { source, path: path.into() }
    }

    /// Create an API error without a status (e.g. a malformed success body)
    pub fn api(message: impl Into<String>) -> Self {
        Self::Api {
            message: message.into(),
            status: None,
            hint: None,
        }
    }

    /// Create an API error with HTTP status
    pub fn api_status(message: impl Into<String>, status: u16) -> Self {
        let hint = match status {
            403 => Some("Your account may lack the role required for this action"),
            404 | 405 => Some("The API base URL may be misconfigured"),
            422 => Some("Check the submitted fields"),
            429 => Some("Rate limited - wait a moment and try again"),
            500..=599 => Some("Booking server error - try again later"),
            _ => None,
        };
        Self::Api {
            message: message.into(),
            status: Some(status),
            hint,
        }
    }

    /// Create a network error from the last transport failure
    pub fn network(detail: impl Into<String>) -> Self {
        Self::Network { detail: detail.into() }
    }

    /// Create a config error with actionable hint
    pub fn config(message: impl Into<String>, hint: &'static str) -> Self {
        Self::Config { message: message.into(), hint }
    }

    /// Create a parse error with file context
    pub fn parse(message: impl Into<String>, file: impl Into<Option<std::path::PathBuf>>) -> Self {
        Self::Parse { file: file.into(), message: message.into() }
    }

    /// HTTP status that produced this error, if any
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => *status,
            Self::SessionExpired => Some(401),
            _ => None,
        }
    }

    /// Whether the caller should send the user back to the login page
    pub const fn is_session_expired(&self) -> bool {
        matches!(self, Self::SessionExpired)
    }
}

// Convenience conversions
impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io { source: e, path: None }
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Self::Msg(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Self::Msg(s.to_string())
    }
}
