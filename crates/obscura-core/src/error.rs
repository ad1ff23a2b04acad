//! Error types for `obscura-core`.
//!
//! Unified error type for the engine's collaborators (config loading,
//! the backend KV store, the request-framing surface). The planner
//! itself never returns `Result` — per its design it always terminates
//! and returns whatever responses it could assemble (see `planner`).
//! [`config::ConfigError`](crate::config::ConfigError) and
//! [`backend::BackendError`](crate::backend::BackendError) stay as the
//! detailed errors their own modules raise; `From` impls here convert
//! them to this type's stable `OBSCURA-NNN` codes at the points they
//! cross into logging or an HTTP response.

use thiserror::Error;

/// Result type alias for `obscura-core` operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in `obscura-core` operations.
///
/// Error codes follow the pattern `OBSCURA-NNN` for easy debugging.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error (OBSCURA-001).
    #[error("[OBSCURA-001] Configuration error: {0}")]
    Config(String),

    /// Backend operation timed out (OBSCURA-002).
    #[error("[OBSCURA-002] Backend timed out after {0:?}")]
    BackendTimeout(std::time::Duration),

    /// Backend returned an error (OBSCURA-003).
    #[error("[OBSCURA-003] Backend error: {0}")]
    Backend(String),

    /// Internal error (OBSCURA-004).
    ///
    /// Indicates an unexpected internal error. Please report if encountered.
    #[error("[OBSCURA-004] Internal error: {0}")]
    Internal(String),

    /// Malformed request envelope (OBSCURA-005).
    ///
    /// Distinct from a per-request empty key, which spec.md §7 treats
    /// as silently dropped rather than an error; this covers the
    /// envelope itself failing to parse as the expected shape.
    #[error("[OBSCURA-005] Malformed request: {0}")]
    Request(String),
}

impl Error {
    /// Returns the error code (e.g., "OBSCURA-001").
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "OBSCURA-001",
            Self::BackendTimeout(_) => "OBSCURA-002",
            Self::Backend(_) => "OBSCURA-003",
            Self::Internal(_) => "OBSCURA-004",
            Self::Request(_) => "OBSCURA-005",
        }
    }
}

impl From<crate::config::ConfigError> for Error {
    fn from(err: crate::config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<crate::backend::BackendError> for Error {
    fn from(err: crate::backend::BackendError) -> Self {
        match err {
            crate::backend::BackendError::Store(message) => Self::Backend(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_unique() {
        let errors: Vec<Error> = vec![
            Error::Config("test".into()),
            Error::BackendTimeout(std::time::Duration::from_secs(5)),
            Error::Backend("test".into()),
            Error::Internal("test".into()),
            Error::Request("test".into()),
        ];

        let mut codes: Vec<&str> = errors.iter().map(Error::code).collect();
        let unique_len = {
            let mut sorted = codes.clone();
            sorted.sort_unstable();
            sorted.dedup();
            sorted.len()
        };
        codes.sort_unstable();
        assert_eq!(codes.len(), unique_len);
    }

    #[test]
    fn test_error_display() {
        let err = Error::Backend("connection refused".to_string());
        assert_eq!(
            err.to_string(),
            "[OBSCURA-003] Backend error: connection refused"
        );
    }

    #[test]
    fn config_error_converts_with_config_code() {
        let err: Error = crate::config::ConfigError::InvalidValue {
            key: "batch.batch_size".to_string(),
            message: "must be greater than 0".to_string(),
        }
        .into();
        assert_eq!(err.code(), "OBSCURA-001");
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn backend_error_converts_with_backend_code() {
        let err: Error = crate::backend::BackendError::Store("connection refused".to_string()).into();
        assert_eq!(err.code(), "OBSCURA-003");
        assert!(matches!(err, Error::Backend(message) if message == "connection refused"));
    }
}
