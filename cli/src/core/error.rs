//! # zipconv Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error types shared across the zipconv application.
//! There are two layers:
//!
//! - `ConvertError`: the request taxonomy of the `/convert/{type}` endpoint. Every
//!   variant knows its HTTP status code, and its `Display` text is the exact
//!   plain-text body sent back to the client.
//! - `ZipconvError`: application-level failures (configuration, filesystem) raised
//!   by the CLI commands, usually wrapped into `anyhow::Error` with context.
//!
//! `Result<T>` is an alias for `anyhow::Result<T>`, used by command handlers and
//! server startup where flexible context is more useful than a closed enum.
//!
//! ## Examples
//!
//! ```rust
//! // Request-driven errors become responses at the dispatcher boundary
//! let err = ConvertError::BadPath;
//! assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
//!
//! // Application errors carry context through anyhow
//! let bytes = fs::read(&path)
//!     .with_context(|| format!("Failed to read input file: {}", path.display()))?;
//! ```
//!
use crate::common::archive::CompressorError;
use crate::common::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

/// Errors raised while handling a single conversion request.
///
/// The `Display` output of each variant is the response body; `status_code` gives
/// the matching HTTP status.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Error: bad path")]
    BadPath,

    #[error("Error: bad output type ('{output_type}'). Available: {available}")]
    UnsupportedFormat {
        output_type: String,
        available: String,
    },

    #[error("BAD_REQUEST: Single file should be sent")]
    BadRequest,

    #[error("Error: no headers found in your request")]
    MalformedMultipartBody,

    #[error("Error: no filename header found in your request")]
    MissingFilename,

    #[error("Error: method not allowed")]
    MethodNotAllowed,

    /// The uploaded name cannot be carried in a `Content-Disposition` header
    /// (control characters).
    #[error("Error: filename cannot be used as a download name")]
    UnrepresentableFilename,

    /// Lifecycle misuse or writer failure inside the compressor. A defect, not a
    /// client error; only the current request is aborted.
    #[error("Error: archive creation failed")]
    Archive(#[from] CompressorError),

    /// The blocking conversion task panicked or was cancelled.
    #[error("Error: archive creation failed")]
    Worker(String),
}

impl ConvertError {
    /// # Status Code (`status_code`)
    ///
    /// Maps the error to the HTTP status returned to the client.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ConvertError::BadPath => StatusCode::NOT_FOUND,
            ConvertError::UnsupportedFormat { .. }
            | ConvertError::BadRequest
            | ConvertError::MalformedMultipartBody
            | ConvertError::MissingFilename
            | ConvertError::UnrepresentableFilename => StatusCode::BAD_REQUEST,
            ConvertError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ConvertError::Archive(_) | ConvertError::Worker(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<MultipartError> for ConvertError {
    fn from(err: MultipartError) -> Self {
        match err {
            MultipartError::MalformedBody => ConvertError::MalformedMultipartBody,
            MultipartError::MissingFilename => ConvertError::MissingFilename,
        }
    }
}

impl IntoResponse for ConvertError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            ConvertError::Archive(source) => error!("Conversion aborted: {}", source),
            ConvertError::Worker(reason) => error!("Conversion task failed: {}", reason),
            _ => {}
        }
        (status, self.to_string()).into_response()
    }
}

/// Application-level errors raised outside request handling.
#[derive(Error, Debug)]
pub enum ZipconvError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Filesystem error: {0}")]
    FileSystem(String),

    #[error("Unsupported format '{name}'. Available: {available}")]
    UnknownFormat { name: String, available: String },
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::archive::{CompressorError, Lifecycle};

    #[test]
    fn test_error_display() {
        assert_eq!(ConvertError::BadPath.to_string(), "Error: bad path");
        assert_eq!(
            ConvertError::BadRequest.to_string(),
            "BAD_REQUEST: Single file should be sent"
        );

        let unsupported = ConvertError::UnsupportedFormat {
            output_type: "zipRar".into(),
            available: "{'zipStored'}".into(),
        };
        assert_eq!(
            unsupported.to_string(),
            "Error: bad output type ('zipRar'). Available: {'zipStored'}"
        );

        let config_err = ZipconvError::Config("max_upload_mb must be positive".to_string());
        assert_eq!(
            config_err.to_string(),
            "Configuration error: max_upload_mb must be positive"
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ConvertError::BadPath.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ConvertError::MissingFilename.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ConvertError::MethodNotAllowed.status_code(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            ConvertError::UnrepresentableFilename.status_code(),
            StatusCode::BAD_REQUEST
        );

        let misuse = ConvertError::from(CompressorError::InvalidState {
            operation: "put",
            state: Lifecycle::Finalized,
        });
        assert_eq!(misuse.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        // Internal details never reach the client.
        assert_eq!(misuse.to_string(), "Error: archive creation failed");
    }

    #[test]
    fn test_multipart_error_mapping() {
        assert!(matches!(
            ConvertError::from(MultipartError::MalformedBody),
            ConvertError::MalformedMultipartBody
        ));
        assert!(matches!(
            ConvertError::from(MultipartError::MissingFilename),
            ConvertError::MissingFilename
        ));
    }
}
