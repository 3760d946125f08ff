//! # zipconv Request Dispatcher
//!
//! File: cli/src/commands/serve/dispatch.rs
//!
//! ## Overview
//!
//! Turns one HTTP request into one response. Every branch is terminal:
//!
//! 1. Method must be `POST`, otherwise 405.
//! 2. Path must be exactly `/convert/{outputType}`, otherwise 404.
//! 3. `outputType` must be a registered format, otherwise 400 listing the
//!    available names.
//! 4. The multipart body must carry exactly one part, otherwise 400.
//! 5. The body is parsed (`common::multipart`); parser failures become 400.
//! 6. A fresh `ArchiveCompressor` builds the archive, returned as
//!    `application/zip` with a `Content-Disposition` attachment name.
//!
//! Steps 2 to 6 are synchronous and run on the blocking thread pool, so a large
//! bzip2 or lzma conversion never stalls the async workers. Each conversion owns
//! its compressor and buffers; nothing is shared between requests.
//!
use crate::common::archive::{self, ArchiveCompressor, CompressionFormat, CompressorError};
use crate::common::multipart::{self, ParsedUpload};
use crate::core::error::ConvertError;
use axum::body::Bytes;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderValue, Method, Uri};
use axum::response::{IntoResponse, Response};
use tracing::{info, warn};

/// A finished archive ready to be sent to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertedArchive {
    /// Download name, e.g. `notes.txt.zip`.
    pub file_name: String,
    /// Complete zip bytes.
    pub bytes: Vec<u8>,
}

impl IntoResponse for ConvertedArchive {
    fn into_response(self) -> Response {
        let disposition = format!("attachment;filename={}", self.file_name);
        // `from_bytes` accepts non-ASCII names; control characters are refused.
        let Ok(disposition) = HeaderValue::from_bytes(disposition.as_bytes()) else {
            warn!("Archive name {:?} is not a valid header value", self.file_name);
            return ConvertError::UnrepresentableFilename.into_response();
        };

        (
            [
                (CONTENT_TYPE, HeaderValue::from_static("application/zip")),
                (CONTENT_DISPOSITION, disposition),
            ],
            self.bytes,
        )
            .into_response()
    }
}

/// # Output Type From Path (`output_type_from_path`)
///
/// Extracts `{outputType}` from a path of the exact shape `/convert/{outputType}`.
/// The segment may be empty (`/convert/`); the format lookup rejects it later.
///
/// ## Errors
///
/// `BadPath` for any other shape, including extra segments.
pub fn output_type_from_path(path: &str) -> Result<&str, ConvertError> {
    let mut segments = path.split('/');
    match (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) {
        (Some(""), Some("convert"), Some(output_type), None) => Ok(output_type),
        _ => Err(ConvertError::BadPath),
    }
}

/// # Convert (`convert`)
///
/// Runs the whole validation and conversion pipeline for one request.
///
/// ## Arguments
///
/// * `path`: request path (without query string).
/// * `content_type`: the raw `Content-Type` header, if any.
/// * `body`: the complete request body.
///
/// ## Errors
///
/// Any `ConvertError`; see the module overview for the order of checks.
pub fn convert(
    path: &str,
    content_type: Option<&str>,
    body: &[u8],
) -> Result<ConvertedArchive, ConvertError> {
    let output_type = output_type_from_path(path)?;

    let format =
        archive::format::lookup(output_type).map_err(|_| ConvertError::UnsupportedFormat {
            output_type: output_type.to_string(),
            available: archive::format::available_set(),
        })?;

    let boundary = content_type
        .and_then(multipart::boundary_from_content_type)
        .ok_or(ConvertError::BadRequest)?;
    let parts = multipart::count_parts(body, &boundary);
    if parts != 1 {
        warn!("Rejecting upload with {} parts", parts);
        return Err(ConvertError::BadRequest);
    }

    let upload = multipart::parse_upload(body)?;
    Ok(build_archive(format, upload)?)
}

/// # Build Archive (`build_archive`)
///
/// Packs a parsed upload into a single-entry archive with a fresh compressor.
pub fn build_archive(
    format: CompressionFormat,
    upload: ParsedUpload,
) -> Result<ConvertedArchive, CompressorError> {
    let mut compressor = ArchiveCompressor::new(format);
    compressor.create_archive()?;
    compressor.put(&upload.file_name, &upload.content)?;
    let bytes = compressor.get_archive_bytes()?;

    info!(
        "Converted '{}' with {}: {} -> {} bytes",
        upload.file_name,
        compressor.format(),
        upload.content.len(),
        bytes.len()
    );

    Ok(ConvertedArchive {
        file_name: compressor.add_extension(&upload.file_name),
        bytes,
    })
}

/// # Handle Request (`handle_request`)
///
/// The axum handler behind every route of the service.
pub async fn handle_request(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Response {
    if method != Method::POST {
        return ConvertError::MethodNotAllowed.into_response();
    }

    let path = uri.path().to_string();
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    let outcome = tokio::task::spawn_blocking(move || {
        convert(&path, content_type.as_deref(), &body)
    })
    .await;

    match outcome {
        Ok(Ok(archive)) => archive.into_response(),
        Ok(Err(err)) => {
            if err.status_code().is_client_error() {
                warn!("Rejected conversion request {}: {}", uri, err);
            }
            err.into_response()
        }
        Err(join_err) => ConvertError::Worker(join_err.to_string()).into_response(),
    }
}
