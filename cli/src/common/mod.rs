//! # zipconv Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//!
//! ## Overview
//!
//! Shared building blocks used by the commands:
//!
//! - **`archive`**: the format registry and the in-memory `ArchiveCompressor`.
//! - **`multipart`**: the minimal `multipart/form-data` parser used by the
//!   conversion endpoint.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::{archive, multipart};
//!
//! let upload = multipart::parse_upload(&body)?;
//! let format = archive::format::lookup("zipDeflate")?;
//! ```
//!

/// Format registry and archive builder.
pub mod archive;
/// Single-file `multipart/form-data` body parsing.
pub mod multipart;
