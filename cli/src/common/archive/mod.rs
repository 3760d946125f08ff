//! # zipconv Archive Module (`common::archive`)
//!
//! File: cli/src/common/archive/mod.rs
//!
//! ## Overview
//!
//! Everything needed to turn bytes into a zip archive:
//!
//! - **`format`**: the fixed registry of output formats (`zipStored`,
//!   `zipDeflate`, `zipBzip2`, `zipLzma`) and the `CompressionFormat` they map to.
//! - **`compressor`**: `ArchiveCompressor`, the in-memory
//!   create/put/finalize builder parameterized by a `CompressionFormat`.
//! - **`encode`**: per-method compression of a single entry (store, deflate,
//!   bzip2, zip-framed lzma) with its CRC-32.
//! - **`container`**: the zip file layout (local headers, central directory,
//!   end record) for encoded entries.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::archive::{self, ArchiveCompressor};
//!
//! let format = archive::format::lookup("zipLzma")?;
//! let mut compressor = ArchiveCompressor::new(format);
//! ```
//!

pub mod compressor;
mod container;
mod encode;
pub mod format;

pub use compressor::{ArchiveCompressor, CompressorError, Lifecycle};
pub use format::{CompressionFormat, UnsupportedFormat};
