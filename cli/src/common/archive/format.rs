//! # zipconv Compression Formats (`common::archive::format`)
//!
//! File: cli/src/common/archive/format.rs
//!
//! ## Overview
//!
//! The fixed registry of output formats a client can request. Each entry maps a
//! user-facing name (the `{type}` in `/convert/{type}`) to a `CompressionFormat`,
//! which in turn names the zip compression method used for every entry of the
//! produced archive.
//!
//! | Name         | Zip method  |
//! |--------------|-------------|
//! | `zipStored`  | store (0)   |
//! | `zipDeflate` | deflate (8) |
//! | `zipBzip2`   | bzip2 (12)  |
//! | `zipLzma`    | lzma (14)   |
//!
//! The registry is a `const` table: it is never mutated and is shared between
//! requests without synchronization. Compressors are created per request from a
//! looked-up format (see `ArchiveCompressor::new`).
//!
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Compression algorithm used for the entries of an archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompressionFormat {
    Stored,
    Deflate,
    Bzip2,
    Lzma,
}

/// Name -> format table, in the order formats are listed to clients.
const REGISTRY: [(&str, CompressionFormat); 4] = [
    ("zipStored", CompressionFormat::Stored),
    ("zipDeflate", CompressionFormat::Deflate),
    ("zipBzip2", CompressionFormat::Bzip2),
    ("zipLzma", CompressionFormat::Lzma),
];

/// Returned when a requested format name is not in the registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported format '{0}'")]
pub struct UnsupportedFormat(pub String);

impl CompressionFormat {
    /// Every registered format, in registry order.
    pub const ALL: [CompressionFormat; 4] = [
        CompressionFormat::Stored,
        CompressionFormat::Deflate,
        CompressionFormat::Bzip2,
        CompressionFormat::Lzma,
    ];

    /// The registry name of this format (e.g. `"zipDeflate"`).
    pub fn name(self) -> &'static str {
        match self {
            CompressionFormat::Stored => "zipStored",
            CompressionFormat::Deflate => "zipDeflate",
            CompressionFormat::Bzip2 => "zipBzip2",
            CompressionFormat::Lzma => "zipLzma",
        }
    }

    /// The zip compression method identifier written into each entry header.
    pub fn method(self) -> u16 {
        match self {
            CompressionFormat::Stored => 0,
            CompressionFormat::Deflate => 8,
            CompressionFormat::Bzip2 => 12,
            CompressionFormat::Lzma => 14,
        }
    }

    /// Human-readable name of the zip method.
    pub fn method_label(self) -> &'static str {
        match self {
            CompressionFormat::Stored => "store",
            CompressionFormat::Deflate => "deflate",
            CompressionFormat::Bzip2 => "bzip2",
            CompressionFormat::Lzma => "lzma",
        }
    }

    /// Minimum zip specification version (times ten) a reader needs for the method.
    pub fn version_needed(self) -> u16 {
        match self {
            CompressionFormat::Stored => 10,
            CompressionFormat::Deflate => 20,
            CompressionFormat::Bzip2 => 46,
            CompressionFormat::Lzma => 63,
        }
    }

    /// File extension of the container, without the leading dot.
    pub fn extension(self) -> &'static str {
        "zip"
    }
}

impl fmt::Display for CompressionFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CompressionFormat {
    type Err = UnsupportedFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lookup(s)
    }
}

/// # Look Up Format (`lookup`)
///
/// Resolves a registry name to its `CompressionFormat`. Names are case-sensitive.
///
/// ## Errors
///
/// Returns `UnsupportedFormat` carrying the requested name if it is not registered.
pub fn lookup(name: &str) -> Result<CompressionFormat, UnsupportedFormat> {
    REGISTRY
        .iter()
        .find(|(registered, _)| *registered == name)
        .map(|(_, format)| *format)
        .ok_or_else(|| UnsupportedFormat(name.to_string()))
}

/// Registered names, in registry order.
pub fn names() -> impl Iterator<Item = &'static str> {
    REGISTRY.iter().map(|(name, _)| *name)
}

/// # Render Available Set (`available_set`)
///
/// Renders the registered names as a set literal, e.g.
/// `{'zipStored', 'zipDeflate', 'zipBzip2', 'zipLzma'}`. This is the form used in
/// the body of "bad output type" responses.
pub fn available_set() -> String {
    let quoted: Vec<String> = names().map(|name| format!("'{}'", name)).collect();
    format!("{{{}}}", quoted.join(", "))
}
