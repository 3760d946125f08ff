//! # zipconv Archive Compressor (`common::archive::compressor`)
//!
//! File: cli/src/common/archive/compressor.rs
//!
//! ## Overview
//!
//! `ArchiveCompressor` builds a zip archive entirely in memory over a single
//! `CompressionFormat`. It exposes a strict linear lifecycle:
//!
//! ```text
//! Uninitialized --create_archive--> Open --get_archive_bytes--> Finalized
//! ```
//!
//! - `create_archive` allocates a fresh, empty zip container.
//! - `put` compresses one named entry and appends it while the archive is `Open`.
//!   Names are not de-duplicated: putting the same name twice yields two entries.
//!   An entry is fully encoded before it is appended, so a failed `put` leaves
//!   the archive exactly as it was.
//! - `get_archive_bytes` writes the central directory, hands back the buffer and
//!   leaves the compressor `Finalized`. Buffer and container are released at that
//!   point; any further `put` or `get_archive_bytes` is rejected.
//!
//! There are no backward transitions. A compressor is owned by exactly one
//! conversion and is simply dropped if that conversion is abandoned.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::archive::{ArchiveCompressor, CompressionFormat};
//!
//! let mut compressor = ArchiveCompressor::new(CompressionFormat::Deflate);
//! compressor.create_archive()?;
//! compressor.put("notes.txt", b"hello")?;
//! let zip_bytes = compressor.get_archive_bytes()?;
//! let name = compressor.add_extension("notes.txt"); // "notes.txt.zip"
//! ```
//!
use super::container::ZipContainer;
use super::encode;
use super::format::CompressionFormat;
use std::fmt;
use thiserror::Error;
use tracing::{debug, trace};

/// Observable lifecycle stage of an `ArchiveCompressor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Uninitialized,
    Open,
    Finalized,
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Lifecycle::Uninitialized => "uninitialized",
            Lifecycle::Open => "open",
            Lifecycle::Finalized => "finalized",
        };
        f.write_str(label)
    }
}

/// Errors raised by `ArchiveCompressor`.
///
/// `AlreadyInitialized` and `InvalidState` signal misuse of the lifecycle by the
/// caller; `LimitExceeded` and `Io` come from encoding or laying out an entry.
#[derive(Error, Debug)]
pub enum CompressorError {
    #[error("archive has already been created")]
    AlreadyInitialized,

    #[error("cannot {operation} while the compressor is {state}")]
    InvalidState {
        operation: &'static str,
        state: Lifecycle,
    },

    #[error("zip limit exceeded: {0}")]
    LimitExceeded(&'static str),

    #[error("failed to compress entry data: {0}")]
    Io(#[from] std::io::Error),
}

/// Internal state; the container (and the buffer it owns) only exists while `Open`.
enum State {
    Uninitialized,
    Open(ZipContainer),
    Finalized,
}

/// # Archive Compressor (`ArchiveCompressor`)
///
/// Stateful in-memory zip builder bound to one `CompressionFormat`. Create one per
/// conversion with `ArchiveCompressor::new`.
pub struct ArchiveCompressor {
    format: CompressionFormat,
    state: State,
}

impl ArchiveCompressor {
    /// Creates an `Uninitialized` compressor for `format`.
    pub fn new(format: CompressionFormat) -> Self {
        Self {
            format,
            state: State::Uninitialized,
        }
    }

    /// The compression format every entry is written with.
    pub fn format(&self) -> CompressionFormat {
        self.format
    }

    /// Current lifecycle stage.
    pub fn state(&self) -> Lifecycle {
        match self.state {
            State::Uninitialized => Lifecycle::Uninitialized,
            State::Open(_) => Lifecycle::Open,
            State::Finalized => Lifecycle::Finalized,
        }
    }

    /// # Create Archive (`create_archive`)
    ///
    /// Allocates an empty zip container.
    ///
    /// ## Errors
    ///
    /// Returns `AlreadyInitialized` if the archive was already created, whether it
    /// is still open or already finalized.
    pub fn create_archive(&mut self) -> Result<(), CompressorError> {
        if !matches!(self.state, State::Uninitialized) {
            return Err(CompressorError::AlreadyInitialized);
        }
        self.state = State::Open(ZipContainer::new());
        debug!("Opened {} archive", self.format);
        Ok(())
    }

    /// # Put Entry (`put`)
    ///
    /// Writes one entry named `entry_name` holding `content`, compressed with the
    /// compressor's format. Entries keep the order in which they are put, and a
    /// name already present is written again as a separate entry.
    ///
    /// ## Errors
    ///
    /// - `InvalidState` unless the archive is `Open`.
    /// - `Io` if the compressor fails.
    /// - `LimitExceeded` if the entry does not fit a zip without zip64 extensions.
    ///
    /// On error nothing is appended; the archive stays `Open` with its earlier
    /// entries intact.
    pub fn put(&mut self, entry_name: &str, content: &[u8]) -> Result<(), CompressorError> {
        let state = self.state();
        let State::Open(container) = &mut self.state else {
            return Err(CompressorError::InvalidState {
                operation: "put an entry",
                state,
            });
        };

        let encoded = encode::encode(self.format, content)?;
        let compressed_len = encoded.data.len();
        container.append(entry_name, encoded)?;

        trace!(
            "Wrote entry '{}' ({} -> {} bytes) to {} archive",
            entry_name,
            content.len(),
            compressed_len,
            self.format
        );
        Ok(())
    }

    /// # Get Archive Bytes (`get_archive_bytes`)
    ///
    /// Finishes the archive (writing the central directory) and returns the
    /// complete zip bytes. The compressor is `Finalized` afterwards, even when
    /// finishing fails, since the container has been consumed.
    ///
    /// ## Errors
    ///
    /// - `InvalidState` unless the archive is `Open`.
    /// - `LimitExceeded` if the central directory cannot be addressed.
    pub fn get_archive_bytes(&mut self) -> Result<Vec<u8>, CompressorError> {
        match std::mem::replace(&mut self.state, State::Finalized) {
            State::Open(container) => {
                let entries = container.entry_count();
                let buffer = container.finish()?;
                debug!(
                    "Finalized {} archive: {} entries, {} bytes",
                    self.format,
                    entries,
                    buffer.len()
                );
                Ok(buffer)
            }
            previous => {
                self.state = previous;
                Err(CompressorError::InvalidState {
                    operation: "read archive bytes",
                    state: self.state(),
                })
            }
        }
    }

    /// Output file name for an archive built from `base_name` (`"report"` ->
    /// `"report.zip"`).
    pub fn add_extension(&self, base_name: &str) -> String {
        format!("{}.{}", base_name, self.format.extension())
    }
}

impl fmt::Debug for ArchiveCompressor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArchiveCompressor")
            .field("format", &self.format)
            .field("state", &self.state())
            .finish()
    }
}
