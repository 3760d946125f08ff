//! # zipconv Pack Command
//!
//! File: cli/src/commands/pack.rs
//!
//! ## Overview
//!
//! `zipconv pack <file>` performs the same conversion as the HTTP service on a
//! local file: the file becomes the single entry of a zip archive compressed with
//! the chosen format. The archive is written next to the input as
//! `<file name>.zip` unless `--output` is given.
//!
//! ## Examples
//!
//! ```bash
//! zipconv pack notes.txt                     # notes.txt.zip, deflate
//! zipconv pack data.bin -f zipLzma -o out.zip
//! ```
//!
use crate::common::archive::{self, ArchiveCompressor, CompressionFormat};
use crate::core::error::{Result, ZipconvError};
use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Arguments for `zipconv pack`.
#[derive(Parser, Debug)]
pub struct PackArgs {
    /// File to archive.
    pub file: PathBuf,

    /// Output format (see `zipconv formats`).
    #[arg(long, short, default_value = "zipDeflate")]
    pub format: String,

    /// Destination path. Defaults to `<file>.zip` in the input's directory.
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

/// # Handle Pack Command (`handle_pack`)
///
/// Reads the input file, archives it and writes the archive to disk.
///
/// ## Errors
///
/// Returns an error if the format is unknown, the input cannot be read, or the
/// archive cannot be built or written.
pub async fn handle_pack(args: PackArgs) -> Result<()> {
    info!("Handling pack command with args: {:?}", args);

    let format: CompressionFormat =
        args.format
            .parse()
            .map_err(|_| ZipconvError::UnknownFormat {
                name: args.format.clone(),
                available: archive::format::available_set(),
            })?;

    let entry_name = args
        .file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| {
            ZipconvError::FileSystem(format!("'{}' does not name a file", args.file.display()))
        })?;

    let content = tokio::fs::read(&args.file)
        .await
        .with_context(|| format!("Failed to read input file: {}", args.file.display()))?;

    let (archive_name, archive_bytes) =
        tokio::task::spawn_blocking(move || pack_bytes(format, &entry_name, &content))
            .await
            .context("Archive task failed")??;

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output(&args.file, &archive_name));
    debug!("Writing {} bytes to {}", archive_bytes.len(), output.display());

    tokio::fs::write(&output, &archive_bytes)
        .await
        .with_context(|| format!("Failed to write archive: {}", output.display()))?;

    println!(
        "Created {} ({}, {} bytes)",
        output.display(),
        format,
        archive_bytes.len()
    );
    Ok(())
}

/// Builds a single-entry archive, returning the archive file name and bytes.
fn pack_bytes(
    format: CompressionFormat,
    entry_name: &str,
    content: &[u8],
) -> Result<(String, Vec<u8>)> {
    let mut compressor = ArchiveCompressor::new(format);
    compressor.create_archive()?;
    compressor.put(entry_name, content)?;
    let bytes = compressor.get_archive_bytes()?;
    Ok((compressor.add_extension(entry_name), bytes))
}

fn default_output(input: &Path, archive_name: &str) -> PathBuf {
    input
        .parent()
        .map(|dir| dir.join(archive_name))
        .unwrap_or_else(|| PathBuf::from(archive_name))
}
