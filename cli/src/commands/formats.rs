//! # zipconv Formats Command
//!
//! File: cli/src/commands/formats.rs
//!
//! Lists the output formats accepted by `zipconv pack --format` and by the
//! `/convert/{type}` endpoint.
//!
use crate::common::archive::CompressionFormat;
use crate::core::error::Result;

/// Prints one registered format per line with its zip compression method.
pub async fn handle_formats() -> Result<()> {
    for format in CompressionFormat::ALL {
        println!(
            "{:<12} {:<8} (method {})",
            format.name(),
            format.method_label(),
            format.method()
        );
    }
    Ok(())
}
