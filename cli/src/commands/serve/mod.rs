//! # zipconv Conversion Service
//!
//! File: cli/src/commands/serve/mod.rs
//!
//! ## Overview
//!
//! `zipconv serve` runs an HTTP service with a single endpoint:
//!
//! ```text
//! POST /convert/{type}     multipart/form-data, exactly one file part
//! ```
//!
//! The response is the uploaded file packed into a zip archive compressed with
//! the requested format (`zipStored`, `zipDeflate`, `zipBzip2`, `zipLzma`).
//!
//! ## Architecture
//!
//! - `config.rs`: argument parsing and `.zipconv.toml` merging
//! - `dispatch.rs`: request validation and conversion
//! - `server_logic.rs`: the Axum server, port fallback and shutdown handling
//!
//! ## Examples
//!
//! ```bash
//! zipconv serve --port 9000
//! curl -F "file=@report.pdf" http://localhost:9000/convert/zipDeflate -o report.pdf.zip
//! ```
//!
use crate::core::error::Result;
use tracing::info;

pub use config::ServeArgs;

/// Configuration loading and merging for the service.
pub mod config;

/// Request validation and conversion.
pub mod dispatch;

/// The Axum-based HTTP server.
pub mod server_logic;

/// # Handle Serve Command (`handle_serve`)
///
/// Entry point for `zipconv serve`: loads the effective configuration and runs
/// the server until shutdown.
pub async fn handle_serve(args: ServeArgs) -> Result<()> {
    info!("Handling serve command with args: {:?}", args);

    let config = config::load_and_merge_config(&args)?;
    info!("Effective server config: {:?}", config);

    server_logic::run_server(config).await?;

    Ok(())
}
