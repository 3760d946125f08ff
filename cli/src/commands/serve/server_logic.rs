//! # zipconv HTTP Server Implementation
//!
//! File: cli/src/commands/serve/server_logic.rs
//!
//! ## Overview
//!
//! Runs the conversion service for `zipconv serve`:
//! - Port availability checking with automatic fallback
//! - Request body limit from the configuration
//! - HTTP request tracing
//! - Graceful shutdown on Ctrl+C / SIGTERM
//!
//! All routing decisions (method, path, format) live in the dispatcher, so the
//! router sends every request to `dispatch::handle_request`.
//!
//! ## Architecture
//!
//! 1. Find an available port, starting from the configured one
//! 2. Build the Axum router (`create_app`)
//! 3. Serve until a shutdown signal arrives
//!
use super::config::ServerConfig;
use super::dispatch;
use crate::common::archive::format;
use crate::core::error::Result;
use anyhow::Context;
use axum::extract::DefaultBodyLimit;
use axum::Router;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::{error, info, warn, Level};

/// # Run HTTP Server (`run_server`)
///
/// Binds the service and serves requests until shutdown.
///
/// ## Errors
///
/// Returns an error if no port is available, the listener cannot be bound, or
/// the server fails while running.
pub async fn run_server(config: ServerConfig) -> Result<()> {
    let max_port_attempts = 10;
    let addr = find_available_port(config.host, config.port, max_port_attempts).await?;

    let app = create_app(&config);

    println!("\n=================================================================");
    println!("🗜️  zipconv listening on http://{}", addr);
    println!("📮 Endpoint:          POST /convert/{{type}}");
    println!(
        "📦 Formats:           {}",
        format::names().collect::<Vec<_>>().join(", ")
    );
    println!(
        "📏 Upload limit:      {} MiB",
        config.max_upload_bytes / (1024 * 1024)
    );
    println!("=================================================================\n");

    info!("Starting conversion service on {}", addr);
    println!("Server starting! Press Ctrl+C to stop.");

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind TCP listener to address {}", addr))?;

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    println!("\nServer shutdown complete.");
    Ok(())
}

/// Resolves when Ctrl+C (or SIGTERM on Unix) is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
        info!("Received Ctrl+C, initiating graceful shutdown...");
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
                info!("Received SIGTERM, initiating graceful shutdown...");
            }
            Err(e) => {
                error!(
                    "Failed to install SIGTERM handler: {}. Shutdown on SIGTERM might not work.",
                    e
                );
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// # Find Available Port (`find_available_port`)
///
/// Tries `start_port` and up to `max_attempts - 1` following ports, returning the
/// first address that can be bound.
///
/// ## Errors
///
/// Returns an error if every attempted port is unavailable.
async fn find_available_port(
    req_host: std::net::IpAddr,
    start_port: u16,
    max_attempts: u8,
) -> Result<SocketAddr> {
    let mut current_port = start_port;

    for attempt in 0..max_attempts {
        let addr = SocketAddr::new(req_host, current_port);

        match TcpListener::bind(addr).await {
            Ok(listener) => {
                drop(listener);
                if attempt > 0 {
                    info!(
                        "Port {} was unavailable, successfully bound to available port {}.",
                        start_port, current_port
                    );
                }
                return Ok(addr);
            }
            Err(e) => {
                warn!(
                    "Attempt {}: Port {} on host {} is unavailable (Error: {}). Trying next port...",
                    attempt + 1,
                    current_port,
                    req_host,
                    e
                );
                current_port = match current_port.checked_add(1) {
                    Some(next) => next,
                    None => break,
                };
            }
        }
    }

    anyhow::bail!(
        "Could not find an available port on host {} starting from port {} after trying {} ports.",
        req_host,
        start_port,
        max_attempts
    )
}

/// # Create Axum Application (`create_app`)
///
/// Builds the router: every request goes to the dispatcher, with the configured
/// body limit and HTTP tracing applied.
pub fn create_app(config: &ServerConfig) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::default().include_headers(config.trace_headers))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .fallback(dispatch::handle_request)
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(ServiceBuilder::new().layer(trace_layer))
}

// --- Unit Tests ---
