//! # zipconv Command Modules
//!
//! File: cli/src/commands/mod.rs
//!
//! ## Overview
//!
//! Aggregates the top-level commands of the zipconv CLI so `main.rs` can route
//! to them.
//!
//! ## Commands
//!
//! - `serve`: the HTTP conversion service
//! - `pack`: archive a local file
//! - `formats`: list the available output formats
//!

/// Lists the registered output formats.
pub mod formats;
/// Archives a local file with a chosen format.
pub mod pack;
/// The HTTP conversion service. Includes configuration, dispatch and server logic.
pub mod serve;
