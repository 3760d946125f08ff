//! # zipconv CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//!
//! ## Overview
//!
//! Shared helpers for the integration tests in `cli/tests/`. Each test file is
//! compiled as its own crate and runs the compiled `zipconv` binary.
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;

/// # Get zipconv Command (`zipconv_cmd`)
///
/// Creates an `assert_cmd::Command` for the `zipconv` binary built for this test
/// run.
///
/// ## Panics
/// Panics if the binary cannot be found via `Command::cargo_bin`.
pub fn zipconv_cmd() -> Command {
    Command::cargo_bin("zipconv").expect("Failed to find zipconv binary for testing")
}
