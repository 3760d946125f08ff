//! # zipconv Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//!
//! ## Overview
//!
//! Foundational pieces shared by every command. Currently this is the error
//! system:
//! - `error`: the request error taxonomy (`ConvertError`), application errors
//!   (`ZipconvError`) and the `Result` alias.
//!
//! ## Usage
//!
//! ```rust
//! use crate::core::error::{ConvertError, Result};
//! ```
//!
pub mod error;
