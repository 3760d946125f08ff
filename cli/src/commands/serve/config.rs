//! # zipconv Server Configuration
//!
//! File: cli/src/commands/serve/config.rs
//!
//! ## Overview
//!
//! Configuration loading and merging for `zipconv serve`. Settings come from:
//! 1. Command-line arguments (highest priority, when they differ from defaults)
//! 2. A `.zipconv.toml` file in the working directory, or the file given with
//!    `--config`
//! 3. Default values (lowest priority)
//!
//! ## Examples
//!
//! Configuration file format:
//!
//! ```toml
//! port = 9000
//! host = "0.0.0.0"
//! max_upload_mb = 256
//! trace_headers = false
//! ```
//!
use crate::core::error::{Result, ZipconvError};
use anyhow::Context;
use clap::Parser;
use serde::Deserialize;
use std::fs;
use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// The default name of the server configuration file.
const CONFIG_FILE_NAME: &str = ".zipconv.toml";

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_MAX_UPLOAD_MB: usize = 64;

/// # Serve Command Arguments (`ServeArgs`)
///
/// Command-line arguments accepted by `zipconv serve`. Values left at their
/// defaults may be overridden by the configuration file.
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Port the service listens on. If it is busy, the next free port is used.
    #[arg(long, short, default_value_t = DEFAULT_PORT, env = "ZIPCONV_PORT")]
    pub port: u16,

    /// Address to bind. `0.0.0.0` accepts connections on every interface.
    #[arg(long, default_value = "127.0.0.1")]
    pub host: IpAddr,

    /// Largest accepted request body, in MiB.
    #[arg(long, default_value_t = DEFAULT_MAX_UPLOAD_MB)]
    pub max_upload_mb: usize,

    /// Do not include request headers in the HTTP trace spans.
    #[arg(long)]
    pub no_trace_headers: bool,

    /// Explicit configuration file. Defaults to `.zipconv.toml` in the working
    /// directory, if present.
    #[arg(long, short)]
    pub config: Option<PathBuf>,
}

/// # Effective Server Configuration (`ServerConfig`)
///
/// The merged and validated settings used by the server logic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// The network port the server will try first.
    pub port: u16,

    /// The network IP address the server binds to.
    pub host: IpAddr,

    /// Request body limit in bytes.
    pub max_upload_bytes: usize,

    /// Whether request headers are recorded in trace spans.
    pub trace_headers: bool,
}

/// Raw contents of a configuration file; every field is optional.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    port: Option<u16>,
    host: Option<String>, // Parsed separately so a bad value only warns
    max_upload_mb: Option<usize>,
    trace_headers: Option<bool>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_MB * 1024 * 1024,
            trace_headers: true,
        }
    }
}

/// # Load and Merge Server Configuration (`load_and_merge_config`)
///
/// Produces the effective `ServerConfig` from defaults, the configuration file and
/// the command-line arguments.
///
/// ## Process:
/// 1. Locate the configuration file: `--config` if given (it must exist),
///    otherwise `.zipconv.toml` in the current directory (optional).
/// 2. Apply file values over the defaults.
/// 3. Apply every argument that differs from its clap default; `--no-trace-headers`
///    always wins when present.
/// 4. Validate the result.
///
/// ## Errors
///
/// Returns an error if an explicit `--config` file is missing, a configuration
/// file cannot be read or parsed, or the merged values are invalid.
pub fn load_and_merge_config(args: &ServeArgs) -> Result<ServerConfig> {
    let file_config = match &args.config {
        Some(path) => {
            if !path.is_file() {
                return Err(ZipconvError::Config(format!(
                    "configuration file not found: {}",
                    path.display()
                ))
                .into());
            }
            Some(load_config_file(path)?)
        }
        None => {
            let default_path = std::env::current_dir()
                .context("Failed to get current working directory")?
                .join(CONFIG_FILE_NAME);
            if default_path.is_file() {
                Some(load_config_file(&default_path)?)
            } else {
                debug!("No config file found at {}", default_path.display());
                None
            }
        }
    };

    let mut config = ServerConfig::default();
    if let Some(file_config) = file_config {
        config.apply_file(file_config)?;
    }
    config.apply_args(args);
    config.validate()?;
    Ok(config)
}

/// Reads and parses a configuration file.
fn load_config_file(path: &Path) -> Result<FileConfig> {
    info!("Loading configuration from {}", path.display());
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

impl ServerConfig {
    fn apply_file(&mut self, file: FileConfig) -> Result<()> {
        if let Some(port) = file.port {
            self.port = port;
        }
        if let Some(ref host) = file.host {
            match host.parse() {
                Ok(ip) => self.host = ip,
                Err(e) => warn!(
                    "Invalid host IP '{}' in config file ({}), using {}",
                    host, e, self.host
                ),
            }
        }
        if let Some(mb) = file.max_upload_mb {
            self.max_upload_bytes = megabytes(mb)?;
        }
        if let Some(trace_headers) = file.trace_headers {
            self.trace_headers = trace_headers;
        }
        Ok(())
    }

    fn apply_args(&mut self, args: &ServeArgs) {
        let defaults = ServeArgs::parse_from(["zipconv"]);

        if args.port != defaults.port {
            self.port = args.port;
        }
        if args.host != defaults.host {
            self.host = args.host;
        }
        if args.max_upload_mb != defaults.max_upload_mb {
            // Overflow is caught by `validate` through the saturated value.
            self.max_upload_bytes = args.max_upload_mb.saturating_mul(1024 * 1024);
        }
        if args.no_trace_headers {
            self.trace_headers = false;
        }
    }

    fn validate(&self) -> Result<()> {
        if self.max_upload_bytes == 0 {
            return Err(
                ZipconvError::Config("max_upload_mb must be greater than zero".into()).into(),
            );
        }
        if self.max_upload_bytes == usize::MAX {
            return Err(ZipconvError::Config("max_upload_mb is too large".into()).into());
        }
        Ok(())
    }
}

fn megabytes(mb: usize) -> Result<usize> {
    mb.checked_mul(1024 * 1024)
        .ok_or_else(|| ZipconvError::Config(format!("max_upload_mb {} is too large", mb)).into())
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn args_with_config(path: PathBuf) -> ServeArgs {
        ServeArgs {
            port: DEFAULT_PORT,
            host: Ipv4Addr::LOCALHOST.into(),
            max_upload_mb: DEFAULT_MAX_UPLOAD_MB,
            no_trace_headers: false,
            config: Some(path),
        }
    }

    #[test]
    fn test_server_config_default() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert_eq!(config.max_upload_bytes, 64 * 1024 * 1024);
        assert!(config.trace_headers);
    }

    #[test]
    fn test_file_values_apply_over_defaults() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join(CONFIG_FILE_NAME);
        fs::write(
            &path,
            r#"
            port = 9090
            host = "0.0.0.0"
            max_upload_mb = 2
            trace_headers = false
            "#,
        )?;

        let config = load_and_merge_config(&args_with_config(path))?;
        assert_eq!(config.port, 9090);
        assert_eq!(config.host.to_string(), "0.0.0.0");
        assert_eq!(config.max_upload_bytes, 2 * 1024 * 1024);
        assert!(!config.trace_headers);
        Ok(())
    }

    #[test]
    fn test_cli_overrides_file() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("custom.toml");
        fs::write(&path, "port = 9090\nmax_upload_mb = 2\n")?;

        let mut args = args_with_config(path);
        args.port = 7000;
        args.max_upload_mb = 8;
        args.no_trace_headers = true;

        let config = load_and_merge_config(&args)?;
        assert_eq!(config.port, 7000);
        assert_eq!(config.max_upload_bytes, 8 * 1024 * 1024);
        assert!(!config.trace_headers);
        // Not set anywhere: default.
        assert_eq!(config.host, IpAddr::V4(Ipv4Addr::LOCALHOST));
        Ok(())
    }

    #[test]
    fn test_invalid_host_in_file_keeps_default() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "host = \"not-an-ip\"\n")?;

        let config = load_and_merge_config(&args_with_config(path))?;
        assert_eq!(config.host, IpAddr::V4(Ipv4Addr::LOCALHOST));
        Ok(())
    }

    #[test]
    fn test_unknown_field_is_rejected() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "directory = \"public\"\n")?;

        assert!(load_and_merge_config(&args_with_config(path)).is_err());
        Ok(())
    }

    #[test]
    fn test_missing_explicit_config_file() {
        let args = args_with_config(PathBuf::from("/path/that/does/not/exist.toml"));
        let err = load_and_merge_config(&args).unwrap_err();
        assert!(err.to_string().contains("configuration file not found"));
    }

    #[test]
    fn test_zero_upload_limit_is_invalid() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "max_upload_mb = 0\n")?;

        let err = load_and_merge_config(&args_with_config(path)).unwrap_err();
        assert!(err.to_string().contains("greater than zero"));
        Ok(())
    }
}
