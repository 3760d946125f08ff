//! # zipconv Main Entry Point
//!
//! File: cli/src/main.rs
//!
//! ## Overview
//!
//! Entry point of the zipconv CLI. It handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Routing execution to the command handlers
//!
//! ## Examples
//!
//! ```bash
//! # Run the conversion service
//! zipconv -v serve --port 8080
//!
//! # Archive a local file
//! zipconv pack report.pdf --format zipBzip2
//!
//! # List output formats
//! zipconv formats
//! ```
//!
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod commands; // Command handlers (serve, pack, formats)
mod common; // Archive and multipart building blocks
mod core; // Errors

/// Top-level command-line arguments.
#[derive(Parser, Debug)]
#[command(
    name = "zipconv",
    about = "🗜️ zipconv: repackage a single file as a zip archive",
    long_about = "Converts uploaded or local files into zip archives using a selectable\n\
                  compression method (stored, deflate, bzip2, lzma).",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

/// All available top-level commands.
#[derive(Parser, Debug)]
enum Commands {
    /// Run the HTTP conversion service.
    #[command(alias = "s")]
    Serve(commands::serve::ServeArgs),
    /// Archive a local file.
    #[command(alias = "p")]
    Pack(commands::pack::PackArgs),
    /// List the available output formats.
    Formats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    let command_result = match cli.command {
        Commands::Serve(args) => commands::serve::handle_serve(args).await,
        Commands::Pack(args) => commands::pack::handle_pack(args).await,
        Commands::Formats => commands::formats::handle_formats().await,
    };

    if let Err(e) = command_result {
        tracing::error!("Command execution failed: {:?}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_pack_with_alias() {
        let cli = Cli::parse_from(["zipconv", "-vv", "p", "notes.txt", "-f", "zipLzma"]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Pack(args) => {
                assert_eq!(args.file, std::path::PathBuf::from("notes.txt"));
                assert_eq!(args.format, "zipLzma");
                assert!(args.output.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
