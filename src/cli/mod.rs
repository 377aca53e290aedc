//! CLI module for the trellis runner
//!
//! ## Commands
//!
//! - `run` - Run the built-in self-test suites, optionally discovered from a directory
//! - `humanize <value>` - Print an integer with a magnitude suffix
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

use crate::loader::DEFAULT_SUITE_PATTERN;
use crate::version::TRELLIS_VERSION;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }

    /// Render a diagnostic the way miette reports it, as a failure error.
    pub fn diagnostic<E>(error: E) -> Self
    where
        E: miette::Diagnostic + Send + Sync + 'static,
    {
        Self::failure(format!("{:?}", miette::Report::new(error)))
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Tag-driven test lifecycle runner
#[derive(Parser, Debug)]
#[command(name = "trellis")]
#[command(version = TRELLIS_VERSION)]
#[command(about = "Tag-driven test lifecycle runner", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the built-in self-test suites
    Run {
        /// Discover suite modules under this directory instead of running the built-in module
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,
        /// File-name pattern of suite modules (with --dir)
        #[arg(long, value_name = "GLOB", default_value = DEFAULT_SUITE_PATTERN)]
        pattern: String,
        /// Only search the top level of --dir
        #[arg(long, requires = "dir")]
        top_only: bool,
        /// Where trace lines go
        #[arg(long, value_enum, default_value_t = SinkKind::Stderr)]
        sink: SinkKind,
    },

    /// Print an integer with a magnitude suffix
    Humanize {
        /// Value to format
        #[arg(value_name = "VALUE", allow_negative_numbers = true)]
        value: i64,
        /// Format specifier: D (decimal) or B (binary)
        #[arg(short, long, value_name = "SPEC")]
        format: Option<String>,
    },
}

/// Destination of trace lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SinkKind {
    /// Plain lines on standard error
    Stderr,
    /// `info` events under the `trellis::trace` target
    Log,
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
pub fn execute(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Command::Run {
            dir,
            pattern,
            top_only,
            sink,
        } => commands::run_selftests(&commands::RunOptions {
            dir,
            pattern,
            top_only,
            sink,
        }),
        Command::Humanize { value, format } => commands::humanize_value(value, format.as_deref()),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_run_defaults() {
        let cli = Cli::try_parse_from(["trellis", "run"]).unwrap();
        if let Command::Run {
            dir,
            pattern,
            top_only,
            sink,
        } = cli.command
        {
            assert!(dir.is_none());
            assert_eq!(pattern, "*.suite");
            assert!(!top_only);
            assert_eq!(sink, SinkKind::Stderr);
        } else {
            panic!("Expected Run command");
        }
    }

    #[test]
    fn test_cli_parse_run_with_dir() {
        let cli = Cli::try_parse_from([
            "trellis", "run", "--dir", "suites", "--pattern", "*.mod", "--top-only", "--sink", "log",
        ])
        .unwrap();
        if let Command::Run {
            dir,
            pattern,
            top_only,
            sink,
        } = cli.command
        {
            assert_eq!(dir, Some(PathBuf::from("suites")));
            assert_eq!(pattern, "*.mod");
            assert!(top_only);
            assert_eq!(sink, SinkKind::Log);
        } else {
            panic!("Expected Run command");
        }
    }

    #[test]
    fn test_cli_parse_top_only_requires_dir() {
        assert!(Cli::try_parse_from(["trellis", "run", "--top-only"]).is_err());
    }

    #[test]
    fn test_cli_parse_humanize() {
        let cli = Cli::try_parse_from(["trellis", "humanize", "1024", "-f", "D"]).unwrap();
        if let Command::Humanize { value, format } = cli.command {
            assert_eq!(value, 1024);
            assert_eq!(format.as_deref(), Some("D"));
        } else {
            panic!("Expected Humanize command");
        }
    }

    #[test]
    fn test_cli_parse_humanize_negative() {
        let cli = Cli::try_parse_from(["trellis", "humanize", "-5"]).unwrap();
        assert!(matches!(cli.command, Command::Humanize { value: -5, format: None }));
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["trellis"]).is_err());
    }

    #[test]
    fn test_execute_humanize() {
        let cli = Cli::try_parse_from(["trellis", "humanize", "2048"]).unwrap();
        assert_eq!(execute(cli).unwrap(), ExitCode::SUCCESS);
    }
}
