//! CLI module for the DRL linter
//!
//! ## Commands
//!
//! - `check <file>` - Lint a rule file and report diagnostics
//! - `parse <file>` - Dump the syntax tree (debug)
//! - `<file>` - Same as `check <file>` with default settings
//!
//! ## Modules
//!
//! - `commands` - Command implementations
//! - `render` - Human-readable diagnostic output
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
pub mod render;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

use crate::lint::LintSettings;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
    pub const USAGE: ExitCode = ExitCode(2);
}

/// Error type for CLI operations.
///
/// The CLI entry point prints the message and exits with [`CliError::exit_code`].
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Cannot access file '{path}': {source}")]
    Access { path: String, source: std::io::Error },

    #[error("Source file '{path}' is too large ({size} bytes, max {max} bytes)")]
    TooLarge { path: String, size: u64, max: u64 },

    #[error("Error reading file '{path}': {source}")]
    Read { path: String, source: std::io::Error },

    #[error("Cannot serialize diagnostics: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Usage(String),
}

impl CliError {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            CliError::Usage(_) => ExitCode::USAGE,
            CliError::Access { .. } | CliError::TooLarge { .. } | CliError::Read { .. } | CliError::Json(_) => {
                ExitCode::FAILURE
            }
        }
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Lint and inspect Drools rule files
#[derive(Parser, Debug)]
#[command(name = "drl")]
#[command(version = VERSION)]
#[command(about = "Lint and inspect Drools rule files", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// File to check (default action when no subcommand given)
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Lint a rule file
    Check {
        /// Rule file to check
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Stop reporting after N problems
        #[arg(long, value_name = "N")]
        max_problems: Option<usize>,
        /// Skip parse-error and bracket checks
        #[arg(long)]
        no_syntax: bool,
        /// Skip duplicate, structure and variable checks
        #[arg(long)]
        no_semantic: bool,
        /// Skip style hints
        #[arg(long)]
        no_style: bool,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
        format: OutputFormat,
    },

    /// Print the syntax tree of a rule file (debug)
    Parse {
        /// Rule file to parse
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

/// How `check` prints its findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Source snippets with labels
    Human,
    /// One `path:line:col` line per diagnostic
    Short,
    /// LSP diagnostics as a JSON array
    Json,
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
            eprintln!("{e}");
            process::exit(e.exit_code().0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Some(Command::Check {
            file,
            max_problems,
            no_syntax,
            no_semantic,
            no_style,
            format,
        }) => {
            let mut settings = LintSettings::new()
                .with_syntax_checks(!no_syntax)
                .with_semantic_checks(!no_semantic)
                .with_style_warnings(!no_style);
            if let Some(max) = max_problems {
                settings = settings.with_max_problems(max);
            }
            commands::check_file(&file.to_string_lossy(), &settings, format)
        }
        Some(Command::Parse { file }) => commands::parse_file(&file.to_string_lossy()),
        None => match cli.file {
            Some(file) => commands::check_file(&file.to_string_lossy(), &LintSettings::default(), OutputFormat::Human),
            None => Err(CliError::Usage(
                "No input file; run `drl --help` for usage".to_string(),
            )),
        },
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
    fn test_cli_parse_check_flags() {
        let cli = Cli::try_parse_from([
            "drl",
            "check",
            "rules.drl",
            "--max-problems",
            "5",
            "--no-style",
            "--format",
            "json",
        ])
        .unwrap();
        if let Some(Command::Check {
            max_problems,
            no_style,
            no_syntax,
            format,
            ..
        }) = cli.command
        {
            assert_eq!(max_problems, Some(5));
            assert!(no_style);
            assert!(!no_syntax);
            assert_eq!(format, OutputFormat::Json);
        } else {
            panic!("Expected Check command");
        }
    }

    #[test]
    fn test_cli_parse_bare_file() {
        let cli = Cli::try_parse_from(["drl", "rules.drl"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.file, Some(PathBuf::from("rules.drl")));
    }

    #[test]
    fn test_cli_parse_parse_command() {
        let cli = Cli::try_parse_from(["drl", "parse", "rules.drl"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Parse { .. })));
    }

    #[test]
    fn test_cli_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["drl", "check", "r.drl", "--format", "xml"]).is_err());
    }

    #[test]
    fn test_missing_file_is_usage_error() {
        let cli = Cli::try_parse_from(["drl"]).unwrap();
        let err = execute(cli).unwrap_err();
        assert_eq!(err.exit_code(), ExitCode::USAGE);
    }

    #[test]
    fn test_unreadable_file_is_failure() {
        let cli = Cli::try_parse_from(["drl", "check", "/nonexistent/dir/rules.drl"]).unwrap();
        let err = execute(cli).unwrap_err();
        assert!(matches!(err, CliError::Access { .. }));
        assert_eq!(err.exit_code(), ExitCode::FAILURE);
    }
}
