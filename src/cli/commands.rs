//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::fs;

use crate::lint::{self, Diagnostic, LintSettings};
use crate::lsp;

use super::{CliError, CliResult, ExitCode, OutputFormat, render};

/// Maximum source file size (100 MB). Larger files are rejected before reading.
const MAX_SOURCE_SIZE: u64 = 100 * 1024 * 1024;

/// Read a source file, refusing anything over `MAX_SOURCE_SIZE`.
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be accessed (doesn't exist, permission denied)
/// - The file exceeds `MAX_SOURCE_SIZE` (100 MB)
/// - The file is not valid UTF-8
pub fn read_source(file_path: &str) -> CliResult<String> {
    let metadata = fs::metadata(file_path).map_err(|source| CliError::Access {
        path: file_path.to_string(),
        source,
    })?;

    if metadata.len() > MAX_SOURCE_SIZE {
        return Err(CliError::TooLarge {
            path: file_path.to_string(),
            size: metadata.len(),
            max: MAX_SOURCE_SIZE,
        });
    }

    fs::read_to_string(file_path).map_err(|source| CliError::Read {
        path: file_path.to_string(),
        source,
    })
}

/// Output of a check, ready to print.
#[derive(Debug)]
pub struct CheckReport {
    pub output: String,
    pub diagnostics: Vec<Diagnostic>,
}

impl CheckReport {
    /// Failure when any diagnostic is an error.
    pub fn exit_code(&self) -> ExitCode {
        if self.diagnostics.iter().any(Diagnostic::is_error) {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        }
    }
}

/// Lint `source` (read from `file_path`) and format the findings.
pub fn check_source(
    file_path: &str,
    source: &str,
    settings: &LintSettings,
    format: OutputFormat,
) -> CliResult<CheckReport> {
    let (_, diagnostics) = lint::lint_source(source, settings);
    tracing::debug!(file = file_path, count = diagnostics.len(), "checked file");

    let output = match format {
        OutputFormat::Json => serde_json::to_string_pretty(&lsp::to_lsp_diagnostics(source, &diagnostics))?,
        OutputFormat::Human => {
            let mut out = String::new();
            for diagnostic in &diagnostics {
                out.push_str(&format!("{:?}\n", render::report(file_path, source, diagnostic)));
            }
            out.push_str(&format!("{}: {}", file_path, render::summary(&diagnostics)));
            out
        }
        OutputFormat::Short => {
            let mut out = render::listing(file_path, &diagnostics);
            out.push_str(&format!("{}: {}", file_path, render::summary(&diagnostics)));
            out
        }
    };
    Ok(CheckReport { output, diagnostics })
}

/// Lint a file and print the findings.
pub fn check_file(file_path: &str, settings: &LintSettings, format: OutputFormat) -> CliResult<ExitCode> {
    let source = read_source(file_path)?;
    let report = check_source(file_path, &source, settings, format)?;
    println!("{}", report.output);
    Ok(report.exit_code())
}

/// Parse a file and print its syntax tree, followed by any parse errors.
pub fn parse_file(file_path: &str) -> CliResult<ExitCode> {
    let source = read_source(file_path)?;
    let output = drl_syntax::parse(&source);
    println!("{:#?}", output.tree);

    for error in &output.errors {
        let diagnostic = Diagnostic::from_parse_error(error);
        eprintln!("{:?}", render::report(file_path, &source, &diagnostic));
    }
    Ok(if output.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
