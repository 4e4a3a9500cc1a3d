//! Diagnostic engine for DRL documents
//!
//! Runs independent passes over a parsed document and collects their findings:
//!
//! | Pass | Group | Checks |
//! |------|-------|--------|
//! | `parse` | syntax | parse errors, one diagnostic each |
//! | `duplicates` | semantic | rule, function, global and query names are unique |
//! | `structure` | semantic | required parts of rules and functions, attribute names and values |
//! | `variables` | semantic | `$variables` used in actions are bound in conditions |
//! | `brackets` | syntax | bracket balance over the raw text, pattern nesting depth |
//! | `style` | style | hints |
//!
//! Passes run in that order and their output is concatenated, then truncated to
//! [`LintSettings::max_problems`]. A pass that panics contributes nothing; the others still run.

mod brackets;
pub mod config;
mod duplicates;
mod parse_errors;
mod structure;
mod style;
mod variables;

pub use config::LintSettings;

use drl_syntax::scanner::Source;
use drl_syntax::{ParseError, ParseOptions, ParseOutput, ParseSeverity, Range, SyntaxTree};

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Error,
    Warning,
    Information,
    Hint,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Information => "info",
            Severity::Hint => "hint",
        }
    }
}

/// The pass that produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pass {
    ParseErrors,
    Duplicates,
    Structure,
    Variables,
    Brackets,
    Style,
}

impl Pass {
    /// Every pass, in execution order.
    pub const ALL: [Pass; 6] = [
        Pass::ParseErrors,
        Pass::Duplicates,
        Pass::Structure,
        Pass::Variables,
        Pass::Brackets,
        Pass::Style,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Pass::ParseErrors => "parse",
            Pass::Duplicates => "duplicates",
            Pass::Structure => "structure",
            Pass::Variables => "variables",
            Pass::Brackets => "brackets",
            Pass::Style => "style",
        }
    }

    /// Source tag attached to emitted diagnostics (`drl:duplicates`).
    pub fn tag(self) -> String {
        format!("drl:{}", self.name())
    }

    fn enabled(self, settings: &LintSettings) -> bool {
        match self {
            Pass::ParseErrors | Pass::Brackets => settings.enable_syntax_checks,
            Pass::Duplicates | Pass::Structure | Pass::Variables => settings.enable_semantic_checks,
            Pass::Style => settings.enable_style_warnings,
        }
    }

    fn runner(self) -> fn(&LintContext<'_>) -> Vec<Diagnostic> {
        match self {
            Pass::ParseErrors => parse_errors::check,
            Pass::Duplicates => duplicates::check,
            Pass::Structure => structure::check,
            Pass::Variables => variables::check,
            Pass::Brackets => brackets::check,
            Pass::Style => style::check,
        }
    }
}

/// A positioned finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub range: Range,
    pub message: String,
    pub source: Pass,
}

impl Diagnostic {
    pub fn new(source: Pass, severity: Severity, range: Range, message: impl Into<String>) -> Self {
        Self {
            severity,
            range,
            message: message.into(),
            source,
        }
    }

    /// A parse error as a diagnostic of the `parse` pass, severity preserved.
    pub fn from_parse_error(error: &ParseError) -> Self {
        let severity = match error.severity {
            ParseSeverity::Error => Severity::Error,
            ParseSeverity::Warning => Severity::Warning,
        };
        Self::new(Pass::ParseErrors, severity, error.range, error.message.clone())
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Everything a pass may look at.
pub(crate) struct LintContext<'a> {
    pub text: &'a str,
    pub tree: &'a SyntaxTree,
    pub errors: &'a [ParseError],
    pub settings: &'a LintSettings,
}

/// Run every enabled pass.
///
/// ## Parameters
/// - `text`: the document the tree was parsed from.
/// - `tree`, `errors`: the parser's output for `text`.
///
/// ## Returns
/// - Diagnostics in pass order, at most `settings.max_problems` of them.
#[tracing::instrument(skip_all, fields(rules = tree.rules.len(), parse_errors = errors.len()))]
pub fn compute_diagnostics(
    text: &str,
    tree: &SyntaxTree,
    errors: &[ParseError],
    settings: &LintSettings,
) -> Vec<Diagnostic> {
    let context = LintContext {
        text,
        tree,
        errors,
        settings,
    };

    let mut diagnostics = Vec::new();
    for pass in Pass::ALL.into_iter().filter(|p| p.enabled(settings)) {
        let run = pass.runner();
        match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| run(&context))) {
            Ok(found) => {
                tracing::trace!(pass = pass.name(), count = found.len(), "lint pass finished");
                diagnostics.extend(found);
            }
            Err(payload) => {
                let detail = drl_syntax::parser::panic_detail(payload.as_ref());
                tracing::error!(pass = pass.name(), %detail, "lint pass failed; skipping it");
            }
        }
    }

    if diagnostics.len() > settings.max_problems {
        tracing::debug!(
            total = diagnostics.len(),
            kept = settings.max_problems,
            "truncating diagnostics"
        );
        diagnostics.truncate(settings.max_problems);
    }
    diagnostics
}

/// Parse `text` and lint the result.
pub fn lint_source(text: &str, settings: &LintSettings) -> (ParseOutput, Vec<Diagnostic>) {
    let options = ParseOptions::new().with_max_nesting_depth(settings.max_nesting_depth);
    let output = drl_syntax::parse_with_options(text, &options);
    let diagnostics = compute_diagnostics(text, &output.tree, &output.errors, settings);
    (output, diagnostics)
}

/// `true` if `word` occurs in `text` as a whole identifier, outside strings and comments.
pub(crate) fn mentions(text: &str, word: &str) -> bool {
    if word.is_empty() {
        return false;
    }
    let source = Source::new(text);
    (0..source.line_count()).any(|line| {
        let code = source.code_line(line);
        code.match_indices(word).any(|(at, _)| {
            let before = code[..at].chars().next_back();
            let after = code[at + word.len()..].chars().next();
            !before.is_some_and(is_ident_char)
                && !after.is_some_and(is_ident_char)
                && !inside_string(code, at)
        })
    })
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// `true` if byte `at` of `code` sits inside a string literal.
fn inside_string(code: &str, at: usize) -> bool {
    let mut i = 0;
    let bytes = code.as_bytes();
    while i < at && i < bytes.len() {
        if bytes[i] == b'"' || bytes[i] == b'\'' {
            match drl_syntax::scanner::string_end(code, i) {
                Some(end) if end <= at => i = end,
                _ => return true,
            }
        } else {
            i += 1;
        }
    }
    false
}
