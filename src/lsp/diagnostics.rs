//! Convert lint diagnostics to LSP diagnostics
//!
//! Syntax-tree columns count `char`s. LSP columns count UTF-16 code units (the protocol's default
//! position encoding), so every column is re-measured against the document text.

use drl_syntax::scanner::LineIndex;
use tower_lsp::lsp_types::{Diagnostic, DiagnosticSeverity, Position, Range};

use crate::lint::{self, Severity};

/// Convert a syntax-tree position in `text` (indexed by `index`).
pub fn to_lsp_position(index: &LineIndex, text: &str, position: drl_syntax::Position) -> Position {
    let line_start = index.line_start(position.line_index());
    let at = index.offset(text, position);
    let character = text.get(line_start..at).map_or(0, |prefix| prefix.encode_utf16().count());
    Position::new(position.line, u32::try_from(character).unwrap_or(u32::MAX))
}

pub fn to_lsp_range(index: &LineIndex, text: &str, range: drl_syntax::Range) -> Range {
    Range::new(
        to_lsp_position(index, text, range.start),
        to_lsp_position(index, text, range.end),
    )
}

fn to_lsp_severity(severity: Severity) -> DiagnosticSeverity {
    match severity {
        Severity::Error => DiagnosticSeverity::ERROR,
        Severity::Warning => DiagnosticSeverity::WARNING,
        Severity::Information => DiagnosticSeverity::INFORMATION,
        Severity::Hint => DiagnosticSeverity::HINT,
    }
}

/// Convert a lint diagnostic. `source` carries the pass tag, e.g. `drl:variables`.
pub fn to_lsp_diagnostic(index: &LineIndex, text: &str, diagnostic: &lint::Diagnostic) -> Diagnostic {
    Diagnostic {
        range: to_lsp_range(index, text, diagnostic.range),
        severity: Some(to_lsp_severity(diagnostic.severity)),
        code: None,
        code_description: None,
        source: Some(diagnostic.source.tag()),
        message: diagnostic.message.clone(),
        related_information: None,
        tags: None,
        data: None,
    }
}

/// Convert every diagnostic of the document `text`.
pub fn to_lsp_diagnostics(text: &str, diagnostics: &[lint::Diagnostic]) -> Vec<Diagnostic> {
    let index = LineIndex::new(text);
    diagnostics
        .iter()
        .map(|diagnostic| to_lsp_diagnostic(&index, text, diagnostic))
        .collect()
}
