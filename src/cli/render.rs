//! Human-readable output for diagnostics
//!
//! `report` builds a `miette` graphical report with the offending source line; `listing` is the
//! plain one-line-per-diagnostic form behind `--format short`.

use drl_syntax::scanner::LineIndex;
use miette::{LabeledSpan, MietteDiagnostic, NamedSource, Report};

use crate::lint::{Diagnostic, Severity};

fn miette_severity(severity: Severity) -> miette::Severity {
    match severity {
        Severity::Error => miette::Severity::Error,
        Severity::Warning => miette::Severity::Warning,
        Severity::Information | Severity::Hint => miette::Severity::Advice,
    }
}

/// Byte span of `diagnostic` in `text`, at least one character wide when the text allows it.
fn byte_span(index: &LineIndex, text: &str, diagnostic: &Diagnostic) -> std::ops::Range<usize> {
    let start = index.offset(text, diagnostic.range.start).min(text.len());
    let mut end = index.offset(text, diagnostic.range.end).min(text.len()).max(start);
    if end == start {
        end = text[start..].chars().next().map_or(start, |c| start + c.len_utf8());
    }
    start..end
}

/// A graphical report for one diagnostic. Print it with `{:?}`.
pub fn report(path: &str, text: &str, diagnostic: &Diagnostic) -> Report {
    let index = LineIndex::new(text);
    let span = byte_span(&index, text, diagnostic);
    let label = diagnostic.severity.as_str();

    let inner = MietteDiagnostic::new(diagnostic.message.clone())
        .with_severity(miette_severity(diagnostic.severity))
        .with_code(diagnostic.source.tag())
        .with_label(LabeledSpan::at(span, label));
    Report::new(inner).with_source_code(NamedSource::new(path, text.to_string()))
}

/// `path:line:col: severity [drl:pass] message`, one line each, 1-based positions.
pub fn listing(path: &str, diagnostics: &[Diagnostic]) -> String {
    let mut out = String::new();
    for d in diagnostics {
        out.push_str(&format!(
            "{}:{}:{}: {} [{}] {}\n",
            path,
            d.range.start.line + 1,
            d.range.start.character + 1,
            d.severity.as_str(),
            d.source.tag(),
            d.message
        ));
    }
    out
}

/// `2 errors, 1 warning, 0 hints`
pub fn summary(diagnostics: &[Diagnostic]) -> String {
    let count = |wanted: &[Severity]| diagnostics.iter().filter(|d| wanted.contains(&d.severity)).count();
    let plural = |n: usize, word: &str| if n == 1 { format!("{n} {word}") } else { format!("{n} {word}s") };
    format!(
        "{}, {}, {}",
        plural(count(&[Severity::Error]), "error"),
        plural(count(&[Severity::Warning]), "warning"),
        plural(count(&[Severity::Information, Severity::Hint]), "hint")
    )
}
