//! Duplicate names among rules, functions, globals and queries.
//!
//! Each kind has its own namespace. Every occurrence after the first is an error at its name,
//! pointing back at the line of the first one.

use super::{Diagnostic, LintContext, Pass, Severity};
use drl_syntax::Range;
use std::collections::HashMap;

pub(crate) fn check(context: &LintContext<'_>) -> Vec<Diagnostic> {
    let tree = context.tree;
    let mut diagnostics = Vec::new();
    report(
        "rule",
        tree.rules.iter().map(|r| (r.name.as_str(), r.name_range)),
        &mut diagnostics,
    );
    report(
        "function",
        tree.functions.iter().map(|f| (f.name.as_str(), f.name_range)),
        &mut diagnostics,
    );
    report(
        "global",
        tree.globals.iter().map(|g| (g.name.as_str(), g.name_range)),
        &mut diagnostics,
    );
    report(
        "query",
        tree.queries.iter().map(|q| (q.name.as_str(), q.name_range)),
        &mut diagnostics,
    );
    diagnostics
}

fn report<'t>(kind: &str, names: impl Iterator<Item = (&'t str, Range)>, out: &mut Vec<Diagnostic>) {
    let mut first_seen: HashMap<&str, Range> = HashMap::new();
    for (name, range) in names.filter(|(name, _)| !name.is_empty()) {
        match first_seen.get(name) {
            Some(first) => out.push(Diagnostic::new(
                Pass::Duplicates,
                Severity::Error,
                range,
                format!(
                    "Duplicate {kind} name \"{name}\" (first defined on line {})",
                    first.start.line + 1
                ),
            )),
            None => {
                first_seen.insert(name, range);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lint::LintSettings;

    fn run(text: &str) -> Vec<Diagnostic> {
        let output = drl_syntax::parse(text);
        let settings = LintSettings::default();
        check(&LintContext {
            text,
            tree: &output.tree,
            errors: &output.errors,
            settings: &settings,
        })
    }

    #[test]
    fn test_duplicate_rule_points_at_second_name() {
        let text = "rule \"Dup\"\nwhen\nthen\nend\n\nrule \"Dup\"\nwhen\nthen\nend\n";
        let diagnostics = run(text);
        assert_eq!(diagnostics.len(), 1);
        let d = &diagnostics[0];
        assert_eq!(d.severity, Severity::Error);
        assert_eq!(d.range.start.line, 5);
        assert!(d.message.contains("Dup"));
        assert!(d.message.contains("line 1"));
    }

    #[test]
    fn test_kinds_have_separate_namespaces() {
        let text = "global java.util.List check\nquery \"check\"\nend\nrule \"check\"\nend\n";
        assert!(run(text).is_empty());
    }

    #[test]
    fn test_third_occurrence_also_reported() {
        let text = "global A g\nglobal B g\nglobal C g\n";
        let diagnostics = run(text);
        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics.iter().all(|d| d.message.contains("line 1")));
    }
}
