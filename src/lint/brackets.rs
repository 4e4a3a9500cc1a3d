//! Bracket balance over the whole raw document.

use super::{Diagnostic, LintContext, Pass, Severity};
use drl_syntax::brackets::{self, BracketIssue};
use drl_syntax::{Position, Range};

pub(crate) fn check(context: &LintContext<'_>) -> Vec<Diagnostic> {
    let report = brackets::check_balance(context.text, context.settings.max_nesting_depth);
    report
        .issues
        .iter()
        .map(|issue| {
            let severity = match issue {
                BracketIssue::NestingTooDeep { .. } => Severity::Warning,
                BracketIssue::UnmatchedClosing { .. } | BracketIssue::UnmatchedOpening { .. } => Severity::Error,
            };
            let at = issue.position();
            let range = Range::new(at, Position::new(at.line_index(), at.column() + 1));
            Diagnostic::new(Pass::Brackets, severity, range, issue.message())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lint::LintSettings;

    fn run(text: &str, settings: &LintSettings) -> Vec<Diagnostic> {
        let output = drl_syntax::parse(text);
        check(&LintContext {
            text,
            tree: &output.tree,
            errors: &output.errors,
            settings,
        })
    }

    #[test]
    fn test_unclosed_exists_reported_at_its_paren() {
        let text = "rule \"R\"\nwhen\n    exists(Person()\nthen\n    go();\nend\n";
        let diagnostics = run(text, &LintSettings::default());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity, Severity::Error);
        assert_eq!(diagnostics[0].range.start, Position::new(2, 10));
        assert_eq!(diagnostics[0].message, "Unclosed '('");
    }

    #[test]
    fn test_stray_closing_brace() {
        let text = "function void f() {\n}\n}\n";
        let diagnostics = run(text, &LintSettings::default());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].range.start, Position::new(2, 0));
        assert_eq!(diagnostics[0].message, "Unmatched closing '}'");
    }

    #[test]
    fn test_nesting_overflow_is_a_warning() {
        let text = "rule \"N\"\nwhen\n    not(exists(not(Person())))\nthen\nend\n";
        let settings = LintSettings::new().with_max_nesting_depth(2);
        let diagnostics = run(text, &settings);
        assert!(!diagnostics.is_empty());
        assert!(diagnostics.iter().all(|d| d.severity == Severity::Warning));
    }

    #[test]
    fn test_brackets_in_strings_and_comments_ignored() {
        let text = "rule \"R\"\nwhen\n    Person(name == \"(\") // )\nthen\n    /* { */\nend\n";
        assert!(run(text, &LintSettings::default()).is_empty());
    }
}
