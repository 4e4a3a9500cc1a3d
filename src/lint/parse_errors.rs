//! Parse errors surfaced as diagnostics, one each, severity preserved.

use super::{Diagnostic, LintContext};

pub(crate) fn check(context: &LintContext<'_>) -> Vec<Diagnostic> {
    context.errors.iter().map(Diagnostic::from_parse_error).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lint::LintSettings;

    #[test]
    fn test_each_parse_error_becomes_one_diagnostic() {
        let text = "rule \"Open\"\nwhen\n  Person()\nthen\n  go();\n\nend extra\nglobal\n";
        let output = drl_syntax::parse(text);
        assert!(!output.errors.is_empty());

        let settings = LintSettings::default();
        let context = LintContext {
            text,
            tree: &output.tree,
            errors: &output.errors,
            settings: &settings,
        };
        let diagnostics = check(&context);
        assert_eq!(diagnostics.len(), output.errors.len());
        for (diagnostic, error) in diagnostics.iter().zip(&output.errors) {
            assert_eq!(diagnostic.range, error.range);
            assert_eq!(diagnostic.message, error.message);
            assert_eq!(diagnostic.is_error(), error.is_error());
        }
    }
}
