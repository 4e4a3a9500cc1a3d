//! Property-based tests for the DRL parser and linter
//!
//! These tests use proptest to verify invariants across many randomly
//! generated inputs, catching edge cases that hand-written tests might miss.

use drl::lint::{LintSettings, compute_diagnostics};
use drl_syntax::brackets::{DEFAULT_MAX_NESTING_DEPTH, check_balance};
use drl_syntax::incremental::{ChangedRange, reparse};
use drl_syntax::{ParseOptions, parse, parse_with_options};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

/// Line fragments that look like DRL, including broken ones.
fn fragment_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("package demo;".to_string()),
        Just("import com.example.Person;".to_string()),
        Just("global java.util.List results;".to_string()),
        Just("rule \"R\"".to_string()),
        Just("rule".to_string()),
        Just("when".to_string()),
        Just("then".to_string()),
        Just("end".to_string()),
        Just("salience 10".to_string()),
        Just("no-loop".to_string()),
        Just("$p : Person(age > 18)".to_string()),
        Just("exists(".to_string()),
        Just("not (".to_string()),
        Just("eval(".to_string()),
        Just(")".to_string()),
        Just("}".to_string()),
        Just("function void f() {".to_string()),
        Just("query \"q\"".to_string()),
        Just("declare Fact".to_string()),
        Just("/*".to_string()),
        Just("*/".to_string()),
        Just("\"unterminated".to_string()),
        Just("modify($p) { setAge(1) };".to_string()),
        "[a-zA-Z$(){}\\[\\]\"' ;:.,=<>!]{0,30}",
    ]
}

fn document_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(fragment_strategy(), 0..40).prop_map(|lines| lines.join("\n"))
}

/// A well-formed document of `rules` rules, each with a numbered condition.
fn rules_document(values: &[u32]) -> String {
    let mut text = String::from("package demo;\n\n");
    for (i, value) in values.iter().enumerate() {
        text.push_str(&format!(
            "rule \"R{i}\"\nwhen\n    $f : Fact{i}(value > {value})\nthen\n    $f.touch();\nend\n\n"
        ));
    }
    text
}

// =============================================================================
// Parser Properties
// =============================================================================

proptest! {
    /// Property: Any input terminates with a tree and an error list
    #[test]
    fn parse_never_panics_on_arbitrary_text(text in ".{0,400}") {
        let output = parse(&text);
        prop_assert!(output.errors.len() <= ParseOptions::default().max_errors);
    }

    /// Property: DRL-shaped noise parses without a fatal error and keeps nodes sorted
    #[test]
    fn parse_recovers_on_drl_noise(text in document_strategy()) {
        let output = parse(&text);
        prop_assert!(output.errors.iter().all(|e| !e.message.starts_with("Internal parser error")));
        let starts: Vec<_> = output.tree.rules.iter().map(|r| r.range.start).collect();
        let mut sorted = starts.clone();
        sorted.sort();
        prop_assert_eq!(starts, sorted);
    }

    /// Property: The error cap is honored
    #[test]
    fn parse_respects_error_cap(text in document_strategy(), cap in 0usize..5) {
        let output = parse_with_options(&text, &ParseOptions::new().with_max_errors(cap));
        prop_assert!(output.errors.len() <= cap);
    }

    /// Property: Linting never exceeds `max_problems`
    #[test]
    fn lint_respects_max_problems(text in document_strategy(), max in 0usize..8) {
        let output = parse(&text);
        let settings = LintSettings::new().with_max_problems(max);
        let diagnostics = compute_diagnostics(&text, &output.tree, &output.errors, &settings);
        prop_assert!(diagnostics.len() <= max);
    }
}

// =============================================================================
// Bracket Properties
// =============================================================================

proptest! {
    /// Property: Bracket-balance validation is idempotent
    #[test]
    fn bracket_check_is_idempotent(text in document_strategy()) {
        let first = check_balance(&text, DEFAULT_MAX_NESTING_DEPTH);
        let second = check_balance(&text, DEFAULT_MAX_NESTING_DEPTH);
        prop_assert_eq!(first, second);
    }

    /// Property: Balanced bracket nests report no issues
    #[test]
    fn nested_patterns_are_balanced(depth in 1usize..20) {
        let mut text = String::from("rule \"N\"\nwhen\n");
        for level in 0..depth {
            text.push_str(&format!("{}exists(\n", "  ".repeat(level + 1)));
        }
        text.push_str("Person()\n");
        for level in (0..depth).rev() {
            text.push_str(&format!("{})\n", "  ".repeat(level + 1)));
        }
        text.push_str("then\nend\n");

        let report = check_balance(&text, DEFAULT_MAX_NESTING_DEPTH);
        prop_assert!(report.issues.is_empty());
        prop_assert_eq!(report.regions.len(), depth);

        let output = parse(&text);
        let conditions = &output.tree.rules[0].when.as_ref().unwrap().conditions;
        prop_assert_eq!(conditions.len(), 1);
        prop_assert_eq!(conditions[0].range.start.line, 2);
        prop_assert_eq!(conditions[0].range.end.line as usize, 2 * depth + 2);
    }
}

// =============================================================================
// Incremental Properties
// =============================================================================

proptest! {
    /// Property: Reparsing one edited rule equals a fresh parse
    #[test]
    fn single_rule_edit_matches_full_parse(
        values in prop::collection::vec(0u32..1000, 1..8),
        pick in any::<prop::sample::Index>(),
        replacement in 0u32..100_000,
        extra_line in any::<bool>(),
    ) {
        let old = rules_document(&values);
        let previous = parse(&old).tree;

        let target = pick.index(values.len());
        let needle = format!("Fact{target}(value > {})", values[target]);
        let start = old.find(&needle).unwrap();
        let mut inserted = format!("Fact{target}(value > {replacement})");
        if extra_line {
            inserted.push_str("\n    Other()");
        }
        let new_text = format!("{}{}{}", &old[..start], inserted, &old[start + needle.len()..]);
        let change = ChangedRange::new(start, start + inserted.len()).with_line_delta(i64::from(extra_line));

        let incremental = reparse(&new_text, &previous, &[change], &ParseOptions::default());
        let fresh = parse(&new_text);
        prop_assert_eq!(incremental.tree, fresh.tree);
        prop_assert!(fresh.errors.is_empty());
    }
}
