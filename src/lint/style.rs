//! Style hints.

use super::{Diagnostic, LintContext, Pass, Severity, mentions};
use drl_core::lang::attributes::{self, AttributeId};
use drl_syntax::SyntaxTree;
use drl_syntax::ast::{ConditionKind, RuleNode};

const LOOPING_CALLS: [&str; 2] = ["modify", "update"];

pub(crate) fn check(context: &LintContext<'_>) -> Vec<Diagnostic> {
    let tree = context.tree;
    let mut diagnostics = Vec::new();

    if tree.rules.len() > 1 && !tree.rules.iter().any(|r| r.has_attribute(AttributeId::Salience)) {
        let first = &tree.rules[0];
        diagnostics.push(hint(
            first.name_range,
            "Several rules and none sets `salience`; firing order between them is unspecified",
        ));
    }

    for rule in &tree.rules {
        if may_loop(rule) {
            diagnostics.push(hint(
                rule.name_range,
                format!(
                    "Rule \"{}\" modifies facts without `no-loop` or `lock-on-active`; it may re-trigger itself",
                    rule.name
                ),
            ));
        }
        for condition in rule.when.iter().flat_map(|w| &w.conditions) {
            if condition.kind == ConditionKind::Eval {
                diagnostics.push(hint(
                    condition.range,
                    "`eval` conditions are opaque to the engine; prefer pattern constraints",
                ));
            }
        }
    }

    for global in &tree.globals {
        if !is_referenced(tree, &global.name) {
            diagnostics.push(hint(
                global.name_range,
                format!("Global `{}` is never used", global.name),
            ));
        }
    }

    diagnostics
}

fn may_loop(rule: &RuleNode) -> bool {
    let Some(action) = &rule.then else { return false };
    if !LOOPING_CALLS.iter().any(|call| mentions(&action.text, call)) {
        return false;
    }
    let guarded = rule
        .attributes
        .iter()
        .any(|a| a.id().is_some_and(attributes::prevents_loops) && a.value.trim() != "false");
    !guarded
}

/// `true` if `name` appears in any rule, query or function body.
fn is_referenced(tree: &SyntaxTree, name: &str) -> bool {
    let in_rules = tree.rules.iter().any(|rule| {
        rule.then.as_ref().is_some_and(|t| mentions(&t.text, name))
            || rule.when.iter().flat_map(|w| &w.conditions).any(|c| mentions(&c.content, name))
    });
    in_rules
        || tree
            .queries
            .iter()
            .flat_map(|q| &q.conditions)
            .any(|c| mentions(&c.content, name))
        || tree.functions.iter().any(|f| mentions(&f.body, name))
}

fn hint(range: drl_syntax::Range, message: impl Into<String>) -> Diagnostic {
    Diagnostic::new(Pass::Style, Severity::Hint, range, message)
}
