//! `$variables` used in a rule's actions must be bound by its conditions.
//!
//! A rule also sees the bindings of the rules it `extends`, transitively.

use super::{Diagnostic, LintContext, Pass, Severity};
use drl_syntax::SyntaxTree;
use drl_syntax::ast::RuleNode;
use drl_syntax::scanner;
use std::collections::HashSet;

pub(crate) fn check(context: &LintContext<'_>) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    for rule in &context.tree.rules {
        let Some(action) = &rule.then else { continue };
        let declared = declared_variables(context.tree, rule);
        let mut reported: HashSet<String> = HashSet::new();
        let lines: Vec<&str> = action.text.split('\n').collect();

        for token in scanner::variable_tokens(&action.text) {
            if declared.contains(&token.name) || !reported.insert(token.name.clone()) {
                continue;
            }
            let line_text = lines.get(token.line).copied().unwrap_or("");
            let start = action.position_at(token.line, scanner::char_column(line_text, token.column));
            let end = action.position_at(
                token.line,
                scanner::char_column(line_text, token.column + token.name.len()),
            );
            diagnostics.push(Diagnostic::new(
                Pass::Variables,
                Severity::Error,
                drl_syntax::Range::new(start, end),
                format!("Undefined variable `{}` in rule \"{}\"", token.name, rule.name),
            ));
        }
    }
    diagnostics
}

/// Bindings visible to `rule`: its own plus those of every ancestor.
fn declared_variables(tree: &SyntaxTree, rule: &RuleNode) -> HashSet<String> {
    let mut declared: HashSet<String> = rule.bound_variables().into_iter().collect();
    let mut visited: HashSet<&str> = HashSet::from([rule.name.as_str()]);
    let mut parent = rule.parent.as_deref();

    while let Some(name) = parent {
        if !visited.insert(name) {
            tracing::debug!(rule = %rule.name, parent = name, "cycle in rule inheritance");
            break;
        }
        let Some(ancestor) = tree.rule(name) else { break };
        declared.extend(ancestor.bound_variables());
        parent = ancestor.parent.as_deref();
    }
    declared
}
