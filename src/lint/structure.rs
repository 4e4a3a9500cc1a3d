//! Required parts of rules and functions, and attribute names and values.

use super::{Diagnostic, LintContext, Pass, Severity};
use drl_core::lang::attributes;
use drl_core::lang::keywords::{self, KeywordId};
use drl_syntax::Range;
use drl_syntax::ast::{AttributeNode, FunctionNode, RuleNode};

pub(crate) fn check(context: &LintContext<'_>) -> Vec<Diagnostic> {
    let tree = context.tree;
    let mut diagnostics = Vec::new();

    for rule in &tree.rules {
        check_rule(rule, &mut diagnostics);
    }
    for function in &tree.functions {
        check_function(function, &mut diagnostics);
    }
    for attribute in &tree.attributes {
        check_attribute(attribute, &mut diagnostics);
    }
    diagnostics
}

fn check_rule(rule: &RuleNode, out: &mut Vec<Diagnostic>) {
    let header = keyword_range(rule.range, KeywordId::Rule);
    if rule.name.is_empty() {
        out.push(error(header, "Rule has no name"));
    }
    if rule.when.is_none() && rule.then.is_none() {
        out.push(error(header, format!("Rule \"{}\" has neither a `when` nor a `then` clause", rule.name)));
    }

    if let Some(when) = rule.when.as_ref().filter(|w| w.conditions.is_empty()) {
        out.push(warning(
            keyword_range(when.range, KeywordId::When),
            format!("Rule \"{}\" has an empty `when` clause", rule.name),
        ));
    }
    if let Some(then) = rule.then.as_ref().filter(|t| t.is_blank()) {
        out.push(warning(
            keyword_range(then.range, KeywordId::Then),
            format!("Rule \"{}\" has an empty `then` clause", rule.name),
        ));
    }

    for attribute in &rule.attributes {
        check_attribute(attribute, out);
    }
}

fn check_function(function: &FunctionNode, out: &mut Vec<Diagnostic>) {
    let header = keyword_range(function.range, KeywordId::Function);
    if function.name.is_empty() {
        out.push(error(header, "Function has no name"));
        return;
    }
    if function.return_type.is_none() {
        out.push(error(
            function.name_range,
            format!("Function `{}` has no return type", function.name),
        ));
    }
}

fn check_attribute(attribute: &AttributeNode, out: &mut Vec<Diagnostic>) {
    let Some(id) = attribute.id() else {
        out.push(warning(attribute.range, format!("Unknown attribute `{}`", attribute.name)));
        return;
    };
    let kind = attributes::value_kind(id);
    if !kind.accepts(&attribute.value) {
        let message = if attribute.value.is_empty() {
            format!("Attribute `{}` needs a value: expected {}", attribute.name, kind.describe())
        } else {
            format!(
                "Invalid value `{}` for attribute `{}`: expected {}",
                attribute.value,
                attribute.name,
                kind.describe()
            )
        };
        out.push(warning(attribute.range, message));
    }
}

/// The keyword at the start of `range`.
fn keyword_range(range: Range, id: KeywordId) -> Range {
    let len = keywords::as_str(id).len();
    Range::on_line(range.start.line_index(), range.start.column(), range.start.column() + len)
}

fn error(range: Range, message: impl Into<String>) -> Diagnostic {
    Diagnostic::new(Pass::Structure, Severity::Error, range, message)
}

fn warning(range: Range, message: impl Into<String>) -> Diagnostic {
    Diagnostic::new(Pass::Structure, Severity::Warning, range, message)
}
