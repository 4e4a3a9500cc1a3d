#[cfg(test)]
/// Parser unit tests.
///
/// These cover the construct parsers, the single-line clause forms, and recovery (one clear error
/// per broken construct, no cascades).
mod tests {
    use super::*;
    use crate::diagnostics::ParseSeverity;

    #[test]
    fn test_parse_basic_rule() {
        let source = r#"package demo;

rule "Adult"
when
    $p : Person(age >= 18)
then
    $p.setAdult(true);
end
"#;
        let output = parse(source);
        assert!(output.errors.is_empty(), "unexpected errors: {:?}", output.errors);
        assert_eq!(output.tree.package.as_ref().map(|p| p.name.as_str()), Some("demo"));

        let rule = &output.tree.rules[0];
        assert_eq!(rule.name, "Adult");
        assert!(rule.quoted);
        assert_eq!(rule.range.start, Position::new(2, 0));
        assert_eq!(rule.range.end, Position::new(7, 3));

        let when = rule.when.as_ref().unwrap();
        assert_eq!(when.conditions.len(), 1);
        let condition = &when.conditions[0];
        assert_eq!(condition.kind, ConditionKind::Pattern);
        assert_eq!(condition.variable.as_deref(), Some("$p"));
        assert_eq!(condition.fact_type.as_deref(), Some("Person"));
        assert!(condition.multiline.is_none());

        let then = rule.then.as_ref().unwrap();
        assert_eq!(then.text, "$p.setAdult(true);");
        assert_eq!(then.body_start, Position::new(6, 4));
    }

    #[test]
    fn test_single_line_rule() {
        let output = parse(r#"rule "Dup" when Person() then end"#);
        assert!(output.errors.is_empty(), "unexpected errors: {:?}", output.errors);
        let rule = &output.tree.rules[0];
        assert_eq!(rule.when.as_ref().unwrap().conditions[0].content, "Person()");
        assert!(rule.then.as_ref().unwrap().is_blank());
        assert_eq!(rule.range.end, Position::new(0, 33));
    }

    #[test]
    fn test_single_line_then_with_statement() {
        let output = parse("rule R\nwhen\nthen log(\"x\"); end\n");
        assert!(output.errors.is_empty(), "unexpected errors: {:?}", output.errors);
        let rule = &output.tree.rules[0];
        assert_eq!(rule.name, "R");
        assert!(!rule.quoted);
        assert_eq!(rule.then.as_ref().unwrap().text, "log(\"x\");");
    }

    #[test]
    fn test_missing_end_keeps_rule_and_next_rule() {
        let source = "rule \"A\"\nwhen\n    Person()\nthen\n    x();\nrule \"B\"\nwhen\nthen\nend\n";
        let output = parse(source);
        assert_eq!(output.tree.rules.len(), 2);
        assert_eq!(output.errors.len(), 1);
        assert!(output.errors[0].message.contains("Missing `end`"));
        assert_eq!(output.tree.rules[0].then.as_ref().unwrap().text, "x();");
    }

    #[test]
    fn test_recovery_skips_to_end_line() {
        let source = "rule \"broken\nwhen\n  Person()\nthen\nend\nrule \"ok\"\nend\n";
        let output = parse(source);
        assert_eq!(output.errors.len(), 1, "expected one error, got {:?}", output.errors);
        assert!(output.errors[0].message.contains("Unterminated"));
        assert_eq!(output.tree.rules.len(), 1);
        assert_eq!(output.tree.rules[0].name, "ok");
    }

    #[test]
    fn test_rule_header_attributes_and_extends() {
        let source = "rule \"Child\" extends \"Parent\" salience 10, no-loop\n    agenda-group \"g\"\nwhen\nthen\nend\n";
        let output = parse(source);
        assert!(output.errors.is_empty(), "unexpected errors: {:?}", output.errors);
        let rule = &output.tree.rules[0];
        assert_eq!(rule.parent.as_deref(), Some("Parent"));
        let attrs: Vec<(&str, &str)> = rule
            .attributes
            .iter()
            .map(|a| (a.name.as_str(), a.value.as_str()))
            .collect();
        assert_eq!(attrs, vec![("salience", "10"), ("no-loop", ""), ("agenda-group", "\"g\"")]);
    }

    #[test]
    fn test_multiline_patterns_span_their_lines() {
        let source = r#"rule "Nested"
when
    exists(
        Person(age > 18)
    )
    not(
        Car(
            color == "red"
        )
    )
    eval(
        true
    )
then
end
"#;
        let output = parse(source);
        assert!(output.errors.is_empty(), "unexpected errors: {:?}", output.errors);
        let conditions = &output.tree.rules[0].when.as_ref().unwrap().conditions;
        let kinds: Vec<ConditionKind> = conditions.iter().map(|c| c.kind).collect();
        assert_eq!(kinds, vec![ConditionKind::Exists, ConditionKind::Not, ConditionKind::Eval]);

        assert_eq!(conditions[0].range, Range::new(Position::new(2, 4), Position::new(4, 5)));
        assert_eq!(conditions[1].range, Range::new(Position::new(5, 4), Position::new(9, 5)));
        assert_eq!(conditions[2].range, Range::new(Position::new(10, 4), Position::new(12, 5)));

        let multiline = conditions[1].multiline.as_ref().unwrap();
        assert_eq!(multiline.regions.len(), 1);
        assert_eq!(multiline.regions[0].keyword, KeywordId::Not);
        assert_eq!(multiline.pairs.len(), 2);
        assert_eq!(conditions[0].fact_type.as_deref(), Some("Person"));
    }

    #[test]
    fn test_unclosed_condition_stops_at_then() {
        let source = "rule \"U\"\nwhen\n    exists(Person()\nthen\n    go();\nend\n";
        let output = parse(source);
        assert!(output.errors.is_empty(), "bracket issues are not parse errors: {:?}", output.errors);
        let rule = &output.tree.rules[0];
        assert_eq!(rule.when.as_ref().unwrap().conditions[0].content, "exists(Person()");
        assert_eq!(rule.then.as_ref().unwrap().text, "go();");
    }

    #[test]
    fn test_comments_are_ignored_in_conditions() {
        let source = "rule \"C\" // trailing\nwhen\n    /* then */ Person()\nthen\nend\n";
        let output = parse(source);
        assert!(output.errors.is_empty(), "unexpected errors: {:?}", output.errors);
        let conditions = &output.tree.rules[0].when.as_ref().unwrap().conditions;
        assert_eq!(conditions.len(), 1);
        assert_eq!(conditions[0].fact_type.as_deref(), Some("Person"));
    }

    #[test]
    fn test_parse_function() {
        let source = "function String greet(String name, int times) {\n    return \"Hi \" + name;\n}\n";
        let output = parse(source);
        assert!(output.errors.is_empty(), "unexpected errors: {:?}", output.errors);
        let function = &output.tree.functions[0];
        assert_eq!(function.name, "greet");
        assert_eq!(function.return_type.as_deref(), Some("String"));
        assert_eq!(function.parameters.len(), 2);
        assert_eq!(function.parameters[1].type_name.as_deref(), Some("int"));
        assert_eq!(function.parameters[1].name, "times");
        assert!(function.body.contains("return \"Hi \" + name;"));
        assert_eq!(function.range.end, Position::new(2, 1));
    }

    #[test]
    fn test_unclosed_function_body_is_recoverable() {
        let source = "function void f() {\n    x();\nrule \"R\"\nend\n";
        let output = parse(source);
        assert_eq!(output.tree.functions.len(), 1);
        assert_eq!(output.tree.rules.len(), 1);
        assert_eq!(output.errors.len(), 1);
        assert!(output.errors[0].message.contains("Unclosed body"));
    }

    #[test]
    fn test_function_without_paren_fails_cleanly() {
        let output = parse("function broken {\n}\nrule \"R\"\nend\n");
        assert!(output.tree.functions.is_empty());
        assert_eq!(output.tree.rules.len(), 1);
        assert_eq!(output.errors.len(), 1);
    }

    #[test]
    fn test_function_without_body_resumes_at_next_construct() {
        let output = parse("function void f()\nglobal java.util.List results;\nrule \"R\"\nend\n");
        assert!(output.tree.functions.is_empty());
        assert_eq!(output.tree.globals.len(), 1);
        assert_eq!(output.tree.rules.len(), 1);
        assert_eq!(output.errors.len(), 1);
        assert!(output.errors[0].message.contains("Expected `{`"));
        assert_eq!(output.errors[0].range.start.line, 0);
    }

    #[test]
    fn test_function_body_on_next_line() {
        let output = parse("function void f()\n{\n    x();\n}\n");
        assert!(output.errors.is_empty(), "{:?}", output.errors);
        assert_eq!(output.tree.functions.len(), 1);
    }

    #[test]
    fn test_parse_query_and_declarations() {
        let source = r#"query "adults" (int min)
    $p : Person(age >= min)
end
declare Person extends Being
    @role(fact)
    name : String @key
    age : int
end
declare enum Color
    RED, GREEN("g");
end
"#;
        let output = parse(source);
        assert!(output.errors.is_empty(), "unexpected errors: {:?}", output.errors);

        let query = &output.tree.queries[0];
        assert_eq!(query.name, "adults");
        assert_eq!(query.parameters.len(), 1);
        assert_eq!(query.conditions.len(), 1);

        let person = &output.tree.declares[0];
        assert_eq!(person.kind, DeclareKind::Type);
        assert_eq!(person.supertype.as_deref(), Some("Being"));
        assert_eq!(person.annotations, vec!["@role(fact)".to_string()]);
        assert_eq!(person.fields.len(), 2);
        assert_eq!(person.fields[0].type_name.as_deref(), Some("String"));
        assert_eq!(person.fields[0].annotations, vec!["@key".to_string()]);

        let color = &output.tree.declares[1];
        assert_eq!(color.kind, DeclareKind::Enum);
        let names: Vec<&str> = color.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["RED", "GREEN"]);
    }

    #[test]
    fn test_header_constructs() {
        let source = "package com.acme;\nimport com.acme.Person;\nimport function com.acme.Util.log;\nglobal java.util.List results;\ndialect \"mvel\"\n";
        let output = parse(source);
        assert!(output.errors.is_empty(), "unexpected errors: {:?}", output.errors);
        let tree = &output.tree;
        assert_eq!(tree.imports[0].kind, ImportKind::Type);
        assert_eq!(tree.imports[0].simple_name(), "Person");
        assert_eq!(tree.imports[1].kind, ImportKind::Function);
        assert_eq!(tree.imports[1].target, "com.acme.Util.log");
        assert_eq!(tree.globals[0].type_name, "java.util.List");
        assert_eq!(tree.globals[0].name, "results");
        assert_eq!(tree.globals[0].name_range, Range::on_line(3, 22, 29));
        assert_eq!(tree.attributes[0].name, "dialect");
        assert_eq!(tree.attributes[0].value, "\"mvel\"");
    }

    #[test]
    fn test_second_package_is_a_warning() {
        let output = parse("package a;\npackage b;\n");
        assert_eq!(output.tree.package.as_ref().map(|p| p.name.as_str()), Some("a"));
        assert_eq!(output.errors.len(), 1);
        assert_eq!(output.errors[0].severity, ParseSeverity::Warning);
        assert!(!output.has_errors());
    }

    #[test]
    fn test_unrecognized_lines_are_warnings() {
        let output = parse("hello world\nend\n");
        assert!(output.tree.is_empty());
        assert_eq!(output.errors.len(), 2);
        assert!(output.errors.iter().all(|e| e.severity == ParseSeverity::Warning));
    }

    #[test]
    fn test_error_cap_drops_overflow() {
        let source = "global x\n".repeat(5);
        let output = parse_with_options(&source, &ParseOptions::new().with_max_errors(2));
        assert_eq!(output.errors.len(), 2);
    }

    #[test]
    fn test_node_lists_are_sorted_by_start_line() {
        let source = "rule \"b\"\nend\nrule \"a\"\nend\n";
        let output = parse(source);
        let lines: Vec<u32> = output.tree.rules.iter().map(|r| r.range.start.line).collect();
        assert_eq!(lines, vec![0, 2]);
    }

    const DEPTH: usize = crate::brackets::DEFAULT_MAX_NESTING_DEPTH;

    #[test]
    fn test_classify_conditions() {
        assert_eq!(
            classify_condition("not Person()", DEPTH),
            (ConditionKind::Not, None, Some("Person".to_string()))
        );
        assert_eq!(
            classify_condition("$t : Number() from accumulate(Item($v : value), sum($v))", DEPTH),
            (ConditionKind::Pattern, Some("$t".to_string()), Some("Number".to_string()))
        );
        assert_eq!(
            classify_condition("exists($c := Car(color == \"red\"))", DEPTH),
            (ConditionKind::Exists, Some("$c".to_string()), Some("Car".to_string()))
        );
        assert_eq!(classify_condition("eval($x > 3)", DEPTH), (ConditionKind::Eval, None, None));
        assert_eq!(
            classify_condition("or Dog()", DEPTH),
            (ConditionKind::Or, None, Some("Dog".to_string()))
        );
    }

    #[test]
    fn test_classify_stops_at_depth_cap() {
        assert_eq!(
            classify_condition("not(exists(Person()))", 2),
            (ConditionKind::Not, None, Some("Person".to_string()))
        );
        assert_eq!(
            classify_condition("not(exists($p : Person()))", 1),
            (ConditionKind::Not, None, None)
        );
    }

    #[test]
    fn test_deeply_nested_condition_terminates() {
        let depth = 10_000;
        let source = format!(
            "rule \"Deep\"\nwhen\n    {}Person(){}\nthen\nend\n",
            "not(".repeat(depth),
            ")".repeat(depth)
        );
        let output = parse(&source);
        let rule = output.tree.rule("Deep").expect("rule kept");
        let conditions = &rule.when.as_ref().expect("when clause").conditions;
        assert_eq!(conditions.len(), 1);
        assert_eq!(conditions[0].kind, ConditionKind::Not);
        assert_eq!(conditions[0].fact_type, None);
        assert_eq!(conditions[0].range.start, Position::new(2, 4));
    }

    #[test]
    fn test_trailing_end_detection() {
        assert_eq!(trailing_end(" x(); end"), Some(6));
        assert_eq!(trailing_end(" end"), Some(1));
        assert_eq!(trailing_end(" obj.end"), None);
        assert_eq!(trailing_end(" append"), None);
    }
}
