/// Condition parsing for rule `when` clauses and query bodies.
///
/// A condition starts at a significant character and runs to the end of its line. While brackets
/// opened inside it stay open, it continues onto the following lines. It stops early at a line
/// that is `end`, starts with `then`, or starts a new construct; the brackets are then left
/// unclosed and the bracket-balance check reports them.
///
/// ## Notes
/// - This file is `include!`'d into `crate::parser`.

const CONDITION_STOP_WORDS: [KeywordId; 2] = [KeywordId::Then, KeywordId::End];

impl<'a> Parser<'a> {
    /// Parse conditions from `from` until `then`, `end`, a new construct, or end of input.
    ///
    /// ## Returns
    /// - The conditions and the cursor of whatever stopped them.
    fn conditions(&mut self, from: Cursor) -> (Vec<ConditionNode>, Cursor) {
        let mut nodes = Vec::new();
        let mut cursor = from;

        loop {
            let Some(at) = self.source.skip_whitespace(cursor) else {
                return (nodes, Cursor::new(self.source.line_count(), 0));
            };
            let rest = self.source.rest(at);
            let stopped = CONDITION_STOP_WORDS
                .iter()
                .any(|id| scanner::starts_with_keyword(rest, *id));
            if stopped || self.at_construct_start(at) {
                return (nodes, at);
            }

            let (node, next) = self.condition(at);
            nodes.push(node);
            cursor = if next > at { next } else { at.next_line() };
        }
    }

    /// Parse one condition starting at `at`.
    fn condition(&mut self, at: Cursor) -> (ConditionNode, Cursor) {
        let mut tracker = BracketTracker::new(self.options.max_nesting_depth);
        let mut line = at.line;
        let mut from = at.column;
        let mut content_end = at;

        let next = loop {
            let code = self.source.code_line(line);
            let rest = code.get(from..).unwrap_or("");
            let cut = scanner::find_word_at_depth(rest, &CONDITION_STOP_WORDS, tracker.open_count())
                .map(|(offset, _)| from + offset);
            let segment_end = cut.unwrap_or(code.len());
            let segment = code.get(..segment_end).unwrap_or(code);

            tracker.scan_line(line, segment, self.source.raw_line(line), from);
            let significant = segment.get(from..).unwrap_or("").trim_end();
            if !significant.trim_start().is_empty() {
                content_end = Cursor::new(line, from + significant.len());
            }

            if let Some(cut) = cut {
                break Cursor::new(line, cut);
            }
            if tracker.open_count() == 0 {
                break Cursor::new(line + 1, 0);
            }

            line += 1;
            from = 0;
            if line >= self.source.line_count() {
                break Cursor::new(line, 0);
            }
            let starts_then = scanner::starts_with_keyword(self.source.code_line(line).trim_start(), KeywordId::Then);
            if self.source.is_end_line(line) || starts_then || self.source.construct_at(line).is_some() {
                break Cursor::new(line, 0);
            }
        };

        let content = self.raw_between(at, content_end);
        let (kind, variable, fact_type) = classify_condition(&content, self.options.max_nesting_depth);
        let multiline = (content_end.line > at.line).then(|| {
            let report = tracker.finish();
            MultilinePattern {
                pairs: report.pairs,
                regions: report.regions,
            }
        });

        let node = ConditionNode {
            kind,
            variable,
            fact_type,
            content,
            range: self.span(at, content_end),
            multiline,
        };
        (node, next)
    }
}

/// Work out what a condition is from its text.
///
/// Keyword layers (`not(exists(Person()))`) are peeled one per iteration, at most `max_depth` of
/// them; past that the fact type is left unknown.
///
/// ## Returns
/// - `(kind, binding, fact type)`. The kind comes from the outermost keyword, the binding from the
///   outermost layer that has one, and the fact type from the innermost pattern.
fn classify_condition(text: &str, max_depth: usize) -> (ConditionKind, Option<String>, Option<String>) {
    let mut outer: Option<ConditionKind> = None;
    let mut variable = None;
    let mut rest = text.trim();

    for _ in 0..=max_depth {
        let (binding, body) = split_binding(rest);
        variable = variable.or(binding);
        let (word, after) = scanner::leading_word(body);
        let Some(kind) = keywords::from_str(word).and_then(ConditionKind::from_keyword) else {
            return (outer.unwrap_or(ConditionKind::Pattern), variable, pattern_type(body));
        };
        outer.get_or_insert(kind);
        rest = strip_outer_parens(after.trim());
    }

    (outer.unwrap_or(ConditionKind::Pattern), variable, None)
}

/// Split `$p : Person()` into `($p, "Person()")`; `:=` is accepted too.
fn split_binding(text: &str) -> (Option<String>, &str) {
    let Some(body) = text.strip_prefix('$') else {
        return (None, text);
    };
    let (name, after) = scanner::leading_word(body);
    let after = after.trim_start();
    if name.is_empty() || !after.starts_with(':') || after.starts_with("::") {
        return (None, text);
    }
    let after = after.strip_prefix(":=").unwrap_or(&after[1..]);
    (Some(format!("${name}")), after.trim_start())
}

/// Fact type of a pattern such as `com.example.Person(age > 3)`.
fn pattern_type(text: &str) -> Option<String> {
    let (name, after) = scanner::leading_name(text);
    let is_type = !name.is_empty() && !name.starts_with('$') && after.trim_start().starts_with('(');
    is_type.then(|| name.to_string())
}

fn strip_outer_parens(text: &str) -> &str {
    text.strip_prefix('(')
        .and_then(|t| t.strip_suffix(')'))
        .map_or(text, str::trim)
}
