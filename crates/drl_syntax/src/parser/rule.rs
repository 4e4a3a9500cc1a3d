/// Rule parsing: header, attributes, `when`, `then`, `end`.
///
/// ## Notes
/// - This file is `include!`'d into `crate::parser`.
/// - Clause keywords may share a line: `rule "R" when Person() then end` is one valid rule.

const CLAUSE_WORDS: [KeywordId; 3] = [KeywordId::When, KeywordId::Then, KeywordId::End];

impl<'a> Parser<'a> {
    /// `rule "Name" [extends Parent] [attributes] [when ...] [then ...] end`
    ///
    /// A missing `end` is recorded as an error; the rule node is still produced.
    fn rule(&mut self, at: Cursor) -> Parsed<RuleNode> {
        let name = self.name_at(self.after_keyword(at, KeywordId::Rule))?;
        let mut cursor = name.end;

        let mut parent = None;
        let after_name = self.skip_inline_space(cursor);
        if scanner::starts_with_keyword(self.source.rest(after_name), KeywordId::Extends) {
            let parent_name = self.name_at(self.after_keyword(after_name, KeywordId::Extends))?;
            if parent_name.text.is_empty() {
                return Err(ParseFailure::new("Expected a parent rule name after `extends`", after_name));
            }
            parent = Some(parent_name.text);
            cursor = parent_name.end;
        }

        let (attributes, next) = self.rule_attributes(cursor);
        cursor = next;

        let mut when = None;
        if let Some(keyword) = self.next_keyword(cursor, KeywordId::When) {
            let (clause, next) = self.when_clause(keyword);
            when = Some(clause);
            cursor = next;
        }

        let mut then = None;
        if let Some(keyword) = self.next_keyword(cursor, KeywordId::Then) {
            let (clause, next) = self.then_clause(keyword);
            then = Some(clause);
            cursor = next;
        }

        let content_end = [Some(name.range), when.as_ref().map(|w| w.range), then.as_ref().map(|t| t.range)]
            .into_iter()
            .flatten()
            .chain(attributes.iter().map(|a| a.range))
            .map(|r| r.end)
            .max()
            .unwrap_or_else(|| self.pos(name.end));

        let (end, next) = match self.next_keyword(cursor, KeywordId::End) {
            Some(keyword) => {
                let after = self.after_keyword(keyword, KeywordId::End);
                (self.pos(after), after)
            }
            None => {
                let label = if name.text.is_empty() { "<unnamed>" } else { name.text.as_str() };
                let message = format!("Missing `end` for rule \"{label}\"");
                let range = self.line_range(at);
                self.error(message, range);
                (content_end, cursor)
            }
        };

        let rule = RuleNode {
            name: name.text,
            quoted: name.quoted,
            name_range: name.range,
            parent,
            attributes,
            when,
            then,
            range: Range::new(self.pos(at), end),
        };
        Ok((rule, next))
    }

    /// Collect attribute segments until a clause keyword or a new construct.
    fn rule_attributes(&self, from: Cursor) -> (Vec<AttributeNode>, Cursor) {
        let mut nodes = Vec::new();
        let mut cursor = from;

        while let Some(at) = self.source.skip_whitespace(cursor) {
            let rest = self.source.rest(at);
            let at_clause = CLAUSE_WORDS.iter().any(|id| scanner::starts_with_keyword(rest, *id));
            if at_clause || self.at_construct_start(at) {
                return (nodes, at);
            }

            let stop = scanner::find_top_level_word(rest, &CLAUSE_WORDS).map_or(rest.len(), |(offset, _)| offset);
            nodes.extend(self.attribute_segments(at, rest[..stop].trim_end()));
            cursor = if stop < rest.len() { at.advance(stop) } else { at.next_line() };
        }

        (nodes, cursor)
    }

    /// Parse the `when` clause whose keyword is at `keyword`.
    fn when_clause(&mut self, keyword: Cursor) -> (ConditionClause, Cursor) {
        let body = self.after_keyword(keyword, KeywordId::When);
        let (conditions, next) = self.conditions(body);
        let end = conditions.last().map_or_else(|| self.pos(body), |c| c.range.end);
        let clause = ConditionClause {
            conditions,
            range: Range::new(self.pos(keyword), end),
        };
        (clause, next)
    }

    /// Parse the `then` clause whose keyword is at `keyword`.
    ///
    /// Action text is host-language code: it is kept verbatim, up to a line consisting of `end`
    /// or a line that starts a new construct. The returned cursor points at that line.
    fn then_clause(&mut self, keyword: Cursor) -> (ActionClause, Cursor) {
        let body = self.after_keyword(keyword, KeywordId::Then);
        let first = self.source.rest(body);

        // Single-line form: `then stmt; end`.
        if let Some(end_offset) = trailing_end(first) {
            let lead = first.len() - first.trim_start().len();
            let start = body.advance(lead.min(end_offset));
            let stop = body.advance(first[..end_offset].trim_end().len());
            let clause = ActionClause {
                text: self.raw_between(start, stop),
                body_start: self.pos(start),
                range: self.span(keyword, stop.max(body)),
            };
            return (clause, body.advance(end_offset));
        }

        let mut start = None;
        if !first.trim().is_empty() {
            start = Some(self.skip_inline_space(body));
        }

        let mut line = keyword.line + 1;
        let mut last_text_line = start.map(|s| s.line);
        while line < self.source.line_count() {
            if self.source.is_end_line(line) || self.source.construct_at(line).is_some() {
                break;
            }
            if !self.source.is_blank(line) {
                if start.is_none() {
                    start = Some(Cursor::new(line, self.indent(line)));
                }
                last_text_line = Some(line);
            }
            line += 1;
        }

        let clause = match (start, last_text_line) {
            (Some(start), Some(last)) => {
                let stop = self.source.line_end(last);
                ActionClause {
                    text: self.raw_between(start, stop),
                    body_start: self.pos(start),
                    range: self.span(keyword, stop),
                }
            }
            _ => ActionClause {
                text: String::new(),
                body_start: self.pos(body),
                range: self.span(keyword, body),
            },
        };
        (clause, Cursor::new(line, 0))
    }
}

/// Byte offset of a trailing `end` word that closes a single-line action.
fn trailing_end(text: &str) -> Option<usize> {
    let trimmed = text.trim_end();
    let end_word = keywords::as_str(KeywordId::End);
    let start = trimmed.len().checked_sub(end_word.len())?;
    if trimmed.get(start..) != Some(end_word) {
        return None;
    }
    let boundary = trimmed[..start]
        .chars()
        .next_back()
        .is_none_or(|c| c.is_whitespace() || c == ';' || c == '}');
    boundary.then_some(start)
}
