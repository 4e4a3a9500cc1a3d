/// Small helpers shared across parser chunks: error recording, positions and names.
///
/// ## Notes
/// - This file is `include!`'d into `crate::parser`.

/// A construct name as written: its text, whether it was quoted, and where it sits.
struct NameToken {
    text: String,
    quoted: bool,
    range: Range,
    end: Cursor,
}

impl<'a> Parser<'a> {
    fn push_error(&mut self, error: ParseError) {
        if self.errors.len() < self.options.max_errors {
            self.errors.push(error);
        } else {
            self.dropped_errors += 1;
        }
    }

    fn error(&mut self, message: impl Into<String>, range: Range) {
        self.push_error(ParseError::error(message, range));
    }

    fn warn(&mut self, message: impl Into<String>, range: Range) {
        self.push_error(ParseError::warning(message, range));
    }

    fn fail(&mut self, failure: ParseFailure) {
        let range = self.line_range(failure.at);
        tracing::debug!(line = failure.at.line, message = %failure.message, "recovering from parse failure");
        self.error(failure.message, range);
    }

    fn pos(&self, cursor: Cursor) -> Position {
        self.source.position(cursor)
    }

    /// Range from `start` up to (not including) `end`.
    fn span(&self, start: Cursor, end: Cursor) -> Range {
        Range::new(self.pos(start), self.pos(end))
    }

    /// Range from `at` to the last significant character of its line.
    fn line_range(&self, at: Cursor) -> Range {
        let end = self.source.line_end(at.line);
        self.span(at, end.max(at))
    }

    /// Byte column of the first significant character on `line`.
    fn indent(&self, line: usize) -> usize {
        let code = self.source.code_line(line);
        code.len() - code.trim_start().len()
    }

    /// `true` when `at` is the first word of a line that starts a top-level construct.
    fn at_construct_start(&self, at: Cursor) -> bool {
        at.column == self.indent(at.line) && self.source.construct_at(at.line).is_some()
    }

    /// Cursor just past the keyword `id` at `at`.
    fn after_keyword(&self, at: Cursor, id: KeywordId) -> Cursor {
        at.advance(keywords::as_str(id).len())
    }

    /// Cursor at the next significant character on the same line as `at`.
    fn skip_inline_space(&self, at: Cursor) -> Cursor {
        let rest = self.source.rest(at);
        at.advance(rest.len() - rest.trim_start().len())
    }

    /// Read a quoted or bare name starting at `at` (same line only).
    ///
    /// A bare name runs until whitespace, `(`, `{`, or `;`. A keyword in that position is not a
    /// name, so `rule when` yields an empty name.
    fn name_at(&self, at: Cursor) -> Result<NameToken, ParseFailure> {
        let at = self.skip_inline_space(at);
        let code = self.source.code_line(at.line);
        let rest = self.source.rest(at);

        if rest.starts_with('"') || rest.starts_with('\'') {
            let Some(close) = scanner::string_end(code, at.column) else {
                return Err(ParseFailure::new("Unterminated quoted name", at));
            };
            let raw = self.source.raw_line(at.line);
            let body = raw.get(at.column + 1..close - 1).unwrap_or("");
            let end = Cursor::new(at.line, close);
            return Ok(NameToken {
                text: scanner::unescape(body),
                quoted: true,
                range: self.span(at, end),
                end,
            });
        }

        let len = rest
            .find(|c: char| c.is_whitespace() || matches!(c, '(' | '{' | ';' | '"' | '\''))
            .unwrap_or(rest.len());
        let word = &rest[..len];
        let is_keyword = keywords::from_str(word).is_some();
        let (text, end) = if is_keyword {
            (String::new(), at)
        } else {
            (word.to_string(), at.advance(len))
        };
        Ok(NameToken {
            text,
            quoted: false,
            range: self.span(at, end),
            end,
        })
    }

    /// Raw text from `start` up to (not including) `end`, across lines.
    fn raw_between(&self, start: Cursor, end: Cursor) -> String {
        if end <= start {
            return String::new();
        }
        if start.line == end.line {
            let line = self.source.raw_line(start.line);
            return line.get(start.column..end.column).unwrap_or("").to_string();
        }
        let mut text = self.source.raw_rest(start).to_string();
        for line in start.line + 1..end.line {
            text.push('\n');
            text.push_str(self.source.raw_line(line));
        }
        text.push('\n');
        text.push_str(self.source.raw_line(end.line).get(..end.column).unwrap_or(""));
        text
    }

    /// Cursor at the keyword `id` if it is the next significant word after `from`.
    fn next_keyword(&self, from: Cursor, id: KeywordId) -> Option<Cursor> {
        let at = self.source.skip_whitespace(from)?;
        scanner::starts_with_keyword(self.source.rest(at), id).then_some(at)
    }

    /// Parse `name value, name value` attribute segments from `text`, which starts at `at`.
    fn attribute_segments(&self, at: Cursor, text: &str) -> Vec<AttributeNode> {
        let mut nodes = Vec::new();
        for (offset, segment) in scanner::split_top_level_commas(text, false) {
            let lead = segment.len() - segment.trim_start().len();
            let trimmed = segment.trim();
            if trimmed.is_empty() {
                continue;
            }
            let (name, value) = scanner::leading_attribute(trimmed);
            let start = at.advance(offset + lead);
            let end = start.advance(trimmed.len());
            let raw_value = self
                .source
                .raw_line(at.line)
                .get(start.column + name.len()..end.column)
                .unwrap_or(value)
                .trim();
            nodes.push(AttributeNode {
                name: name.to_string(),
                value: raw_value.to_string(),
                range: self.span(start, end),
            });
        }
        nodes
    }
}

/// Parse a comma-separated parameter list (`String name, int age`).
fn parameters(text: &str) -> Vec<Parameter> {
    scanner::split_top_level_commas(text, true)
        .into_iter()
        .filter_map(|(_, part)| {
            let part = part.trim();
            if part.is_empty() {
                return None;
            }
            match part.rsplit_once(char::is_whitespace) {
                Some((type_name, name)) => Some(Parameter {
                    type_name: Some(type_name.trim().to_string()),
                    name: name.to_string(),
                }),
                None => Some(Parameter {
                    type_name: None,
                    name: part.to_string(),
                }),
            }
        })
        .collect()
}
