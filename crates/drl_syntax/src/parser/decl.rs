/// Parsing for the non-rule constructs: `package`, `import`, `global`, `function`, `query`,
/// and `declare`.
///
/// ## Notes
/// - This file is `include!`'d into `crate::parser`.
/// - `package`, `import` and `global` are single-line constructs with an optional `;`.

impl<'a> Parser<'a> {
    /// `package com.example.rules;`
    fn package(&mut self, at: Cursor) -> Parsed<PackageNode> {
        let after = self.after_keyword(at, KeywordId::Package);
        let name = statement_body(self.source.rest(after));
        if name.is_empty() {
            return Err(ParseFailure::new("Expected a package name after `package`", at));
        }
        let node = PackageNode {
            name: name.to_string(),
            range: self.line_range(at),
        };
        Ok((node, at.next_line()))
    }

    /// `import [function|static] com.example.Person;`
    fn import(&mut self, at: Cursor) -> Parsed<ImportNode> {
        let after = self.after_keyword(at, KeywordId::Import);
        let body = statement_body(self.source.rest(after));
        let (word, tail) = scanner::leading_word(body);
        let qualified = tail.starts_with(char::is_whitespace);

        let (kind, target) = match word {
            w if qualified && w == keywords::as_str(KeywordId::Function) => (ImportKind::Function, tail.trim()),
            "static" if qualified => (ImportKind::Static, tail.trim()),
            _ => (ImportKind::Type, body),
        };
        if target.is_empty() {
            return Err(ParseFailure::new("Expected an import target after `import`", at));
        }
        let node = ImportNode {
            target: target.to_string(),
            kind,
            range: self.line_range(at),
        };
        Ok((node, at.next_line()))
    }

    /// `global java.util.List results;`
    fn global(&mut self, at: Cursor) -> Parsed<GlobalNode> {
        let after = self.after_keyword(at, KeywordId::Global);
        let rest = self.source.rest(after);
        let body = statement_body(rest);
        let lead = rest.len() - rest.trim_start().len();

        let Some((type_name, name)) = body.rsplit_once(char::is_whitespace) else {
            return Err(ParseFailure::new("Expected `global <Type> <name>`", at));
        };
        let name_start = after.advance(lead + body.len() - name.len());
        let node = GlobalNode {
            type_name: type_name.trim().to_string(),
            name: name.to_string(),
            name_range: self.span(name_start, name_start.advance(name.len())),
            range: self.line_range(at),
        };
        Ok((node, at.next_line()))
    }

    /// `function ReturnType name(Type a, Type b) { body }`
    ///
    /// An unclosed body records an error; the function node is still produced and ends before
    /// the next construct.
    fn function(&mut self, at: Cursor) -> Parsed<FunctionNode> {
        let after = self.after_keyword(at, KeywordId::Function);
        let rest = self.source.rest(after);
        let Some(paren) = rest.find('(') else {
            return Err(ParseFailure::new("Expected `(` after the function name", at));
        };

        let header = rest[..paren].trim_end();
        let words: Vec<&str> = header.split_whitespace().collect();
        let (return_type, name) = match words.split_last() {
            Some((name, [])) => (None, *name),
            Some((name, types)) => (Some(types.join(" ")), *name),
            None => (None, ""),
        };
        let name_start = after.advance(header.len() - name.len());
        let name_range = self.span(name_start, name_start.advance(name.len()));
        let name = name.to_string();

        let open = after.advance(paren);
        let close = brackets::find_closing(&self.source, open, BracketKind::Paren)
            .map_err(|_| ParseFailure::new("Unclosed parameter list", open))?;
        let parameters = parameters(&self.raw_between(open.advance(1), close));

        let brace = match self.source.skip_whitespace(close.advance(1)) {
            Some(brace) if self.source.rest(brace).starts_with('{') => brace,
            Some(other) if other.line == close.line => {
                return Err(ParseFailure::new("Expected `{` to open the function body", other));
            }
            _ => return Err(ParseFailure::new("Expected `{` to open the function body", close)),
        };

        let (body, end, next) = match brackets::find_closing(&self.source, brace, BracketKind::Brace) {
            Ok(closing) => {
                let body = self.raw_between(brace.advance(1), closing);
                (body, closing.advance(1), closing.advance(1))
            }
            Err(unclosed) => {
                let stop = match unclosed {
                    Unclosed::StoppedAt(line) => line,
                    Unclosed::EndOfInput => self.source.line_count(),
                };
                let last = (brace.line..stop)
                    .rev()
                    .find(|&line| !self.source.is_blank(line))
                    .unwrap_or(brace.line);
                let end = self.source.line_end(last).max(brace.advance(1));
                let label = if name.is_empty() { "<unnamed>" } else { name.as_str() };
                let message = format!("Unclosed body for function `{label}`");
                let range = self.line_range(brace);
                self.error(message, range);
                (self.raw_between(brace.advance(1), end), end, Cursor::new(stop, 0))
            }
        };

        let node = FunctionNode {
            return_type,
            name,
            name_range,
            parameters,
            body,
            range: self.span(at, end),
        };
        Ok((node, next))
    }

    /// `query "name" (Type param, ...)` conditions `end`
    fn query(&mut self, at: Cursor) -> Parsed<QueryNode> {
        let name = self.name_at(self.after_keyword(at, KeywordId::Query))?;
        if name.text.is_empty() {
            return Err(ParseFailure::new("Expected a query name after `query`", at));
        }

        let mut cursor = name.end;
        let mut parameters_list = Vec::new();
        let open = self.skip_inline_space(cursor);
        if self.source.rest(open).starts_with('(') {
            let close = brackets::find_closing(&self.source, open, BracketKind::Paren)
                .map_err(|_| ParseFailure::new("Unclosed query parameter list", open))?;
            parameters_list = parameters(&self.raw_between(open.advance(1), close));
            cursor = close.advance(1);
        }

        let (conditions, stopped) = self.conditions(cursor);
        let (end, next) = match self.next_keyword(stopped, KeywordId::End) {
            Some(keyword) => {
                let after = self.after_keyword(keyword, KeywordId::End);
                (self.pos(after), after)
            }
            None => {
                let message = format!("Missing `end` for query \"{}\"", name.text);
                let range = self.line_range(at);
                self.error(message, range);
                let end = conditions.last().map_or(name.range.end, |c| c.range.end);
                (end, stopped)
            }
        };

        let node = QueryNode {
            name: name.text,
            name_range: name.range,
            parameters: parameters_list,
            conditions,
            range: Range::new(self.pos(at), end),
        };
        Ok((node, next))
    }

    /// `declare [enum|trait] Name [extends Super]`, annotation and field lines, `end`.
    fn declare(&mut self, at: Cursor) -> Parsed<DeclareNode> {
        let head = self.skip_inline_space(self.after_keyword(at, KeywordId::Declare));
        let (word, tail) = scanner::leading_word(self.source.rest(head));
        let modifier = |kind, len| (kind, head.advance(len));
        let (kind, name_at) = match word {
            "enum" if tail.starts_with(char::is_whitespace) => modifier(DeclareKind::Enum, word.len()),
            "trait" if tail.starts_with(char::is_whitespace) => modifier(DeclareKind::Trait, word.len()),
            _ => (DeclareKind::Type, head),
        };

        let name = self.name_at(name_at)?;
        if name.text.is_empty() {
            return Err(ParseFailure::new("Expected a type name after `declare`", at));
        }

        let mut supertype = None;
        let after_name = self.skip_inline_space(name.end);
        let header_rest = self.source.rest(after_name);
        if scanner::starts_with_keyword(header_rest, KeywordId::Extends) {
            let after_extends = &header_rest[keywords::as_str(KeywordId::Extends).len()..];
            let (parent, _) = scanner::leading_name(after_extends.trim_start());
            if !parent.is_empty() {
                supertype = Some(parent.to_string());
            }
        }
        let mut annotations = annotations_in(header_rest);

        let mut fields = Vec::new();
        let mut line = at.line + 1;
        let (end, next) = loop {
            if line >= self.source.line_count() || self.source.construct_at(line).is_some() {
                let message = format!("Missing `end` for declaration `{}`", name.text);
                let range = self.line_range(at);
                self.error(message, range);
                let end = fields.last().map_or(name.range.end, |f: &FieldNode| f.range.end);
                break (end, Cursor::new(line, 0));
            }
            if self.source.is_end_line(line) {
                let after = Cursor::new(line, self.indent(line)).advance(keywords::as_str(KeywordId::End).len());
                break (self.pos(after), Cursor::new(line + 1, 0));
            }
            if !self.source.is_blank(line) {
                let start = Cursor::new(line, self.indent(line));
                let text = self.source.rest(start).trim_end();
                if text.starts_with('@') {
                    annotations.extend(annotations_in(text));
                } else if let Some(member) = self.declare_member(kind, start, text) {
                    fields.extend(member);
                } else {
                    let message = format!("Unrecognized declaration member `{}`", preview(text));
                    let range = self.line_range(start);
                    self.warn(message, range);
                }
            }
            line += 1;
        };

        let node = DeclareNode {
            kind,
            name: name.text,
            name_range: name.range,
            supertype,
            annotations,
            fields,
            range: Range::new(self.pos(at), end),
        };
        Ok((node, next))
    }

    /// Fields on one member line: `name : Type @key`, or enum constants `RED, GREEN("g");`.
    fn declare_member(&self, kind: DeclareKind, start: Cursor, text: &str) -> Option<Vec<FieldNode>> {
        if let Some((name, rest)) = text.split_once(':') {
            let name = name.trim();
            if name.is_empty() || name.contains(char::is_whitespace) {
                return None;
            }
            let rest = rest.trim().trim_end_matches(';');
            let (type_text, annotation_text) = rest.split_once('@').map_or((rest, ""), |(t, _)| {
                let at = t.len();
                (t, &rest[at..])
            });
            let type_name = type_text.trim();
            let end = start.advance(text.len());
            return Some(vec![FieldNode {
                name: name.to_string(),
                type_name: (!type_name.is_empty()).then(|| type_name.to_string()),
                annotations: annotations_in(annotation_text),
                range: self.span(start, end),
            }]);
        }

        if kind != DeclareKind::Enum {
            return None;
        }
        let constants = text.trim_end_matches(';');
        let fields = scanner::split_top_level_commas(constants, false)
            .into_iter()
            .filter_map(|(offset, part)| {
                let lead = part.len() - part.trim_start().len();
                let part = part.trim();
                let (name, _) = scanner::leading_name(part);
                if name.is_empty() {
                    return None;
                }
                let from = start.advance(offset + lead);
                Some(FieldNode {
                    name: name.to_string(),
                    type_name: None,
                    annotations: Vec::new(),
                    range: self.span(from, from.advance(part.len())),
                })
            })
            .collect::<Vec<_>>();
        (!fields.is_empty()).then_some(fields)
    }
}

/// The text of a single-line statement without its keyword, surrounding space, or `;`.
fn statement_body(rest: &str) -> &str {
    rest.trim().trim_end_matches(';').trim_end()
}

/// Every `@name` or `@name(...)` annotation in `text`.
fn annotations_in(text: &str) -> Vec<String> {
    let bytes = text.as_bytes();
    let mut found = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'@' {
            i += 1;
            continue;
        }
        let (name, after) = scanner::leading_name(&text[i + 1..]);
        let mut end = i + 1 + name.len();
        if after.starts_with('(') {
            let mut depth = 0usize;
            for (offset, b) in after.bytes().enumerate() {
                match b {
                    b'(' => depth += 1,
                    b')' => {
                        depth = depth.saturating_sub(1);
                        if depth == 0 {
                            end += offset + 1;
                            break;
                        }
                    }
                    _ => {}
                }
            }
            if depth > 0 {
                end = bytes.len();
            }
        }
        if !name.is_empty() {
            found.push(text[i..end].to_string());
        }
        i = end.max(i + 1);
    }
    found
}
