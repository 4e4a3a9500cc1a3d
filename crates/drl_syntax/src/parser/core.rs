/// Parser core types and the top-level dispatch loop.
///
/// ## Notes
/// - This file is `include!`'d into `crate::parser`.

/// What a parse produces: always a tree, plus whatever went wrong on the way.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParseOutput {
    pub tree: SyntaxTree,
    pub errors: Vec<ParseError>,
}

impl ParseOutput {
    pub fn has_errors(&self) -> bool {
        self.errors.iter().any(ParseError::is_error)
    }
}

/// A sub-parser that could not make sense of its construct.
///
/// The controller records it as an error at `at` and resynchronizes.
#[derive(Debug, Clone, PartialEq)]
struct ParseFailure {
    message: String,
    at: Cursor,
}

impl ParseFailure {
    fn new(message: impl Into<String>, at: Cursor) -> Self {
        Self {
            message: message.into(),
            at,
        }
    }
}

/// Result of a sub-parser: the node and the cursor just past it.
type Parsed<T> = Result<(T, Cursor), ParseFailure>;

/// Parser state.
///
/// ## Notes
/// - Errors past `options.max_errors` are counted in `dropped_errors` but not kept.
struct Parser<'a> {
    source: Source<'a>,
    options: ParseOptions,
    tree: SyntaxTree,
    errors: Vec<ParseError>,
    dropped_errors: usize,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str, options: &ParseOptions) -> Self {
        Self {
            source: Source::new(text),
            options: options.clone(),
            tree: SyntaxTree::empty(),
            errors: Vec::new(),
            dropped_errors: 0,
        }
    }

    /// Parse the whole document.
    fn run(mut self) -> ParseOutput {
        let mut cursor = Cursor::default();

        while let Some(at) = self.source.skip_whitespace(cursor) {
            let next = match self.top_level(at) {
                Ok(next) => next,
                Err(failure) => {
                    let resume = self.recover(at, failure.at);
                    self.fail(failure);
                    resume
                }
            };
            // Every construct consumes at least its first character.
            cursor = if next > at { next } else { at.next_line() };
        }

        if self.dropped_errors > 0 {
            tracing::debug!(dropped = self.dropped_errors, "parse error cap reached");
        }
        self.tree.sort();
        ParseOutput {
            tree: self.tree,
            errors: self.errors,
        }
    }

    /// Dispatch on the first word at `at` and store the resulting node.
    fn top_level(&mut self, at: Cursor) -> Result<Cursor, ParseFailure> {
        let rest = self.source.rest(at);
        let (word, _) = scanner::leading_word(rest);

        match keywords::from_str(word) {
            Some(KeywordId::Package) => {
                let (node, next) = self.package(at)?;
                if let Some(first) = &self.tree.package {
                    let message = format!(
                        "Duplicate package declaration; `{}` from line {} is kept",
                        first.name,
                        first.range.start.line + 1
                    );
                    self.warn(message, node.range);
                } else {
                    self.tree.package = Some(node);
                }
                Ok(next)
            }
            Some(KeywordId::Import) => {
                let (node, next) = self.import(at)?;
                self.tree.imports.push(node);
                Ok(next)
            }
            Some(KeywordId::Global) => {
                let (node, next) = self.global(at)?;
                self.tree.globals.push(node);
                Ok(next)
            }
            Some(KeywordId::Function) => {
                let (node, next) = self.function(at)?;
                self.tree.functions.push(node);
                Ok(next)
            }
            Some(KeywordId::Rule) => {
                let (node, next) = self.rule(at)?;
                self.tree.rules.push(node);
                Ok(next)
            }
            Some(KeywordId::Query) => {
                let (node, next) = self.query(at)?;
                self.tree.queries.push(node);
                Ok(next)
            }
            Some(KeywordId::Declare) => {
                let (node, next) = self.declare(at)?;
                self.tree.declares.push(node);
                Ok(next)
            }
            _ if attributes::from_str(scanner::leading_attribute(rest).0).is_some() => {
                let end = rest.trim_end().trim_end_matches(';').len();
                let parsed = self.attribute_segments(at, &rest[..end]);
                self.tree.attributes.extend(parsed);
                Ok(at.next_line())
            }
            _ => {
                let range = self.line_range(at);
                let message = if word == keywords::as_str(KeywordId::End) {
                    "Unexpected `end` outside of a rule, query or declaration".to_string()
                } else {
                    format!("Unrecognized content `{}`", preview(rest.trim_end()))
                };
                self.warn(message, range);
                Ok(at.next_line())
            }
        }
    }
}

/// First few characters of `text`, for messages.
fn preview(text: &str) -> String {
    const LIMIT: usize = 40;
    if text.chars().count() <= LIMIT {
        text.to_string()
    } else {
        let cut: String = text.chars().take(LIMIT).collect();
        format!("{cut}...")
    }
}
