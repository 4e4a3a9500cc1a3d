//! Line scanner and position tracker
//!
//! DRL is parsed line by line. [`Source`] splits a document into lines and keeps two views of
//! each line:
//! - the **raw** text, used wherever text is captured verbatim (action clauses, function bodies,
//!   rule names), and
//! - the **code** text, where every byte that belongs to a comment has been replaced by a space.
//!
//! Masking preserves byte offsets, so a column found in the code view is valid in the raw view.
//! The parser therefore never has to think about comments: it only ever looks at code text.
//!
//! ## Notes
//! - `//` ends a line; `/* ... */` may span lines.
//! - Block comments are flat: the first `*/` closes the comment even if another `/*` appeared
//!   inside it.
//! - String literals (`"..."` and `'...'`) are scanned escape-aware and never span lines, so
//!   comment markers and brackets inside them are not syntax.

use crate::ast::Position;
use drl_core::lang::keywords::{self, KeywordId};

// ============================================================================
// Source
// ============================================================================

/// A document split into raw and comment-masked lines.
#[derive(Debug, Clone)]
pub struct Source<'a> {
    raw: Vec<&'a str>,
    code: Vec<String>,
    /// `true` when the line begins inside an unterminated block comment.
    starts_in_comment: Vec<bool>,
}

impl<'a> Source<'a> {
    pub fn new(text: &'a str) -> Self {
        let raw: Vec<&'a str> = text
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .collect();
        let (code, starts_in_comment) = mask_comments(&raw);
        Self {
            raw,
            code,
            starts_in_comment,
        }
    }

    pub fn line_count(&self) -> usize {
        self.raw.len()
    }

    /// Raw text of `line`, or `""` past the end of the document.
    pub fn raw_line(&self, line: usize) -> &'a str {
        self.raw.get(line).copied().unwrap_or("")
    }

    /// Comment-masked text of `line`, or `""` past the end of the document.
    pub fn code_line(&self, line: usize) -> &str {
        self.code.get(line).map(String::as_str).unwrap_or("")
    }

    pub fn starts_in_comment(&self, line: usize) -> bool {
        self.starts_in_comment.get(line).copied().unwrap_or(false)
    }

    /// `true` if the masked line has no significant characters.
    pub fn is_blank(&self, line: usize) -> bool {
        self.code_line(line).trim().is_empty()
    }

    /// Code text from `cursor` to the end of its line.
    pub fn rest(&self, cursor: Cursor) -> &str {
        self.code_line(cursor.line).get(cursor.column..).unwrap_or("")
    }

    /// Raw text from `cursor` to the end of its line.
    pub fn raw_rest(&self, cursor: Cursor) -> &'a str {
        self.raw_line(cursor.line).get(cursor.column..).unwrap_or("")
    }

    /// Convert a cursor into a document position (character column).
    pub fn position(&self, cursor: Cursor) -> Position {
        Position::new(cursor.line, char_column(self.raw_line(cursor.line), cursor.column))
    }

    /// Cursor at the end of `line` (after its last significant character).
    pub fn line_end(&self, line: usize) -> Cursor {
        Cursor::new(line, self.code_line(line).trim_end().len())
    }

    /// Advance `cursor` to the next significant character, crossing lines as needed.
    ///
    /// ## Returns
    /// - `None` when only whitespace and comments remain.
    pub fn skip_whitespace(&self, cursor: Cursor) -> Option<Cursor> {
        let mut at = cursor;
        while at.line < self.line_count() {
            let rest = self.rest(at);
            if let Some(offset) = rest.find(|c: char| !c.is_whitespace()) {
                return Some(Cursor::new(at.line, at.column + offset));
            }
            at = at.next_line();
        }
        None
    }

    /// Raw lines `first..=last` joined with `\n`.
    pub fn raw_lines(&self, first: usize, last: usize) -> String {
        if first > last {
            return String::new();
        }
        (first..=last.min(self.line_count().saturating_sub(1)))
            .map(|line| self.raw_line(line))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Top-level construct keyword that starts `line`, if any.
    pub fn construct_at(&self, line: usize) -> Option<KeywordId> {
        let text = self.code_line(line).trim_start();
        let (word, after) = leading_word(text);
        let id = keywords::from_str(word)?;
        let boundary = after
            .chars()
            .next()
            .is_none_or(|c| c.is_whitespace() || c == '"' || c == '\'');
        (keywords::starts_construct(id) && boundary).then_some(id)
    }

    /// `true` if the line consists of the `end` keyword alone.
    pub fn is_end_line(&self, line: usize) -> bool {
        self.code_line(line).trim() == keywords::as_str(KeywordId::End)
    }

    /// `true` if the line starts a construct or closes one; recovery stops on such lines.
    pub fn is_sync_line(&self, line: usize) -> bool {
        self.construct_at(line).is_some() || self.is_end_line(line)
    }
}

// ============================================================================
// Cursor
// ============================================================================

/// Scan position threaded through the parser.
///
/// `column` is a byte offset into the line. Cursors are plain values: sub-parsers take one and
/// return the cursor where they stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Cursor {
    pub line: usize,
    pub column: usize,
}

impl Cursor {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Start of the following line.
    pub fn next_line(self) -> Self {
        Self::new(self.line + 1, 0)
    }

    /// Same line, `bytes` further right.
    pub fn advance(self, bytes: usize) -> Self {
        Self::new(self.line, self.column + bytes)
    }
}

// ============================================================================
// Comment masking
// ============================================================================

/// Replace every comment byte with a space, line by line.
///
/// ## Returns
/// - The masked lines, and for each line whether it starts inside a block comment.
fn mask_comments(lines: &[&str]) -> (Vec<String>, Vec<bool>) {
    let mut code = Vec::with_capacity(lines.len());
    let mut starts = Vec::with_capacity(lines.len());
    let mut in_block = false;

    for raw in lines {
        starts.push(in_block);
        let bytes = raw.as_bytes();
        let mut out = bytes.to_vec();
        let mut quote: Option<u8> = None;
        let mut i = 0;

        while i < bytes.len() {
            let b = bytes[i];
            let next = bytes.get(i + 1).copied();

            if in_block {
                if b == b'*' && next == Some(b'/') {
                    out[i] = b' ';
                    out[i + 1] = b' ';
                    in_block = false;
                    i += 2;
                } else {
                    out[i] = b' ';
                    i += 1;
                }
                continue;
            }

            if let Some(q) = quote {
                if b == b'\\' {
                    i += 2;
                    continue;
                }
                if b == q {
                    quote = None;
                }
                i += 1;
                continue;
            }

            match (b, next) {
                (b'"' | b'\'', _) => quote = Some(b),
                (b'/', Some(b'/')) => {
                    for byte in &mut out[i..] {
                        *byte = b' ';
                    }
                    break;
                }
                (b'/', Some(b'*')) => {
                    out[i] = b' ';
                    out[i + 1] = b' ';
                    in_block = true;
                    i += 2;
                    continue;
                }
                _ => {}
            }
            i += 1;
        }

        // Only whole comment spans are blanked, and those start and end on ASCII delimiters.
        code.push(String::from_utf8(out).unwrap_or_else(|_| (*raw).to_string()));
    }

    (code, starts)
}

// ============================================================================
// Small lexical helpers
// ============================================================================

/// Character column of byte offset `byte` in `line`.
pub fn char_column(line: &str, byte: usize) -> usize {
    line.char_indices().take_while(|(i, _)| *i < byte).count()
}

/// [`char_column`] for byte offsets visited left to right along one line.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColumnCounter {
    byte: usize,
    chars: usize,
}

impl ColumnCounter {
    /// Character column of `byte` in `line`.
    pub fn column(&mut self, line: &str, byte: usize) -> usize {
        if byte < self.byte {
            *self = Self::default();
        }
        let start = self.byte;
        for (i, c) in line.get(start..).unwrap_or("").char_indices() {
            if start + i >= byte {
                break;
            }
            self.chars += 1;
            self.byte = start + i + c.len_utf8();
        }
        self.chars
    }
}

/// Return the byte offset just past the closing quote of the string starting at `start`.
///
/// ## Returns
/// - `None` if the string is not terminated on this line.
pub fn string_end(line: &str, start: usize) -> Option<usize> {
    let bytes = line.as_bytes();
    let quote = *bytes.get(start)?;
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b if b == quote => return Some(i + 1),
            _ => i += 1,
        }
    }
    None
}

/// Unescape the body of a quoted literal (without its quotes).
pub fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(match escaped {
                    'n' => '\n',
                    't' => '\t',
                    other => other,
                });
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Split off the leading keyword-like word (`[A-Za-z0-9_]+`).
pub fn leading_word(text: &str) -> (&str, &str) {
    split_while(text, |c| c.is_ascii_alphanumeric() || c == '_')
}

/// Split off a leading name that may contain dots, `$`, and generics punctuation-free
/// identifiers (`com.example.Person`, `$p`).
pub fn leading_name(text: &str) -> (&str, &str) {
    split_while(text, |c| c.is_ascii_alphanumeric() || c == '_' || c == '$' || c == '.')
}

/// Split off a leading attribute name (`no-loop`, `agenda-group`).
pub fn leading_attribute(text: &str) -> (&str, &str) {
    split_while(text, |c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn split_while(text: &str, keep: impl Fn(char) -> bool) -> (&str, &str) {
    let end = text.find(|c: char| !keep(c)).unwrap_or(text.len());
    text.split_at(end)
}

/// `true` if `text` starts with the keyword `id` as a whole word.
pub fn starts_with_keyword(text: &str, id: KeywordId) -> bool {
    leading_word(text).0 == keywords::as_str(id)
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

/// Byte offset of the first whole-word occurrence of one of `words` outside strings and at
/// bracket depth zero.
///
/// Used to split lines such as `rule "R" when Person() then end` into their clauses.
pub fn find_top_level_word(line: &str, words: &[KeywordId]) -> Option<(usize, KeywordId)> {
    find_word_at_depth(line, words, 0)
}

/// Like [`find_top_level_word`], for a line that begins with `depth` brackets already open.
pub fn find_word_at_depth(line: &str, words: &[KeywordId], depth: usize) -> Option<(usize, KeywordId)> {
    let bytes = line.as_bytes();
    let mut depth = depth;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        match b {
            b'"' | b'\'' => {
                i = string_end(line, i).unwrap_or(bytes.len());
                continue;
            }
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => depth = depth.saturating_sub(1),
            _ if depth == 0 && b.is_ascii_alphabetic() && (i == 0 || !is_ident_byte(bytes[i - 1])) => {
                let (word, _) = leading_word(&line[i..]);
                if let Some(id) = words.iter().copied().find(|id| keywords::as_str(*id) == word) {
                    return Some((i, id));
                }
                i += word.len().max(1);
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// Split `text` at top-level commas (outside strings and brackets).
///
/// With `angle_brackets`, `<...>` also nests, so `Map<K, V> m` stays one part.
pub fn split_top_level_commas(text: &str, angle_brackets: bool) -> Vec<(usize, &str)> {
    let bytes = text.as_bytes();
    let mut parts = Vec::new();
    let mut depth: usize = 0;
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'"' | b'\'' => {
                i = string_end(text, i).unwrap_or(bytes.len());
                continue;
            }
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => depth = depth.saturating_sub(1),
            b'<' if angle_brackets => depth += 1,
            b'>' if angle_brackets => depth = depth.saturating_sub(1),
            b',' if depth == 0 => {
                parts.push((start, &text[start..i]));
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    parts.push((start, &text[start..]));
    parts
}

// ============================================================================
// Variables
// ============================================================================

/// A `$name` occurrence found by [`variable_tokens`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableToken {
    pub name: String,
    /// Line offset within the scanned text.
    pub line: usize,
    /// Byte column within that line.
    pub column: usize,
    /// `true` when followed by `:` or `:=` (a binding rather than a use).
    pub is_binding: bool,
}

/// Find every `$name` token outside strings and comments.
pub fn variable_tokens(text: &str) -> Vec<VariableToken> {
    let source = Source::new(text);
    let mut tokens = Vec::new();

    for line in 0..source.line_count() {
        let code = source.code_line(line);
        let bytes = code.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'"' | b'\'' => {
                    i = string_end(code, i).unwrap_or(bytes.len());
                    continue;
                }
                b'$' if i == 0 || !is_ident_byte(bytes[i - 1]) => {
                    let (name, after) = split_while(&code[i + 1..], |c| c.is_ascii_alphanumeric() || c == '_');
                    if !name.is_empty() {
                        let after = after.trim_start();
                        let is_binding = after.starts_with(':') && !after.starts_with("::");
                        tokens.push(VariableToken {
                            name: format!("${name}"),
                            line,
                            column: i,
                            is_binding,
                        });
                        i += 1 + name.len();
                        continue;
                    }
                }
                _ => {}
            }
            i += 1;
        }
    }

    tokens
}

// ============================================================================
// Byte offsets
// ============================================================================

/// Byte-offset ↔ line lookup for a document.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<usize>,
    len: usize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(text.match_indices('\n').map(|(i, _)| i + 1));
        Self {
            line_starts,
            len: text.len(),
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Zero-based line containing byte `offset` (clamped to the document).
    pub fn line_of(&self, offset: usize) -> usize {
        let offset = offset.min(self.len);
        self.line_starts.partition_point(|&start| start <= offset).saturating_sub(1)
    }

    /// Byte offset where `line` starts (clamped to the document).
    pub fn line_start(&self, line: usize) -> usize {
        self.line_starts.get(line).copied().unwrap_or(self.len)
    }

    /// Document position of byte `offset`.
    pub fn position(&self, text: &str, offset: usize) -> Position {
        let line = self.line_of(offset);
        let start = self.line_start(line);
        let line_text = text.get(start..).unwrap_or("");
        Position::new(line, char_column(line_text, offset.min(self.len) - start))
    }

    /// Byte offset of a document position (clamped to its line).
    pub fn offset(&self, text: &str, position: Position) -> usize {
        let start = self.line_start(position.line_index());
        let end = self.line_start(position.line_index() + 1).min(self.len);
        let line_text = text.get(start..end).unwrap_or("");
        let column = line_text
            .char_indices()
            .nth(position.column())
            .map_or(line_text.trim_end_matches('\n').len(), |(i, _)| i);
        start + column
    }
}
