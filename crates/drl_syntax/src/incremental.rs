//! Incremental reparsing
//!
//! After an edit, only the lines it touched are parsed again. For each [`ChangedRange`]:
//!
//! 1. The byte range is mapped to a line span of the new text; the same span in the previous tree's
//!    coordinates ends `line_delta` lines earlier.
//! 2. The span is widened until it fully covers every top-level node it partially overlaps.
//! 3. Nodes inside the span are dropped and nodes below it are shifted by `line_delta`.
//! 4. The corresponding lines of the new text are parsed as a standalone document, shifted into
//!    place, and merged back in start-line order.
//!
//! A window that starts or ends inside a block comment cannot be parsed alone; the whole document
//! is parsed instead.

use crate::ast::{Ranged, ShiftLines, SyntaxTree};
use crate::diagnostics::{ParseError, ParseOptions};
use crate::parser::{self, ParseOutput};
use crate::scanner::{LineIndex, Source};

/// An edited region of the new text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangedRange {
    /// Byte offset where the edit starts in the new text.
    pub start: usize,
    /// Byte offset where the inserted text ends in the new text.
    pub end: usize,
    /// Lines in the new text minus lines in the old text for this edit.
    pub line_delta: i64,
}

impl ChangedRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end: end.max(start),
            line_delta: 0,
        }
    }

    pub fn with_line_delta(mut self, line_delta: i64) -> Self {
        self.line_delta = line_delta;
        self
    }
}

/// A reparsed window, in old-tree line coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Window {
    old_first: usize,
    old_last: usize,
    delta: i64,
}

enum Outcome {
    Full(ParseOutput),
    Partial { output: ParseOutput, windows: Vec<Window> },
}

/// Reparse only the lines touched by `changes`.
///
/// ## Parameters
/// - `text`: the full new text.
/// - `previous`: the tree of the text before the edits. It is not modified.
/// - `changes`: edited regions, as byte offsets into `text`.
///
/// ## Returns
/// - The merged tree. `errors` holds the errors of the reparsed windows only, or of the whole
///   document when a full reparse was needed. [`ParsedDocument`] keeps the remaining errors.
#[tracing::instrument(skip_all, fields(len = text.len(), changes = changes.len()))]
pub fn reparse(text: &str, previous: &SyntaxTree, changes: &[ChangedRange], options: &ParseOptions) -> ParseOutput {
    match reparse_windows(text, previous, changes, options) {
        Outcome::Full(output) | Outcome::Partial { output, .. } => output,
    }
}

fn reparse_windows(text: &str, previous: &SyntaxTree, changes: &[ChangedRange], options: &ParseOptions) -> Outcome {
    if changes.is_empty() {
        return Outcome::Partial {
            output: ParseOutput {
                tree: previous.clone(),
                errors: Vec::new(),
            },
            windows: Vec::new(),
        };
    }

    let source = Source::new(text);
    let index = LineIndex::new(text);
    let last_line = source.line_count().saturating_sub(1);

    let mut ordered = changes.to_vec();
    ordered.sort_by_key(|change| change.start);

    let mut tree = previous.clone();
    let mut errors = Vec::new();
    let mut windows: Vec<Window> = Vec::new();
    let mut previous_new_last: Option<usize> = None;

    for change in ordered {
        let first_line = index.line_of(change.start);
        let last_edit_line = index.line_of(change.end);
        let old_last_edit = (last_edit_line as i64 - change.line_delta).max(first_line as i64);
        let (old_first, old_last) = widen(&tree, first_line, old_last_edit as usize);

        let new_first = old_first;
        let new_last = (old_last as i64 + change.line_delta).max(new_first as i64) as usize;
        let new_last = new_last.min(last_line);

        let overlaps_previous = previous_new_last.is_some_and(|prev| new_first <= prev);
        let in_comment = source.starts_in_comment(new_first)
            || (new_last < last_line && source.starts_in_comment(new_last + 1));
        if overlaps_previous || in_comment {
            tracing::debug!(new_first, new_last, in_comment, "falling back to a full reparse");
            return Outcome::Full(parser::parse_with_options(text, options));
        }
        previous_new_last = Some(new_last);

        remove_and_shift(&mut tree, old_first, old_last, change.line_delta);

        let window_text = source.raw_lines(new_first, new_last);
        let mut window = parser::parse_with_options(&window_text, options);
        window.tree.shift_lines(new_first as i64);
        for error in &mut window.errors {
            error.range.shift_lines(new_first as i64);
        }

        merge_package(&mut tree, &mut window.tree, &mut errors);
        tree.absorb(window.tree);
        errors.extend(window.errors);
        windows.push(Window {
            old_first,
            old_last,
            delta: change.line_delta,
        });
    }

    tracing::debug!(windows = windows.len(), "incremental reparse merged");
    Outcome::Partial {
        output: ParseOutput { tree, errors },
        windows,
    }
}

/// Grow `first..=last` until no top-level node straddles either edge.
fn widen(tree: &SyntaxTree, first: usize, last: usize) -> (usize, usize) {
    let ranges = tree.top_level_ranges();
    let (mut first, mut last) = (first, last);
    loop {
        let mut changed = false;
        for range in &ranges {
            if !range.overlaps_lines(first, last) {
                continue;
            }
            if range.start.line_index() < first {
                first = range.start.line_index();
                changed = true;
            }
            if range.end.line_index() > last {
                last = range.end.line_index();
                changed = true;
            }
        }
        if !changed {
            return (first, last);
        }
    }
}

/// Drop every node touching `first..=last`, then move everything below by `delta` lines.
fn remove_and_shift(tree: &mut SyntaxTree, first: usize, last: usize, delta: i64) {
    fn keep<T: Ranged + ShiftLines>(nodes: &mut Vec<T>, first: usize, last: usize, delta: i64) {
        nodes.retain(|n| !n.range().overlaps_lines(first, last));
        for node in nodes.iter_mut().filter(|n| n.range().start.line_index() > last) {
            node.shift_lines(delta);
        }
    }

    if tree.package.as_ref().is_some_and(|p| p.range().overlaps_lines(first, last)) {
        tree.package = None;
    }
    if let Some(package) = tree.package.as_mut().filter(|p| p.range().start.line_index() > last) {
        package.shift_lines(delta);
    }
    keep(&mut tree.attributes, first, last, delta);
    keep(&mut tree.imports, first, last, delta);
    keep(&mut tree.globals, first, last, delta);
    keep(&mut tree.functions, first, last, delta);
    keep(&mut tree.rules, first, last, delta);
    keep(&mut tree.queries, first, last, delta);
    keep(&mut tree.declares, first, last, delta);
}

/// Keep the earlier of two package declarations, as a full parse would.
fn merge_package(tree: &mut SyntaxTree, window: &mut SyntaxTree, errors: &mut Vec<ParseError>) {
    let (Some(existing), Some(incoming)) = (&tree.package, &window.package) else {
        return;
    };
    let (kept, dropped) = if existing.range.start <= incoming.range.start {
        (existing.clone(), incoming.clone())
    } else {
        (incoming.clone(), existing.clone())
    };
    errors.push(ParseError::warning(
        format!(
            "Duplicate package declaration; `{}` from line {} is kept",
            kept.name,
            kept.range.start.line + 1
        ),
        dropped.range,
    ));
    tree.package = Some(kept);
    window.package = None;
}

/// A document kept in sync with its tree and parse errors across edits.
///
/// ## Examples
/// ```rust
/// use drl_syntax::incremental::{ChangedRange, ParsedDocument};
/// use drl_syntax::ParseOptions;
///
/// let mut doc = ParsedDocument::new("rule \"A\"\nend\n", ParseOptions::default());
/// let text = "rule \"B\"\nend\n".to_string();
/// doc.apply_changes(text, &[ChangedRange::new(5, 8)]);
/// assert_eq!(doc.tree().rules[0].name, "B");
/// ```
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    text: String,
    tree: SyntaxTree,
    errors: Vec<ParseError>,
    options: ParseOptions,
}

impl ParsedDocument {
    pub fn new(text: impl Into<String>, options: ParseOptions) -> Self {
        let text = text.into();
        let output = parser::parse_with_options(&text, &options);
        Self {
            text,
            tree: output.tree,
            errors: output.errors,
            options,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn tree(&self) -> &SyntaxTree {
        &self.tree
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// Replace the text and reparse only what `changes` touched.
    ///
    /// Errors outside the reparsed windows are kept and moved with their lines.
    pub fn apply_changes(&mut self, text: String, changes: &[ChangedRange]) {
        match reparse_windows(&text, &self.tree, changes, &self.options) {
            Outcome::Full(output) => {
                self.tree = output.tree;
                self.errors = output.errors;
            }
            Outcome::Partial { output, windows } => {
                let mut errors = std::mem::take(&mut self.errors);
                for window in &windows {
                    errors.retain(|e| !e.range.overlaps_lines(window.old_first, window.old_last));
                    for error in errors.iter_mut().filter(|e| e.range.start.line_index() > window.old_last) {
                        error.range.shift_lines(window.delta);
                    }
                }
                errors.extend(output.errors);
                errors.sort_by_key(|e| e.range.start);
                errors.truncate(self.options.max_errors);
                self.tree = output.tree;
                self.errors = errors;
            }
        }
        self.text = text;
    }

    /// Replace the text and parse it from scratch.
    pub fn replace(&mut self, text: String) {
        let output = parser::parse_with_options(&text, &self.options);
        self.tree = output.tree;
        self.errors = output.errors;
        self.text = text;
    }
}
