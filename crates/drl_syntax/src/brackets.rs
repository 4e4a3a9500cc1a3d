//! Bracket and pattern-region tracking
//!
//! [`BracketTracker`] keeps one stack per [`BracketKind`] across any number of lines. It is fed
//! comment-masked lines (see [`crate::scanner::Source`]) and skips string literals itself, so the
//! same tracker serves the parser (multi-line condition extents) and the bracket-balance lint.
//!
//! A pattern keyword (`exists`, `not`, `eval`, `forall`, `collect`, `accumulate`) directly
//! followed by `(` opens a [`PatternRegion`]. Regions live in a flat arena: each one records its
//! parent's index and its depth, and the matching `)` closes it.

use crate::ast::{Position, ShiftLines};
use crate::scanner::{self, Cursor, Source};
use drl_core::lang::brackets::{self as kinds, BracketKind};
use drl_core::lang::keywords::{self, KeywordId};

/// Default cap on nested pattern regions.
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 50;

/// A matched open/close pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BracketPair {
    pub kind: BracketKind,
    pub open: Position,
    pub close: Position,
}

/// A `keyword(` ... `)` region such as `exists( ... )`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternRegion {
    pub keyword: KeywordId,
    /// Position of the opening `(`.
    pub open: Position,
    /// Position of the matching `)`, if one was found.
    pub close: Option<Position>,
    /// Zero for a region not nested in another region.
    pub depth: usize,
    /// Arena index of the enclosing region.
    pub parent: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BracketIssue {
    /// A closing bracket with no open bracket of its kind.
    UnmatchedClosing { kind: BracketKind, at: Position },
    /// An opening bracket still open at the end of input.
    UnmatchedOpening { kind: BracketKind, at: Position },
    /// A pattern region that would exceed the nesting cap.
    NestingTooDeep {
        keyword: KeywordId,
        at: Position,
        limit: usize,
    },
}

impl BracketIssue {
    pub fn position(&self) -> Position {
        match self {
            BracketIssue::UnmatchedClosing { at, .. }
            | BracketIssue::UnmatchedOpening { at, .. }
            | BracketIssue::NestingTooDeep { at, .. } => *at,
        }
    }

    pub fn message(&self) -> String {
        match self {
            BracketIssue::UnmatchedClosing { kind, .. } => {
                format!("Unmatched closing '{}'", kind.close())
            }
            BracketIssue::UnmatchedOpening { kind, .. } => {
                format!("Unclosed '{}'", kind.open())
            }
            BracketIssue::NestingTooDeep { keyword, limit, .. } => format!(
                "`{}` pattern nested deeper than {} levels",
                keywords::as_str(*keyword),
                limit
            ),
        }
    }
}

/// Everything the tracker found.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BracketReport {
    pub pairs: Vec<BracketPair>,
    pub regions: Vec<PatternRegion>,
    pub issues: Vec<BracketIssue>,
}

impl BracketReport {
    pub fn is_balanced(&self) -> bool {
        !self.issues.iter().any(|issue| {
            matches!(
                issue,
                BracketIssue::UnmatchedClosing { .. } | BracketIssue::UnmatchedOpening { .. }
            )
        })
    }
}

#[derive(Debug, Clone, Copy)]
struct OpenBracket {
    at: Position,
    region: Option<usize>,
}

/// Incremental bracket matcher.
#[derive(Debug, Clone)]
pub struct BracketTracker {
    max_depth: usize,
    stacks: [Vec<OpenBracket>; 3],
    /// Arena indices of regions that are still open, innermost last.
    open_regions: Vec<usize>,
    report: BracketReport,
}

impl BracketTracker {
    pub fn new(max_depth: usize) -> Self {
        Self {
            max_depth,
            stacks: [Vec::new(), Vec::new(), Vec::new()],
            open_regions: Vec::new(),
            report: BracketReport::default(),
        }
    }

    /// Number of open brackets of `kind`.
    pub fn depth(&self, kind: BracketKind) -> usize {
        self.stacks[kind.index()].len()
    }

    /// Number of open brackets of every kind.
    pub fn open_count(&self) -> usize {
        self.stacks.iter().map(Vec::len).sum()
    }

    /// Feed one line.
    ///
    /// ## Parameters
    /// - `line`: document line number, used for positions.
    /// - `code`: the comment-masked text to scan.
    /// - `raw`: the unmasked line, used to convert byte offsets into character columns.
    /// - `from`: byte offset in `code` where scanning starts.
    pub fn scan_line(&mut self, line: usize, code: &str, raw: &str, from: usize) {
        let bytes = code.as_bytes();
        let mut columns = scanner::ColumnCounter::default();
        let mut position = |byte: usize| Position::new(line, columns.column(raw, byte));
        let mut pending: Option<KeywordId> = None;
        let mut i = from;

        while i < bytes.len() {
            let b = bytes[i];
            if b == b'"' || b == b'\'' {
                i = scanner::string_end(code, i).unwrap_or(bytes.len());
                pending = None;
                continue;
            }

            if b.is_ascii_alphabetic() && (i == 0 || !is_word_byte(bytes[i - 1])) {
                let (word, after) = scanner::leading_word(&code[i..]);
                pending = None;
                if let Some(id) = keywords::from_str(word).filter(|id| keywords::opens_pattern(*id)) {
                    let gap = after.len() - after.trim_start_matches([' ', '\t']).len();
                    if after[gap..].starts_with('(') {
                        pending = Some(id);
                        i += word.len() + gap;
                        continue;
                    }
                }
                i += word.len();
                continue;
            }

            if let Some((kind, is_open)) = kinds::classify(char::from(b)) {
                if is_open {
                    let region = match pending.take() {
                        Some(keyword) if kind == BracketKind::Paren => self.open_region(keyword, position(i)),
                        _ => None,
                    };
                    self.stacks[kind.index()].push(OpenBracket { at: position(i), region });
                } else {
                    self.close(kind, position(i));
                }
            } else if !b.is_ascii_whitespace() {
                pending = None;
            }
            i += 1;
        }
    }

    /// Feed every line of `source` in `first..=last`.
    pub fn scan_source(&mut self, source: &Source<'_>, first: usize, last: usize) {
        for line in first..=last.min(source.line_count().saturating_sub(1)) {
            self.scan_line(line, source.code_line(line), source.raw_line(line), 0);
        }
    }

    fn open_region(&mut self, keyword: KeywordId, at: Position) -> Option<usize> {
        let depth = self.open_regions.len();
        if depth >= self.max_depth {
            self.report.issues.push(BracketIssue::NestingTooDeep {
                keyword,
                at,
                limit: self.max_depth,
            });
            return None;
        }
        let index = self.report.regions.len();
        self.report.regions.push(PatternRegion {
            keyword,
            open: at,
            close: None,
            depth,
            parent: self.open_regions.last().copied(),
        });
        self.open_regions.push(index);
        Some(index)
    }

    fn close(&mut self, kind: BracketKind, at: Position) {
        let Some(open) = self.stacks[kind.index()].pop() else {
            self.report.issues.push(BracketIssue::UnmatchedClosing { kind, at });
            return;
        };
        self.report.pairs.push(BracketPair {
            kind,
            open: open.at,
            close: at,
        });
        if let Some(index) = open.region {
            if let Some(region) = self.report.regions.get_mut(index) {
                region.close = Some(at);
            }
            self.open_regions.retain(|&r| r != index);
        }
    }

    /// Report whatever is still open and return the full report.
    pub fn finish(mut self) -> BracketReport {
        let mut unclosed: Vec<BracketIssue> = BracketKind::ALL
            .iter()
            .flat_map(|&kind| {
                self.stacks[kind.index()]
                    .iter()
                    .map(move |open| BracketIssue::UnmatchedOpening { kind, at: open.at })
            })
            .collect();
        unclosed.sort_by_key(BracketIssue::position);
        self.report.issues.extend(unclosed);
        self.report
    }
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$' || b == b'.'
}

/// Check bracket balance over a whole document.
pub fn check_balance(text: &str, max_depth: usize) -> BracketReport {
    let source = Source::new(text);
    let mut tracker = BracketTracker::new(max_depth);
    tracker.scan_source(&source, 0, source.line_count().saturating_sub(1));
    tracker.finish()
}

/// Outcome of [`find_closing`] when no matching bracket was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unclosed {
    /// Scanning stopped at a line that starts a new construct.
    StoppedAt(usize),
    EndOfInput,
}

/// Find the bracket closing the one at `open`.
///
/// Only brackets of the same kind count. Scanning gives up at the first later line that starts a
/// top-level construct.
pub fn find_closing(source: &Source<'_>, open: Cursor, kind: BracketKind) -> Result<Cursor, Unclosed> {
    let mut depth: usize = 0;
    let mut line = open.line;
    let mut from = open.column;

    while line < source.line_count() {
        if line > open.line && source.construct_at(line).is_some() {
            return Err(Unclosed::StoppedAt(line));
        }
        let code = source.code_line(line);
        let bytes = code.as_bytes();
        let mut i = from;
        while i < bytes.len() {
            match bytes[i] {
                b'"' | b'\'' => {
                    i = scanner::string_end(code, i).unwrap_or(bytes.len());
                    continue;
                }
                b if char::from(b) == kind.open() => depth += 1,
                b if char::from(b) == kind.close() => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return Ok(Cursor::new(line, i));
                    }
                }
                _ => {}
            }
            i += 1;
        }
        line += 1;
        from = 0;
    }
    Err(Unclosed::EndOfInput)
}

impl ShiftLines for BracketPair {
    fn shift_lines(&mut self, delta: i64) {
        self.open.shift_lines(delta);
        self.close.shift_lines(delta);
    }
}

impl ShiftLines for PatternRegion {
    fn shift_lines(&mut self, delta: i64) {
        self.open.shift_lines(delta);
        self.close.shift_lines(delta);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balanced_document_has_no_issues() {
        let report = check_balance("a(b[c]{d})\n(\n)", DEFAULT_MAX_NESTING_DEPTH);
        assert!(report.issues.is_empty());
        assert_eq!(report.pairs.len(), 4);
    }

    #[test]
    fn kinds_are_tracked_independently() {
        let report = check_balance("( ]", DEFAULT_MAX_NESTING_DEPTH);
        assert_eq!(
            report.issues,
            vec![
                BracketIssue::UnmatchedClosing {
                    kind: BracketKind::Square,
                    at: Position::new(0, 2)
                },
                BracketIssue::UnmatchedOpening {
                    kind: BracketKind::Paren,
                    at: Position::new(0, 0)
                },
            ]
        );
    }

    #[test]
    fn strings_and_comments_are_ignored() {
        let report = check_balance("x(\")\") // )\n/* ( */", DEFAULT_MAX_NESTING_DEPTH);
        assert!(report.issues.is_empty());
        assert_eq!(report.pairs.len(), 1);
    }

    #[test]
    fn pattern_regions_nest_with_parent_links() {
        let report = check_balance("not (\n  exists(Person())\n)", DEFAULT_MAX_NESTING_DEPTH);
        assert!(report.issues.is_empty());
        assert_eq!(report.regions.len(), 2);
        assert_eq!(report.regions[0].keyword, KeywordId::Not);
        assert_eq!(report.regions[0].depth, 0);
        assert_eq!(report.regions[0].close, Some(Position::new(2, 0)));
        assert_eq!(report.regions[1].keyword, KeywordId::Exists);
        assert_eq!(report.regions[1].parent, Some(0));
        assert_eq!(report.regions[1].depth, 1);
    }

    #[test]
    fn keyword_must_directly_precede_the_paren() {
        let report = check_balance("notify(x) exists\n(y)", DEFAULT_MAX_NESTING_DEPTH);
        assert!(report.regions.is_empty());
    }

    #[test]
    fn nesting_cap_records_issue_and_keeps_matching() {
        let text = "exists(exists(exists(A())))";
        let report = check_balance(text, 2);
        assert_eq!(report.regions.len(), 2);
        assert!(report.is_balanced());
        assert!(matches!(
            report.issues.as_slice(),
            [BracketIssue::NestingTooDeep { limit: 2, .. }]
        ));
    }

    #[test]
    fn find_closing_spans_lines_and_stops_at_constructs() {
        let source = Source::new("f() {\n  if (a) { b(); }\n}\nrule \"x\"");
        assert_eq!(
            find_closing(&source, Cursor::new(0, 4), BracketKind::Brace),
            Ok(Cursor::new(2, 0))
        );

        let source = Source::new("f() {\n  x();\nrule \"x\"\n}");
        assert_eq!(
            find_closing(&source, Cursor::new(0, 4), BracketKind::Brace),
            Err(Unclosed::StoppedAt(2))
        );
    }
}
