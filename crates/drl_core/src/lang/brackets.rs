//! Bracket vocabulary.
//!
//! DRL tracks three bracket kinds independently: parentheses (patterns, `eval`, function
//! signatures), braces (function bodies, action blocks), and square brackets (indexing, inline
//! lists). Each kind has its own stack; a `)` never closes a `{`.
//!
//! ## Examples
//! ```rust
//! use drl_core::lang::brackets::{self, BracketKind};
//!
//! assert_eq!(brackets::classify('('), Some((BracketKind::Paren, true)));
//! assert_eq!(brackets::classify('}'), Some((BracketKind::Brace, false)));
//! assert_eq!(BracketKind::Square.close(), ']');
//! ```

/// Stable identifier for a bracket kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BracketKind {
    Paren,
    Brace,
    Square,
}

impl BracketKind {
    /// All kinds, in stack-index order.
    pub const ALL: [BracketKind; 3] = [BracketKind::Paren, BracketKind::Brace, BracketKind::Square];

    /// Opening character.
    pub fn open(self) -> char {
        match self {
            BracketKind::Paren => '(',
            BracketKind::Brace => '{',
            BracketKind::Square => '[',
        }
    }

    /// Closing character.
    pub fn close(self) -> char {
        match self {
            BracketKind::Paren => ')',
            BracketKind::Brace => '}',
            BracketKind::Square => ']',
        }
    }

    /// Stable index into per-kind tables.
    pub fn index(self) -> usize {
        match self {
            BracketKind::Paren => 0,
            BracketKind::Brace => 1,
            BracketKind::Square => 2,
        }
    }
}

/// Classify a character as a bracket.
///
/// ## Returns
/// - `Some((kind, true))` for an opening bracket, `Some((kind, false))` for a closing one.
/// - `None` for any other character.
pub fn classify(c: char) -> Option<(BracketKind, bool)> {
    match c {
        '(' => Some((BracketKind::Paren, true)),
        ')' => Some((BracketKind::Paren, false)),
        '{' => Some((BracketKind::Brace, true)),
        '}' => Some((BracketKind::Brace, false)),
        '[' => Some((BracketKind::Square, true)),
        ']' => Some((BracketKind::Square, false)),
        _ => None,
    }
}
