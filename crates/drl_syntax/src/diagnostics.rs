//! Parse errors and parser configuration.

use crate::ast::Range;
use crate::brackets::DEFAULT_MAX_NESTING_DEPTH;

/// Default cap on recorded parse errors.
pub const DEFAULT_MAX_ERRORS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseSeverity {
    Error,
    Warning,
}

/// A problem found while building the syntax tree.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
    pub range: Range,
    pub severity: ParseSeverity,
}

impl ParseError {
    pub fn error(message: impl Into<String>, range: Range) -> Self {
        Self {
            message: message.into(),
            range,
            severity: ParseSeverity::Error,
        }
    }

    pub fn warning(message: impl Into<String>, range: Range) -> Self {
        Self {
            message: message.into(),
            range,
            severity: ParseSeverity::Warning,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == ParseSeverity::Error
    }
}

/// Parser configuration.
///
/// ## Examples
/// ```rust
/// use drl_syntax::ParseOptions;
///
/// let options = ParseOptions::new().with_max_errors(10);
/// assert_eq!(options.max_errors, 10);
/// assert_eq!(options.max_nesting_depth, 50);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Errors past this count are dropped; parsing still continues.
    pub max_errors: usize,
    /// Deepest allowed nesting of pattern regions such as `exists( not( ... ) )`.
    pub max_nesting_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_errors: DEFAULT_MAX_ERRORS,
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_errors(mut self, max_errors: usize) -> Self {
        self.max_errors = max_errors;
        self
    }

    pub fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }
}
