//! Syntax frontend for DRL rule files: scanner, bracket tracker, parser, incremental reparse.
//!
//! This crate is dependency-light and shared by the linter, the CLI and editor integrations.
//!
//! ## Notes
//! - This crate is syntax-only: it never type-checks patterns or interprets action code.
//! - Vocabulary identity (keywords, attributes, bracket kinds) comes from `drl_core::lang`.
//! - Parsing never fails outright. Every call returns a [`SyntaxTree`] and a list of
//!   [`ParseError`]s.
//!
//! ## Examples
//! ```rust
//! let output = drl_syntax::parse("rule \"R\" when Person() then end");
//! assert_eq!(output.tree.rules.len(), 1);
//! assert!(output.errors.is_empty());
//! ```

pub mod ast;
pub mod brackets;
pub mod diagnostics;
pub mod incremental;
pub mod parser;
pub mod scanner;

pub use ast::{Position, Range, SyntaxTree};
pub use diagnostics::{ParseError, ParseOptions, ParseSeverity};
pub use parser::{ParseOutput, parse, parse_with_options};
