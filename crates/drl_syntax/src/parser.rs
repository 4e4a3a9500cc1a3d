//! Error-tolerant parser for DRL documents
//!
//! Turns source text into a [`SyntaxTree`] plus a list of [`ParseError`]s. The parser is
//! line-oriented: a construct keyword at the start of a line selects a sub-parser, and each
//! sub-parser threads a [`Cursor`] through the document and hands back the cursor where it
//! stopped.
//!
//! ## Examples
//!
//! ```rust
//! use drl_syntax::parser;
//!
//! let source = "package demo;\n\nrule \"Adult\"\nwhen\n    $p : Person(age >= 18)\nthen\n    $p.setAdult(true);\nend\n";
//! let output = parser::parse(source);
//! assert!(output.errors.is_empty());
//! assert_eq!(output.tree.rules[0].name, "Adult");
//! ```

use crate::ast::*;
use crate::brackets::{self, BracketTracker, Unclosed};
use crate::diagnostics::{ParseError, ParseOptions};
use crate::scanner::{self, Cursor, Source};
use drl_core::lang::attributes;
use drl_core::lang::brackets::BracketKind;
use drl_core::lang::keywords::{self, KeywordId};

// NOTE: This module is split across multiple files using `include!` so every parser method
// lives in one module while no single file grows unwieldy.

include!("parser/core.rs");
include!("parser/helpers.rs");
include!("parser/rule.rs");
include!("parser/conditions.rs");
include!("parser/decl.rs");
include!("parser/recovery.rs");
include!("parser/api.rs");
include!("parser/tests.rs");
