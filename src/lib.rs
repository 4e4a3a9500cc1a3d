#![forbid(unsafe_code)]
//! DRL rule-file linter
//!
//! Builds on the `drl_syntax` frontend: the `lint` module runs diagnostic passes over a parsed
//! document, `lsp` converts the results for editors, and `cli` is the command-line front end.
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module
//!   enforces `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **Isolation**: Parsing and every lint pass run under `catch_unwind`, so a bug in one pass
//!   costs that pass's findings, not the whole run.

pub mod cli;
pub mod lint;
pub mod lsp;

pub use drl_syntax::{ParseError, ParseOptions, ParseOutput, SyntaxTree, parse, parse_with_options};
pub use lint::{Diagnostic, LintSettings, Pass, Severity, compute_diagnostics, lint_source};
