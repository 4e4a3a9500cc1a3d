//! Provide the canonical language vocabulary shared by the DRL parser and linter.
//!
//! This crate is intentionally small and dependency-free. It holds the registries that both
//! the syntax frontend (`drl_syntax`) and the diagnostic engine (`drl`) consult, so keyword
//! spellings and attribute metadata live in exactly one place.
//!
//! ## Notes
//!
//! - This is a “vocabulary” crate: **no IO**, no global state, and no AST types.
//! - Current scope: construct/clause/pattern keywords, rule attributes, bracket kinds.

pub mod lang;
