//! DRL vocabulary registries.
//!
//! This module is the “front door” for language-level vocabulary: reserved keywords, rule
//! attributes, and bracket kinds.
//!
//! The design goal is to avoid stringly-typed checks scattered across the parser and the lint
//! passes. Instead, callers work with **stable IDs** (e.g. `KeywordId`, `AttributeId`) and look up
//! spellings/metadata via registry tables.
//!
//! ## Notes
//! - Registries are intentionally **pure**: no AST types, no IO, no side effects.
//! - The parser enforces syntax; registries provide spellings and metadata for shared use
//!   (diagnostics, completion, highlighting).
//!
//! ## Examples
//! ```rust
//! use drl_core::lang::keywords::{self, KeywordId};
//!
//! assert_eq!(keywords::from_str("rule"), Some(KeywordId::Rule));
//! assert_eq!(keywords::as_str(KeywordId::Rule), "rule");
//! ```

pub mod attributes;
pub mod brackets;
pub mod keywords;
