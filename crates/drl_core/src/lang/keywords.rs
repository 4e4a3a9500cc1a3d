//! Define the reserved keyword vocabulary for DRL.
//!
//! This module is the single source of truth for reserved words: a stable identifier
//! ([`KeywordId`]) plus a const metadata table ([`KEYWORDS`]) that records canonical spellings,
//! categories, and whether a keyword may open a multi-line bracketed pattern.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive**; DRL keywords are lowercase.
//! - This registry is intentionally **pure** (no AST/IO/side effects).
//!
//! ## Examples
//! ```rust
//! use drl_core::lang::keywords::{self, KeywordId};
//!
//! assert_eq!(keywords::from_str("exists"), Some(KeywordId::Exists));
//! assert!(keywords::opens_pattern(KeywordId::Exists));
//! assert!(keywords::starts_construct(KeywordId::Declare));
//! ```

/// Stable identifier for every reserved keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordId {
    // Top-level constructs
    Package,
    Import,
    Global,
    Function,
    Rule,
    Query,
    Declare,

    // Rule clauses
    When,
    Then,
    End,
    Extends,

    // Multi-line pattern keywords
    Exists,
    Not,
    Eval,
    Forall,
    Collect,
    Accumulate,

    // Pattern connectives
    From,
    And,
    Or,
}

/// High-level grouping for documentation and tooling.
///
/// ## Notes
/// - Categories are metadata only; the parser owns context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordCategory {
    /// Starts a top-level construct (`rule`, `query`, ...).
    Construct,
    /// Delimits the parts of a rule or query (`when`, `then`, `end`).
    Clause,
    /// Wraps a bracketed condition (`exists(...)`, `eval(...)`).
    Pattern,
    /// Joins or sources patterns (`and`, `or`, `from`).
    Connective,
}

/// Metadata for a keyword.
#[derive(Debug, Clone, Copy)]
pub struct KeywordInfo {
    pub id: KeywordId,
    pub canonical: &'static str,
    pub category: KeywordCategory,
    /// `true` when `keyword(` opens a tracked multi-line pattern region.
    pub opens_pattern: bool,
}

/// Registry of all keywords.
///
/// ## Notes
/// - The ordering is not semantically meaningful, but is grouped for readability.
pub const KEYWORDS: &[KeywordInfo] = &[
    // Top-level constructs
    info(KeywordId::Package, "package", KeywordCategory::Construct),
    info(KeywordId::Import, "import", KeywordCategory::Construct),
    info(KeywordId::Global, "global", KeywordCategory::Construct),
    info(KeywordId::Function, "function", KeywordCategory::Construct),
    info(KeywordId::Rule, "rule", KeywordCategory::Construct),
    info(KeywordId::Query, "query", KeywordCategory::Construct),
    info(KeywordId::Declare, "declare", KeywordCategory::Construct),
    // Rule clauses
    info(KeywordId::When, "when", KeywordCategory::Clause),
    info(KeywordId::Then, "then", KeywordCategory::Clause),
    info(KeywordId::End, "end", KeywordCategory::Clause),
    info(KeywordId::Extends, "extends", KeywordCategory::Clause),
    // Multi-line pattern keywords
    pattern(KeywordId::Exists, "exists"),
    pattern(KeywordId::Not, "not"),
    pattern(KeywordId::Eval, "eval"),
    pattern(KeywordId::Forall, "forall"),
    pattern(KeywordId::Collect, "collect"),
    pattern(KeywordId::Accumulate, "accumulate"),
    // Pattern connectives
    info(KeywordId::From, "from", KeywordCategory::Connective),
    info(KeywordId::And, "and", KeywordCategory::Connective),
    info(KeywordId::Or, "or", KeywordCategory::Connective),
];

/// Canonical spelling.
///
/// ## Parameters
/// - `id`: Keyword identifier.
///
/// ## Returns
/// - The canonical spelling (for example, `"accumulate"`).
pub fn as_str(id: KeywordId) -> &'static str {
    match id {
        KeywordId::Package => "package",
        KeywordId::Import => "import",
        KeywordId::Global => "global",
        KeywordId::Function => "function",
        KeywordId::Rule => "rule",
        KeywordId::Query => "query",
        KeywordId::Declare => "declare",
        KeywordId::When => "when",
        KeywordId::Then => "then",
        KeywordId::End => "end",
        KeywordId::Extends => "extends",
        KeywordId::Exists => "exists",
        KeywordId::Not => "not",
        KeywordId::Eval => "eval",
        KeywordId::Forall => "forall",
        KeywordId::Collect => "collect",
        KeywordId::Accumulate => "accumulate",
        KeywordId::From => "from",
        KeywordId::And => "and",
        KeywordId::Or => "or",
    }
}

/// Full metadata, if the registry has an entry for `id`.
pub fn info_for(id: KeywordId) -> Option<&'static KeywordInfo> {
    KEYWORDS.iter().find(|k| k.id == id)
}

/// Category of a keyword.
pub fn category(id: KeywordId) -> Option<KeywordCategory> {
    info_for(id).map(|k| k.category)
}

/// Lookup by spelling.
///
/// ## Returns
/// - `Some(KeywordId)` if the spelling matches this registry.
/// - `None` otherwise.
pub fn from_str(s: &str) -> Option<KeywordId> {
    KEYWORDS.iter().find(|k| k.canonical == s).map(|k| k.id)
}

/// `true` if `id` starts a top-level construct.
pub fn starts_construct(id: KeywordId) -> bool {
    category(id) == Some(KeywordCategory::Construct)
}

/// `true` if `id(` opens a multi-line pattern region.
pub fn opens_pattern(id: KeywordId) -> bool {
    info_for(id).is_some_and(|k| k.opens_pattern)
}

/// Iterate over the spellings of every top-level construct keyword.
pub fn construct_spellings() -> impl Iterator<Item = &'static str> {
    KEYWORDS
        .iter()
        .filter(|k| k.category == KeywordCategory::Construct)
        .map(|k| k.canonical)
}

// --- helpers -----------------------------------------------------------------

const fn info(id: KeywordId, canonical: &'static str, category: KeywordCategory) -> KeywordInfo {
    KeywordInfo {
        id,
        canonical,
        category,
        opens_pattern: false,
    }
}

const fn pattern(id: KeywordId, canonical: &'static str) -> KeywordInfo {
    KeywordInfo {
        id,
        canonical,
        category: KeywordCategory::Pattern,
        opens_pattern: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construct_keywords_are_the_seven_top_level_forms() {
        let spellings: Vec<_> = construct_spellings().collect();
        assert_eq!(
            spellings,
            vec!["package", "import", "global", "function", "rule", "query", "declare"]
        );
    }

    #[test]
    fn lookup_is_case_sensitive() {
        assert_eq!(from_str("Rule"), None);
        assert_eq!(from_str("rule"), Some(KeywordId::Rule));
    }

    #[test]
    fn only_pattern_keywords_open_regions() {
        assert!(opens_pattern(KeywordId::Accumulate));
        assert!(!opens_pattern(KeywordId::From));
        assert!(!opens_pattern(KeywordId::When));
    }
}
