//! Syntax tree definitions for DRL documents
//!
//! The tree is deliberately shallow: constructs are typed nodes, but rule conditions keep their
//! raw text and action clauses are opaque host-language code. Every node carries a line/character
//! [`Range`] so editor tooling can map it back onto the document.

use crate::brackets::{BracketPair, PatternRegion};
use drl_core::lang::attributes::{self, AttributeId};
use drl_core::lang::keywords::KeywordId;

// ============================================================================
// Positions
// ============================================================================

/// A zero-based line/character position.
///
/// `character` counts `char`s from the start of the line; editor protocols that count UTF-16
/// code units convert at the boundary. Ordering is line-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    pub fn new(line: usize, character: usize) -> Self {
        Self {
            line: u32::try_from(line).unwrap_or(u32::MAX),
            character: u32::try_from(character).unwrap_or(u32::MAX),
        }
    }

    /// Line as an index into the document's line table.
    pub fn line_index(self) -> usize {
        self.line as usize
    }

    pub fn column(self) -> usize {
        self.character as usize
    }
}

/// Half-open range over positions. `end` is never before `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    /// Create a range, clamping `end` so it is never before `start`.
    pub fn new(start: Position, end: Position) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    /// Range covering `start_col..end_col` on a single line.
    pub fn on_line(line: usize, start_col: usize, end_col: usize) -> Self {
        Self::new(Position::new(line, start_col), Position::new(line, end_col))
    }

    /// Empty range at `pos`.
    pub fn point(pos: Position) -> Self {
        Self { start: pos, end: pos }
    }

    pub fn merge(self, other: Range) -> Range {
        Range {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// `true` if any line of this range falls inside `first..=last`.
    pub fn overlaps_lines(&self, first: usize, last: usize) -> bool {
        self.start.line_index() <= last && self.end.line_index() >= first
    }

    /// `true` if every line of this range falls inside `first..=last`.
    pub fn within_lines(&self, first: usize, last: usize) -> bool {
        self.start.line_index() >= first && self.end.line_index() <= last
    }
}

/// Shift every line number in a value by a signed delta.
///
/// Used by the incremental engine to relocate nodes parsed from a line window, and to move nodes
/// that sit below an edit which added or removed lines.
pub trait ShiftLines {
    fn shift_lines(&mut self, delta: i64);
}

impl ShiftLines for Position {
    fn shift_lines(&mut self, delta: i64) {
        let shifted = (i64::from(self.line) + delta).clamp(0, i64::from(u32::MAX));
        self.line = u32::try_from(shifted).unwrap_or(u32::MAX);
    }
}

impl ShiftLines for Range {
    fn shift_lines(&mut self, delta: i64) {
        self.start.shift_lines(delta);
        self.end.shift_lines(delta);
    }
}

impl<T: ShiftLines> ShiftLines for Vec<T> {
    fn shift_lines(&mut self, delta: i64) {
        for item in self {
            item.shift_lines(delta);
        }
    }
}

impl<T: ShiftLines> ShiftLines for Option<T> {
    fn shift_lines(&mut self, delta: i64) {
        if let Some(item) = self {
            item.shift_lines(delta);
        }
    }
}

/// A node with a source range.
pub trait Ranged {
    fn range(&self) -> Range;
}

// ============================================================================
// Document
// ============================================================================

/// The parsed structure of one document.
///
/// ## Notes
/// - Every node list is sorted by ascending start line.
/// - A tree is always produced, even for input the parser could not make sense of.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SyntaxTree {
    pub package: Option<PackageNode>,
    /// Package-level attributes such as `dialect "mvel"`.
    pub attributes: Vec<AttributeNode>,
    pub imports: Vec<ImportNode>,
    pub globals: Vec<GlobalNode>,
    pub functions: Vec<FunctionNode>,
    pub rules: Vec<RuleNode>,
    pub queries: Vec<QueryNode>,
    pub declares: Vec<DeclareNode>,
}

impl SyntaxTree {
    /// The minimal tree returned when parsing fails outright.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.package.is_none() && self.top_level_ranges().is_empty()
    }

    /// Restore the start-line ordering invariant on every node list.
    pub fn sort(&mut self) {
        sort_by_start(&mut self.attributes);
        sort_by_start(&mut self.imports);
        sort_by_start(&mut self.globals);
        sort_by_start(&mut self.functions);
        sort_by_start(&mut self.rules);
        sort_by_start(&mut self.queries);
        sort_by_start(&mut self.declares);
    }

    /// Ranges of every top-level node, in no particular order.
    pub fn top_level_ranges(&self) -> Vec<Range> {
        let mut ranges = Vec::new();
        ranges.extend(self.package.iter().map(Ranged::range));
        ranges.extend(self.attributes.iter().map(Ranged::range));
        ranges.extend(self.imports.iter().map(Ranged::range));
        ranges.extend(self.globals.iter().map(Ranged::range));
        ranges.extend(self.functions.iter().map(Ranged::range));
        ranges.extend(self.rules.iter().map(Ranged::range));
        ranges.extend(self.queries.iter().map(Ranged::range));
        ranges.extend(self.declares.iter().map(Ranged::range));
        ranges
    }

    /// Look up a rule by name.
    pub fn rule(&self, name: &str) -> Option<&RuleNode> {
        self.rules.iter().find(|r| r.name == name)
    }

    /// Append every node of `other` to this tree. The package of `other` wins when present.
    pub fn absorb(&mut self, other: SyntaxTree) {
        if other.package.is_some() {
            self.package = other.package;
        }
        self.attributes.extend(other.attributes);
        self.imports.extend(other.imports);
        self.globals.extend(other.globals);
        self.functions.extend(other.functions);
        self.rules.extend(other.rules);
        self.queries.extend(other.queries);
        self.declares.extend(other.declares);
        self.sort();
    }
}

impl ShiftLines for SyntaxTree {
    fn shift_lines(&mut self, delta: i64) {
        self.package.shift_lines(delta);
        self.attributes.shift_lines(delta);
        self.imports.shift_lines(delta);
        self.globals.shift_lines(delta);
        self.functions.shift_lines(delta);
        self.rules.shift_lines(delta);
        self.queries.shift_lines(delta);
        self.declares.shift_lines(delta);
    }
}

fn sort_by_start<T: Ranged>(nodes: &mut [T]) {
    // Stable: nodes starting on the same line keep their textual order.
    nodes.sort_by_key(|n| n.range().start);
}

// ============================================================================
// Simple constructs
// ============================================================================

/// `package com.example.rules;`
#[derive(Debug, Clone, PartialEq)]
pub struct PackageNode {
    pub name: String,
    pub range: Range,
}

/// How an `import` line brings a name into scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    /// `import com.example.Person;`
    Type,
    /// `import function com.example.Utils.log;`
    Function,
    /// `import static com.example.Utils.MAX;`
    Static,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportNode {
    pub target: String,
    pub kind: ImportKind,
    pub range: Range,
}

impl ImportNode {
    /// Last segment of the imported path (`Person` for `com.example.Person`).
    pub fn simple_name(&self) -> &str {
        self.target.rsplit('.').next().unwrap_or(&self.target)
    }
}

/// `global java.util.List results;`
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalNode {
    pub type_name: String,
    pub name: String,
    pub name_range: Range,
    pub range: Range,
}

/// A `name value` pair, either on a rule or at package level.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeNode {
    pub name: String,
    /// Raw value text; empty when the attribute was written without one (`no-loop`).
    pub value: String,
    pub range: Range,
}

impl AttributeNode {
    /// Registry ID, if the attribute name is known.
    pub fn id(&self) -> Option<AttributeId> {
        attributes::from_str(&self.name)
    }
}

/// A typed parameter of a function or query.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub type_name: Option<String>,
    pub name: String,
}

// ============================================================================
// Rules
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct RuleNode {
    pub name: String,
    /// `true` when the name was written as a string literal.
    pub quoted: bool,
    pub name_range: Range,
    /// Parent rule named by `extends`.
    pub parent: Option<String>,
    pub attributes: Vec<AttributeNode>,
    pub when: Option<ConditionClause>,
    pub then: Option<ActionClause>,
    pub range: Range,
}

impl RuleNode {
    pub fn attribute(&self, id: AttributeId) -> Option<&AttributeNode> {
        self.attributes.iter().find(|a| a.id() == Some(id))
    }

    pub fn has_attribute(&self, id: AttributeId) -> bool {
        self.attribute(id).is_some()
    }

    /// Every variable bound anywhere in the `when` clause.
    pub fn bound_variables(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for condition in self.when.iter().flat_map(|w| &w.conditions) {
            for name in condition.bound_variables() {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }
}

/// The `when` half of a rule.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionClause {
    pub conditions: Vec<ConditionNode>,
    pub range: Range,
}

/// What a single condition is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionKind {
    /// `$p : Person(age > 18)` or `Person()`
    Pattern,
    Exists,
    Not,
    Eval,
    Forall,
    Collect,
    Accumulate,
    And,
    Or,
}

impl ConditionKind {
    /// Condition kind introduced by a leading keyword.
    pub fn from_keyword(id: KeywordId) -> Option<Self> {
        match id {
            KeywordId::Exists => Some(ConditionKind::Exists),
            KeywordId::Not => Some(ConditionKind::Not),
            KeywordId::Eval => Some(ConditionKind::Eval),
            KeywordId::Forall => Some(ConditionKind::Forall),
            KeywordId::Collect => Some(ConditionKind::Collect),
            KeywordId::Accumulate => Some(ConditionKind::Accumulate),
            KeywordId::And => Some(ConditionKind::And),
            KeywordId::Or => Some(ConditionKind::Or),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConditionNode {
    pub kind: ConditionKind,
    /// Pattern binding (`$p` in `$p : Person()`).
    pub variable: Option<String>,
    pub fact_type: Option<String>,
    /// Raw condition text, possibly spanning several lines.
    pub content: String,
    pub range: Range,
    /// Present when the condition spans more than one line.
    pub multiline: Option<MultilinePattern>,
}

impl ConditionNode {
    /// The pattern binding plus every inline field binding (`Person($n : name)`).
    pub fn bound_variables(&self) -> Vec<String> {
        let mut names: Vec<String> = self.variable.iter().cloned().collect();
        for token in crate::scanner::variable_tokens(&self.content) {
            if token.is_binding && !names.contains(&token.name) {
                names.push(token.name);
            }
        }
        names
    }
}

/// Bracket structure captured for a condition that spans several lines.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MultilinePattern {
    /// Every bracket pair matched inside the condition.
    pub pairs: Vec<BracketPair>,
    /// Pattern regions (`exists(`, `not(`, ...) in an arena; `parent` indexes into this vector.
    pub regions: Vec<PatternRegion>,
}

impl MultilinePattern {
    /// Deepest region nesting, counting the outermost region as depth 1.
    pub fn depth(&self) -> usize {
        self.regions.iter().map(|r| r.depth + 1).max().unwrap_or(0)
    }
}

/// The `then` half of a rule: host-language code kept verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionClause {
    pub text: String,
    /// Position of the first character of `text`.
    pub body_start: Position,
    pub range: Range,
}

impl ActionClause {
    /// Document position of `column` on the `line_offset`-th line of `text`.
    ///
    /// The first line of `text` starts at `body_start`; later lines are whole document lines.
    pub fn position_at(&self, line_offset: usize, column: usize) -> Position {
        if line_offset == 0 {
            Position::new(self.body_start.line_index(), self.body_start.column() + column)
        } else {
            Position::new(self.body_start.line_index() + line_offset, column)
        }
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

// ============================================================================
// Functions, queries, declarations
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionNode {
    pub return_type: Option<String>,
    pub name: String,
    pub name_range: Range,
    pub parameters: Vec<Parameter>,
    /// Raw text between the body braces.
    pub body: String,
    pub range: Range,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryNode {
    pub name: String,
    pub name_range: Range,
    pub parameters: Vec<Parameter>,
    pub conditions: Vec<ConditionNode>,
    pub range: Range,
}

/// Flavor of a `declare` block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclareKind {
    Type,
    Enum,
    Trait,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeclareNode {
    pub kind: DeclareKind,
    pub name: String,
    pub name_range: Range,
    pub supertype: Option<String>,
    /// Type-level annotations such as `@role(event)`.
    pub annotations: Vec<String>,
    pub fields: Vec<FieldNode>,
    pub range: Range,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldNode {
    pub name: String,
    /// Absent for enum constants.
    pub type_name: Option<String>,
    pub annotations: Vec<String>,
    pub range: Range,
}

// ============================================================================
// Trait plumbing
// ============================================================================

macro_rules! impl_ranged {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Ranged for $ty {
                fn range(&self) -> Range {
                    self.range
                }
            }
        )*
    };
}

impl_ranged!(
    PackageNode,
    ImportNode,
    GlobalNode,
    AttributeNode,
    RuleNode,
    ConditionClause,
    ConditionNode,
    ActionClause,
    FunctionNode,
    QueryNode,
    DeclareNode,
    FieldNode,
);

macro_rules! impl_shift_range_only {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ShiftLines for $ty {
                fn shift_lines(&mut self, delta: i64) {
                    self.range.shift_lines(delta);
                }
            }
        )*
    };
}

impl_shift_range_only!(PackageNode, ImportNode, AttributeNode, FieldNode);

impl ShiftLines for GlobalNode {
    fn shift_lines(&mut self, delta: i64) {
        self.name_range.shift_lines(delta);
        self.range.shift_lines(delta);
    }
}

impl ShiftLines for RuleNode {
    fn shift_lines(&mut self, delta: i64) {
        self.name_range.shift_lines(delta);
        self.attributes.shift_lines(delta);
        self.when.shift_lines(delta);
        self.then.shift_lines(delta);
        self.range.shift_lines(delta);
    }
}

impl ShiftLines for ConditionClause {
    fn shift_lines(&mut self, delta: i64) {
        self.conditions.shift_lines(delta);
        self.range.shift_lines(delta);
    }
}

impl ShiftLines for ConditionNode {
    fn shift_lines(&mut self, delta: i64) {
        self.range.shift_lines(delta);
        self.multiline.shift_lines(delta);
    }
}

impl ShiftLines for MultilinePattern {
    fn shift_lines(&mut self, delta: i64) {
        self.pairs.shift_lines(delta);
        self.regions.shift_lines(delta);
    }
}

impl ShiftLines for ActionClause {
    fn shift_lines(&mut self, delta: i64) {
        self.body_start.shift_lines(delta);
        self.range.shift_lines(delta);
    }
}

impl ShiftLines for FunctionNode {
    fn shift_lines(&mut self, delta: i64) {
        self.name_range.shift_lines(delta);
        self.range.shift_lines(delta);
    }
}

impl ShiftLines for QueryNode {
    fn shift_lines(&mut self, delta: i64) {
        self.name_range.shift_lines(delta);
        self.conditions.shift_lines(delta);
        self.range.shift_lines(delta);
    }
}

impl ShiftLines for DeclareNode {
    fn shift_lines(&mut self, delta: i64) {
        self.name_range.shift_lines(delta);
        self.fields.shift_lines(delta);
        self.range.shift_lines(delta);
    }
}
