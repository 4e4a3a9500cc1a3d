//! Diagnostic engine settings

use drl_syntax::brackets::DEFAULT_MAX_NESTING_DEPTH;

/// Which passes run and how much they may report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintSettings {
    /// Diagnostics beyond this count are dropped (earlier passes win).
    pub max_problems: usize,
    /// Parse errors and bracket balance.
    pub enable_syntax_checks: bool,
    /// Duplicate names, construct structure, undefined variables.
    pub enable_semantic_checks: bool,
    /// Style hints.
    pub enable_style_warnings: bool,
    /// Cap on nested pattern regions used by the bracket pass.
    pub max_nesting_depth: usize,
}

impl Default for LintSettings {
    fn default() -> Self {
        Self {
            max_problems: 100,
            enable_syntax_checks: true,
            enable_semantic_checks: true,
            enable_style_warnings: true,
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }
}

impl LintSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_problems(mut self, max_problems: usize) -> Self {
        self.max_problems = max_problems;
        self
    }

    pub fn with_syntax_checks(mut self, enabled: bool) -> Self {
        self.enable_syntax_checks = enabled;
        self
    }

    pub fn with_semantic_checks(mut self, enabled: bool) -> Self {
        self.enable_semantic_checks = enabled;
        self
    }

    pub fn with_style_warnings(mut self, enabled: bool) -> Self {
        self.enable_style_warnings = enabled;
        self
    }

    pub fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }
}
