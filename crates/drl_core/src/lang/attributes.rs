//! Rule attribute vocabulary.
//!
//! Rule attributes appear between a rule's name and its `when` clause (`salience 10`,
//! `no-loop true`, `agenda-group "billing"`). The same spellings are accepted at package level,
//! where they set defaults for every rule in the file (`dialect "mvel"`).
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive**.
//! - Value checking is shallow: it classifies the textual shape of a value, it does not
//!   evaluate expressions.
//!
//! ## Examples
//! ```rust
//! use drl_core::lang::attributes::{self, AttributeId, ValueKind};
//!
//! assert_eq!(attributes::from_str("no-loop"), Some(AttributeId::NoLoop));
//! assert_eq!(attributes::value_kind(AttributeId::Salience), ValueKind::Integer);
//! assert!(ValueKind::Integer.accepts("-5"));
//! assert!(ValueKind::Boolean.accepts(""));
//! ```

/// Stable identifier for every known rule attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeId {
    Salience,
    NoLoop,
    LockOnActive,
    AutoFocus,
    AgendaGroup,
    ActivationGroup,
    RuleflowGroup,
    Dialect,
    DateEffective,
    DateExpires,
    Enabled,
    Duration,
    Timer,
    Calendars,
}

/// Shape of the value an attribute accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// A (possibly negative) integer literal, or a parenthesized expression.
    Integer,
    /// `true`/`false`; omitting the value means `true`.
    Boolean,
    /// A quoted string literal.
    Text,
    /// Free-form expression, usually parenthesized (`timer (int: 0 1s)`).
    Expression,
}

impl ValueKind {
    /// Return `true` if `value` has the textual shape this kind expects.
    ///
    /// ## Notes
    /// - Parenthesized values are accepted for integer and boolean attributes because DRL
    ///   allows dynamic expressions there (`salience ($priority)`).
    pub fn accepts(self, value: &str) -> bool {
        let value = value.trim();
        let parenthesized = value.starts_with('(') && value.ends_with(')');
        match self {
            ValueKind::Integer => {
                let digits = value.strip_prefix('-').unwrap_or(value);
                parenthesized || (!digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
            }
            ValueKind::Boolean => value.is_empty() || value == "true" || value == "false" || parenthesized,
            ValueKind::Text => {
                value.len() >= 2
                    && ((value.starts_with('"') && value.ends_with('"'))
                        || (value.starts_with('\'') && value.ends_with('\'')))
            }
            ValueKind::Expression => !value.is_empty(),
        }
    }

    /// Human-readable description used in diagnostics.
    pub fn describe(self) -> &'static str {
        match self {
            ValueKind::Integer => "an integer or a parenthesized expression",
            ValueKind::Boolean => "`true` or `false`",
            ValueKind::Text => "a quoted string",
            ValueKind::Expression => "an expression",
        }
    }
}

/// Metadata for an attribute.
#[derive(Debug, Clone, Copy)]
pub struct AttributeInfo {
    pub id: AttributeId,
    pub canonical: &'static str,
    pub value: ValueKind,
    /// `true` for attributes that stop a rule from re-activating itself.
    pub prevents_loops: bool,
    /// `true` for attributes that influence conflict-resolution order.
    pub sets_priority: bool,
}

/// Registry of all rule attributes.
pub const ATTRIBUTES: &[AttributeInfo] = &[
    AttributeInfo {
        id: AttributeId::Salience,
        canonical: "salience",
        value: ValueKind::Integer,
        prevents_loops: false,
        sets_priority: true,
    },
    flag(AttributeId::NoLoop, "no-loop", true),
    flag(AttributeId::LockOnActive, "lock-on-active", true),
    flag(AttributeId::AutoFocus, "auto-focus", false),
    text(AttributeId::AgendaGroup, "agenda-group"),
    text(AttributeId::ActivationGroup, "activation-group"),
    text(AttributeId::RuleflowGroup, "ruleflow-group"),
    text(AttributeId::Dialect, "dialect"),
    text(AttributeId::DateEffective, "date-effective"),
    text(AttributeId::DateExpires, "date-expires"),
    flag(AttributeId::Enabled, "enabled", false),
    AttributeInfo {
        id: AttributeId::Duration,
        canonical: "duration",
        value: ValueKind::Integer,
        prevents_loops: false,
        sets_priority: false,
    },
    AttributeInfo {
        id: AttributeId::Timer,
        canonical: "timer",
        value: ValueKind::Expression,
        prevents_loops: false,
        sets_priority: false,
    },
    text(AttributeId::Calendars, "calendars"),
];

/// Canonical spelling.
pub fn as_str(id: AttributeId) -> &'static str {
    info_for(id).map_or("", |a| a.canonical)
}

/// Full metadata, if the registry has an entry for `id`.
pub fn info_for(id: AttributeId) -> Option<&'static AttributeInfo> {
    ATTRIBUTES.iter().find(|a| a.id == id)
}

/// Value shape accepted by `id`.
pub fn value_kind(id: AttributeId) -> ValueKind {
    info_for(id).map_or(ValueKind::Expression, |a| a.value)
}

/// Lookup by spelling.
pub fn from_str(s: &str) -> Option<AttributeId> {
    ATTRIBUTES.iter().find(|a| a.canonical == s).map(|a| a.id)
}

/// `true` if `id` is a loop-prevention flag (`no-loop`, `lock-on-active`).
pub fn prevents_loops(id: AttributeId) -> bool {
    info_for(id).is_some_and(|a| a.prevents_loops)
}

/// `true` if `id` sets firing priority (`salience`).
pub fn sets_priority(id: AttributeId) -> bool {
    info_for(id).is_some_and(|a| a.sets_priority)
}

// --- helpers -----------------------------------------------------------------

const fn flag(id: AttributeId, canonical: &'static str, prevents_loops: bool) -> AttributeInfo {
    AttributeInfo {
        id,
        canonical,
        value: ValueKind::Boolean,
        prevents_loops,
        sets_priority: false,
    }
}

const fn text(id: AttributeId, canonical: &'static str) -> AttributeInfo {
    AttributeInfo {
        id,
        canonical,
        value: ValueKind::Text,
        prevents_loops: false,
        sets_priority: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_values() {
        assert!(ValueKind::Integer.accepts("10"));
        assert!(ValueKind::Integer.accepts("-1"));
        assert!(ValueKind::Integer.accepts("($p.getPriority())"));
        assert!(!ValueKind::Integer.accepts("high"));
        assert!(!ValueKind::Integer.accepts("-"));
    }

    #[test]
    fn text_values_need_quotes() {
        assert!(ValueKind::Text.accepts("\"billing\""));
        assert!(ValueKind::Text.accepts("'billing'"));
        assert!(!ValueKind::Text.accepts("billing"));
        assert!(!ValueKind::Text.accepts("\""));
    }

    #[test]
    fn loop_prevention_flags() {
        assert!(prevents_loops(AttributeId::NoLoop));
        assert!(prevents_loops(AttributeId::LockOnActive));
        assert!(!prevents_loops(AttributeId::AutoFocus));
    }
}
