//! Two-value comparison rule.
//!
//! Equality operators compare the text forms of both values; ordering
//! operators compare their numeric forms. `"5"` and `"5.0"` are therefore
//! unequal yet satisfy `gte`. The client script applies the same split with
//! `String(...)` and `Number(...)`.

use std::cmp::Ordering;
use std::fmt;

use serde_json::Value;
use tracing::warn;

use crate::error::RuleError;
use crate::rule::{Rule, RuleOptions};
use crate::script::ValidationScript;
use crate::value::{number_of, text_of};

/// Canonical comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CompareOperator {
    /// Text equality.
    #[default]
    Equal,
    /// Text inequality.
    NotEqual,
    /// Numeric `>`.
    Greater,
    /// Numeric `>=`.
    GreaterOrEqual,
    /// Numeric `<`.
    Less,
    /// Numeric `<=`.
    LessOrEqual,
}

impl CompareOperator {
    /// Resolves an operator token. Accepts the aliases `eq`, `neq`, `gt`,
    /// `gte`, `lt`, `lte`, `==`, `!=` and the script symbols themselves.
    /// Missing, empty or unknown tokens resolve to [`Self::Equal`].
    #[must_use]
    pub fn resolve(token: Option<&str>) -> Self {
        let Some(token) = token.filter(|token| !token.is_empty()) else {
            return Self::Equal;
        };
        Self::parse(token).unwrap_or_else(|| {
            warn!("unknown compare operator '{token}', using equality");
            Self::Equal
        })
    }

    /// Strict variant of [`Self::resolve`]: `None` for unknown tokens.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "eq" | "==" | "===" => Some(Self::Equal),
            "neq" | "!=" | "!==" => Some(Self::NotEqual),
            "gt" | ">" => Some(Self::Greater),
            "gte" | ">=" => Some(Self::GreaterOrEqual),
            "lt" | "<" => Some(Self::Less),
            "lte" | "<=" => Some(Self::LessOrEqual),
            _ => None,
        }
    }

    /// Script operator symbol.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Equal => "===",
            Self::NotEqual => "!==",
            Self::Greater => ">",
            Self::GreaterOrEqual => ">=",
            Self::Less => "<",
            Self::LessOrEqual => "<=",
        }
    }

    /// `true` for the two text-compared operators.
    #[must_use]
    pub const fn is_equality(self) -> bool {
        matches!(self, Self::Equal | Self::NotEqual)
    }

    /// Applies the operator to two values.
    #[must_use]
    pub fn apply(self, left: &Value, right: &Value) -> bool {
        if self.is_equality() {
            let equal = text_of(left) == text_of(right);
            return if self == Self::Equal { equal } else { !equal };
        }
        let ordering = number_of(left).partial_cmp(&number_of(right));
        match self {
            Self::Greater => ordering == Some(Ordering::Greater),
            Self::GreaterOrEqual => matches!(ordering, Some(Ordering::Greater | Ordering::Equal)),
            Self::Less => ordering == Some(Ordering::Less),
            Self::LessOrEqual => matches!(ordering, Some(Ordering::Less | Ordering::Equal)),
            Self::Equal | Self::NotEqual => unreachable!("equality handled above"),
        }
    }
}

impl fmt::Display for CompareOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Compares two values with a selectable operator.
///
/// Bound through [`Rule`], the value is a two-element array
/// `[left, right]`; missing entries read as `null`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompareRule;

impl CompareRule {
    /// Registered name.
    pub const NAME: &'static str = "compare";

    /// Server check for `left OP right`.
    #[must_use]
    pub fn validate(&self, left: &Value, right: &Value, operator: Option<&str>) -> bool {
        CompareOperator::resolve(operator).apply(left, right)
    }

    /// Client check; the bound value is an array of the two field values.
    #[must_use]
    pub fn script(&self, operator: Option<&str>) -> ValidationScript {
        let operator = CompareOperator::resolve(operator);
        let coerce = if operator.is_equality() {
            "String"
        } else {
            "Number"
        };
        ValidationScript::test(format!(
            "'' != {{jsVar}}[0] && !({coerce}({{jsVar}}[0]) {operator} {coerce}({{jsVar}}[1]))"
        ))
    }
}

impl Rule for CompareRule {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn validate(&self, value: &Value, options: &RuleOptions) -> bool {
        let (left, right) = match value {
            Value::Array(items) => (
                items.first().unwrap_or(&Value::Null),
                items.get(1).unwrap_or(&Value::Null),
            ),
            other => (other, &Value::Null),
        };
        CompareRule::validate(self, left, right, options.operator())
    }

    fn validation_script(&self, options: &RuleOptions) -> Option<ValidationScript> {
        Some(self.script(options.operator()))
    }

    fn check_options(&self, options: &RuleOptions) -> Result<(), RuleError> {
        match options {
            RuleOptions::None | RuleOptions::Operator(_) => Ok(()),
            other => Err(RuleError::options(
                Self::NAME,
                format!("expected an operator, got {}", other.shape()),
            )),
        }
    }
}
