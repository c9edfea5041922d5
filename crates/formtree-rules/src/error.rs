//! Rule registration and option errors.

#![allow(missing_docs)]

use smol_str::SmolStr;
use thiserror::Error;

/// Errors raised while registering rules or binding them to elements.
///
/// Evaluating a rule never fails; these errors only surface when a rule is
/// looked up or its options are checked.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    /// No rule registered under this name.
    #[error("unknown rule '{0}'")]
    UnknownRule(SmolStr),

    /// Options do not have the shape the rule expects.
    #[error("invalid options for rule '{rule}': {reason}")]
    InvalidOptions { rule: SmolStr, reason: SmolStr },

    /// A pattern option failed to compile.
    #[error("invalid pattern for rule '{rule}': {reason}")]
    InvalidPattern { rule: SmolStr, reason: SmolStr },
}

impl RuleError {
    pub(crate) fn options(rule: &str, reason: impl Into<SmolStr>) -> Self {
        Self::InvalidOptions {
            rule: rule.into(),
            reason: reason.into(),
        }
    }
}
