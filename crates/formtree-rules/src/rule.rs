//! The rule abstraction shared by built-in and element-provided rules.

use std::fmt;

use serde_json::Value;
use smol_str::SmolStr;

use crate::error::RuleError;
use crate::range::LengthBound;
use crate::script::ValidationScript;

/// Options attached to a rule when it is bound to an element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RuleOptions {
    /// The rule takes no options.
    #[default]
    None,
    /// Comparison operator token (`eq`, `gte`, `!=`, ...).
    Operator(SmolStr),
    /// Length bound for the range family.
    Length(LengthBound),
    /// Size limit in bytes.
    Size(u64),
    /// Accepted MIME types.
    MimeTypes(Vec<SmolStr>),
    /// Regular expression source.
    Pattern(SmolStr),
}

impl RuleOptions {
    /// Operator token, if these are operator options.
    #[must_use]
    pub fn operator(&self) -> Option<&str> {
        match self {
            Self::Operator(token) => Some(token.as_str()),
            _ => None,
        }
    }

    /// Length bound, if these are length options.
    #[must_use]
    pub fn length(&self) -> Option<LengthBound> {
        match self {
            Self::Length(bound) => Some(*bound),
            _ => None,
        }
    }

    /// Short name of the option shape, for error messages.
    #[must_use]
    pub fn shape(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Operator(_) => "operator",
            Self::Length(_) => "length",
            Self::Size(_) => "size",
            Self::MimeTypes(_) => "mime types",
            Self::Pattern(_) => "pattern",
        }
    }
}

/// A validation rule with a server predicate and a client script.
///
/// Implementations are stateless; one instance serves every element the
/// rule is bound to.
pub trait Rule: fmt::Debug + Send + Sync {
    /// Registered rule name.
    fn name(&self) -> &str;

    /// Server-side check. `true` means the value is valid.
    fn validate(&self, value: &Value, options: &RuleOptions) -> bool;

    /// Client-side check, or `None` when the rule only runs on the server.
    fn validation_script(&self, options: &RuleOptions) -> Option<ValidationScript>;

    /// Rejects options the rule cannot interpret. Called once when the rule
    /// is bound so evaluation itself never has to fail.
    fn check_options(&self, options: &RuleOptions) -> Result<(), RuleError> {
        let _ = options;
        Ok(())
    }
}
