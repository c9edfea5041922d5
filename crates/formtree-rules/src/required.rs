//! Non-empty value rule.

use serde_json::Value;

use crate::rule::{Rule, RuleOptions};
use crate::script::ValidationScript;
use crate::value::text_of;

/// Fails on `null`, empty text and empty collections.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequiredRule;

impl RequiredRule {
    /// Registered name.
    pub const NAME: &'static str = "required";
}

impl Rule for RequiredRule {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn validate(&self, value: &Value, _options: &RuleOptions) -> bool {
        match value {
            Value::Array(items) => !items.is_empty(),
            Value::Object(fields) => !fields.is_empty(),
            other => !text_of(other).is_empty(),
        }
    }

    fn validation_script(&self, _options: &RuleOptions) -> Option<ValidationScript> {
        Some(ValidationScript::test("{jsVar} == ''"))
    }
}
