//! Client-side validation script fragments.

use serde::Serialize;

/// Placeholder for the bound field value inside a [`ValidationScript`].
pub const JS_VAR: &str = "{jsVar}";

/// A rule's client-side check: a `setup` snippet run once, then a boolean
/// `test` expression that is `true` when the value is invalid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationScript {
    /// Code to run before the test. Usually empty.
    pub setup: String,
    /// Boolean expression template containing [`JS_VAR`].
    pub test: String,
}

impl ValidationScript {
    /// Builds a script with no setup code.
    #[must_use]
    pub fn test(test: impl Into<String>) -> Self {
        Self {
            setup: String::new(),
            test: test.into(),
        }
    }

    /// Substitutes the value placeholder in both parts.
    #[must_use]
    pub fn bind(&self, field_ref: &str) -> Self {
        Self {
            setup: self.setup.replace(JS_VAR, field_ref),
            test: self.test.replace(JS_VAR, field_ref),
        }
    }

    /// Returns `true` when there is nothing to run.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.setup.is_empty() && self.test.is_empty()
    }
}
