//! Name-to-rule lookup.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use smol_str::SmolStr;
use tracing::debug;

use crate::compare::CompareRule;
use crate::error::RuleError;
use crate::range::{LengthUnit, RangeRule};
use crate::required::RequiredRule;
use crate::rule::Rule;

/// Rules available to a form, keyed by registered name.
///
/// Cloning shares the rule instances.
#[derive(Clone)]
pub struct RuleRegistry {
    rules: IndexMap<SmolStr, Arc<dyn Rule>>,
}

impl RuleRegistry {
    /// An empty registry.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            rules: IndexMap::new(),
        }
    }

    /// Registry with `required`, `compare`, `minlength`, `maxlength` and
    /// `rangelength`.
    #[must_use]
    pub fn with_builtins(unit: LengthUnit) -> Self {
        let mut registry = Self::empty();
        registry.register(RequiredRule);
        registry.register(CompareRule);
        for name in ["minlength", "maxlength", "rangelength"] {
            registry.register(RangeRule::new(name).with_unit(unit));
        }
        registry
    }

    /// Registers `rule` under its own name, replacing any previous entry.
    pub fn register(&mut self, rule: impl Rule + 'static) {
        let name = SmolStr::new(rule.name());
        debug!("registering rule '{name}'");
        self.rules.insert(name, Arc::new(rule));
    }

    /// Looks up a rule by name.
    pub fn get(&self, name: &str) -> Result<Arc<dyn Rule>, RuleError> {
        self.rules
            .get(name)
            .cloned()
            .ok_or_else(|| RuleError::UnknownRule(name.into()))
    }

    /// Returns `true` when a rule is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// Registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(SmolStr::as_str)
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::with_builtins(LengthUnit::default())
    }
}

impl fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("rules", &self.rules.keys().collect::<Vec<_>>())
            .finish()
    }
}
