//! Length rules: `minlength`, `maxlength` and `rangelength`.
//!
//! The server check measures the value as-is, so an empty string fails
//! `minlength`. The client script skips empty values instead; required-ness
//! is the `required` rule's job in the browser.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use smol_str::SmolStr;

use crate::error::RuleError;
use crate::rule::{Rule, RuleOptions};
use crate::script::ValidationScript;
use crate::value::text_of;

/// Which comparison a length rule performs, keyed by its registered name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RangeKind {
    /// `length >= bound`.
    MinLength,
    /// `length <= bound`.
    MaxLength,
    /// `lo <= length <= hi`.
    Range,
}

impl RangeKind {
    /// Maps a rule name to its kind. Names other than `minlength` and
    /// `maxlength` select the two-sided range.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "minlength" => Self::MinLength,
            "maxlength" => Self::MaxLength,
            _ => Self::Range,
        }
    }
}

/// Bound for a length rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LengthBound {
    /// Single limit, for `minlength`/`maxlength`.
    Scalar(usize),
    /// Inclusive `[lo, hi]` pair, for ranges.
    Pair(usize, usize),
}

impl LengthBound {
    /// Lower limit. A scalar is its own lower limit.
    #[must_use]
    pub const fn lower(self) -> usize {
        match self {
            Self::Scalar(limit) | Self::Pair(limit, _) => limit,
        }
    }

    /// Upper limit. A scalar is its own upper limit.
    #[must_use]
    pub const fn upper(self) -> usize {
        match self {
            Self::Scalar(limit) | Self::Pair(_, limit) => limit,
        }
    }
}

impl From<usize> for LengthBound {
    fn from(value: usize) -> Self {
        Self::Scalar(value)
    }
}

impl From<(usize, usize)> for LengthBound {
    fn from((lo, hi): (usize, usize)) -> Self {
        Self::Pair(lo, hi)
    }
}

/// How value length is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    /// UTF-8 bytes of the text form.
    #[default]
    Bytes,
    /// Unicode scalar values of the text form.
    Chars,
}

impl LengthUnit {
    /// Parses `bytes` or `chars`.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_ascii_lowercase().as_str() {
            "bytes" => Some(Self::Bytes),
            "chars" => Some(Self::Chars),
            _ => None,
        }
    }

    fn measure(self, text: &str) -> usize {
        match self {
            Self::Bytes => text.len(),
            Self::Chars => text.chars().count(),
        }
    }
}

/// A length rule registered under `minlength`, `maxlength` or a range name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeRule {
    name: SmolStr,
    kind: RangeKind,
    unit: LengthUnit,
}

impl RangeRule {
    /// Creates the rule registered under `name`.
    #[must_use]
    pub fn new(name: impl Into<SmolStr>) -> Self {
        let name = name.into();
        let kind = RangeKind::from_name(&name);
        Self {
            name,
            kind,
            unit: LengthUnit::default(),
        }
    }

    /// `minlength`.
    #[must_use]
    pub fn min_length() -> Self {
        Self::new("minlength")
    }

    /// `maxlength`.
    #[must_use]
    pub fn max_length() -> Self {
        Self::new("maxlength")
    }

    /// `rangelength`.
    #[must_use]
    pub fn range_length() -> Self {
        Self::new("rangelength")
    }

    /// Switches the length measure.
    #[must_use]
    pub fn with_unit(mut self, unit: LengthUnit) -> Self {
        self.unit = unit;
        self
    }

    /// Comparison performed by this rule.
    #[must_use]
    pub fn kind(&self) -> RangeKind {
        self.kind
    }

    /// Server check of the value's length against `bound`.
    #[must_use]
    pub fn check(&self, value: &Value, bound: LengthBound) -> bool {
        let length = self.unit.measure(&text_of(value));
        match self.kind {
            RangeKind::MinLength => length >= bound.lower(),
            RangeKind::MaxLength => length <= bound.upper(),
            RangeKind::Range => length >= bound.lower() && length <= bound.upper(),
        }
    }

    /// Client check; passes (evaluates `false`) on empty values.
    #[must_use]
    pub fn script(&self, bound: LengthBound) -> ValidationScript {
        let test = match self.kind {
            RangeKind::MinLength => format!("{{jsVar}}.length < {}", bound.lower()),
            RangeKind::MaxLength => format!("{{jsVar}}.length > {}", bound.upper()),
            RangeKind::Range => format!(
                "({{jsVar}}.length < {} || {{jsVar}}.length > {})",
                bound.lower(),
                bound.upper()
            ),
        };
        ValidationScript::test(format!("{{jsVar}} != '' && {test}"))
    }
}

impl Rule for RangeRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn validate(&self, value: &Value, options: &RuleOptions) -> bool {
        options
            .length()
            .is_some_and(|bound| self.check(value, bound))
    }

    fn validation_script(&self, options: &RuleOptions) -> Option<ValidationScript> {
        options.length().map(|bound| self.script(bound))
    }

    fn check_options(&self, options: &RuleOptions) -> Result<(), RuleError> {
        match options {
            RuleOptions::Length(LengthBound::Pair(lo, hi)) if lo > hi => Err(RuleError::options(
                &self.name,
                format!("lower bound {lo} exceeds upper bound {hi}"),
            )),
            RuleOptions::Length(_) => Ok(()),
            other => Err(RuleError::options(
                &self.name,
                format!("expected a length bound, got {}", other.shape()),
            )),
        }
    }
}
