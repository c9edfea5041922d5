//! `formtree-rules` - Validation rules for form elements.
//!
//! Every rule answers two questions about a bound value:
//!
//! - **Server check**: does the submitted value satisfy the rule?
//! - **Client check**: which script fragment tests the same condition in the
//!   browser?
//!
//! The client side follows a two-token contract: a rule returns a
//! [`ValidationScript`] made of a `setup` snippet and a boolean `test`
//! expression. The `test` expression refers to the field value through the
//! [`JS_VAR`] placeholder, which the hosting script generator substitutes
//! with the real field reference. A `test` that evaluates to `true` means
//! the value is invalid.
//!
//! # Example
//!
//! ```
//! use formtree_rules::{CompareRule, LengthBound, RangeRule};
//! use serde_json::json;
//!
//! assert!(!CompareRule.validate(&json!("5"), &json!("5.0"), Some("eq")));
//! assert!(CompareRule.validate(&json!("5"), &json!("5.0"), Some("gte")));
//!
//! let min = RangeRule::min_length();
//! assert!(min.check(&json!("hello"), LengthBound::Scalar(3)));
//! assert_eq!(
//!     min.script(LengthBound::Scalar(3)).test,
//!     "{jsVar} != '' && {jsVar}.length < 3"
//! );
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod compare;
pub mod error;
pub mod range;
pub mod registry;
pub mod required;
pub mod rule;
pub mod script;
pub mod value;

pub use compare::{CompareOperator, CompareRule};
pub use error::RuleError;
pub use range::{LengthBound, LengthUnit, RangeKind, RangeRule};
pub use registry::RuleRegistry;
pub use required::RequiredRule;
pub use rule::{Rule, RuleOptions};
pub use script::{ValidationScript, JS_VAR};
