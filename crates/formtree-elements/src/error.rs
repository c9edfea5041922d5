//! Form building errors.

use formtree_rules::RuleError;
use smol_str::SmolStr;
use thiserror::Error;

use crate::name::NameError;

/// Errors raised while assembling a form or binding rules to it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    /// A rule, value or requirement referenced an element the form lacks.
    #[error("unknown element '{0}'")]
    UnknownElement(SmolStr),

    /// File inputs need a POST form.
    #[error("file field '{0}' requires a POST form")]
    FileUploadOnGet(SmolStr),

    /// An element name could not be split into segments.
    #[error(transparent)]
    Name(#[from] NameError),

    /// Rule lookup or option check failed.
    #[error(transparent)]
    Rule(#[from] RuleError),
}
