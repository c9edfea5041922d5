//! Render and configuration errors.

#![allow(missing_docs)]

use smol_str::SmolStr;
use thiserror::Error;

/// Visitor callbacks arrived in an order the renderer cannot follow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    /// Groups do not nest.
    #[error("group '{requested}' started while group '{active}' is open")]
    GroupAlreadyActive { active: SmolStr, requested: SmolStr },

    /// `finish_group` without a matching `start_group`.
    #[error("group '{group}' finished but no group is open")]
    NoActiveGroup { group: SmolStr },
}

/// An element could not be placed in the output tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot place element '{element}': {reason}")]
pub struct SerializationError {
    /// Name of the element being placed.
    pub element: SmolStr,
    /// What went wrong.
    pub reason: SmolStr,
}

impl SerializationError {
    pub(crate) fn new(element: &str, reason: impl Into<SmolStr>) -> Self {
        Self {
            element: element.into(),
            reason: reason.into(),
        }
    }
}

/// Errors returned by the renderers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// Out-of-order group callbacks.
    #[error(transparent)]
    State(#[from] StateError),

    /// Key path or tree placement failure.
    #[error(transparent)]
    Serialization(#[from] SerializationError),

    /// The template engine rejected a template.
    #[error("template for element '{element}' failed: {reason}")]
    Template { element: SmolStr, reason: SmolStr },
}

/// Errors loading a [`RenderConfig`](crate::RenderConfig).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("{path}: {reason}")]
    Read { path: SmolStr, reason: SmolStr },

    /// The file is not valid TOML for this schema.
    #[error("{path}: {reason}")]
    Parse { path: SmolStr, reason: SmolStr },

    /// A value is out of range.
    #[error("invalid render config: {0}")]
    Invalid(SmolStr),
}
