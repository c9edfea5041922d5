//! Bracket-syntax element names.
//!
//! `addr[city]` splits into `addr`, `city`; `tags[]` ends with an append
//! segment. A name without brackets is a single field segment, taken
//! verbatim.

use std::fmt;

use smol_str::SmolStr;
use thiserror::Error;

/// One step of a split element name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NameSegment {
    /// Named member.
    Field(SmolStr),
    /// `[]`: the next free position.
    Append,
}

impl NameSegment {
    /// Field text, `None` for an append segment.
    #[must_use]
    pub fn as_field(&self) -> Option<&str> {
        match self {
            Self::Field(field) => Some(field.as_str()),
            Self::Append => None,
        }
    }
}

impl fmt::Display for NameSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(field) => f.write_str(field),
            Self::Append => f.write_str("[]"),
        }
    }
}

/// A name that does not follow `base[seg][seg]...`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid element name '{name}': {reason}")]
pub struct NameError {
    /// The offending name.
    pub name: SmolStr,
    /// What is wrong with it.
    pub reason: SmolStr,
}

impl NameError {
    fn new(name: &str, reason: &str) -> Self {
        Self {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Splits `name` into its bracket segments.
pub fn split_name(name: &str) -> Result<Vec<NameSegment>, NameError> {
    let Some(open) = name.find('[') else {
        return Ok(vec![NameSegment::Field(name.into())]);
    };
    if open == 0 {
        return Err(NameError::new(name, "missing base name before '['"));
    }

    let mut segments = vec![NameSegment::Field(name[..open].into())];
    let mut rest = &name[open..];
    while !rest.is_empty() {
        let Some(inner) = rest.strip_prefix('[') else {
            return Err(NameError::new(name, "text after closing ']'"));
        };
        let Some(close) = inner.find(']') else {
            return Err(NameError::new(name, "unclosed '['"));
        };
        let segment = &inner[..close];
        if segment.contains('[') {
            return Err(NameError::new(name, "nested '['"));
        }
        segments.push(if segment.is_empty() {
            NameSegment::Append
        } else {
            NameSegment::Field(segment.into())
        });
        rest = &inner[close + 1..];
    }
    Ok(segments)
}
