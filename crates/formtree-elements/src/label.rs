//! Element labels: none, a single text, or an ordered list of entries.

use smol_str::SmolStr;

/// One entry of a multi-part label. Keyed entries are addressed by key,
/// the rest by position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelEntry {
    /// Optional entry key.
    pub key: Option<SmolStr>,
    /// Label text.
    pub text: String,
}

impl LabelEntry {
    /// Positional entry.
    #[must_use]
    pub fn positional(text: impl Into<String>) -> Self {
        Self {
            key: None,
            text: text.into(),
        }
    }

    /// Keyed entry.
    #[must_use]
    pub fn keyed(key: impl Into<SmolStr>, text: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            text: text.into(),
        }
    }
}

/// Label attached to an element or group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Label {
    /// No label.
    #[default]
    None,
    /// A single label.
    Text(String),
    /// Several labels, e.g. a caption plus a hint.
    Multi(Vec<LabelEntry>),
}

impl Label {
    /// Multi-part label of positional entries.
    #[must_use]
    pub fn list<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Multi(texts.into_iter().map(LabelEntry::positional).collect())
    }

    /// Returns `true` for [`Label::None`].
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// First label text, if any.
    #[must_use]
    pub fn first(&self) -> Option<&str> {
        match self {
            Self::None => None,
            Self::Text(text) => Some(text),
            Self::Multi(entries) => entries.first().map(|entry| entry.text.as_str()),
        }
    }
}

impl From<&str> for Label {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Label {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Vec<LabelEntry>> for Label {
    fn from(entries: Vec<LabelEntry>) -> Self {
        Self::Multi(entries)
    }
}
