//! Section headers.

/// A header that starts a new form section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    name: String,
    text: String,
}

impl Header {
    /// Header named `name` showing `text`. The name may be empty.
    #[must_use]
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }

    /// Header name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Header text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Markup is the text itself.
    #[must_use]
    pub fn to_html(&self) -> String {
        self.text.clone()
    }
}
