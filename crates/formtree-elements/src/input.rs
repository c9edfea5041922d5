//! `<input>` elements.

use std::fmt;

use formtree_rules::value::text_of;
use serde_json::Value;

use crate::attributes::{escape_html, Attributes};
use crate::label::Label;

/// `type` attribute of an input element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputType {
    /// Single-line text.
    Text,
    /// Masked text.
    Password,
    /// Plain push button.
    Button,
    /// Submit button.
    Submit,
    /// Reset button.
    Reset,
    /// Image submit button.
    Image,
    /// Hidden field.
    Hidden,
    /// Radio option.
    Radio,
    /// Checkbox.
    Checkbox,
}

impl InputType {
    /// Type tag as written in markup.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Password => "password",
            Self::Button => "button",
            Self::Submit => "submit",
            Self::Reset => "reset",
            Self::Image => "image",
            Self::Hidden => "hidden",
            Self::Radio => "radio",
            Self::Checkbox => "checkbox",
        }
    }

    /// Parses a type tag.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        Some(match text {
            "text" => Self::Text,
            "password" => Self::Password,
            "button" => Self::Button,
            "submit" => Self::Submit,
            "reset" => Self::Reset,
            "image" => Self::Image,
            "hidden" => Self::Hidden,
            "radio" => Self::Radio,
            "checkbox" => Self::Checkbox,
            _ => return None,
        })
    }

    /// Whether elements of this type can be frozen.
    #[must_use]
    pub const fn can_freeze(self) -> bool {
        matches!(
            self,
            Self::Text | Self::Password | Self::Radio | Self::Checkbox
        )
    }

    const fn keeps_value_when_frozen(self) -> bool {
        matches!(self, Self::Text | Self::Radio | Self::Checkbox)
    }
}

impl fmt::Display for InputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An `<input>` element.
#[derive(Debug, Clone, PartialEq)]
pub struct Input {
    kind: InputType,
    label: Label,
    attributes: Attributes,
    frozen: bool,
    persistent_freeze: bool,
}

impl Input {
    /// Input of `kind` named `name`.
    #[must_use]
    pub fn new(kind: InputType, name: &str, label: impl Into<Label>) -> Self {
        let mut attributes = Attributes::new();
        attributes.set("name", name);
        attributes.set("type", kind.as_str());
        Self {
            kind,
            label: label.into(),
            attributes,
            frozen: false,
            persistent_freeze: kind.keeps_value_when_frozen(),
        }
    }

    /// Text field.
    #[must_use]
    pub fn text(name: &str, label: impl Into<Label>) -> Self {
        Self::new(InputType::Text, name, label)
    }

    /// Password field.
    #[must_use]
    pub fn password(name: &str, label: impl Into<Label>) -> Self {
        Self::new(InputType::Password, name, label)
    }

    /// Hidden field carrying `value`.
    #[must_use]
    pub fn hidden(name: &str, value: &str) -> Self {
        Self::new(InputType::Hidden, name, Label::None).with_value(value)
    }

    /// Push button with caption `value`.
    #[must_use]
    pub fn button(name: &str, value: &str) -> Self {
        Self::new(InputType::Button, name, Label::None).with_value(value)
    }

    /// Submit button with caption `value`.
    #[must_use]
    pub fn submit(name: &str, value: &str) -> Self {
        Self::new(InputType::Submit, name, Label::None).with_value(value)
    }

    /// Reset button with caption `value`.
    #[must_use]
    pub fn reset(name: &str, value: &str) -> Self {
        Self::new(InputType::Reset, name, Label::None).with_value(value)
    }

    /// Image button showing `src`.
    #[must_use]
    pub fn image(name: &str, src: &str) -> Self {
        let mut input = Self::new(InputType::Image, name, Label::None);
        input.attributes.set("src", src);
        input
    }

    /// Radio option submitting `value` when checked.
    #[must_use]
    pub fn radio(name: &str, label: impl Into<Label>, value: &str) -> Self {
        let mut input = Self::new(InputType::Radio, name, label);
        input.attributes.set("value", value);
        input
    }

    /// Checkbox.
    #[must_use]
    pub fn checkbox(name: &str, label: impl Into<Label>) -> Self {
        Self::new(InputType::Checkbox, name, label)
    }

    /// Builder form of [`Input::set_value`].
    #[must_use]
    pub fn with_value(mut self, value: &str) -> Self {
        self.set_value(&Value::String(value.to_string()));
        self
    }

    /// Input type.
    #[must_use]
    pub fn kind(&self) -> InputType {
        self.kind
    }

    /// `name` attribute.
    #[must_use]
    pub fn name(&self) -> &str {
        self.attributes.get("name").unwrap_or_default()
    }

    /// Renames the element.
    pub fn set_name(&mut self, name: &str) {
        self.attributes.set("name", name);
    }

    /// Label.
    #[must_use]
    pub fn label(&self) -> &Label {
        &self.label
    }

    /// Attributes in markup order.
    #[must_use]
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Sets an arbitrary attribute.
    pub fn set_attribute(&mut self, key: &str, value: impl Into<String>) {
        self.attributes.set(key, value);
    }

    /// `size` attribute of text and password fields.
    pub fn set_size(&mut self, size: u32) {
        self.attributes.set("size", size.to_string());
    }

    /// `maxlength` attribute of text and password fields.
    pub fn set_max_length(&mut self, max_length: u32) {
        self.attributes.set("maxlength", max_length.to_string());
    }

    /// Current value: the `value` attribute, or `null` when unset.
    ///
    /// A checkbox reports its state instead: its `value` attribute (or
    /// `"1"`) when checked, `null` otherwise.
    #[must_use]
    pub fn value(&self) -> Value {
        let own = self.attributes.get("value");
        match self.kind {
            InputType::Checkbox if !self.is_checked() => Value::Null,
            InputType::Checkbox => Value::String(own.unwrap_or("1").to_string()),
            _ => own.map_or(Value::Null, |value| Value::String(value.to_string())),
        }
    }

    /// Applies a submitted or default value.
    ///
    /// Radio options become checked when `value` matches their own value;
    /// checkboxes become checked on any non-empty value. Other inputs store
    /// the text form as their `value` attribute.
    pub fn set_value(&mut self, value: &Value) {
        let text = text_of(value);
        match self.kind {
            InputType::Radio => {
                let checked = self.attributes.get("value") == Some(&*text);
                self.set_checked(checked);
            }
            InputType::Checkbox => self.set_checked(!text.is_empty() && text != "0"),
            _ => self.attributes.set("value", text.into_owned()),
        }
    }

    fn set_checked(&mut self, checked: bool) {
        if checked {
            self.attributes.set("checked", "checked");
        } else {
            self.attributes.remove("checked");
        }
    }

    /// Returns `true` for a checked radio or checkbox.
    #[must_use]
    pub fn is_checked(&self) -> bool {
        self.attributes.contains("checked")
    }

    /// Returns `true` once frozen.
    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Freezes the input if its type allows it. Returns whether it froze.
    pub fn freeze(&mut self) -> bool {
        if self.kind.can_freeze() {
            self.frozen = true;
        }
        self.frozen
    }

    /// Whether frozen markup carries a hidden copy of the value.
    pub fn set_persistent_freeze(&mut self, persistent: bool) {
        self.persistent_freeze = persistent;
    }

    /// Markup: `<input ... />`, or the read-only rendering once frozen.
    #[must_use]
    pub fn to_html(&self) -> String {
        if self.frozen {
            self.frozen_html()
        } else {
            format!("<input{} />", self.attributes.to_html())
        }
    }

    /// Read-only rendering of the value.
    #[must_use]
    pub fn frozen_html(&self) -> String {
        let value = self.attributes.get("value").unwrap_or_default();
        let shown = match self.kind {
            InputType::Password if value.is_empty() => "&nbsp;".to_string(),
            InputType::Password => "**********".to_string(),
            InputType::Radio if self.is_checked() => "<tt>(x)</tt>".to_string(),
            InputType::Radio => "<tt>( )</tt>".to_string(),
            InputType::Checkbox if self.is_checked() => "<tt>[x]</tt>".to_string(),
            InputType::Checkbox => "<tt>[ ]</tt>".to_string(),
            _ if value.is_empty() => "&nbsp;".to_string(),
            _ => escape_html(value),
        };
        shown + &self.persistent_data()
    }

    fn persistent_data(&self) -> String {
        if !self.persistent_freeze {
            return String::new();
        }
        if matches!(self.kind, InputType::Radio | InputType::Checkbox) && !self.is_checked() {
            return String::new();
        }
        let mut hidden = Attributes::new();
        hidden.set("type", "hidden");
        hidden.set("name", self.name());
        hidden.set("value", self.attributes.get("value").unwrap_or_default());
        if let Some(id) = self.attributes.get("id") {
            hidden.set("id", id);
        }
        format!("<input{} />", hidden.to_html())
    }
}
