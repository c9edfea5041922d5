//! The element sum type seen by forms and visitors.

use serde_json::Value;

use crate::file::FileInput;
use crate::group::Group;
use crate::header::Header;
use crate::input::{Input, InputType};
use crate::label::Label;

/// Any node a form can hold.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    /// `<input>` of any type.
    Input(Input),
    /// File upload field.
    File(FileInput),
    /// Section header.
    Header(Header),
    /// Group of elements.
    Group(Group),
}

impl Element {
    /// Element name; may be empty.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Input(input) => input.name(),
            Self::File(file) => file.name(),
            Self::Header(header) => header.name(),
            Self::Group(group) => group.name(),
        }
    }

    pub(crate) fn set_name(&mut self, name: &str) {
        match self {
            Self::Input(input) => input.set_name(name),
            Self::File(file) => file.set_name(name),
            Self::Header(_) | Self::Group(_) => {}
        }
    }

    /// Type tag: the input type, `file`, `header` or `group`.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Input(input) => input.kind().as_str(),
            Self::File(_) => "file",
            Self::Header(_) => "header",
            Self::Group(_) => "group",
        }
    }

    /// Current value.
    #[must_use]
    pub fn value(&self) -> Value {
        match self {
            Self::Input(input) => input.value(),
            Self::File(file) => file.value(),
            Self::Header(_) => Value::Null,
            Self::Group(group) => group.value(),
        }
    }

    /// Applies a value to an input. Files take theirs from an upload
    /// table, groups through their members.
    pub fn set_value(&mut self, value: &Value) {
        if let Self::Input(input) = self {
            input.set_value(value);
        }
    }

    /// Label; headers have none.
    #[must_use]
    pub fn label(&self) -> &Label {
        const NONE: &Label = &Label::None;
        match self {
            Self::Input(input) => input.label(),
            Self::File(file) => file.label(),
            Self::Header(_) => NONE,
            Self::Group(group) => group.label(),
        }
    }

    /// Returns `true` once frozen.
    #[must_use]
    pub fn is_frozen(&self) -> bool {
        match self {
            Self::Input(input) => input.is_frozen(),
            Self::File(_) | Self::Header(_) => false,
            Self::Group(group) => group.is_frozen(),
        }
    }

    /// Freezes the element where its type allows.
    pub fn freeze(&mut self) {
        match self {
            Self::Input(input) => {
                input.freeze();
            }
            Self::File(_) | Self::Header(_) => {}
            Self::Group(group) => group.freeze(),
        }
    }

    /// Markup.
    #[must_use]
    pub fn to_html(&self) -> String {
        match self {
            Self::Input(input) => input.to_html(),
            Self::File(file) => file.to_html(),
            Self::Header(header) => header.to_html(),
            Self::Group(group) => group.to_html(),
        }
    }

    /// The group, for group elements.
    #[must_use]
    pub fn as_group(&self) -> Option<&Group> {
        match self {
            Self::Group(group) => Some(group),
            _ => None,
        }
    }

    /// The input, for input elements.
    #[must_use]
    pub fn as_input(&self) -> Option<&Input> {
        match self {
            Self::Input(input) => Some(input),
            _ => None,
        }
    }

    /// Returns `true` for hidden inputs.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.is_input(InputType::Hidden)
    }

    /// Returns `true` for inputs of `kind`.
    #[must_use]
    pub fn is_input(&self, kind: InputType) -> bool {
        matches!(self, Self::Input(input) if input.kind() == kind)
    }
}

impl From<Input> for Element {
    fn from(input: Input) -> Self {
        Self::Input(input)
    }
}

impl From<FileInput> for Element {
    fn from(file: FileInput) -> Self {
        Self::File(file)
    }
}

impl From<Header> for Element {
    fn from(header: Header) -> Self {
        Self::Header(header)
    }
}

impl From<Group> for Element {
    fn from(group: Group) -> Self {
        Self::Group(group)
    }
}
