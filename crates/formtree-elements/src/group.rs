//! Element groups.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::element::Element;
use crate::label::Label;

/// Markup placed after group members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Separator {
    /// Same text after every member but the last.
    Text(String),
    /// Texts used in turn, wrapping around.
    Cycle(Vec<String>),
}

impl Separator {
    /// Separator following member `index` of `count`.
    ///
    /// A cycle gives `items[index % len]` to every member, the last one
    /// included. Plain text goes to every member except the last, which
    /// gets `""`.
    #[must_use]
    pub fn after(&self, index: usize, count: usize) -> &str {
        match self {
            Self::Cycle(items) if items.is_empty() => "",
            Self::Cycle(items) => &items[index % items.len()],
            Self::Text(_) if index + 1 >= count => "",
            Self::Text(text) => text,
        }
    }
}

impl From<&str> for Separator {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<Vec<&str>> for Separator {
    fn from(items: Vec<&str>) -> Self {
        Self::Cycle(items.into_iter().map(str::to_string).collect())
    }
}

/// Several elements rendered and validated as one field.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    name: String,
    label: Label,
    elements: Vec<Element>,
    separator: Option<Separator>,
    append_name: bool,
    frozen: bool,
}

impl Group {
    /// Empty group. Member names are prefixed with the group name by
    /// default, see [`Group::with_append_name`].
    #[must_use]
    pub fn new(name: impl Into<String>, label: impl Into<Label>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            elements: Vec::new(),
            separator: None,
            append_name: true,
            frozen: false,
        }
    }

    /// Whether members added from now on are renamed `group[member]`.
    #[must_use]
    pub fn with_append_name(mut self, append_name: bool) -> Self {
        self.append_name = append_name;
        self
    }

    /// Sets the separator.
    #[must_use]
    pub fn with_separator(mut self, separator: impl Into<Separator>) -> Self {
        self.separator = Some(separator.into());
        self
    }

    /// Builder form of [`Group::push`].
    #[must_use]
    pub fn with_element(mut self, element: impl Into<Element>) -> Self {
        self.push(element);
        self
    }

    /// Adds a member. Unnamed members become `group[<position>]`; named
    /// ones become `group[name]` in append-name mode.
    pub fn push(&mut self, element: impl Into<Element>) {
        let mut element = element.into();
        let index = self.elements.len();
        let own = element.name().to_string();
        if own.is_empty() {
            element.set_name(&format!("{}[{index}]", self.name));
        } else if self.append_name {
            element.set_name(&format!("{}[{own}]", self.name));
        }
        self.elements.push(element);
    }

    /// Group name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Label.
    #[must_use]
    pub fn label(&self) -> &Label {
        &self.label
    }

    /// Members in order.
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Mutable members.
    pub fn elements_mut(&mut self) -> &mut [Element] {
        &mut self.elements
    }

    /// Separator, if any.
    #[must_use]
    pub fn separator(&self) -> Option<&Separator> {
        self.separator.as_ref()
    }

    /// Returns `true` when member names carry the group prefix.
    #[must_use]
    pub fn appends_name(&self) -> bool {
        self.append_name
    }

    /// Returns `true` once frozen.
    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Freezes the group and every member that can freeze.
    pub fn freeze(&mut self) {
        self.frozen = true;
        for element in &mut self.elements {
            element.freeze();
        }
    }

    /// Member values keyed by member name; `null` when no member has one.
    #[must_use]
    pub fn value(&self) -> Value {
        let values: Map<String, Value> = self
            .elements
            .iter()
            .map(|element| (element.name().to_string(), element.value()))
            .filter(|(_, value)| !value.is_null())
            .collect();
        if values.is_empty() {
            Value::Null
        } else {
            Value::Object(values)
        }
    }

    /// Member markup joined by the separator.
    #[must_use]
    pub fn to_html(&self) -> String {
        let count = self.elements.len();
        let mut html = String::new();
        for (index, element) in self.elements.iter().enumerate() {
            if index > 0 {
                if let Some(separator) = &self.separator {
                    html.push_str(separator.after(index - 1, count));
                }
            }
            html.push_str(&element.to_html());
        }
        html
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Input;

    #[test]
    fn cyclic_separators_wrap() {
        let sep = Separator::from(vec!["-", "|"]);
        let picked: Vec<&str> = (0..3).map(|i| sep.after(i, 3)).collect();
        assert_eq!(picked, ["-", "|", "-"]);
    }

    #[test]
    fn scalar_separator_skips_the_last_member() {
        let sep = Separator::from(", ");
        let picked: Vec<&str> = (0..3).map(|i| sep.after(i, 3)).collect();
        assert_eq!(picked, [", ", ", ", ""]);
    }

    #[test]
    fn members_are_renamed_under_the_group() {
        let group = Group::new("phone", "Phone")
            .with_element(Input::text("area", Label::None))
            .with_element(Input::text("", Label::None));
        let names: Vec<&str> = group.elements().iter().map(Element::name).collect();
        assert_eq!(names, ["phone[area]", "phone[1]"]);

        let plain = Group::new("phone", "Phone")
            .with_append_name(false)
            .with_element(Input::text("area", Label::None));
        assert_eq!(plain.elements()[0].name(), "area");
    }

    #[test]
    fn html_joins_members_with_separators() {
        let group = Group::new("d", "Date")
            .with_separator(vec!["/", "/"])
            .with_element(Input::text("m", Label::None).with_value("01"))
            .with_element(Input::text("y", Label::None).with_value("99"));
        assert_eq!(
            group.to_html(),
            r#"<input name="d[m]" type="text" value="01" />/<input name="d[y]" type="text" value="99" />"#
        );
    }
}
