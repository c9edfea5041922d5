//! Element-to-record projection.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::trace;

use formtree_elements::{Element, Group, Label, Separator};

use crate::model::{ElementRecord, GroupElements};

/// How multi-part labels are split into `label` and `label_<n>`.
///
/// With entries `[{note: "N"}, "Name", "hint"]`:
///
/// - `FirstEntry` → `label = "N"`, `label_2 = "Name"`, `label_3 = "hint"`
/// - `FirstPositional` → `label = "Name"`, `label_2 = "hint"`,
///   `label_note = "N"`
///
/// Keyed entries other than a leading one under `FirstEntry` always become
/// `label_<key>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LabelNumbering {
    /// The first entry is primary; remaining positional entries count
    /// from 2.
    #[default]
    FirstEntry,
    /// Positional entries count from 1 and the first of them is primary.
    FirstPositional,
}

impl LabelNumbering {
    /// Parses `first-entry` or `first-positional`.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_ascii_lowercase().as_str() {
            "first-entry" => Some(Self::FirstEntry),
            "first-positional" => Some(Self::FirstPositional),
            _ => None,
        }
    }

    fn apply(self, label: &Label, record: &mut ElementRecord) {
        let entries = match label {
            Label::None => return,
            Label::Text(text) => {
                record.label = Some(text.clone());
                return;
            }
            Label::Multi(entries) => entries,
        };
        let mut extra = |key: String, text: &str| {
            record.extra_labels.insert(format!("label_{key}"), text.to_string());
        };
        let mut primary = None;
        match self {
            Self::FirstEntry => {
                let mut entries = entries.iter();
                primary = entries.next().map(|entry| entry.text.clone());
                let mut position = 2;
                for entry in entries {
                    match &entry.key {
                        Some(key) => extra(key.to_string(), &entry.text),
                        None => {
                            extra(position.to_string(), &entry.text);
                            position += 1;
                        }
                    }
                }
            }
            Self::FirstPositional => {
                let mut position = 1;
                for entry in entries {
                    match &entry.key {
                        Some(key) => extra(key.to_string(), &entry.text),
                        None if position == 1 => {
                            primary = Some(entry.text.clone());
                            position += 1;
                        }
                        None => {
                            extra(position.to_string(), &entry.text);
                            position += 1;
                        }
                    }
                }
            }
        }
        record.label = primary;
    }
}

/// What the projector is looking at.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    /// A leaf element.
    Element(&'a Element),
    /// A group, without its members.
    Group(&'a Group),
}

impl<'a> Node<'a> {
    /// Node name.
    #[must_use]
    pub fn name(self) -> &'a str {
        match self {
            Self::Element(element) => element.name(),
            Self::Group(group) => group.name(),
        }
    }

    /// The leaf element, if this is one.
    #[must_use]
    pub fn element(self) -> Option<&'a Element> {
        match self {
            Self::Element(element) => Some(element),
            Self::Group(_) => None,
        }
    }

    fn label(self) -> &'a Label {
        match self {
            Self::Element(element) => element.label(),
            Self::Group(group) => group.label(),
        }
    }
}

/// Builds the initial record for a node and may decorate it once
/// projection is done.
pub trait RecordFactory: fmt::Debug + Send + Sync {
    /// Empty record to fill in.
    fn create(&self, node: Node<'_>) -> ElementRecord {
        let _ = node;
        ElementRecord::default()
    }

    /// Called after the projector has filled in `record`.
    fn finish(&self, record: &mut ElementRecord, node: Node<'_>) {
        let _ = (record, node);
    }
}

/// Factory producing plain records.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainRecords;

impl RecordFactory for PlainRecords {}

/// Turns elements into [`ElementRecord`]s.
#[derive(Debug, Clone)]
pub struct ElementProjector {
    styles: IndexMap<String, String>,
    numbering: LabelNumbering,
    factory: Arc<dyn RecordFactory>,
}

impl Default for ElementProjector {
    fn default() -> Self {
        Self {
            styles: IndexMap::new(),
            numbering: LabelNumbering::default(),
            factory: Arc::new(PlainRecords),
        }
    }
}

impl ElementProjector {
    /// Projector with no styles, `FirstEntry` numbering and plain records.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Label numbering convention.
    #[must_use]
    pub fn with_numbering(mut self, numbering: LabelNumbering) -> Self {
        self.numbering = numbering;
        self
    }

    /// Record factory.
    #[must_use]
    pub fn with_factory(mut self, factory: Arc<dyn RecordFactory>) -> Self {
        self.factory = factory;
        self
    }

    /// Sets the style of one element.
    pub fn set_style(&mut self, element: impl Into<String>, style: impl Into<String>) {
        self.styles.insert(element.into(), style.into());
    }

    /// Merges element-to-style entries.
    pub fn merge_styles<I, K, V>(&mut self, styles: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.styles
            .extend(styles.into_iter().map(|(k, v)| (k.into(), v.into())));
    }

    /// Projects an element. `separator` is the one picked for it when it
    /// is a group member; groups are handed to [`Self::project_group`].
    #[must_use]
    pub fn project(
        &self,
        element: &Element,
        required: bool,
        error: Option<&str>,
        separator: Option<String>,
    ) -> ElementRecord {
        if let Element::Group(group) = element {
            return self.project_group(group, required, error);
        }
        let node = Node::Element(element);
        let mut record = self.base(node, required, error);
        record.value = element.value();
        record.kind = element.type_name().to_string();
        record.frozen = element.is_frozen();
        record.html = Some(element.to_html());
        record.separator = separator.map(Separator::Text);
        self.factory.finish(&mut record, node);
        trace!("projected {} '{}'", record.kind, record.name);
        record
    }

    /// Projects a group without its members: `elements` starts empty and
    /// there is no `html`.
    #[must_use]
    pub fn project_group(
        &self,
        group: &Group,
        required: bool,
        error: Option<&str>,
    ) -> ElementRecord {
        let node = Node::Group(group);
        let mut record = self.base(node, required, error);
        record.value = group.value();
        record.kind = "group".to_string();
        record.frozen = group.is_frozen();
        record.elements = Some(GroupElements::List(Vec::new()));
        record.separator = group.separator().cloned();
        self.factory.finish(&mut record, node);
        trace!("projected group '{}'", record.name);
        record
    }

    fn base(&self, node: Node<'_>, required: bool, error: Option<&str>) -> ElementRecord {
        let mut record = self.factory.create(node);
        record.name = node.name().to_string();
        record.required = required;
        record.error = error.filter(|error| !error.is_empty()).map(str::to_string);
        self.numbering.apply(node.label(), &mut record);
        if let Some(style) = self.styles.get(&record.name) {
            record.style_template = Some(format!("styles/{style}.html"));
            record.style = Some(style.clone());
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formtree_elements::{Input, LabelEntry};
    use serde_json::json;

    fn labelled(label: Label) -> Element {
        Element::Input(Input::text("q", label))
    }

    fn mixed_label() -> Label {
        Label::Multi(vec![
            LabelEntry::keyed("note", "N"),
            LabelEntry::positional("Name"),
            LabelEntry::positional("hint"),
        ])
    }

    #[test]
    fn scalar_label_is_primary() {
        let record = ElementProjector::new().project(&labelled("Query".into()), false, None, None);
        assert_eq!(record.label.as_deref(), Some("Query"));
        assert!(record.extra_labels.is_empty());
    }

    #[test]
    fn first_entry_numbering() {
        let record = ElementProjector::new().project(&labelled(mixed_label()), false, None, None);
        assert_eq!(record.label.as_deref(), Some("N"));
        assert_eq!(record.extra_label("2"), Some("Name"));
        assert_eq!(record.extra_label("3"), Some("hint"));
        assert_eq!(record.extra_labels.len(), 2);
    }

    #[test]
    fn first_positional_numbering() {
        let projector = ElementProjector::new().with_numbering(LabelNumbering::FirstPositional);
        let record = projector.project(&labelled(mixed_label()), false, None, None);
        assert_eq!(record.label.as_deref(), Some("Name"));
        assert_eq!(record.extra_label("2"), Some("hint"));
        assert_eq!(record.extra_label("note"), Some("N"));
        assert_eq!(record.extra_labels.len(), 2);
    }

    #[test]
    fn conventions_agree_on_plain_lists() {
        let label = Label::list(["Name", "hint"]);
        for numbering in [LabelNumbering::FirstEntry, LabelNumbering::FirstPositional] {
            let projector = ElementProjector::new().with_numbering(numbering);
            let record = projector.project(&labelled(label.clone()), false, None, None);
            assert_eq!(record.label.as_deref(), Some("Name"));
            assert_eq!(record.extra_label("2"), Some("hint"));
        }
    }

    #[test]
    fn styles_and_errors() {
        let mut projector = ElementProjector::new();
        projector.merge_styles([("q", "wide")]);
        let record = projector.project(&labelled(Label::None), true, Some(""), None);
        assert_eq!(record.style.as_deref(), Some("wide"));
        assert_eq!(record.style_template.as_deref(), Some("styles/wide.html"));
        assert_eq!(record.error, None);
        assert!(record.required);

        let other = Element::Input(Input::text("other", Label::None));
        assert_eq!(projector.project(&other, false, None, None).style, None);
    }

    #[derive(Debug)]
    struct WithMaxLength;

    impl RecordFactory for WithMaxLength {
        fn finish(&self, record: &mut ElementRecord, node: Node<'_>) {
            if let Some(max) = node
                .element()
                .and_then(Element::as_input)
                .and_then(|input| input.attributes().get("maxlength"))
            {
                record.extra.insert("maxlength".to_string(), json!(max));
            }
        }
    }

    #[test]
    fn factory_decorates_records() {
        let projector = ElementProjector::new().with_factory(Arc::new(WithMaxLength));
        let mut input = Input::text("zip", "Zip");
        input.set_max_length(5);
        let record = projector.project(&Element::Input(input), false, None, None);
        assert_eq!(record.extra["maxlength"], json!("5"));
    }
}
