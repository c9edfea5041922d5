//! Output model handed to template collaborators.

#![allow(missing_docs)]

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use formtree_elements::Separator;

use crate::keypath::KeyTree;

/// Children of a group record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum GroupElements {
    /// Positional children.
    List(Vec<ElementRecord>),
    /// Children addressed by their key path relative to the group.
    Keyed(KeyTree),
}

impl GroupElements {
    /// Number of direct children.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::List(items) => items.len(),
            Self::Keyed(tree) => tree.len(),
        }
    }

    /// Returns `true` when there are no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One projected element or group.
///
/// Leaves carry `html`; groups carry `elements` and never `html`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementRecord {
    pub name: String,
    pub value: Value,
    #[serde(rename = "type")]
    pub kind: String,
    pub frozen: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Auxiliary labels, `label_2`, `label_note`, ...
    #[serde(flatten)]
    pub extra_labels: IndexMap<String, String>,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style_template: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elements: Option<GroupElements>,
    /// Inside a group: the separator after this member. On a group: the
    /// configured separator.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub separator: Option<Separator>,
    /// Fields added by a [`RecordFactory`](crate::RecordFactory).
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl ElementRecord {
    /// Returns `true` if the element type is `kind`.
    #[must_use]
    pub fn is_type(&self, kind: &str) -> bool {
        self.kind == kind
    }

    /// Returns `true` unless frozen.
    #[must_use]
    pub fn not_frozen(&self) -> bool {
        !self.frozen
    }

    /// Returns `true` for submit and reset buttons.
    #[must_use]
    pub fn is_button(&self) -> bool {
        matches!(self.kind.as_str(), "submit" | "reset")
    }

    /// Returns `true` for group records.
    #[must_use]
    pub fn is_group(&self) -> bool {
        self.kind == "group"
    }

    /// Auxiliary label stored as `label_<key>`.
    #[must_use]
    pub fn extra_label(&self, key: &str) -> Option<&str> {
        self.extra_labels
            .get(&format!("label_{key}"))
            .map(String::as_str)
    }

    /// Positional children of a group record.
    #[must_use]
    pub fn children(&self) -> &[ElementRecord] {
        match &self.elements {
            Some(GroupElements::List(items)) => items,
            _ => &[],
        }
    }
}

/// Elements that follow one header.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SectionRecord {
    pub header: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub elements: Vec<ElementRecord>,
}

/// Form-level fields shared by both output shapes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSummary {
    pub frozen: bool,
    pub javascript: String,
    pub attributes: String,
    pub required_note: String,
    /// Markup of hidden inputs, one per line; only when collecting them.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hidden: Option<String>,
    pub has_required: bool,
    /// Messages keyed by element name.
    pub errors: IndexMap<String, String>,
}

impl FormSummary {
    /// Opening `<form>` tag followed by a newline.
    #[must_use]
    pub fn output_header(&self) -> String {
        format!("<form {}>\n", self.attributes)
    }

    /// Client validation script.
    #[must_use]
    pub fn output_javascript(&self) -> &str {
        &self.javascript
    }
}

/// Output of the [`ObjectRenderer`](crate::ObjectRenderer).
///
/// Elements land in `elements` until the first header; from then on they
/// go into `sections`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OutputModel {
    #[serde(flatten)]
    pub form: FormSummary,
    pub elements: Vec<ElementRecord>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sections: Vec<SectionRecord>,
}

impl OutputModel {
    /// See [`FormSummary::output_header`].
    #[must_use]
    pub fn output_header(&self) -> String {
        self.form.output_header()
    }

    /// See [`FormSummary::output_javascript`].
    #[must_use]
    pub fn output_javascript(&self) -> &str {
        self.form.output_javascript()
    }

    /// Every top-level record, flat list first, then section by section.
    pub fn records(&self) -> impl Iterator<Item = &ElementRecord> {
        self.elements
            .iter()
            .chain(self.sections.iter().flat_map(|section| &section.elements))
    }
}

/// Output of the [`KeyedRenderer`](crate::KeyedRenderer).
///
/// Records sit in a tree at the key paths derived from their names; the
/// tree is flattened into the top level when serialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KeyedOutput {
    #[serde(flatten)]
    pub form: FormSummary,
    /// Header texts by header name, or by section index when unnamed.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub header: IndexMap<String, String>,
    #[serde(flatten)]
    pub tree: KeyTree,
}

impl KeyedOutput {
    /// Names the tree may not use at its root.
    pub const RESERVED: [&'static str; 8] = [
        "frozen",
        "javascript",
        "attributes",
        "requiredNote",
        "hidden",
        "hasRequired",
        "errors",
        "header",
    ];

    /// See [`FormSummary::output_header`].
    #[must_use]
    pub fn output_header(&self) -> String {
        self.form.output_header()
    }

    /// See [`FormSummary::output_javascript`].
    #[must_use]
    pub fn output_javascript(&self) -> &str {
        self.form.output_javascript()
    }
}
