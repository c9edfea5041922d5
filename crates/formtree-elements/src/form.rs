//! The form container: elements, rules, validation and traversal.

use std::fmt::Write as _;
use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use serde_json::{Map, Value};
use smol_str::SmolStr;
use tracing::{debug, trace};

use formtree_rules::{
    LengthUnit, RequiredRule, Rule, RuleOptions, RuleRegistry, ValidationScript,
};

use crate::attributes::Attributes;
use crate::element::Element;
use crate::error::FormError;
use crate::file::{register_file_rules, UploadTable};
use crate::group::Group;
use crate::input::{Input, InputType};
use crate::name::{split_name, NameSegment};
use crate::visit::{FormMeta, FormVisitor};

/// Note shown next to forms with required fields unless replaced.
pub const DEFAULT_REQUIRED_NOTE: &str = "<span style=\"font-size:80%; color:#ff0000;\">*</span><span style=\"font-size:80%;\"> denotes required field</span>";

/// HTTP method of a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FormMethod {
    /// `get`.
    Get,
    /// `post`.
    #[default]
    Post,
}

impl FormMethod {
    /// Attribute text.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Post => "post",
        }
    }
}

/// Element(s) a rule reads.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RuleTarget {
    /// One element's value.
    Element(SmolStr),
    /// Both values as a two-item list, e.g. for `compare`.
    Pair(SmolStr, SmolStr),
}

impl RuleTarget {
    /// Element that receives the error message.
    #[must_use]
    pub fn first(&self) -> &str {
        match self {
            Self::Element(name) | Self::Pair(name, _) => name,
        }
    }

    fn names(&self) -> impl Iterator<Item = &str> {
        let (first, second) = match self {
            Self::Element(name) => (name.as_str(), None),
            Self::Pair(first, second) => (first.as_str(), Some(second.as_str())),
        };
        std::iter::once(first).chain(second)
    }
}

impl From<&str> for RuleTarget {
    fn from(name: &str) -> Self {
        Self::Element(name.into())
    }
}

impl From<(&str, &str)> for RuleTarget {
    fn from((first, second): (&str, &str)) -> Self {
        Self::Pair(first.into(), second.into())
    }
}

#[derive(Debug, Clone)]
struct RuleBinding {
    target: RuleTarget,
    rule: Arc<dyn Rule>,
    options: RuleOptions,
    message: String,
}

/// An HTML form: ordered elements plus the rules bound to them.
#[derive(Debug, Clone)]
pub struct Form {
    name: String,
    method: FormMethod,
    attributes: Attributes,
    elements: Vec<Element>,
    frozen: bool,
    required: FxHashSet<SmolStr>,
    required_note: String,
    rules: Vec<RuleBinding>,
    errors: IndexMap<SmolStr, String>,
    registry: RuleRegistry,
}

impl Form {
    /// Empty form. The registry holds the built-in and file rules.
    #[must_use]
    pub fn new(name: &str, method: FormMethod, action: &str) -> Self {
        let mut attributes = Attributes::new();
        attributes.set("action", action);
        attributes.set("method", method.as_str());
        attributes.set("name", name);
        attributes.set("id", name);
        let mut registry = RuleRegistry::with_builtins(LengthUnit::default());
        register_file_rules(&mut registry);
        Self {
            name: name.to_string(),
            method,
            attributes,
            elements: Vec::new(),
            frozen: false,
            required: FxHashSet::default(),
            required_note: DEFAULT_REQUIRED_NOTE.to_string(),
            rules: Vec::new(),
            errors: IndexMap::new(),
            registry,
        }
    }

    /// Replaces the rule registry. Rules already bound keep their instance.
    #[must_use]
    pub fn with_registry(mut self, registry: RuleRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Registry used by [`Form::add_rule`].
    pub fn registry_mut(&mut self) -> &mut RuleRegistry {
        &mut self.registry
    }

    /// Form name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `<form>` attributes.
    #[must_use]
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Sets a `<form>` attribute.
    pub fn set_attribute(&mut self, key: &str, value: impl Into<String>) {
        self.attributes.set(key, value);
    }

    /// Top-level elements in order.
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Appends an element.
    ///
    /// File fields switch the form to multipart encoding and are refused
    /// on GET forms.
    pub fn add_element(&mut self, element: impl Into<Element>) -> Result<(), FormError> {
        let element = element.into();
        if let Some(file) = first_file(&element) {
            if self.method == FormMethod::Get {
                return Err(FormError::FileUploadOnGet(file.into()));
            }
            self.attributes.set("enctype", "multipart/form-data");
        }
        debug!("form '{}': adding {} '{}'", self.name, element.type_name(), element.name());
        self.elements.push(element);
        Ok(())
    }

    /// Element named `name`, searching group members too.
    #[must_use]
    pub fn element(&self, name: &str) -> Option<&Element> {
        self.all_elements().find(|element| element.name() == name)
    }

    fn all_elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter().flat_map(|element| {
            let members = element.as_group().map(|group| group.elements()).unwrap_or_default();
            std::iter::once(element).chain(members)
        })
    }

    fn all_elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.elements.iter_mut().flat_map(|element| match element {
            Element::Group(group) => group.elements_mut().iter_mut().collect::<Vec<_>>(),
            other => vec![other],
        })
    }

    fn ensure_exists(&self, name: &str) -> Result<(), FormError> {
        if self.element(name).is_some() {
            Ok(())
        } else {
            Err(FormError::UnknownElement(name.into()))
        }
    }

    /// Marks `name` required and binds the `required` rule with `message`.
    pub fn add_required(&mut self, name: &str, message: &str) -> Result<(), FormError> {
        self.add_rule(name, message, RequiredRule::NAME, RuleOptions::None)?;
        self.required.insert(name.into());
        Ok(())
    }

    /// Binds the rule registered as `rule` to `target`.
    ///
    /// Fails for unknown elements, unknown rules and options the rule
    /// cannot interpret.
    pub fn add_rule(
        &mut self,
        target: impl Into<RuleTarget>,
        message: &str,
        rule: &str,
        options: RuleOptions,
    ) -> Result<(), FormError> {
        let target = target.into();
        for name in target.names() {
            self.ensure_exists(name)?;
        }
        let rule = self.registry.get(rule)?;
        rule.check_options(&options)?;
        debug!("form '{}': rule '{}' on {:?}", self.name, rule.name(), target);
        self.rules.push(RuleBinding {
            target,
            rule,
            options,
            message: message.to_string(),
        });
        Ok(())
    }

    /// Returns `true` if `name` was marked required.
    #[must_use]
    pub fn is_required(&self, name: &str) -> bool {
        self.required.contains(name)
    }

    /// Note explaining the required marker.
    #[must_use]
    pub fn required_note(&self) -> &str {
        &self.required_note
    }

    /// Replaces the required note.
    pub fn set_required_note(&mut self, note: impl Into<String>) {
        self.required_note = note.into();
    }

    /// Applies submitted values.
    ///
    /// Each element looks its name up in `values`, first as a literal key,
    /// then as a bracket path into nested objects, so `addr[city]` reads
    /// `{"addr": {"city": ...}}`. Elements without an entry are untouched.
    pub fn set_values(&mut self, values: &Map<String, Value>) {
        for element in self.all_elements_mut() {
            if let Some(value) = submitted_value(values, element.name()) {
                trace!("value for '{}'", element.name());
                element.set_value(value);
            }
        }
    }

    /// Applies `value` to every element named `name`.
    pub fn set_value(&mut self, name: &str, value: &Value) -> Result<(), FormError> {
        self.ensure_exists(name)?;
        for element in self.all_elements_mut().filter(|element| element.name() == name) {
            element.set_value(value);
        }
        Ok(())
    }

    /// Binds file fields to their uploads.
    pub fn bind_uploads(&mut self, uploads: &UploadTable) {
        for element in self.all_elements_mut() {
            if let Element::File(file) = element {
                file.bind(uploads);
            }
        }
    }

    /// Freezes every element that can freeze.
    pub fn freeze(&mut self) {
        self.frozen = true;
        for element in &mut self.elements {
            element.freeze();
        }
    }

    /// Returns `true` once frozen.
    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Value a rule reads for `name`. A radio set yields its checked
    /// option's value, or `null` when none is checked.
    fn value_of(&self, name: &str) -> Value {
        let mut named = self.all_elements().filter(|element| element.name() == name);
        let Some(first) = named.next() else {
            return Value::Null;
        };
        let is_radio = first
            .as_input()
            .is_some_and(|input| matches!(input.kind(), InputType::Radio));
        if !is_radio {
            return first.value();
        }
        std::iter::once(first)
            .chain(named)
            .filter_map(Element::as_input)
            .find(|input| input.is_checked())
            .map_or(Value::Null, Input::value)
    }

    /// Runs the server checks and records the first failing message per
    /// element. Returns `true` when nothing failed.
    ///
    /// Rules other than `required` skip empty values of optional elements.
    pub fn validate(&mut self) -> bool {
        let mut errors: IndexMap<SmolStr, String> = IndexMap::new();
        for binding in &self.rules {
            let first = binding.target.first();
            if errors.contains_key(first) {
                continue;
            }
            let own = self.value_of(first);
            let is_required_rule = binding.rule.name() == RequiredRule::NAME;
            if !is_required_rule
                && !self.is_required(first)
                && !RequiredRule.validate(&own, &RuleOptions::None)
            {
                trace!("skipping '{}' on empty optional '{first}'", binding.rule.name());
                continue;
            }
            let value = match &binding.target {
                RuleTarget::Element(_) => own,
                RuleTarget::Pair(_, second) => Value::Array(vec![own, self.value_of(second)]),
            };
            if !binding.rule.validate(&value, &binding.options) {
                trace!("'{}' failed on '{first}'", binding.rule.name());
                errors.insert(SmolStr::new(first), binding.message.clone());
            }
        }
        debug!("form '{}': {} invalid element(s)", self.name, errors.len());
        self.errors = errors;
        self.errors.is_empty()
    }

    /// Error recorded for `name`.
    #[must_use]
    pub fn element_error(&self, name: &str) -> Option<&str> {
        self.errors.get(name).map(String::as_str)
    }

    /// Records an error for `name` by hand.
    pub fn set_element_error(&mut self, name: &str, message: impl Into<String>) {
        self.errors.insert(name.into(), message.into());
    }

    /// Errors from the last [`Form::validate`], in rule order.
    #[must_use]
    pub fn errors(&self) -> &IndexMap<SmolStr, String> {
        &self.errors
    }

    /// Client validation script; empty when frozen or when no bound rule
    /// has a client check.
    #[must_use]
    pub fn validation_script(&self) -> String {
        if self.frozen {
            return String::new();
        }
        let checks: Vec<(&RuleBinding, ValidationScript)> = self
            .rules
            .iter()
            .filter_map(|binding| {
                let script = binding.rule.validation_script(&binding.options)?;
                Some((binding, script.bind("value")))
            })
            .collect();
        if checks.is_empty() {
            return String::new();
        }

        let mut js = String::new();
        js.push_str("<script type=\"text/javascript\">\n//<![CDATA[\n");
        let _ = writeln!(js, "function validate_{}(frm) {{", js_identifier(&self.name));
        js.push_str("  var value;\n  var errors = [];\n");
        for (binding, script) in checks {
            let field = |name: &str| format!("frm.elements['{}'].value", js_string(name));
            let value = match &binding.target {
                RuleTarget::Element(name) => field(name),
                RuleTarget::Pair(first, second) => {
                    format!("[{}, {}]", field(first), field(second))
                }
            };
            let _ = writeln!(js, "\n  value = {value};");
            if !script.setup.is_empty() {
                let _ = writeln!(js, "  {}", script.setup);
            }
            let _ = writeln!(js, "  if ({}) {{", script.test);
            let _ = writeln!(js, "    errors.push('{}');", js_string(&binding.message));
            js.push_str("  }\n");
        }
        js.push_str(concat!(
            "\n  if (errors.length > 0) {\n",
            "    alert('Invalid information entered.\\n - ' + errors.join('\\n - '));\n",
            "    return false;\n",
            "  }\n",
            "  return true;\n",
            "}\n",
            "//]]>\n",
            "</script>",
        ));
        js
    }

    /// Form-level data for visitors.
    #[must_use]
    pub fn meta(&self) -> FormMeta {
        FormMeta {
            name: self.name.clone(),
            frozen: self.frozen,
            javascript: self.validation_script(),
            attributes: self.attributes.to_html().trim_start().to_string(),
            required_note: self.required_note.clone(),
        }
    }

    /// Walks the form in declaration order.
    pub fn accept<V: FormVisitor>(&self, visitor: &mut V) -> Result<(), V::Error> {
        let meta = self.meta();
        visitor.start_form(&meta)?;
        for element in &self.elements {
            let name = element.name();
            let required = self.is_required(name) && !element.is_frozen();
            let error = self.element_error(name);
            match element {
                Element::Header(header) => visitor.render_header(header)?,
                Element::Group(group) => self.visit_group(group, required, error, visitor)?,
                hidden if hidden.is_hidden() => visitor.render_hidden(hidden)?,
                other => visitor.render_element(other, required, error)?,
            }
        }
        visitor.finish_form(&meta)
    }

    /// Group members carry their own required flag and error. A nested
    /// group is handed to `start_group`, where renderers refuse it.
    fn visit_group<V: FormVisitor>(
        &self,
        group: &Group,
        required: bool,
        error: Option<&str>,
        visitor: &mut V,
    ) -> Result<(), V::Error> {
        visitor.start_group(group, required, error)?;
        for member in group.elements() {
            let name = member.name();
            let required = self.is_required(name) && !member.is_frozen();
            let error = self.element_error(name);
            match member {
                Element::Group(inner) => self.visit_group(inner, required, error, visitor)?,
                hidden if hidden.is_hidden() => visitor.render_hidden(hidden)?,
                other => visitor.render_element(other, required, error)?,
            }
        }
        visitor.finish_group(group)
    }
}

fn first_file(element: &Element) -> Option<&str> {
    match element {
        Element::File(file) => Some(file.name()),
        Element::Group(group) => group.elements().iter().find_map(first_file),
        _ => None,
    }
}

fn submitted_value<'v>(values: &'v Map<String, Value>, name: &str) -> Option<&'v Value> {
    if let Some(value) = values.get(name) {
        return Some(value);
    }
    let segments = split_name(name).ok()?;
    let (first, rest) = segments.split_first()?;
    let mut value = values.get(first.as_field()?)?;
    for segment in rest {
        value = match segment {
            NameSegment::Field(field) => value.get(field.as_str())?,
            NameSegment::Append => return None,
        };
    }
    Some(value)
}

fn js_identifier(name: &str) -> String {
    name.chars()
        .map(|ch| if ch.is_ascii_alphanumeric() { ch } else { '_' })
        .collect()
}

fn js_string(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace("</", "<\\/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::FileInput;
    use crate::label::Label;
    use formtree_rules::LengthBound;
    use serde_json::json;

    fn signup() -> Form {
        let mut form = Form::new("signup", FormMethod::Post, "/join");
        form.add_element(Input::text("user", "User")).unwrap();
        form.add_element(Input::password("pw", "Password")).unwrap();
        form.add_element(Input::password("pw2", "Repeat")).unwrap();
        form.add_required("user", "User is required").unwrap();
        form.add_rule(
            "user",
            "At least 3 characters",
            "minlength",
            RuleOptions::Length(LengthBound::Scalar(3)),
        )
        .unwrap();
        form.add_rule(("pw", "pw2"), "Passwords differ", "compare", RuleOptions::None)
            .unwrap();
        form
    }

    #[test]
    fn validate_records_first_failure_per_element() {
        let mut form = signup();
        assert!(!form.validate());
        assert_eq!(form.element_error("user"), Some("User is required"));
        assert_eq!(form.errors().len(), 1);

        let values = json!({"user": "al", "pw": "x", "pw2": "y"});
        form.set_values(values.as_object().unwrap());
        assert!(!form.validate());
        assert_eq!(form.element_error("user"), Some("At least 3 characters"));
        assert_eq!(form.element_error("pw"), Some("Passwords differ"));

        let values = json!({"user": "alice", "pw2": "x"});
        form.set_values(values.as_object().unwrap());
        assert!(form.validate());
    }

    #[test]
    fn optional_empty_values_skip_rules() {
        let mut form = Form::new("f", FormMethod::Post, "");
        form.add_element(Input::text("nick", "Nick")).unwrap();
        form.add_rule("nick", "Too short", "minlength", RuleOptions::Length(LengthBound::Scalar(3)))
            .unwrap();
        assert!(form.validate());
        form.set_value("nick", &json!("ab")).unwrap();
        assert!(!form.validate());
    }

    #[test]
    fn binding_checks_elements_rules_and_options() {
        let mut form = signup();
        assert_eq!(
            form.add_required("missing", "x"),
            Err(FormError::UnknownElement("missing".into()))
        );
        assert!(matches!(
            form.add_rule("user", "x", "email", RuleOptions::None),
            Err(FormError::Rule(_))
        ));
        assert!(matches!(
            form.add_rule("user", "x", "maxlength", RuleOptions::None),
            Err(FormError::Rule(_))
        ));
    }

    #[test]
    fn nested_values_reach_bracketed_names() {
        let mut form = Form::new("f", FormMethod::Post, "");
        form.add_element(
            Group::new("addr", "Address")
                .with_element(Input::text("city", Label::None))
                .with_element(Input::text("zip", Label::None)),
        )
        .unwrap();
        let values = json!({"addr": {"city": "Oslo"}, "addr[zip]": "0150"});
        form.set_values(values.as_object().unwrap());
        assert_eq!(form.element("addr[city]").unwrap().value(), json!("Oslo"));
        assert_eq!(form.element("addr[zip]").unwrap().value(), json!("0150"));
        assert_eq!(
            form.element("addr").unwrap().value(),
            json!({"addr[city]": "Oslo", "addr[zip]": "0150"})
        );
    }

    #[test]
    fn file_fields_need_post() {
        let mut get = Form::new("f", FormMethod::Get, "");
        assert_eq!(
            get.add_element(FileInput::new("doc", "Document")),
            Err(FormError::FileUploadOnGet("doc".into()))
        );
        let mut post = Form::new("f", FormMethod::Post, "");
        post.add_element(FileInput::new("doc", "Document")).unwrap();
        assert_eq!(post.attributes().get("enctype"), Some("multipart/form-data"));
    }

    #[test]
    fn script_is_empty_without_client_rules_or_when_frozen() {
        let mut form = Form::new("f", FormMethod::Post, "");
        form.add_element(FileInput::new("doc", "Document")).unwrap();
        form.add_rule("doc", "Upload it", "uploadedfile", RuleOptions::None)
            .unwrap();
        assert_eq!(form.validation_script(), "");

        let mut form = signup();
        assert!(!form.validation_script().is_empty());
        form.freeze();
        assert_eq!(form.validation_script(), "");
    }

    #[test]
    fn radio_sets_validate_the_checked_option() {
        let mut form = Form::new("f", FormMethod::Post, "");
        form.add_element(Input::radio("color", "Red", "red")).unwrap();
        form.add_element(Input::radio("color", "Blue", "blue")).unwrap();
        form.add_element(Input::text("favorite", "Favorite")).unwrap();
        form.add_required("color", "Pick a color").unwrap();
        form.add_rule(("color", "favorite"), "Not your favorite", "compare", RuleOptions::None)
            .unwrap();
        assert!(!form.validate());
        assert_eq!(form.element_error("color"), Some("Pick a color"));
        assert_eq!(form.value_of("color"), Value::Null);

        let values = json!({"color": "blue", "favorite": "blue"});
        form.set_values(values.as_object().unwrap());
        assert_eq!(form.value_of("color"), json!("blue"));
        assert!(form.validate());
    }

    #[test]
    fn ticked_checkbox_satisfies_required() {
        let mut form = Form::new("f", FormMethod::Post, "");
        form.add_element(Input::checkbox("agree", "Agree")).unwrap();
        form.add_required("agree", "Tick it").unwrap();
        assert!(!form.validate());
        form.set_values(json!({"agree": "1"}).as_object().unwrap());
        assert!(form.validate());
    }
}
