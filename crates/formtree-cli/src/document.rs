//! Form documents: a TOML description of a form, its elements and rules.
//!
//! ```toml
//! [form]
//! name = "signup"
//! action = "/signup"
//!
//! [[elements]]
//! type = "text"
//! name = "user"
//! label = "User name"
//!
//! [[rules]]
//! element = "user"
//! rule = "required"
//! message = "Please enter a user name"
//! ```

use std::path::Path;

use anyhow::Context;
use indexmap::IndexMap;
use serde::Deserialize;

use formtree_elements::{
    register_file_rules, Element, FileInput, Form, FormMethod, Group, Header, Input, InputType,
    Label, LabelEntry, RuleTarget, Separator,
};
use formtree_rules::{LengthBound, LengthUnit, RequiredRule, RuleOptions, RuleRegistry};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormDocument {
    form: FormSection,
    #[serde(default)]
    elements: Vec<ElementToml>,
    #[serde(default)]
    rules: Vec<RuleToml>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FormSection {
    name: String,
    #[serde(default)]
    method: Option<String>,
    #[serde(default)]
    action: String,
    #[serde(default)]
    required_note: Option<String>,
    #[serde(default)]
    frozen: bool,
    /// `bytes` (default) or `chars`, for the length rules.
    length_unit: Option<String>,
    #[serde(default)]
    attributes: IndexMap<String, String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ElementToml {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    name: String,
    label: Option<LabelToml>,
    value: Option<String>,
    text: Option<String>,
    src: Option<String>,
    size: Option<u32>,
    maxlength: Option<u32>,
    #[serde(default)]
    checked: bool,
    #[serde(default)]
    attributes: IndexMap<String, String>,
    separator: Option<Separator>,
    append_name: Option<bool>,
    #[serde(default)]
    elements: Vec<ElementToml>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LabelToml {
    Text(String),
    Parts(Vec<LabelPartToml>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LabelPartToml {
    Text(String),
    Keyed { key: String, text: String },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LengthToml {
    Scalar(usize),
    Pair([usize; 2]),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RuleToml {
    element: Option<String>,
    elements: Option<Vec<String>>,
    rule: String,
    #[serde(default)]
    message: String,
    operator: Option<String>,
    length: Option<LengthToml>,
    size: Option<u64>,
    mime_types: Option<Vec<String>>,
    pattern: Option<String>,
}

impl FormDocument {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read form '{}'", path.display()))?;
        Self::parse(&text).with_context(|| format!("invalid form document '{}'", path.display()))
    }

    pub fn parse(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Builds the form. Freezing is left to the caller so values can be
    /// applied first; see [`FormDocument::frozen`].
    pub fn into_form(self) -> anyhow::Result<Form> {
        let method = match self.form.method.as_deref().map(str::to_ascii_lowercase).as_deref() {
            None | Some("post") => FormMethod::Post,
            Some("get") => FormMethod::Get,
            Some(other) => anyhow::bail!("invalid form.method '{other}' (expected get or post)"),
        };
        let mut form = Form::new(&self.form.name, method, &self.form.action);
        if let Some(unit) = &self.form.length_unit {
            let Some(unit) = LengthUnit::parse(unit) else {
                anyhow::bail!("invalid form.length_unit '{unit}' (expected bytes or chars)");
            };
            let mut registry = RuleRegistry::with_builtins(unit);
            register_file_rules(&mut registry);
            form = form.with_registry(registry);
        }
        for (key, value) in self.form.attributes {
            form.set_attribute(&key, value);
        }
        if let Some(note) = self.form.required_note {
            form.set_required_note(note);
        }
        for element in self.elements {
            form.add_element(element.into_element(true)?)?;
        }
        for rule in self.rules {
            rule.bind(&mut form)?;
        }
        Ok(form)
    }

    pub fn frozen(&self) -> bool {
        self.form.frozen
    }
}

impl ElementToml {
    fn into_element(self, top_level: bool) -> anyhow::Result<Element> {
        let label = self.label.map_or(Label::None, LabelToml::into_label);
        let element = match self.kind.as_str() {
            "header" => {
                if !top_level {
                    anyhow::bail!("header '{}' cannot sit inside a group", self.name);
                }
                Element::Header(Header::new(self.name, self.text.unwrap_or_default()))
            }
            "group" => {
                if !top_level {
                    anyhow::bail!("group '{}' cannot sit inside a group", self.name);
                }
                let mut group =
                    Group::new(self.name, label).with_append_name(self.append_name.unwrap_or(true));
                if let Some(separator) = self.separator {
                    group = group.with_separator(separator);
                }
                for member in self.elements {
                    group.push(member.into_element(false)?);
                }
                Element::Group(group)
            }
            "file" => {
                let mut file = FileInput::new(&self.name, label);
                if let Some(size) = self.size {
                    file.set_size(size);
                }
                Element::File(file)
            }
            other => {
                let Some(kind) = InputType::parse(other) else {
                    anyhow::bail!("unknown element type '{other}' for '{}'", self.name);
                };
                let mut input = match kind {
                    InputType::Radio => Input::radio(
                        &self.name,
                        label,
                        self.value.as_deref().unwrap_or_default(),
                    ),
                    InputType::Image => {
                        Input::image(&self.name, self.src.as_deref().unwrap_or_default())
                    }
                    _ => Input::new(kind, &self.name, label),
                };
                for (key, value) in self.attributes {
                    input.set_attribute(&key, value);
                }
                if let Some(size) = self.size {
                    input.set_size(size);
                }
                if let Some(max) = self.maxlength {
                    input.set_max_length(max);
                }
                match kind {
                    InputType::Radio if self.checked => {
                        let own = input.value();
                        input.set_value(&own);
                    }
                    InputType::Checkbox if self.checked => {
                        input.set_value(&serde_json::Value::from("1"));
                    }
                    InputType::Radio | InputType::Checkbox => {}
                    _ => {
                        if let Some(value) = &self.value {
                            input.set_value(&serde_json::Value::from(value.as_str()));
                        }
                    }
                }
                Element::Input(input)
            }
        };
        Ok(element)
    }
}

impl LabelToml {
    fn into_label(self) -> Label {
        match self {
            Self::Text(text) => Label::Text(text),
            Self::Parts(parts) => Label::Multi(
                parts
                    .into_iter()
                    .map(|part| match part {
                        LabelPartToml::Text(text) => LabelEntry::positional(text),
                        LabelPartToml::Keyed { key, text } => LabelEntry::keyed(key, text),
                    })
                    .collect(),
            ),
        }
    }
}

impl RuleToml {
    fn bind(self, form: &mut Form) -> anyhow::Result<()> {
        let target = match (&self.element, self.elements.as_deref()) {
            (Some(name), None) => RuleTarget::from(name.as_str()),
            (None, Some([first, second])) => RuleTarget::from((first.as_str(), second.as_str())),
            (None, Some(other)) => anyhow::bail!(
                "rule '{}' takes two elements, got {}",
                self.rule,
                other.len()
            ),
            _ => anyhow::bail!("rule '{}' needs either element or elements", self.rule),
        };
        if self.rule == RequiredRule::NAME {
            let RuleTarget::Element(name) = &target else {
                anyhow::bail!("rule 'required' takes a single element");
            };
            form.add_required(name, &self.message)?;
            return Ok(());
        }
        let options = self.options()?;
        form.add_rule(target, &self.message, &self.rule, options)?;
        Ok(())
    }

    fn options(&self) -> anyhow::Result<RuleOptions> {
        let mut options = Vec::new();
        if let Some(operator) = &self.operator {
            options.push(RuleOptions::Operator(operator.as_str().into()));
        }
        if let Some(length) = &self.length {
            options.push(RuleOptions::Length(match *length {
                LengthToml::Scalar(bound) => LengthBound::Scalar(bound),
                LengthToml::Pair([lo, hi]) => LengthBound::Pair(lo, hi),
            }));
        }
        if let Some(size) = self.size {
            options.push(RuleOptions::Size(size));
        }
        if let Some(types) = &self.mime_types {
            options.push(RuleOptions::MimeTypes(
                types.iter().map(|kind| kind.as_str().into()).collect(),
            ));
        }
        if let Some(pattern) = &self.pattern {
            options.push(RuleOptions::Pattern(pattern.as_str().into()));
        }
        if options.len() > 1 {
            anyhow::bail!("rule '{}' has more than one option set", self.rule);
        }
        Ok(options.pop().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIGNUP: &str = r#"
        [form]
        name = "signup"
        action = "/signup"
        required_note = "* required"

        [[elements]]
        type = "text"
        name = "user"
        label = ["User name", { key = "hint", text = "3 to 12 characters" }]
        maxlength = 12

        [[elements]]
        type = "password"
        name = "pw"
        label = "Password"

        [[elements]]
        type = "password"
        name = "pw2"
        label = "Repeat"

        [[elements]]
        type = "group"
        name = "plan"
        label = "Plan"
        separator = ["<br />"]
        elements = [
            { type = "radio", name = "kind", label = "Free", value = "free", checked = true },
            { type = "radio", name = "kind", label = "Paid", value = "paid" },
        ]

        [[elements]]
        type = "submit"
        name = "go"
        value = "Sign up"

        [[rules]]
        element = "user"
        rule = "required"
        message = "User name is required"

        [[rules]]
        element = "user"
        rule = "rangelength"
        length = [3, 12]
        message = "Use 3 to 12 characters"

        [[rules]]
        elements = ["pw", "pw2"]
        rule = "compare"
        operator = "eq"
        message = "Passwords differ"
    "#;

    #[test]
    fn builds_the_form() {
        let form = FormDocument::parse(SIGNUP).unwrap().into_form().unwrap();
        assert_eq!(form.name(), "signup");
        assert_eq!(form.elements().len(), 5);
        assert!(form.is_required("user"));
        assert_eq!(form.required_note(), "* required");

        let user = form.element("user").unwrap().as_input().unwrap();
        assert_eq!(user.attributes().get("maxlength"), Some("12"));
        assert!(matches!(user.label(), Label::Multi(entries) if entries.len() == 2));

        let plan = form.element("plan").unwrap().as_group().unwrap();
        let free = plan.elements()[0].as_input().unwrap();
        assert_eq!(free.name(), "plan[kind]");
        assert!(free.is_checked());
        assert!(!plan.elements()[1].as_input().unwrap().is_checked());

        let script = form.validation_script();
        assert!(script.contains("errors.push('Use 3 to 12 characters');"));
        assert!(script.contains("errors.push('Passwords differ');"));
    }

    #[test]
    fn rejects_bad_documents() {
        let unknown_type = "[form]\nname = \"f\"\n[[elements]]\ntype = \"slider\"\nname = \"s\"\n";
        let err = FormDocument::parse(unknown_type).unwrap().into_form().unwrap_err();
        assert_eq!(err.to_string(), "unknown element type 'slider' for 's'");

        let bad_method = "[form]\nname = \"f\"\nmethod = \"put\"\n";
        assert!(FormDocument::parse(bad_method).unwrap().into_form().is_err());

        let unknown_rule = r#"
            [form]
            name = "f"
            [[elements]]
            type = "text"
            name = "q"
            [[rules]]
            element = "q"
            rule = "palindrome"
        "#;
        assert!(FormDocument::parse(unknown_rule).unwrap().into_form().is_err());

        let two_options = r#"
            [form]
            name = "f"
            [[elements]]
            type = "text"
            name = "q"
            [[rules]]
            element = "q"
            rule = "minlength"
            length = 3
            size = 10
        "#;
        assert!(FormDocument::parse(two_options).unwrap().into_form().is_err());

        assert!(FormDocument::parse("[form]\nname = \"f\"\ncolour = 1\n").is_err());
    }

    #[test]
    fn length_unit_switches_the_range_rules() {
        let doc = r#"
            [form]
            name = "f"
            length_unit = "chars"
            [[elements]]
            type = "text"
            name = "city"
            value = "Tromsø"
            [[rules]]
            element = "city"
            rule = "maxlength"
            length = 6
            message = "Too long"
        "#;
        let mut form = FormDocument::parse(doc).unwrap().into_form().unwrap();
        assert!(form.validate());

        let bytes = doc.replace("length_unit = \"chars\"", "");
        let mut form = FormDocument::parse(&bytes).unwrap().into_form().unwrap();
        assert!(!form.validate());
        assert_eq!(form.element_error("city"), Some("Too long"));
    }

    #[test]
    fn file_fields_need_post() {
        let doc = r#"
            [form]
            name = "up"
            method = "get"
            [[elements]]
            type = "file"
            name = "doc"
        "#;
        let err = FormDocument::parse(doc).unwrap().into_form().unwrap_err();
        assert!(err.to_string().contains("doc"), "{err}");
    }
}
