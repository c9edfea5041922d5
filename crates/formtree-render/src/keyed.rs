//! Key-addressed renderer: records placed by their bracket names.
//!
//! `addr[city]` lands at `addr` → `city` in the output tree, `tags[]`
//! appends to a list at `tags`, and radios add their value as a last
//! segment so a radio set becomes one map. Group members are addressed
//! relative to the group and stored under the group record's `elements`.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use formtree_elements::{Element, Form, FormMeta, FormVisitor, Group, Header, InputType};
use formtree_rules::value::text_of;

use crate::config::RenderConfig;
use crate::error::{RenderError, SerializationError, StateError};
use crate::keypath::{KeyPath, KeyTree};
use crate::model::{ElementRecord, FormSummary, GroupElements, KeyedOutput};
use crate::project::ElementProjector;
use crate::state::{Placement, RenderState};

/// Renders label and html templates against a record.
pub trait TemplateEngine: fmt::Debug + Send + Sync {
    /// Expands `template` for `record`.
    fn render(&self, template: &str, record: &ElementRecord) -> Result<String, String>;
}

/// Replaces `{label}`, `{html}`, `{error}`, `{name}`, `{type}` and
/// `{required}` (`*` when required). Any other `{...}` is an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderEngine;

impl TemplateEngine for PlaceholderEngine {
    fn render(&self, template: &str, record: &ElementRecord) -> Result<String, String> {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;
        while let Some(start) = rest.find('{') {
            out.push_str(&rest[..start]);
            let Some(len) = rest[start..].find('}') else {
                return Err(format!("unclosed placeholder in '{template}'"));
            };
            let key = &rest[start + 1..start + len];
            out.push_str(match key {
                "label" => record.label.as_deref().unwrap_or(""),
                "html" => record.html.as_deref().unwrap_or(""),
                "error" => record.error.as_deref().unwrap_or(""),
                "name" => &record.name,
                "type" => &record.kind,
                "required" if record.required => "*",
                "required" => "",
                other => return Err(format!("unknown placeholder '{{{other}}}'")),
            });
            rest = &rest[start + len + 1..];
        }
        out.push_str(rest);
        Ok(out)
    }
}

#[derive(Debug)]
struct GroupFrame {
    record: ElementRecord,
    path: KeyPath,
    tree: KeyTree,
}

/// Builds a [`KeyedOutput`] from a form walk.
#[derive(Debug)]
pub struct KeyedRenderer {
    projector: ElementProjector,
    collect_hidden: bool,
    label_template: Option<String>,
    html_template: Option<String>,
    engine: Arc<dyn TemplateEngine>,
    state: RenderState<GroupFrame>,
    output: KeyedOutput,
}

impl Default for KeyedRenderer {
    fn default() -> Self {
        Self {
            projector: ElementProjector::default(),
            collect_hidden: true,
            label_template: None,
            html_template: None,
            engine: Arc::new(PlaceholderEngine),
            state: RenderState::default(),
            output: KeyedOutput::default(),
        }
    }
}

impl KeyedRenderer {
    /// Renderer that collects hidden inputs and uses no templates.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Renderer set up from `config`.
    #[must_use]
    pub fn from_config(config: &RenderConfig) -> Self {
        let mut projector = ElementProjector::new().with_numbering(config.label_numbering);
        projector.merge_styles(config.styles.clone());
        Self {
            projector,
            collect_hidden: config.collect_hidden.unwrap_or(true),
            label_template: config.label_template.clone(),
            html_template: config.html_template.clone(),
            ..Self::default()
        }
    }

    /// Collect hidden inputs into `hidden` instead of placing them.
    #[must_use]
    pub fn with_collect_hidden(mut self, collect: bool) -> Self {
        self.collect_hidden = collect;
        self
    }

    /// Replaces the projector.
    #[must_use]
    pub fn with_projector(mut self, projector: ElementProjector) -> Self {
        self.projector = projector;
        self
    }

    /// Template applied to every record's label.
    #[must_use]
    pub fn with_label_template(mut self, template: impl Into<String>) -> Self {
        self.label_template = Some(template.into());
        self
    }

    /// Template applied to leaf records' markup.
    #[must_use]
    pub fn with_html_template(mut self, template: impl Into<String>) -> Self {
        self.html_template = Some(template.into());
        self
    }

    /// Template engine used for both templates.
    #[must_use]
    pub fn with_engine(mut self, engine: Arc<dyn TemplateEngine>) -> Self {
        self.engine = engine;
        self
    }

    /// Sets the style of one element.
    pub fn set_element_style(&mut self, element: &str, style: &str) {
        self.projector.set_style(element, style);
    }

    /// Output so far.
    #[must_use]
    pub fn output(&self) -> &KeyedOutput {
        &self.output
    }

    /// Takes the output.
    #[must_use]
    pub fn into_output(self) -> KeyedOutput {
        self.output
    }

    fn note(&mut self, record: &ElementRecord) {
        if let Some(error) = &record.error {
            if !record.name.is_empty() {
                self.output.form.errors.insert(record.name.clone(), error.clone());
            }
        }
        self.output.form.has_required |= record.required;
    }

    /// Key path for `record`, auto-naming it when it has no name.
    fn key_path(&mut self, record: &mut ElementRecord) -> Result<KeyPath, SerializationError> {
        if record.name.is_empty() {
            record.name = self.state.next_auto_name();
        }
        let mut path = KeyPath::parse(&record.name)
            .map_err(|err| SerializationError::new(&record.name, err.reason))?;
        if record.is_type(InputType::Radio.as_str()) && !path.ends_with_append() {
            path.push_field(&*text_of(&record.value));
        }
        path.to_expression()
            .map_err(|reason| SerializationError::new(&record.name, reason))?;
        Ok(path)
    }

    fn check_root(path: &KeyPath, record: &ElementRecord) -> Result<(), SerializationError> {
        match path.root() {
            Some(root) if KeyedOutput::RESERVED.contains(&root) => Err(SerializationError::new(
                &record.name,
                format!("'{root}' is a reserved output field"),
            )),
            _ => Ok(()),
        }
    }

    fn apply_templates(&self, record: &mut ElementRecord) -> Result<(), RenderError> {
        let element = record.name.clone();
        let failed = |reason: String| RenderError::Template {
            element: element.as_str().into(),
            reason: reason.into(),
        };
        if let Some(template) = self.label_template.as_deref().filter(|_| record.label.is_some()) {
            let label = self.engine.render(template, record).map_err(failed)?;
            record.label = Some(label);
        }
        if let Some(template) = self.html_template.as_deref().filter(|_| record.html.is_some()) {
            let html = self.engine.render(template, record).map_err(failed)?;
            record.html = Some(html);
        }
        Ok(())
    }
}

impl FormVisitor for KeyedRenderer {
    type Error = RenderError;

    fn start_form(&mut self, form: &FormMeta) -> Result<(), RenderError> {
        debug!("keyed render of form '{}'", form.name);
        self.state.reset();
        self.output = KeyedOutput {
            form: FormSummary {
                frozen: form.frozen,
                javascript: form.javascript.clone(),
                attributes: form.attributes.clone(),
                required_note: form.required_note.clone(),
                hidden: self.collect_hidden.then(String::new),
                ..FormSummary::default()
            },
            ..KeyedOutput::default()
        };
        Ok(())
    }

    fn render_header(&mut self, header: &Header) -> Result<(), RenderError> {
        let index = self.state.open_section();
        let key = match header.name() {
            "" => index.to_string(),
            name => name.to_string(),
        };
        self.output.header.insert(key, header.text().to_string());
        Ok(())
    }

    fn render_element(
        &mut self,
        element: &Element,
        required: bool,
        error: Option<&str>,
    ) -> Result<(), RenderError> {
        let separator = self.state.next_separator();
        let mut record = self.projector.project(element, required, error, separator);
        let path = self.key_path(&mut record)?;
        self.apply_templates(&mut record)?;
        self.note(&record);
        match self.state.placement(record.is_group()) {
            Placement::Group(frame) => {
                let relative = path.strip_prefix(&frame.path).unwrap_or_else(|| path.clone());
                if relative.is_empty() {
                    warn!(
                        "member '{}' has the path of group '{}', skipped",
                        record.name, frame.record.name
                    );
                    return Ok(());
                }
                frame.tree.insert(&relative, record)?;
            }
            Placement::Section(_) | Placement::Root => {
                Self::check_root(&path, &record)?;
                self.output.tree.insert(&path, record)?;
            }
        }
        Ok(())
    }

    fn render_hidden(&mut self, element: &Element) -> Result<(), RenderError> {
        match &mut self.output.form.hidden {
            Some(hidden) => {
                hidden.push_str(&element.to_html());
                hidden.push('\n');
                Ok(())
            }
            None => self.render_element(element, false, None),
        }
    }

    fn start_group(
        &mut self,
        group: &Group,
        required: bool,
        error: Option<&str>,
    ) -> Result<(), RenderError> {
        if let Some(active) = self.state.group_name() {
            return Err(StateError::GroupAlreadyActive {
                active: active.into(),
                requested: group.name().into(),
            }
            .into());
        }
        let mut record = self.projector.project_group(group, required, error);
        let path = self.key_path(&mut record)?;
        self.apply_templates(&mut record)?;
        Self::check_root(&path, &record)?;
        self.note(&record);
        let members = group
            .elements()
            .iter()
            .filter(|member| !(self.collect_hidden && member.is_hidden()))
            .count();
        let frame = GroupFrame {
            record,
            path,
            tree: KeyTree::default(),
        };
        self.state
            .begin_group(group.name(), frame, members, group.separator().cloned())?;
        Ok(())
    }

    fn finish_group(&mut self, group: &Group) -> Result<(), RenderError> {
        let GroupFrame {
            mut record,
            path,
            tree,
        } = self.state.take_group(group.name())?;
        record.elements = Some(GroupElements::Keyed(tree));
        self.output.tree.insert(&path, record)?;
        Ok(())
    }
}

/// Renders `form` with a [`KeyedRenderer`] set up from `config`.
pub fn render_keyed(form: &Form, config: &RenderConfig) -> Result<KeyedOutput, RenderError> {
    let mut renderer = KeyedRenderer::from_config(config);
    form.accept(&mut renderer)?;
    Ok(renderer.into_output())
}
