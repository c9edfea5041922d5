//! Positional renderer: records in a flat list or in sections.

use tracing::{debug, warn};

use formtree_elements::{Element, Form, FormMeta, FormVisitor, Group, Header};

use crate::config::RenderConfig;
use crate::error::RenderError;
use crate::model::{ElementRecord, FormSummary, GroupElements, OutputModel, SectionRecord};
use crate::project::ElementProjector;
use crate::state::{Placement, RenderState};

/// Builds an [`OutputModel`] from a form walk.
///
/// One instance serves one render at a time; `start_form` resets it.
#[derive(Debug, Default)]
pub struct ObjectRenderer {
    projector: ElementProjector,
    collect_hidden: bool,
    state: RenderState<ElementRecord>,
    output: OutputModel,
}

impl ObjectRenderer {
    /// Renderer that keeps hidden inputs in the element list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Renderer set up from `config`.
    #[must_use]
    pub fn from_config(config: &RenderConfig) -> Self {
        let mut projector = ElementProjector::new().with_numbering(config.label_numbering);
        projector.merge_styles(config.styles.clone());
        Self::new()
            .with_projector(projector)
            .with_collect_hidden(config.collect_hidden.unwrap_or(false))
    }

    /// Collect hidden inputs into `hidden` instead of listing them.
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

    /// Sets the style of one element.
    pub fn set_element_style(&mut self, element: &str, style: &str) {
        self.projector.set_style(element, style);
    }

    /// Merges element-to-style entries.
    pub fn merge_element_styles<'a>(&mut self, styles: impl IntoIterator<Item = (&'a str, &'a str)>) {
        self.projector.merge_styles(styles);
    }

    /// Output so far.
    #[must_use]
    pub fn output(&self) -> &OutputModel {
        &self.output
    }

    /// Takes the output.
    #[must_use]
    pub fn into_output(self) -> OutputModel {
        self.output
    }

    fn note(&mut self, record: &ElementRecord) {
        if let Some(error) = &record.error {
            if record.name.is_empty() {
                warn!("error on an unnamed {} left out of the error map: {error}", record.kind);
            } else {
                self.output.form.errors.insert(record.name.clone(), error.clone());
            }
        }
        self.output.form.has_required |= record.required;
    }

    fn store(&mut self, record: ElementRecord) {
        match self.state.placement(record.is_group()) {
            Placement::Group(group) => match &mut group.elements {
                Some(GroupElements::List(items)) => items.push(record),
                _ => group.elements = Some(GroupElements::List(vec![record])),
            },
            Placement::Section(index) => {
                if let Some(section) = self.output.sections.get_mut(index) {
                    section.elements.push(record);
                }
            }
            Placement::Root => self.output.elements.push(record),
        }
    }
}

impl FormVisitor for ObjectRenderer {
    type Error = RenderError;

    fn start_form(&mut self, form: &FormMeta) -> Result<(), RenderError> {
        debug!("object render of form '{}'", form.name);
        self.state.reset();
        self.output = OutputModel {
            form: FormSummary {
                frozen: form.frozen,
                javascript: form.javascript.clone(),
                attributes: form.attributes.clone(),
                required_note: form.required_note.clone(),
                hidden: self.collect_hidden.then(String::new),
                ..FormSummary::default()
            },
            ..OutputModel::default()
        };
        Ok(())
    }

    fn render_header(&mut self, header: &Header) -> Result<(), RenderError> {
        self.state.open_section();
        self.output.sections.push(SectionRecord {
            header: header.text().to_string(),
            name: Some(header.name().to_string()).filter(|name| !name.is_empty()),
            elements: Vec::new(),
        });
        Ok(())
    }

    fn render_element(
        &mut self,
        element: &Element,
        required: bool,
        error: Option<&str>,
    ) -> Result<(), RenderError> {
        let separator = self.state.next_separator();
        let record = self.projector.project(element, required, error, separator);
        self.note(&record);
        self.store(record);
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
        let record = self.projector.project_group(group, required, error);
        self.note(&record);
        let members = group
            .elements()
            .iter()
            .filter(|member| !(self.collect_hidden && member.is_hidden()))
            .count();
        self.state
            .begin_group(group.name(), record, members, group.separator().cloned())?;
        Ok(())
    }

    fn finish_group(&mut self, group: &Group) -> Result<(), RenderError> {
        let record = self.state.take_group(group.name())?;
        self.store(record);
        Ok(())
    }
}

/// Renders `form` with an [`ObjectRenderer`] set up from `config`.
pub fn render_object(form: &Form, config: &RenderConfig) -> Result<OutputModel, RenderError> {
    let mut renderer = ObjectRenderer::from_config(config);
    form.accept(&mut renderer)?;
    Ok(renderer.into_output())
}
