//! Traversal state shared by the renderers.

use smol_str::SmolStr;
use tracing::debug;

use formtree_elements::Separator;

use crate::error::StateError;

/// Where a freshly projected record goes.
#[derive(Debug)]
pub enum Placement<'a, G> {
    /// Into the open group.
    Group(&'a mut G),
    /// Into the section with this index.
    Section(usize),
    /// Into the top level.
    Root,
}

#[derive(Debug)]
struct OpenGroup<G> {
    name: SmolStr,
    frame: G,
    index: usize,
    count: usize,
    separator: Option<Separator>,
}

/// Mutable accumulator for one render pass.
///
/// `G` is whatever the renderer keeps for the open group.
#[derive(Debug)]
pub struct RenderState<G> {
    current_section: Option<usize>,
    section_count: usize,
    group: Option<OpenGroup<G>>,
    element_index: usize,
}

impl<G> Default for RenderState<G> {
    fn default() -> Self {
        Self {
            current_section: None,
            section_count: 0,
            group: None,
            element_index: 1,
        }
    }
}

impl<G> RenderState<G> {
    /// Fresh state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets everything; used at form start.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Starts a new section and returns its index.
    pub fn open_section(&mut self) -> usize {
        let index = self.section_count;
        self.section_count += 1;
        self.current_section = Some(index);
        debug!("section {index} opened");
        index
    }

    /// Index of the current section.
    #[must_use]
    pub fn current_section(&self) -> Option<usize> {
        self.current_section
    }

    /// Sections opened so far.
    #[must_use]
    pub fn section_count(&self) -> usize {
        self.section_count
    }

    /// Opens a group holding `frame`. `count` is the number of members
    /// that will be projected, for scalar separators.
    pub fn begin_group(
        &mut self,
        name: &str,
        frame: G,
        count: usize,
        separator: Option<Separator>,
    ) -> Result<(), StateError> {
        if let Some(active) = &self.group {
            return Err(StateError::GroupAlreadyActive {
                active: active.name.clone(),
                requested: name.into(),
            });
        }
        debug!("group '{name}' started with {count} member(s)");
        self.group = Some(OpenGroup {
            name: name.into(),
            frame,
            index: 0,
            count,
            separator,
        });
        Ok(())
    }

    /// Closes the open group and hands back its frame.
    pub fn take_group(&mut self, name: &str) -> Result<G, StateError> {
        let open = self.group.take().ok_or_else(|| StateError::NoActiveGroup {
            group: name.into(),
        })?;
        debug!("group '{}' finished", open.name);
        Ok(open.frame)
    }

    /// Name of the open group.
    #[must_use]
    pub fn group_name(&self) -> Option<&str> {
        self.group.as_ref().map(|open| open.name.as_str())
    }

    /// Frame of the open group.
    #[must_use]
    pub fn group_frame(&self) -> Option<&G> {
        self.group.as_ref().map(|open| &open.frame)
    }

    /// Storage routing for a record. Group records never go into a group.
    pub fn placement(&mut self, is_group: bool) -> Placement<'_, G> {
        match (&mut self.group, self.current_section) {
            (Some(open), _) if !is_group => Placement::Group(&mut open.frame),
            (_, Some(index)) => Placement::Section(index),
            _ => Placement::Root,
        }
    }

    /// Next `element_<n>` name.
    pub fn next_auto_name(&mut self) -> String {
        let name = format!("element_{}", self.element_index);
        self.element_index += 1;
        name
    }

    /// Separator for the next member of the open group, advancing the
    /// member index. `None` outside a group; `""` for groups without one.
    pub fn next_separator(&mut self) -> Option<String> {
        let open = self.group.as_mut()?;
        let separator = open
            .separator
            .as_ref()
            .map_or("", |sep| sep.after(open.index, open.count))
            .to_string();
        open.index += 1;
        Some(separator)
    }
}
