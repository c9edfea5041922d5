//! Visitor protocol driven by [`Form::accept`](crate::Form::accept).

use crate::element::Element;
use crate::group::Group;
use crate::header::Header;

/// Form-level data handed to [`FormVisitor::start_form`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormMeta {
    /// Form name.
    pub name: String,
    /// Whether the whole form is frozen.
    pub frozen: bool,
    /// Client validation script; empty for frozen forms or forms without
    /// client rules.
    pub javascript: String,
    /// `<form>` attributes as ` key="value"` text, leading space trimmed.
    pub attributes: String,
    /// Note explaining the required marker.
    pub required_note: String,
}

/// Receives a form's nodes in declaration order.
///
/// A group arrives as `start_group`, one call per member, then
/// `finish_group`. Hidden inputs go to `render_hidden` wherever they sit.
/// The visitor only reads the elements it is given.
pub trait FormVisitor {
    /// Error type returned by every callback.
    type Error;

    /// Called once before any node.
    fn start_form(&mut self, form: &FormMeta) -> Result<(), Self::Error>;

    /// A section header.
    fn render_header(&mut self, header: &Header) -> Result<(), Self::Error>;

    /// A visible element, top-level or group member.
    fn render_element(
        &mut self,
        element: &Element,
        required: bool,
        error: Option<&str>,
    ) -> Result<(), Self::Error>;

    /// A hidden input.
    fn render_hidden(&mut self, element: &Element) -> Result<(), Self::Error>;

    /// Opens a group; its members follow.
    fn start_group(
        &mut self,
        group: &Group,
        required: bool,
        error: Option<&str>,
    ) -> Result<(), Self::Error>;

    /// Closes the group opened by the matching `start_group`.
    fn finish_group(&mut self, group: &Group) -> Result<(), Self::Error>;

    /// Called once after the last node.
    fn finish_form(&mut self, form: &FormMeta) -> Result<(), Self::Error> {
        let _ = form;
        Ok(())
    }
}
