#![allow(dead_code, unused_imports)]

use formtree_elements::{Element, FormMeta, FormVisitor, Group, Header};

/// Visitor that logs every callback as one line.
#[derive(Debug, Default)]
pub struct Recorder {
    pub lines: Vec<String>,
}

impl Recorder {
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

impl FormVisitor for Recorder {
    type Error = std::convert::Infallible;

    fn start_form(&mut self, form: &FormMeta) -> Result<(), Self::Error> {
        self.lines.push(format!(
            "start_form {} frozen={} js={}",
            form.name,
            form.frozen,
            !form.javascript.is_empty()
        ));
        Ok(())
    }

    fn render_header(&mut self, header: &Header) -> Result<(), Self::Error> {
        self.lines.push(format!("header {} {:?}", header.name(), header.text()));
        Ok(())
    }

    fn render_element(
        &mut self,
        element: &Element,
        required: bool,
        error: Option<&str>,
    ) -> Result<(), Self::Error> {
        self.lines.push(format!(
            "element {} {} required={required} error={error:?}",
            element.type_name(),
            element.name()
        ));
        Ok(())
    }

    fn render_hidden(&mut self, element: &Element) -> Result<(), Self::Error> {
        self.lines.push(format!("hidden {}", element.name()));
        Ok(())
    }

    fn start_group(
        &mut self,
        group: &Group,
        required: bool,
        error: Option<&str>,
    ) -> Result<(), Self::Error> {
        self.lines.push(format!(
            "start_group {} required={required} error={error:?}",
            group.name()
        ));
        Ok(())
    }

    fn finish_group(&mut self, group: &Group) -> Result<(), Self::Error> {
        self.lines.push(format!("finish_group {}", group.name()));
        Ok(())
    }

    fn finish_form(&mut self, form: &FormMeta) -> Result<(), Self::Error> {
        self.lines.push(format!("finish_form {}", form.name));
        Ok(())
    }
}
