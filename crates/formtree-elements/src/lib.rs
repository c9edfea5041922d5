//! `formtree-elements` - Form elements, the form container and its visitor.
//!
//! A [`Form`] owns an ordered list of [`Element`]s: inputs, file fields,
//! section headers and groups. Rules from a
//! [`RuleRegistry`](formtree_rules::RuleRegistry) are bound to elements by
//! name; [`Form::validate`] runs their server checks and
//! [`Form::validation_script`] assembles their client checks.
//!
//! Renderers implement [`FormVisitor`] and receive the form's nodes in
//! declaration order through [`Form::accept`].
//!
//! ```
//! use formtree_elements::{Form, FormMethod, Input};
//!
//! let mut form = Form::new("login", FormMethod::Post, "/login");
//! form.add_element(Input::text("user", "User name")).unwrap();
//! form.add_required("user", "Please enter your user name").unwrap();
//! assert!(!form.validate());
//! assert_eq!(form.element_error("user"), Some("Please enter your user name"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod attributes;
pub mod element;
pub mod error;
pub mod file;
pub mod form;
pub mod group;
pub mod header;
pub mod input;
pub mod label;
pub mod name;
pub mod visit;

pub use attributes::{escape_html, Attributes};
pub use element::Element;
pub use error::FormError;
pub use file::{
    register_file_rules, FileCheck, FileInput, FileRule, UploadEntry, UploadStatus, UploadTable,
    UploadedFile,
};
pub use form::{Form, FormMethod, RuleTarget, DEFAULT_REQUIRED_NOTE};
pub use group::{Group, Separator};
pub use header::Header;
pub use input::{Input, InputType};
pub use label::{Label, LabelEntry};
pub use name::{split_name, NameError, NameSegment};
pub use visit::{FormMeta, FormVisitor};
