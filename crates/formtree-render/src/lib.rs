//! `formtree-render` - Turns a [`Form`](formtree_elements::Form) walk into
//! data for a template engine.
//!
//! Two renderers implement [`FormVisitor`](formtree_elements::FormVisitor):
//!
//! - [`ObjectRenderer`] keeps records in order, in a flat list until the
//!   first header and in sections after it.
//! - [`KeyedRenderer`] places records in a tree at the key paths of their
//!   bracket names, so `addr[city]` is reachable as `addr.city`.
//!
//! Both project elements through an [`ElementProjector`] and share the
//! traversal bookkeeping in [`RenderState`].
//!
//! ```
//! use formtree_elements::{Form, FormMethod, Header, Input};
//! use formtree_render::{render_object, RenderConfig};
//!
//! let mut form = Form::new("signup", FormMethod::Post, "/signup");
//! form.add_element(Input::text("nick", "Nickname")).unwrap();
//! form.add_element(Header::new("more", "More")).unwrap();
//! form.add_element(Input::text("bio", "About you")).unwrap();
//!
//! let output = render_object(&form, &RenderConfig::default()).unwrap();
//! assert_eq!(output.elements.len(), 1);
//! assert_eq!(output.sections[0].elements[0].name, "bio");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod keyed;
pub mod keypath;
pub mod model;
pub mod object;
pub mod project;
pub mod state;

pub use config::RenderConfig;
pub use error::{ConfigError, RenderError, SerializationError, StateError};
pub use keyed::{render_keyed, KeyedRenderer, PlaceholderEngine, TemplateEngine};
pub use keypath::{KeyPath, KeyTree};
pub use model::{ElementRecord, FormSummary, GroupElements, KeyedOutput, OutputModel, SectionRecord};
pub use object::{render_object, ObjectRenderer};
pub use project::{ElementProjector, LabelNumbering, Node, PlainRecords, RecordFactory};
pub use state::{Placement, RenderState};
