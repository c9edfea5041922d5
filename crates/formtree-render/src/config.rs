//! Render configuration loading.
//!
//! ```toml
//! [render]
//! collect_hidden = true
//! label_numbering = "first-positional"
//! label_template = "{label}{required}"
//!
//! [styles]
//! email = "wide"
//! ```

use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::ConfigError;
use crate::project::LabelNumbering;

/// Validated render settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderConfig {
    /// Collect hidden inputs into one string. `None` keeps the renderer's
    /// own default.
    pub collect_hidden: Option<bool>,
    /// Multi-part label convention.
    pub label_numbering: LabelNumbering,
    /// Element name to style name.
    pub styles: IndexMap<String, String>,
    /// Template for record labels, keyed renderer only.
    pub label_template: Option<String>,
    /// Template for leaf markup, keyed renderer only.
    pub html_template: Option<String>,
}

impl RenderConfig {
    /// Reads and validates a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|err| ConfigError::Read {
            path: path.display().to_string().into(),
            reason: err.to_string().into(),
        })?;
        Self::parse(&text).map_err(|err| match err {
            ConfigError::Parse { reason, .. } => ConfigError::Parse {
                path: path.display().to_string().into(),
                reason,
            },
            other => other,
        })
    }

    /// Parses and validates TOML text.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let raw: RenderToml = toml::from_str(text).map_err(|err| ConfigError::Parse {
            path: "<inline>".into(),
            reason: err.to_string().into(),
        })?;
        raw.into_config()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RenderToml {
    #[serde(default)]
    render: RenderSection,
    #[serde(default)]
    styles: IndexMap<String, String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RenderSection {
    collect_hidden: Option<bool>,
    label_numbering: Option<String>,
    label_template: Option<String>,
    html_template: Option<String>,
}

impl RenderToml {
    fn into_config(self) -> Result<RenderConfig, ConfigError> {
        let label_numbering = match self.render.label_numbering.as_deref() {
            None => LabelNumbering::default(),
            Some(text) => LabelNumbering::parse(text).ok_or_else(|| {
                ConfigError::Invalid(format!("invalid render.label_numbering '{text}'").into())
            })?,
        };
        for (element, style) in &self.styles {
            if style.trim().is_empty() || style.contains(['/', '\\']) || style.contains("..") {
                return Err(ConfigError::Invalid(
                    format!("invalid style '{style}' for element '{element}'").into(),
                ));
            }
        }
        Ok(RenderConfig {
            collect_hidden: self.render.collect_hidden,
            label_numbering,
            styles: self.styles,
            label_template: self.render.label_template,
            html_template: self.render.html_template,
        })
    }
}
