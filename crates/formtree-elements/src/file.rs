//! File upload fields, the upload table and the file rules.
//!
//! Uploads are handed to the form explicitly as an [`UploadTable`]. The
//! file rules only run on the server; none of them produces a client
//! script.

use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use smol_str::SmolStr;
use tracing::warn;

use formtree_rules::{Rule, RuleError, RuleOptions, RuleRegistry, ValidationScript};

use crate::attributes::Attributes;
use crate::label::Label;
use crate::name::{split_name, NameSegment};

/// Upload status code reported with each file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UploadStatus {
    /// Upload completed.
    #[default]
    Ok,
    /// Larger than the server-wide limit.
    IniSize,
    /// Larger than the form's declared limit.
    FormSize,
    /// Only part of the file arrived.
    Partial,
    /// No file was chosen.
    NoFile,
    /// Server had nowhere to store the file.
    NoTmpDir,
    /// Server failed to store the file.
    CantWrite,
    /// Upload stopped by a server extension.
    Extension,
}

impl UploadStatus {
    /// Returns `true` for the two size-limit failures.
    #[must_use]
    pub fn is_size_error(self) -> bool {
        matches!(self, Self::IniSize | Self::FormSize)
    }
}

/// One uploaded file as received from the client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    /// Client-side file name.
    pub name: String,
    /// Declared MIME type.
    #[serde(rename = "type")]
    pub mime_type: String,
    /// Size in bytes.
    pub size: u64,
    /// Server-side temporary path; empty or `none` when nothing arrived.
    pub tmp_name: String,
    /// Upload status.
    #[serde(default)]
    pub error: UploadStatus,
}

impl UploadedFile {
    /// Returns `true` when a file actually arrived.
    #[must_use]
    pub fn is_uploaded(&self) -> bool {
        self.error == UploadStatus::Ok && !self.tmp_name.is_empty() && self.tmp_name != "none"
    }

    /// Reads an uploaded file back from a field value.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Object(_) => serde_json::from_value(value.clone()).ok(),
            _ => None,
        }
    }
}

/// Node of an [`UploadTable`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UploadEntry {
    /// A file.
    File(UploadedFile),
    /// Nested entries for bracketed field names.
    Nested(IndexMap<SmolStr, UploadEntry>),
}

/// Uploaded files keyed by field name.
///
/// `files[doc]` is stored under `files` → `doc`; a flat entry literally
/// named `files[doc]` also resolves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UploadTable {
    entries: IndexMap<SmolStr, UploadEntry>,
}

impl UploadTable {
    /// Empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `file` under the bracket path of `name`.
    ///
    /// An append segment is stored under the next numeric key.
    pub fn insert(&mut self, name: &str, file: UploadedFile) {
        let Ok(segments) = split_name(name) else {
            self.entries.insert(name.into(), UploadEntry::File(file));
            return;
        };
        let mut level = &mut self.entries;
        let Some((last, parents)) = segments.split_last() else {
            return;
        };
        for segment in parents {
            let key = segment_key(segment, level);
            let entry = level
                .entry(key)
                .or_insert_with(|| UploadEntry::Nested(IndexMap::new()));
            if let UploadEntry::File(_) = entry {
                warn!("upload '{name}' replaces a file entry with nested entries");
                *entry = UploadEntry::Nested(IndexMap::new());
            }
            let UploadEntry::Nested(next) = entry else {
                return;
            };
            level = next;
        }
        let key = segment_key(last, level);
        level.insert(key, UploadEntry::File(file));
    }

    /// File uploaded for field `name`, if any.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&UploadedFile> {
        if let Some(UploadEntry::File(file)) = self.entries.get(name) {
            return Some(file);
        }
        let segments = split_name(name).ok()?;
        let (first, rest) = segments.split_first()?;
        let mut entry = self.entries.get(first.as_field()?)?;
        for segment in rest {
            let UploadEntry::Nested(children) = entry else {
                return None;
            };
            entry = children.get(segment.as_field()?)?;
        }
        match entry {
            UploadEntry::File(file) => Some(file),
            UploadEntry::Nested(_) => None,
        }
    }

    /// Returns `true` when nothing was uploaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn segment_key(segment: &NameSegment, level: &IndexMap<SmolStr, UploadEntry>) -> SmolStr {
    match segment {
        NameSegment::Field(field) => field.clone(),
        NameSegment::Append => SmolStr::new(level.len().to_string()),
    }
}

/// `<input type="file">`.
#[derive(Debug, Clone, PartialEq)]
pub struct FileInput {
    label: Label,
    attributes: Attributes,
    upload: Option<UploadedFile>,
}

impl FileInput {
    /// File field named `name`.
    #[must_use]
    pub fn new(name: &str, label: impl Into<Label>) -> Self {
        let mut attributes = Attributes::new();
        attributes.set("name", name);
        attributes.set("type", "file");
        Self {
            label: label.into(),
            attributes,
            upload: None,
        }
    }

    /// `name` attribute.
    #[must_use]
    pub fn name(&self) -> &str {
        self.attributes.get("name").unwrap_or_default()
    }

    /// Renames the element.
    pub fn set_name(&mut self, name: &str) {
        self.attributes.set("name", name);
    }

    /// Label.
    #[must_use]
    pub fn label(&self) -> &Label {
        &self.label
    }

    /// `size` attribute.
    pub fn set_size(&mut self, size: u32) {
        self.attributes.set("size", size.to_string());
    }

    /// Picks this field's upload out of `uploads`.
    pub fn bind(&mut self, uploads: &UploadTable) {
        self.upload = uploads.get(self.name()).cloned();
    }

    /// The bound upload.
    #[must_use]
    pub fn upload(&self) -> Option<&UploadedFile> {
        self.upload.as_ref()
    }

    /// The bound upload as a value, `null` when nothing is bound.
    #[must_use]
    pub fn value(&self) -> Value {
        self.upload
            .as_ref()
            .and_then(|file| serde_json::to_value(file).ok())
            .unwrap_or(Value::Null)
    }

    /// Markup. File fields never freeze.
    #[must_use]
    pub fn to_html(&self) -> String {
        format!("<input{} />", self.attributes.to_html())
    }
}

/// Which check a [`FileRule`] performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileCheck {
    /// A file arrived.
    Uploaded,
    /// The file is at most `Size(n)` bytes.
    MaxSize,
    /// The declared type is one of `MimeTypes(..)`.
    MimeType,
    /// The client file name matches `Pattern(..)`.
    FileName,
}

/// Server-only rule over an uploaded file value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileRule {
    name: &'static str,
    check: FileCheck,
}

impl FileRule {
    /// `uploadedfile`.
    pub const UPLOADED: Self = Self::new("uploadedfile", FileCheck::Uploaded);
    /// `maxfilesize`.
    pub const MAX_SIZE: Self = Self::new("maxfilesize", FileCheck::MaxSize);
    /// `mimetype`.
    pub const MIME_TYPE: Self = Self::new("mimetype", FileCheck::MimeType);
    /// `filename`.
    pub const FILE_NAME: Self = Self::new("filename", FileCheck::FileName);

    const fn new(name: &'static str, check: FileCheck) -> Self {
        Self { name, check }
    }

    /// Check performed by this rule.
    #[must_use]
    pub fn check(&self) -> FileCheck {
        self.check
    }
}

impl Rule for FileRule {
    fn name(&self) -> &str {
        self.name
    }

    fn validate(&self, value: &Value, options: &RuleOptions) -> bool {
        let file = UploadedFile::from_value(value);
        if self.check == FileCheck::Uploaded {
            return file.is_some_and(|file| file.is_uploaded());
        }
        let Some(file) = file else {
            return true;
        };
        if self.check == FileCheck::MaxSize && file.error.is_size_error() {
            return false;
        }
        if !file.is_uploaded() {
            return true;
        }
        match (self.check, options) {
            (FileCheck::MaxSize, RuleOptions::Size(limit)) => file.size <= *limit,
            (FileCheck::MimeType, RuleOptions::MimeTypes(types)) => {
                types.iter().any(|ty| ty == file.mime_type.as_str())
            }
            (FileCheck::FileName, RuleOptions::Pattern(pattern)) => Regex::new(pattern)
                .map(|re| re.is_match(&file.name))
                .unwrap_or(false),
            _ => false,
        }
    }

    fn validation_script(&self, _options: &RuleOptions) -> Option<ValidationScript> {
        None
    }

    fn check_options(&self, options: &RuleOptions) -> Result<(), RuleError> {
        let expected = match (self.check, options) {
            (FileCheck::Uploaded, RuleOptions::None)
            | (FileCheck::MaxSize, RuleOptions::Size(_))
            | (FileCheck::MimeType, RuleOptions::MimeTypes(_)) => return Ok(()),
            (FileCheck::FileName, RuleOptions::Pattern(pattern)) => {
                return Regex::new(pattern).map(|_| ()).map_err(|err| {
                    RuleError::InvalidPattern {
                        rule: self.name.into(),
                        reason: err.to_string().into(),
                    }
                });
            }
            (FileCheck::Uploaded, _) => "none",
            (FileCheck::MaxSize, _) => "size",
            (FileCheck::MimeType, _) => "mime types",
            (FileCheck::FileName, _) => "pattern",
        };
        Err(RuleError::InvalidOptions {
            rule: self.name.into(),
            reason: format!("expected {expected} options, got {}", options.shape()).into(),
        })
    }
}

/// Adds the four file rules to `registry`.
pub fn register_file_rules(registry: &mut RuleRegistry) {
    for rule in [
        FileRule::UPLOADED,
        FileRule::MAX_SIZE,
        FileRule::MIME_TYPE,
        FileRule::FILE_NAME,
    ] {
        registry.register(rule);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn upload(name: &str, mime: &str, size: u64) -> UploadedFile {
        UploadedFile {
            name: name.to_string(),
            mime_type: mime.to_string(),
            size,
            tmp_name: "/tmp/php123".to_string(),
            error: UploadStatus::Ok,
        }
    }

    fn value(file: &UploadedFile) -> Value {
        serde_json::to_value(file).unwrap()
    }

    #[test]
    fn table_resolves_bracket_names() {
        let mut table = UploadTable::new();
        table.insert("avatar", upload("me.png", "image/png", 10));
        table.insert("files[doc]", upload("cv.pdf", "application/pdf", 20));
        assert_eq!(table.get("avatar").unwrap().name, "me.png");
        assert_eq!(table.get("files[doc]").unwrap().name, "cv.pdf");
        assert!(table.get("files").is_none());
        assert!(table.get("files[other]").is_none());
    }

    #[test]
    fn table_deserializes_nested_json() {
        let table: UploadTable = serde_json::from_value(json!({
            "files": {"doc": {"name": "a.txt", "type": "text/plain", "size": 3, "tmp_name": "/tmp/x"}}
        }))
        .unwrap();
        let file = table.get("files[doc]").unwrap();
        assert_eq!(file.mime_type, "text/plain");
        assert!(file.is_uploaded());
    }

    #[test]
    fn uploaded_requires_a_stored_file() {
        let rule = FileRule::UPLOADED;
        assert!(rule.validate(&value(&upload("a", "text/plain", 1)), &RuleOptions::None));
        let mut missing = upload("", "", 0);
        missing.tmp_name = "none".to_string();
        assert!(!rule.validate(&value(&missing), &RuleOptions::None));
        assert!(!rule.validate(&Value::Null, &RuleOptions::None));
    }

    #[test]
    fn size_errors_fail_max_size() {
        let rule = FileRule::MAX_SIZE;
        let limit = RuleOptions::Size(100);
        assert!(rule.validate(&value(&upload("a", "x/y", 100)), &limit));
        assert!(!rule.validate(&value(&upload("a", "x/y", 101)), &limit));
        let mut too_big = upload("a", "x/y", 0);
        too_big.error = UploadStatus::FormSize;
        assert!(!rule.validate(&value(&too_big), &limit));
        assert!(rule.validate(&Value::Null, &limit));
    }

    #[test]
    fn mime_type_and_file_name() {
        let pdf = value(&upload("cv.pdf", "application/pdf", 5));
        let types = RuleOptions::MimeTypes(vec!["image/png".into(), "application/pdf".into()]);
        assert!(FileRule::MIME_TYPE.validate(&pdf, &types));
        assert!(!FileRule::MIME_TYPE.validate(&pdf, &RuleOptions::MimeTypes(vec!["image/png".into()])));
        assert!(FileRule::FILE_NAME.validate(&pdf, &RuleOptions::Pattern(r"\.pdf$".into())));
        assert!(!FileRule::FILE_NAME.validate(&pdf, &RuleOptions::Pattern(r"\.png$".into())));
    }

    #[test]
    fn options_are_checked_at_binding() {
        assert!(FileRule::FILE_NAME
            .check_options(&RuleOptions::Pattern("(".into()))
            .is_err());
        assert!(FileRule::MAX_SIZE.check_options(&RuleOptions::None).is_err());
        assert!(FileRule::UPLOADED.validation_script(&RuleOptions::None).is_none());
    }
}
