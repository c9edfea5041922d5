//! Key paths and the tree they address.
//!
//! A key path is the segment list of a bracket name (`addr[city]` →
//! `addr`, `city`). [`KeyTree::insert`] places a record at a path,
//! creating maps for field segments and lists for append segments on the
//! way down.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;
use smol_str::SmolStr;
use tracing::warn;

use formtree_elements::{split_name, NameError, NameSegment};

use crate::error::SerializationError;
use crate::model::ElementRecord;

/// Segment list addressing a node of a [`KeyTree`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct KeyPath {
    segments: Vec<NameSegment>,
}

impl KeyPath {
    /// Path of a bracket name.
    pub fn parse(name: &str) -> Result<Self, NameError> {
        Ok(Self {
            segments: split_name(name)?,
        })
    }

    /// Segments in order.
    #[must_use]
    pub fn segments(&self) -> &[NameSegment] {
        &self.segments
    }

    /// Returns `true` for the empty path.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// First field segment.
    #[must_use]
    pub fn root(&self) -> Option<&str> {
        self.segments.first().and_then(NameSegment::as_field)
    }

    /// Appends a field segment.
    pub fn push_field(&mut self, field: impl Into<SmolStr>) {
        self.segments.push(NameSegment::Field(field.into()));
    }

    /// Returns `true` when the last segment is `[]`.
    #[must_use]
    pub fn ends_with_append(&self) -> bool {
        matches!(self.segments.last(), Some(NameSegment::Append))
    }

    /// The rest of this path after `prefix`, or `None` if `prefix` does not
    /// lead it.
    #[must_use]
    pub fn strip_prefix(&self, prefix: &KeyPath) -> Option<KeyPath> {
        self.segments
            .strip_prefix(prefix.segments.as_slice())
            .map(|rest| KeyPath {
                segments: rest.to_vec(),
            })
    }

    /// Property-access rendering, `->{'addr'}->{'city'}`, with `\` and `'`
    /// escaped. Control characters cannot be written and are an error.
    pub fn to_expression(&self) -> Result<String, SmolStr> {
        let mut out = String::new();
        for segment in &self.segments {
            let NameSegment::Field(field) = segment else {
                out.push_str("[]");
                continue;
            };
            if let Some(ch) = field.chars().find(|ch| ch.is_control()) {
                return Err(format!(
                    "segment '{}' holds control character {ch:?}",
                    field.escape_debug()
                )
                .into());
            }
            out.push_str("->{'");
            for ch in field.chars() {
                if matches!(ch, '\\' | '\'') {
                    out.push('\\');
                }
                out.push(ch);
            }
            out.push_str("'}");
        }
        Ok(out)
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut segments = self.segments.iter();
        if let Some(first) = segments.next() {
            write!(f, "{first}")?;
        }
        for segment in segments {
            match segment {
                NameSegment::Field(field) => write!(f, "[{field}]")?,
                NameSegment::Append => f.write_str("[]")?,
            }
        }
        Ok(())
    }
}

/// Tree of records addressed by key paths.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum KeyTree {
    /// A placed record.
    Record(Box<ElementRecord>),
    /// Field-keyed children.
    Map(IndexMap<String, KeyTree>),
    /// Children added through `[]`.
    List(Vec<KeyTree>),
}

impl Default for KeyTree {
    fn default() -> Self {
        Self::Map(IndexMap::new())
    }
}

impl KeyTree {
    fn container_for(next: &NameSegment) -> Self {
        match next {
            NameSegment::Field(_) => Self::Map(IndexMap::new()),
            NameSegment::Append => Self::List(Vec::new()),
        }
    }

    /// Number of direct children; 1 for a record.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Record(_) => 1,
            Self::Map(map) => map.len(),
            Self::List(items) => items.len(),
        }
    }

    /// Returns `true` for an empty container.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The record at this node.
    #[must_use]
    pub fn as_record(&self) -> Option<&ElementRecord> {
        match self {
            Self::Record(record) => Some(record),
            _ => None,
        }
    }

    /// Node at `path`. Field segments index maps, or lists by position.
    #[must_use]
    pub fn get(&self, path: &KeyPath) -> Option<&KeyTree> {
        let mut node = self;
        for segment in path.segments() {
            node = match (node, segment) {
                (Self::Map(map), NameSegment::Field(field)) => map.get(field.as_str())?,
                (Self::List(items), NameSegment::Field(field)) => {
                    items.get(field.parse::<usize>().ok()?)?
                }
                _ => return None,
            };
        }
        Some(node)
    }

    /// Record at the path given as a bracket name, e.g. `addr[city]`.
    #[must_use]
    pub fn record(&self, name: &str) -> Option<&ElementRecord> {
        self.get(&KeyPath::parse(name).ok()?)?.as_record()
    }

    /// Places `record` at `path`, creating intermediate containers.
    ///
    /// A record already at the path is replaced. Descending through a
    /// record, replacing a container, or mixing field and append access on
    /// one container fails.
    pub fn insert(
        &mut self,
        path: &KeyPath,
        record: ElementRecord,
    ) -> Result<(), SerializationError> {
        let element = record.name.clone();
        self.insert_at(path.segments(), record)
            .map_err(|reason| SerializationError::new(&element, format!("{reason} at '{path}'")))
    }

    fn insert_at(
        &mut self,
        path: &[NameSegment],
        record: ElementRecord,
    ) -> Result<(), &'static str> {
        let Some((segment, rest)) = path.split_first() else {
            return Err("empty key path");
        };
        let slot = match (self, segment) {
            (Self::Record(_), _) => return Err("path continues below an element"),
            (Self::Map(_), NameSegment::Append) => return Err("cannot append to a keyed container"),
            (Self::Map(map), NameSegment::Field(field)) => {
                if rest.is_empty() {
                    return place(map.entry(field.to_string()).or_insert(KeyTree::default()), record);
                }
                map.entry(field.to_string())
                    .or_insert_with(|| Self::container_for(&rest[0]))
            }
            (Self::List(items), NameSegment::Append) => {
                let Some(next) = rest.first() else {
                    items.push(Self::Record(Box::new(record)));
                    return Ok(());
                };
                items.push(Self::container_for(next));
                let Some(last) = items.last_mut() else {
                    return Err("list append failed");
                };
                last
            }
            (Self::List(items), NameSegment::Field(field)) => {
                let index: usize = field
                    .parse()
                    .map_err(|_| "cannot use a field name on a list")?;
                if index == items.len() {
                    items.push(match rest.first() {
                        Some(next) => Self::container_for(next),
                        None => Self::default(),
                    });
                }
                let Some(slot) = items.get_mut(index) else {
                    return Err("list index out of range");
                };
                if rest.is_empty() {
                    return place(slot, record);
                }
                slot
            }
        };
        slot.insert_at(rest, record)
    }
}

fn place(slot: &mut KeyTree, record: ElementRecord) -> Result<(), &'static str> {
    match slot {
        KeyTree::Record(existing) => {
            warn!("element '{}' replaces '{}' at the same key", record.name, existing.name);
        }
        KeyTree::Map(map) if map.is_empty() => {}
        KeyTree::List(items) if items.is_empty() => {}
        KeyTree::Map(_) | KeyTree::List(_) => return Err("a container already holds this key"),
    }
    *slot = KeyTree::Record(Box::new(record));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path(name: &str) -> KeyPath {
        KeyPath::parse(name).unwrap()
    }

    fn record(name: &str) -> ElementRecord {
        ElementRecord {
            name: name.to_string(),
            kind: "text".to_string(),
            ..ElementRecord::default()
        }
    }

    #[test]
    fn expression_escapes_quotes_and_backslashes() {
        assert_eq!(path("addr[city]").to_expression().unwrap(), "->{'addr'}->{'city'}");
        assert_eq!(path("a[it's]").to_expression().unwrap(), r"->{'a'}->{'it\'s'}");
        assert_eq!(path(r"a[b\c]").to_expression().unwrap(), r"->{'a'}->{'b\\c'}");
        assert_eq!(path("tags[]").to_expression().unwrap(), "->{'tags'}[]");
        assert!(path("a[b\nc]").to_expression().is_err());
    }

    #[test]
    fn strip_prefix_and_display() {
        let member = path("phone[area]");
        assert_eq!(member.strip_prefix(&path("phone")).unwrap(), path("area"));
        assert!(member.strip_prefix(&path("fax")).is_none());
        assert_eq!(member.to_string(), "phone[area]");
        assert_eq!(path("tags[]").to_string(), "tags[]");
    }

    #[test]
    fn insert_creates_maps_and_lists() {
        let mut tree = KeyTree::default();
        tree.insert(&path("addr[city]"), record("addr[city]")).unwrap();
        tree.insert(&path("addr[zip]"), record("addr[zip]")).unwrap();
        tree.insert(&path("tags[]"), record("tags[]")).unwrap();
        tree.insert(&path("tags[]"), record("tags[]")).unwrap();

        assert_eq!(tree.record("addr[city]").unwrap().name, "addr[city]");
        assert_eq!(tree.get(&path("tags")).unwrap().len(), 2);
        assert!(tree.record("tags[1]").is_some());
        let value = serde_json::to_value(&tree).unwrap();
        assert_eq!(value["addr"]["zip"]["name"], json!("addr[zip]"));
        assert_eq!(value["tags"][0]["type"], json!("text"));
    }

    #[test]
    fn conflicts_are_errors() {
        let mut tree = KeyTree::default();
        tree.insert(&path("addr"), record("addr")).unwrap();
        let err = tree
            .insert(&path("addr[city]"), record("addr[city]"))
            .expect_err("addr is a record");
        assert_eq!(err.element, "addr[city]");

        let mut tree = KeyTree::default();
        tree.insert(&path("addr[city]"), record("addr[city]")).unwrap();
        assert!(tree.insert(&path("addr"), record("addr")).is_err());
        assert!(tree.insert(&path("addr[]"), record("addr[]")).is_err());
    }

    #[test]
    fn same_key_replaces_the_record() {
        let mut tree = KeyTree::default();
        tree.insert(&path("q"), record("q")).unwrap();
        let mut second = record("q");
        second.kind = "password".to_string();
        tree.insert(&path("q"), second).unwrap();
        assert_eq!(tree.record("q").unwrap().kind, "password");
    }
}
