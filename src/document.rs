//! # Generic Document Model
//!
//! Compose manifests are schema-loose: the engine only understands a handful
//! of fields, but every other field has to survive a read-rewrite-write cycle.
//! `Document` is the tagged tree used for that. It mirrors
//! `serde_yaml::Value` with two differences:
//!
//! - Mapping keys are strings and mappings are kept in sorted key order, so
//!   serializing the same tree always produces the same bytes.
//! - Every accessor returns an `Option`, and the engine turns a `None` into a
//!   schema error instead of panicking on an unexpected shape.
//!
//! Non-string scalar keys (`1:`, `true:`) are rendered to their string form
//! when loaded. Sequence or mapping keys are rejected as a parse error.
//! YAML merge keys (`<<: *anchor`) are resolved on load, so a service's
//! inherited fields appear directly in its mapping.

use std::collections::BTreeMap;
use std::path::Path;

use serde_yaml::value::{Tag, TaggedValue};
use serde_yaml::Value as YamlValue;

use crate::error::{Error, Result};

/// A mapping with string keys in sorted order.
pub type Mapping = BTreeMap<String, Document>;

/// A node in a loaded manifest.
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    Null,
    Bool(bool),
    Number(serde_yaml::Number),
    String(String),
    Sequence(Vec<Document>),
    Mapping(Mapping),
    /// A value carrying an explicit YAML tag such as `!reset`.
    Tagged(Box<Tagged>),
}

/// A tagged value. `tag` includes the leading `!`.
#[derive(Debug, Clone, PartialEq)]
pub struct Tagged {
    pub tag: String,
    pub value: Document,
}

impl Document {
    /// Parses YAML text. `origin` is only used for error reporting.
    pub fn parse(content: &str, origin: &Path) -> Result<Self> {
        let mut value: YamlValue =
            serde_yaml::from_str(content).map_err(|e| Error::parse(origin, e.to_string()))?;
        // `<<: *anchor` keys are flattened here so inherited fields are
        // rewritten like any other field.
        value
            .apply_merge()
            .map_err(|e| Error::parse(origin, e.to_string()))?;
        Document::try_from(value).map_err(|message| Error::parse(origin, message))
    }

    /// Serializes the tree back to YAML text.
    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml::to_string(&YamlValue::from(self.clone()))?)
    }

    /// A short name for the node's shape, used in schema error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Document::Null => "null",
            Document::Bool(_) => "boolean",
            Document::Number(_) => "number",
            Document::String(_) => "string",
            Document::Sequence(_) => "sequence",
            Document::Mapping(_) => "mapping",
            Document::Tagged(_) => "tagged value",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Document::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Document::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&Vec<Document>> {
        match self {
            Document::Sequence(seq) => Some(seq),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Document::Mapping(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_mapping_mut(&mut self) -> Option<&mut Mapping> {
        match self {
            Document::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Looks up `key` when this node is a mapping.
    pub fn get(&self, key: &str) -> Option<&Document> {
        self.as_mapping().and_then(|map| map.get(key))
    }
}

impl From<&str> for Document {
    fn from(s: &str) -> Self {
        Document::String(s.to_string())
    }
}

impl From<String> for Document {
    fn from(s: String) -> Self {
        Document::String(s)
    }
}

impl TryFrom<YamlValue> for Document {
    type Error = String;

    fn try_from(value: YamlValue) -> std::result::Result<Self, Self::Error> {
        Ok(match value {
            YamlValue::Null => Document::Null,
            YamlValue::Bool(b) => Document::Bool(b),
            YamlValue::Number(n) => Document::Number(n),
            YamlValue::String(s) => Document::String(s),
            YamlValue::Sequence(seq) => Document::Sequence(
                seq.into_iter()
                    .map(Document::try_from)
                    .collect::<std::result::Result<_, _>>()?,
            ),
            YamlValue::Mapping(map) => {
                let mut out = Mapping::new();
                for (key, value) in map {
                    out.insert(key_to_string(key)?, Document::try_from(value)?);
                }
                Document::Mapping(out)
            }
            YamlValue::Tagged(tagged) => {
                let TaggedValue { tag, value } = *tagged;
                Document::Tagged(Box::new(Tagged {
                    tag: tag.to_string(),
                    value: Document::try_from(value)?,
                }))
            }
        })
    }
}

fn key_to_string(key: YamlValue) -> std::result::Result<String, String> {
    match key {
        YamlValue::String(s) => Ok(s),
        YamlValue::Bool(b) => Ok(b.to_string()),
        YamlValue::Number(n) => Ok(n.to_string()),
        YamlValue::Null => Ok("null".to_string()),
        other => Err(format!(
            "unsupported mapping key of type {}",
            match other {
                YamlValue::Sequence(_) => "sequence",
                YamlValue::Mapping(_) => "mapping",
                _ => "tagged value",
            }
        )),
    }
}

impl From<Document> for YamlValue {
    fn from(doc: Document) -> Self {
        match doc {
            Document::Null => YamlValue::Null,
            Document::Bool(b) => YamlValue::Bool(b),
            Document::Number(n) => YamlValue::Number(n),
            Document::String(s) => YamlValue::String(s),
            Document::Sequence(seq) => {
                YamlValue::Sequence(seq.into_iter().map(YamlValue::from).collect())
            }
            Document::Mapping(map) => YamlValue::Mapping(
                map.into_iter()
                    .map(|(k, v)| (YamlValue::String(k), YamlValue::from(v)))
                    .collect(),
            ),
            Document::Tagged(tagged) => {
                let Tagged { tag, value } = *tagged;
                YamlValue::Tagged(Box::new(TaggedValue {
                    tag: Tag::new(tag),
                    value: YamlValue::from(value),
                }))
            }
        }
    }
}
