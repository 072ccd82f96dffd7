use crate::icon::{CanonicalKey, IconVariant};
use crate::index::SystemIndex;
use serde_yaml::Value;
use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum MappingError {
    #[error("failed to read the mapping file")]
    Io(#[from] std::io::Error),
    #[error("the mapping file is not valid YAML")]
    Yaml(#[from] serde_yaml::Error),
    #[error("the mapping file must contain a mapping at the top level")]
    NotAMapping,
}

/// The canonical keys an existing mapping table already accounts for.
///
/// The table maps arbitrary display names to lists of `category/icon_name` keys:
///
/// ```yaml
/// Copy:
///   - actions/edit-copy
///   - actions/copy
/// Web Browser: [apps/firefox]
/// ```
///
/// Values that are not lists are ignored.
#[derive(Debug, Default, Clone)]
pub struct KnownMappings {
    keys: HashSet<String>,
}

impl KnownMappings {
    /// Load the table at `path`. A file that does not exist is an empty table.
    pub fn load(path: &Path) -> Result<Self, MappingError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::info!("no mapping file at {path:?}, treating every icon as unmapped");
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };

        Self::from_yaml(&text)
    }

    pub fn from_yaml(text: &str) -> Result<Self, MappingError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }

        let mapping = match serde_yaml::from_str::<Value>(text)? {
            Value::Mapping(mapping) => mapping,
            // `null`, `[]`, `""`, `0` and `false` all mean "nothing mapped yet"
            value if is_empty_value(&value) => return Ok(Self::default()),
            _ => return Err(MappingError::NotAMapping),
        };

        let keys = mapping
            .values()
            .filter_map(Value::as_sequence)
            .flatten()
            .filter_map(Value::as_str)
            .map(String::from)
            .collect();

        Ok(KnownMappings { keys })
    }

    pub fn insert(&mut self, key: impl Into<String>) {
        self.keys.insert(key.into());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// The icons in `index` whose key is not in this table, ordered by key.
    pub fn missing<'a>(&self, index: &'a SystemIndex) -> MissingSet<'a> {
        // `SystemIndex` iterates in key order already
        let entries = index
            .iter()
            .filter(|(key, _)| !self.contains(key.as_str()))
            .map(|(key, variants)| (key, variants.as_slice()))
            .collect();

        MissingSet { entries }
    }
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Sequence(seq) => seq.is_empty(),
        Value::Mapping(mapping) => mapping.is_empty(),
        Value::Tagged(_) => false,
    }
}

/// Icons without a mapping, sorted by [CanonicalKey].
#[derive(Debug, Clone)]
pub struct MissingSet<'a> {
    entries: Vec<(&'a CanonicalKey, &'a [IconVariant])>,
}

impl<'a> MissingSet<'a> {
    pub fn iter(&self) -> impl Iterator<Item = (&'a CanonicalKey, &'a [IconVariant])> + '_ {
        self.entries.iter().copied()
    }

    pub fn keys(&self) -> impl Iterator<Item = &'a CanonicalKey> + '_ {
        self.entries.iter().map(|(key, _)| *key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
