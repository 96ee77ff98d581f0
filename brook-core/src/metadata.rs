//! Stream metadata.

use std::collections::BTreeMap;

/// A single metadata value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetaValue {
    /// A flag such as `seekable`.
    Bool(bool),
    /// A numeric value.
    Int(i64),
    /// A textual value such as `mode` or `uri`.
    Text(String),
}

impl From<bool> for MetaValue {
    fn from(value: bool) -> Self {
        MetaValue::Bool(value)
    }
}

impl From<i64> for MetaValue {
    fn from(value: i64) -> Self {
        MetaValue::Int(value)
    }
}

impl From<&str> for MetaValue {
    fn from(value: &str) -> Self {
        MetaValue::Text(value.to_owned())
    }
}

impl From<String> for MetaValue {
    fn from(value: String) -> Self {
        MetaValue::Text(value)
    }
}

/// Key/value metadata describing a stream, ordered by key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    entries: BTreeMap<String, MetaValue>,
}

impl Metadata {
    /// Create an empty metadata map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<MetaValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert an entry, returning the previous value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<MetaValue>) -> Option<MetaValue> {
        self.entries.insert(key.into(), value.into())
    }

    /// Look a key up.
    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        self.entries.get(key)
    }

    /// Remove a key.
    pub fn remove(&mut self, key: &str) -> Option<MetaValue> {
        self.entries.remove(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetaValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Copy every entry of `other` into `self`, `other` winning on collision.
    pub fn extend(&mut self, other: &Metadata) {
        for (key, value) in &other.entries {
            self.entries.insert(key.clone(), value.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_and_lookup() {
        let meta = Metadata::new().with("mode", "r+").with("seekable", true);
        assert_eq!(meta.len(), 2);
        assert_eq!(meta.get("mode"), Some(&MetaValue::Text("r+".into())));
        assert_eq!(meta.get("seekable"), Some(&MetaValue::Bool(true)));
        assert!(meta.get("uri").is_none());
    }

    #[test]
    fn iteration_is_key_ordered() {
        let meta = Metadata::new().with("b", 2i64).with("a", 1i64);
        let keys: Vec<_> = meta.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, ["a", "b"]);
    }

    #[test]
    fn extend_overwrites() {
        let mut base = Metadata::new().with("mode", "r");
        base.extend(&Metadata::new().with("mode", "r+").with("uri", "mem"));
        assert_eq!(base.get("mode"), Some(&MetaValue::from("r+")));
        assert_eq!(base.len(), 2);
    }
}
