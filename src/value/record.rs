//! Ordered records of named values.

use crate::util::{Error, Result};

use super::TypedValue;

/// Ordered collection of `(key, value)` pairs with unique keys.
///
/// Iteration follows insertion order; lookup is by exact key.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Record {
    entries: Vec<(String, TypedValue)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from pairs, rejecting repeated keys.
    pub fn from_entries<K, V, I>(entries: I) -> Result<Self>
    where
        K: Into<String>,
        V: Into<TypedValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut record = Self::new();
        for (key, value) in entries {
            record.insert(key, value)?;
        }
        Ok(record)
    }

    /// Append an entry. Fails with `DuplicateKey` if `key` is already present;
    /// the existing value is kept.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<TypedValue>) -> Result<()> {
        let key = key.into();
        if self.contains_key(&key) {
            return Err(Error::DuplicateKey(key));
        }
        self.entries.push((key, value.into()));
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&TypedValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Like [`get`](Self::get) but fails with `KeyNotFound`.
    pub fn require(&self, key: &str) -> Result<&TypedValue> {
        self.get(key).ok_or_else(|| Error::KeyNotFound(key.to_string()))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TypedValue)> + '_ {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for Record {
    type Item = (String, TypedValue);
    type IntoIter = std::vec::IntoIter<(String, TypedValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
