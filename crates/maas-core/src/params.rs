//! Multi-valued request parameters.
//!
//! [`Params`] backs both query strings and form-encoded bodies. Keys are kept
//! sorted so that encoding is deterministic; each key may carry several
//! values, which MAAS uses for list arguments such as repeated `id=` filters.

use std::collections::BTreeMap;
use std::fmt::Display;

/// Ordered map of parameter names to one or more values.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Params {
    values: BTreeMap<String, Vec<String>>,
}

impl Params {
    /// Create a new, empty parameter map.
    #[must_use]
    pub fn new() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    /// Append a value to the values already held for `key`.
    pub fn add(&mut self, key: impl Into<String>, value: impl Display) {
        self.values
            .entry(key.into())
            .or_default()
            .push(value.to_string());
    }

    /// Replace all values for `key` with a single value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Display) {
        self.values.insert(key.into(), vec![value.to_string()]);
    }

    /// Append a value when it is present.
    pub fn push_opt<T>(&mut self, key: impl Into<String>, value: Option<T>)
    where
        T: Display,
    {
        if let Some(value) = value {
            self.add(key, value);
        }
    }

    /// First value held for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// All values held for `key`.
    #[must_use]
    pub fn get_all(&self, key: &str) -> &[String] {
        self.values.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns true if `key` is present, even with an empty value.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Remove `key`, returning its values.
    pub fn remove(&mut self, key: &str) -> Option<Vec<String>> {
        self.values.remove(key)
    }

    /// Returns true if no parameters have been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Encode as `application/x-www-form-urlencoded`, sorted by key.
    #[must_use]
    pub fn encode(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (key, values) in &self.values {
            for value in values {
                serializer.append_pair(key, value);
            }
        }
        serializer.finish()
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Display,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (key, value) in iter {
            params.add(key, value);
        }
        params
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Params
where
    K: Into<String>,
    V: Display,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}
