//! Drupal `$settings` array.
//!
//! The contents of `$settings` are whatever the site owner put there, so
//! values are kept as a tagged [`SettingValue`] and read through typed
//! accessors that fall back to a zero value instead of failing.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// One value from a PHP array, after a trip through `json_encode`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<SettingValue>),
    Map(Settings),
}

/// The `$settings` array defined in settings.php.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Settings(BTreeMap<String, SettingValue>);

impl<'de> Deserialize<'de> for Settings {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // PHP encodes an empty array as `[]`, not `{}`
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Shape {
            Map(BTreeMap<String, SettingValue>),
            List(Vec<SettingValue>),
        }

        match Shape::deserialize(deserializer)? {
            Shape::Map(map) => Ok(Settings(map)),
            Shape::List(list) if list.is_empty() => Ok(Settings::default()),
            Shape::List(list) => Ok(Settings(
                list.into_iter()
                    .enumerate()
                    .map(|(i, v)| (i.to_string(), v))
                    .collect(),
            )),
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&SettingValue> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: SettingValue) {
        self.0.insert(key.into(), value);
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SettingValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Whether the key is defined at all. Use this to tell a `false` or
    /// empty value apart from a missing one.
    pub fn has_value(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// String value, or `""`.
    pub fn get_string(&self, key: &str) -> String {
        match self.0.get(key) {
            Some(SettingValue::String(s)) => s.clone(),
            _ => String::new(),
        }
    }

    /// Integer value, or `0`. Floats are not truncated.
    pub fn get_int(&self, key: &str) -> i64 {
        match self.0.get(key) {
            Some(SettingValue::Int(i)) => *i,
            _ => 0,
        }
    }

    /// Boolean value, or `false`.
    pub fn get_bool(&self, key: &str) -> bool {
        matches!(self.0.get(key), Some(SettingValue::Bool(true)))
    }

    /// Float value, or `0.0`. Integers are widened.
    pub fn get_float(&self, key: &str) -> f64 {
        match self.0.get(key) {
            Some(SettingValue::Float(f)) => *f,
            Some(SettingValue::Int(i)) => *i as f64,
            _ => 0.0,
        }
    }

    /// Nested associative array, or an empty one.
    pub fn get_map(&self, key: &str) -> Settings {
        match self.0.get(key) {
            Some(SettingValue::Map(map)) => map.clone(),
            _ => Settings::default(),
        }
    }

    /// The string entries of a list value, or an empty list. Non-string
    /// entries are skipped.
    pub fn get_array(&self, key: &str) -> Vec<String> {
        match self.0.get(key) {
            Some(SettingValue::List(items)) => items
                .iter()
                .filter_map(|item| match item {
                    SettingValue::String(s) => Some(s.clone()),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }
}

impl FromIterator<(String, SettingValue)> for Settings {
    fn from_iter<I: IntoIterator<Item = (String, SettingValue)>>(iter: I) -> Self {
        Settings(iter.into_iter().collect())
    }
}
