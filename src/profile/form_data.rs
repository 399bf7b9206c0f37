use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Flat profile record supplied by the host: profile key → value.
///
/// Values that are empty, whitespace-only or the literal `"undefined"` are
/// treated as absent by every lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormData(BTreeMap<String, String>);

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: &str) {
        self.0.insert(key.to_string(), value.to_string());
    }

    /// Present, usable value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .map(String::as_str)
            .filter(|v| is_present(v))
    }

    /// `fullName`, else `name`.
    pub fn full_name(&self) -> Option<&str> {
        self.get("fullName").or_else(|| self.get("name"))
    }

    /// First word of `fullName`.
    pub fn first_name_from_full(&self) -> Option<&str> {
        self.get("fullName")
            .and_then(|full| full.split_whitespace().next())
    }

    /// Everything after the first word of `fullName`.
    pub fn last_name_from_full(&self) -> Option<String> {
        let full = self.get("fullName")?;
        let rest = full.split_whitespace().skip(1).collect::<Vec<_>>().join(" ");
        Some(rest).filter(|r| !r.is_empty())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

pub fn is_present(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty() && trimmed != "undefined"
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Hosts send numbers and booleans as JSON scalars (`"income": 25000`);
/// they are kept as their string form. Nulls are dropped.
#[derive(Deserialize)]
#[serde(untagged)]
enum ProfileScalar {
    Text(String),
    Integer(i64),
    Float(f64),
    Flag(bool),
    Null(()),
}

impl<'de> Deserialize<'de> for FormData {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: BTreeMap<String, ProfileScalar> = BTreeMap::deserialize(deserializer)?;

        Ok(FormData(
            raw.into_iter()
                .filter_map(|(key, value)| {
                    let text = match value {
                        ProfileScalar::Text(s) => s,
                        ProfileScalar::Integer(n) => n.to_string(),
                        ProfileScalar::Float(n) => n.to_string(),
                        ProfileScalar::Flag(b) => b.to_string(),
                        ProfileScalar::Null(()) => return None,
                    };
                    Some((key, text))
                })
                .collect(),
        ))
    }
}
