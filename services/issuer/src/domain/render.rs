//! `{{ placeholder }}` substitution for tenant templates.
//!
//! Keys match case-insensitively. The field list is normalized to lower-case
//! once per call; when two keys collapse to the same lower-case form, the one
//! that appears first in [`TemplateFields`] wins. Placeholders without a
//! matching field are left in place so half-configured templates stay visible.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{(.*?)\}\}").expect("placeholder pattern is valid"));

/// Ordered key/value pairs available to a template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateFields {
    entries: Vec<(String, String)>,
}

impl TemplateFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field. Earlier entries take precedence on case-insensitive collision.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.entries.push((key.into(), value.into()));
        self
    }

    /// Case-insensitive lookup, first match wins.
    pub fn get(&self, key: &str) -> Option<&str> {
        let key = key.to_lowercase();
        self.entries
            .iter()
            .find(|(k, _)| k.to_lowercase() == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    fn normalized(&self) -> HashMap<String, &str> {
        let mut map = HashMap::with_capacity(self.entries.len());
        for (k, v) in &self.entries {
            map.entry(k.to_lowercase()).or_insert(v.as_str());
        }
        map
    }
}

impl<K, V> FromIterator<(K, V)> for TemplateFields
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Render `template` against `fields`.
///
/// A missing or empty template renders as `""`; missing fields return the
/// template unchanged.
pub fn render(template: Option<&str>, fields: Option<&TemplateFields>) -> String {
    let template = match template {
        Some(t) if !t.is_empty() => t,
        _ => return String::new(),
    };
    let Some(fields) = fields else {
        return template.to_owned();
    };

    let lookup = fields.normalized();
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| {
            let key = caps[1].trim().to_lowercase();
            match lookup.get(&key) {
                Some(value) => (*value).to_owned(),
                None => caps[0].to_owned(),
            }
        })
        .into_owned()
}
