/*!
Ordered tag multimap.

Keeps every `@tag value` pair in declaration order. A key may repeat
(`@usage` usually does); `get` returns the first value, `get_all` every
value, `keys` each distinct key once in first-appearance order.
*/

use serde::ser::{Serialize, SerializeMap, Serializer};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagMap {
    entries: Vec<(String, String)>,
}

impl TagMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.push((key.into(), value.into()));
    }

    pub fn has(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// First value declared for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.entries
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Distinct keys, first-appearance order.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = Vec::new();
        for (k, _) in &self.entries {
            if !keys.contains(&k.as_str()) {
                keys.push(k);
            }
        }
        keys
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append entries from `defaults` whose key this map does not declare.
    ///
    /// Keys already present keep only their own values.
    pub fn merge_defaults(&mut self, defaults: &TagMap) {
        let declared: Vec<String> = self.keys().into_iter().map(str::to_string).collect();
        for (k, v) in &defaults.entries {
            if !declared.iter().any(|d| d == k) {
                self.entries.push((k.clone(), v.clone()));
            }
        }
    }

    /// Continuation line for the most recent tag.
    pub(crate) fn append_to_last(&mut self, text: &str) {
        if let Some((_, value)) = self.entries.last_mut() {
            if !value.is_empty() {
                value.push('\n');
            }
            value.push_str(text);
        }
    }
}

impl Serialize for TagMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let keys = self.keys();
        let mut map = serializer.serialize_map(Some(keys.len()))?;
        for key in keys {
            let values: Vec<&str> = self.get_all(key).collect();
            map.serialize_entry(key, &values)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TagMap {
        let mut tags = TagMap::new();
        tags.push("command", "my:cat");
        tags.push("usage", "my:cat a b");
        tags.push("aliases", "c");
        tags.push("usage", "my:cat b a --flip");
        tags
    }

    #[test]
    fn keys_are_distinct_and_ordered() {
        assert_eq!(sample().keys(), vec!["command", "usage", "aliases"]);
        // Stable across repeated queries.
        assert_eq!(sample().keys(), sample().keys());
    }

    #[test]
    fn get_returns_first_and_get_all_returns_every_value() {
        let tags = sample();
        assert_eq!(tags.get("usage"), Some("my:cat a b"));
        assert_eq!(
            tags.get_all("usage").collect::<Vec<_>>(),
            vec!["my:cat a b", "my:cat b a --flip"]
        );
        assert_eq!(tags.get("missing"), None);
    }

    #[test]
    fn merge_defaults_only_fills_absent_keys() {
        let mut tags = sample();
        let mut defaults = TagMap::new();
        defaults.push("aliases", "ignored");
        defaults.push("topic", "cats");
        tags.merge_defaults(&defaults);
        assert_eq!(tags.get_all("aliases").collect::<Vec<_>>(), vec!["c"]);
        assert_eq!(tags.get("topic"), Some("cats"));
    }

    #[test]
    fn continuation_joins_with_newline() {
        let mut tags = TagMap::new();
        tags.push("usage", "my:cat a b");
        tags.append_to_last("Concatenate a and b.");
        assert_eq!(tags.get("usage"), Some("my:cat a b\nConcatenate a and b."));
    }

    #[test]
    fn serializes_as_key_to_values() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["usage"], serde_json::json!(["my:cat a b", "my:cat b a --flip"]));
        assert_eq!(json["aliases"], serde_json::json!(["c"]));
    }
}
