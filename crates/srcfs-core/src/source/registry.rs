//! Source text indexed by source unit name

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Source unit name used for text read from standard input
pub const STDIN_SOURCE_UNIT_NAME: &str = "<stdin>";

/// Known source text for a single compilation run.
///
/// Keys are unique and the last write wins. Iteration follows first
/// insertion so diagnostics come out in a stable order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceRegistry {
    sources: IndexMap<String, String>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `source` under `name`, returning the text it replaced
    pub fn insert(&mut self, name: impl Into<String>, source: impl Into<String>) -> Option<String> {
        self.sources.insert(name.into(), source.into())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.sources.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.sources.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.sources.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.sources.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Drop everything and take `sources` instead
    pub fn replace<I, K, V>(&mut self, sources: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.sources = sources
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
    }

    pub fn into_inner(self) -> IndexMap<String, String> {
        self.sources
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SourceRegistry {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut registry = Self::new();
        registry.replace(iter);
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_last_write_wins() {
        let mut registry = SourceRegistry::new();
        assert_eq!(registry.insert("a.sol", "v1"), None);
        assert_eq!(registry.insert("a.sol", "v2"), Some("v1".to_string()));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("a.sol"), Some("v2"));
    }

    #[test]
    fn test_iteration_is_deterministic() {
        let mut registry = SourceRegistry::new();
        registry.insert("z.sol", "");
        registry.insert(STDIN_SOURCE_UNIT_NAME, "");
        registry.insert("a.sol", "");

        let names: Vec<&str> = registry.names().collect();
        assert_eq!(names, vec!["z.sol", "<stdin>", "a.sol"]);
    }

    #[test]
    fn test_replace() {
        let mut registry = SourceRegistry::new();
        registry.insert("old.sol", "x");
        registry.replace([("new.sol", "y")]);

        assert!(!registry.contains("old.sol"));
        assert_eq!(registry.get("new.sol"), Some("y"));
    }

    #[test]
    fn test_serializes_as_plain_map() {
        let registry: SourceRegistry = [("a.sol", "contract A {}")].into_iter().collect();
        let json = serde_json::to_string(&registry).unwrap();
        assert_eq!(json, r#"{"a.sol":"contract A {}"}"#);
    }
}
