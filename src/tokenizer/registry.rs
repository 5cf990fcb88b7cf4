use super::analyzer::Analyzer;
use super::config::AnalyzerConfigMap;
use std::collections::BTreeMap;

/// Configuration key applying to every field without its own entry.
pub const WILDCARD: &str = "*";
/// Name of the composite field aggregating all non-id values.
pub const ALL_FIELD: &str = "_all";

/// Root key of a flattened field name: `meta.color` and `tags.[0]` resolve
/// through `meta` and `tags`.
pub fn root_key(field: &str) -> &str {
    field.split('.').next().unwrap_or(field)
}

/// Resolves field names to analyzers.
///
/// Lookup order: the exact field name, its root key, the `*` entry, then the
/// built-in [`Analyzer::standard`] pipeline.
#[derive(Debug, Clone)]
pub struct AnalyzerRegistry {
    analyzers: BTreeMap<String, Analyzer>,
    fallback: Analyzer,
}

impl Default for AnalyzerRegistry {
    fn default() -> Self {
        Self::new(&AnalyzerConfigMap::new())
    }
}

impl AnalyzerRegistry {
    pub fn new(configs: &AnalyzerConfigMap) -> Self {
        let analyzers = configs
            .iter()
            .map(|(key, config)| (key.clone(), Analyzer::from_config(config)))
            .collect();
        AnalyzerRegistry {
            analyzers,
            fallback: Analyzer::standard(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.analyzers.is_empty()
    }

    /// The configuration key used for `field`, or `None` if it falls through
    /// to the built-in pipeline.
    pub fn resolve_key(&self, field: &str) -> Option<&str> {
        [field, root_key(field), WILDCARD]
            .into_iter()
            .find_map(|key| self.analyzers.get_key_value(key).map(|(k, _)| k.as_str()))
    }

    pub fn resolve(&self, field: &str) -> &Analyzer {
        self.resolve_key(field)
            .and_then(|key| self.analyzers.get(key))
            .unwrap_or(&self.fallback)
    }

    /// Field-specific keys, sorted, excluding `*` and `_all`.
    pub fn field_keys(&self) -> impl Iterator<Item = &str> {
        self.analyzers
            .keys()
            .map(|k| k.as_str())
            .filter(|k| *k != WILDCARD && *k != ALL_FIELD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::config::{AnalyzerConfig, FilterKind, TokenizerKind};

    fn registry() -> AnalyzerRegistry {
        let mut configs = AnalyzerConfigMap::new();
        configs.insert(
            "sku".to_string(),
            AnalyzerConfig::default().with_tokenizer(TokenizerKind::Whitespace),
        );
        configs.insert(
            "*".to_string(),
            AnalyzerConfig::default().with_filter(FilterKind::Lowercase),
        );
        AnalyzerRegistry::new(&configs)
    }

    #[test]
    fn resolution_order() {
        let r = registry();
        assert_eq!(r.resolve_key("sku"), Some("sku"));
        assert_eq!(r.resolve_key("sku.vendor"), Some("sku"));
        assert_eq!(r.resolve_key("name"), Some("*"));
        assert_eq!(r.resolve_key("_all"), Some("*"));
        assert_eq!(r.resolve("sku").terms("AB-12 cd"), vec!["AB-12", "cd"]);
        assert_eq!(r.resolve("name").terms("AB-12 cd"), vec!["ab", "cd"]);
    }

    #[test]
    fn empty_registry_uses_standard() {
        let r = AnalyzerRegistry::default();
        assert!(r.is_empty());
        assert_eq!(r.resolve_key("anything"), None);
        assert_eq!(r.resolve("anything").terms("Hello World"), vec!["hello", "world"]);
    }

    #[test]
    fn field_keys_skip_special_entries() {
        let mut configs = AnalyzerConfigMap::new();
        configs.insert("b".to_string(), AnalyzerConfig::default());
        configs.insert("a".to_string(), AnalyzerConfig::default());
        configs.insert("*".to_string(), AnalyzerConfig::default());
        configs.insert("_all".to_string(), AnalyzerConfig::default());
        let r = AnalyzerRegistry::new(&configs);
        assert_eq!(r.field_keys().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn root_key_of_flattened_names() {
        assert_eq!(root_key("meta.color"), "meta");
        assert_eq!(root_key("tags.[0]"), "tags");
        assert_eq!(root_key("plain"), "plain");
    }
}
