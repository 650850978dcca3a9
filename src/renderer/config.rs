//! Configuration for constraint rendering

use serde::Deserialize;

/// Namespace of entity IRIs
pub const DEFAULT_ENTITY_NAMESPACE: &str = "http://www.wikidata.org/entity/";

/// Versioned namespace of the constraint vocabulary
pub const DEFAULT_VOCABULARY_NAMESPACE: &str = "http://www.wikidata.org/constraints/v1#";

/// Configuration options shared by the output backends
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Prefix abbreviating entity IRIs in functional syntax (`wd` → `wd:P31`)
    pub prefix: String,

    /// Namespace entity IRIs are built from
    pub entity_namespace: String,

    /// Namespace of constraint classes and predicates in N-Triples
    pub vocabulary_namespace: String,

    /// Whether to write prefix declarations before the first axiom
    pub prelude: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            prefix: "wd".to_string(),
            entity_namespace: DEFAULT_ENTITY_NAMESPACE.to_string(),
            vocabulary_namespace: DEFAULT_VOCABULARY_NAMESPACE.to_string(),
            prelude: false,
        }
    }
}

impl RenderConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the entity prefix
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Set the entity namespace
    pub fn with_entity_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.entity_namespace = namespace.into();
        self
    }

    /// Set the vocabulary namespace
    pub fn with_vocabulary_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.vocabulary_namespace = namespace.into();
        self
    }

    /// Set whether to write a prelude
    pub fn with_prelude(mut self, prelude: bool) -> Self {
        self.prelude = prelude;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RenderConfig::default();
        assert_eq!(config.prefix, "wd");
        assert_eq!(config.entity_namespace, DEFAULT_ENTITY_NAMESPACE);
        assert_eq!(config.vocabulary_namespace, DEFAULT_VOCABULARY_NAMESPACE);
        assert!(!config.prelude);
    }

    #[test]
    fn test_builder_pattern() {
        let config = RenderConfig::new()
            .with_prefix("ex")
            .with_entity_namespace("http://example.org/")
            .with_vocabulary_namespace("http://example.org/vocab#")
            .with_prelude(true);

        assert_eq!(config.prefix, "ex");
        assert_eq!(config.entity_namespace, "http://example.org/");
        assert_eq!(config.vocabulary_namespace, "http://example.org/vocab#");
        assert!(config.prelude);
    }

    #[test]
    fn test_partial_toml() {
        let config: RenderConfig = toml::from_str("prelude = true").unwrap();
        assert!(config.prelude);
        assert_eq!(config.prefix, "wd");
    }
}
