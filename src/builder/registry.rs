//! Builder registry: template name → constraint builder

use std::collections::HashMap;

use serde::Deserialize;
use thiserror::Error;

use crate::ids::PropertyId;
use crate::model::{Constraint, ConstraintKind};
use crate::template::{parse, Template};

use super::kinds::STANDARD;
use super::params::Params;

/// Errors that can occur while lifting a template into a constraint
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// No builder registered under the template name
    #[error("unknown constraint kind: {name}")]
    UnknownConstraintKind { name: String },

    /// A mandatory parameter is absent
    #[error("missing parameter: {key}")]
    MissingParameter { key: String },

    /// A parameter is present but does not parse
    #[error("invalid value '{value}' for parameter {key}: {reason}")]
    InvalidParameterValue {
        key: String,
        value: String,
        reason: String,
    },

    /// An unrecognized parameter under [`UnknownParameterPolicy::Reject`]
    #[error("unexpected parameter: {key}")]
    UnexpectedParameter { key: String },
}

/// A builder turns template parameters into a constraint payload
pub type BuilderFn = fn(&mut Params<'_>) -> Result<ConstraintKind, BuildError>;

/// What to do with parameters a builder does not recognize
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownParameterPolicy {
    /// Drop them silently
    #[default]
    Ignore,
    /// Drop them with a warning
    Warn,
    /// Fail the build
    Reject,
}

/// Configuration for the builder registry
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    pub unknown_parameters: UnknownParameterPolicy,
}

impl BuilderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the policy for unrecognized parameters
    pub fn with_unknown_parameters(mut self, policy: UnknownParameterPolicy) -> Self {
        self.unknown_parameters = policy;
        self
    }
}

/// A registered builder
#[derive(Debug, Clone, Copy)]
struct BuilderEntry {
    build: BuilderFn,
    /// A declaration this builder accepts
    sample: &'static str,
}

/// Normalize a template name for lookup
///
/// Strips an optional `Constraint:` prefix, turns underscores into spaces,
/// collapses whitespace and upper-cases the first character, the way wiki
/// page titles are normalized.
pub fn normalize_name(name: &str) -> String {
    let spaced = name.replace('_', " ");
    let collapsed = spaced.split_whitespace().collect::<Vec<_>>().join(" ");

    let prefix = "constraint:";
    let bare = match collapsed.get(..prefix.len()) {
        Some(head) if head.eq_ignore_ascii_case(prefix) => collapsed[prefix.len()..].trim_start(),
        _ => collapsed.as_str(),
    };

    let mut chars = bare.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Registry of constraint builders keyed by normalized template name
#[derive(Debug, Default)]
pub struct BuilderRegistry {
    builders: HashMap<String, BuilderEntry>,
    config: BuilderConfig,
}

impl BuilderRegistry {
    /// Create an empty registry
    pub fn new(config: BuilderConfig) -> Self {
        Self {
            builders: HashMap::new(),
            config,
        }
    }

    /// A registry with every standard constraint kind and default configuration
    pub fn standard() -> Self {
        Self::with_config(BuilderConfig::default())
    }

    /// A registry with every standard constraint kind
    pub fn with_config(config: BuilderConfig) -> Self {
        let mut registry = Self::new(config);
        for builder in STANDARD {
            registry.register(builder.tag.template_name(), builder.sample, builder.build);
        }
        registry
    }

    /// Register a builder, replacing any builder with the same normalized name
    ///
    /// Returns true if an existing builder was replaced.
    pub fn register(&mut self, name: &str, sample: &'static str, build: BuilderFn) -> bool {
        self.builders
            .insert(normalize_name(name), BuilderEntry { build, sample })
            .is_some()
    }

    /// Check if a builder is registered for a template name
    pub fn contains(&self, name: &str) -> bool {
        self.builders.contains_key(&normalize_name(name))
    }

    /// All registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.builders.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// A template shape the named builder accepts
    pub fn accepted_shape(&self, name: &str) -> Option<Template> {
        let entry = self.builders.get(&normalize_name(name))?;
        parse(entry.sample).ok()
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// Build a constraint on `property` from `template`
    pub fn build(&self, property: &PropertyId, template: &Template) -> Result<Constraint, BuildError> {
        let entry = self
            .builders
            .get(&normalize_name(template.name()))
            .ok_or_else(|| BuildError::UnknownConstraintKind {
                name: template.name().to_string(),
            })?;

        let mut params = Params::new(property, template);
        let kind = (entry.build)(&mut params)?;

        let unrecognized = params.unrecognized();
        if !unrecognized.is_empty() {
            match self.config.unknown_parameters {
                UnknownParameterPolicy::Ignore => {
                    tracing::trace!(%property, template = template.name(), ?unrecognized, "ignoring parameters");
                }
                UnknownParameterPolicy::Warn => {
                    for key in &unrecognized {
                        tracing::warn!(%property, template = template.name(), key = %key, "unrecognized parameter");
                    }
                }
                UnknownParameterPolicy::Reject => {
                    return Err(BuildError::UnexpectedParameter {
                        key: unrecognized[0].clone(),
                    });
                }
            }
        }

        tracing::debug!(%property, kind = %kind.tag(), "built constraint");
        Ok(Constraint::new(property.clone(), kind))
    }
}
