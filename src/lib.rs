//! Property Constraints - compile wiki constraint templates into formal axioms
//!
//! This library provides a template parser, a registry of constraint builders
//! and renderers for OWL functional syntax and N-Triples.
//!
//! # Example
//!
//! ```rust
//! use property_constraints::compile;
//! use property_constraints::ids::PropertyId;
//! use property_constraints::renderer::{FunctionalSyntax, Renderer};
//!
//! let property = PropertyId::new("P78").unwrap();
//! let constraint = compile(&property, "{{Constraint:Unique value}}").unwrap();
//!
//! let mut renderer = Renderer::new(Vec::new(), FunctionalSyntax::default());
//! renderer.render(Some(&constraint)).unwrap();
//! let out = String::from_utf8(renderer.finish().unwrap()).unwrap();
//! assert_eq!(out, "InverseFunctionalObjectProperty(wd:P78)\n");
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod ids;
pub mod model;
pub mod renderer;
pub mod template;

pub use builder::{BuildError, BuilderConfig, BuilderRegistry, UnknownParameterPolicy};
pub use config::{CompilerConfig, ConfigError};
pub use error::{CompileError, SyntaxError};
pub use ids::{ItemId, PropertyId};
pub use model::{Constraint, ConstraintKind, ConstraintTag};
pub use renderer::{render_all, RenderConfig, RenderError, RenderSummary, Renderer};
pub use template::{parse, Template};

use rayon::prelude::*;

/// Parses declarations and builds constraints with one registry
#[derive(Debug)]
pub struct Compiler {
    registry: BuilderRegistry,
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new(BuilderRegistry::standard())
    }
}

impl Compiler {
    pub fn new(registry: BuilderRegistry) -> Self {
        Self { registry }
    }

    /// A compiler with every standard constraint kind
    pub fn with_config(config: &CompilerConfig) -> Self {
        Self::new(BuilderRegistry::with_config(config.builder.clone()))
    }

    pub fn registry(&self) -> &BuilderRegistry {
        &self.registry
    }

    /// Parse one declaration and build the constraint it declares on `property`
    pub fn compile(&self, property: &PropertyId, declaration: &str) -> Result<Constraint, CompileError> {
        let template = parse(declaration)?;
        Ok(self.registry.build(property, &template)?)
    }

    /// Compile many declarations in parallel
    ///
    /// The output has one result per input, in input order.
    pub fn compile_all<D>(&self, declarations: &[(PropertyId, D)]) -> Vec<Result<Constraint, CompileError>>
    where
        D: AsRef<str> + Sync,
    {
        declarations
            .par_iter()
            .map(|(property, declaration)| self.compile(property, declaration.as_ref()))
            .collect()
    }
}

/// Compile one declaration with the standard registry
pub fn compile(property: &PropertyId, declaration: &str) -> Result<Constraint, CompileError> {
    Compiler::default().compile(property, declaration)
}
