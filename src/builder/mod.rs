//! Builders that lift generic templates into typed constraints
//!
//! Each constraint kind has one builder. The [`BuilderRegistry`] picks the
//! builder by template name and binds the result to the constrained property.
//!
//! # Example
//!
//! ```rust
//! use property_constraints::builder::BuilderRegistry;
//! use property_constraints::ids::PropertyId;
//! use property_constraints::template::parse;
//!
//! let registry = BuilderRegistry::standard();
//! let template = parse("{{Constraint:Single value}}").unwrap();
//! let property = PropertyId::new("P19").unwrap();
//! let constraint = registry.build(&property, &template).unwrap();
//! assert_eq!(constraint.property, property);
//! ```

mod kinds;
mod params;
mod registry;

pub use params::Params;
pub use registry::{
    normalize_name, BuildError, BuilderConfig, BuilderFn, BuilderRegistry, UnknownParameterPolicy,
};
