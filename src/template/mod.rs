//! Parser for constraint declarations
//!
//! A declaration is a single wiki template such as
//!
//! ```text
//! {{Constraint:Type|class=Q5|relation=instance}}
//! ```
//!
//! The parser knows nothing about constraint kinds: it produces a generic
//! [`Template`] (name, positional and named parameters) that the builders in
//! [`crate::builder`] interpret.
//!
//! # Example
//!
//! ```rust
//! use property_constraints::template::parse;
//!
//! let t = parse("{{Constraint:Type|class=Q5|relation=instance}}").unwrap();
//! assert_eq!(t.name(), "Constraint:Type");
//! assert_eq!(t.get("class"), Some("Q5"));
//! ```

pub mod ast;
mod grammar;
pub mod lexer;
pub mod scan;

pub use ast::{NamedParams, Template};
pub use grammar::parse;
