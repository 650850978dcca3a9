//! N-Triples backend
//!
//! Each constraint becomes a blank node `_:cN` attached to its property:
//!
//! ```text
//! <…/entity/P78> <…#constraint> _:c1 .
//! _:c1 <…rdf-syntax-ns#type> <…#UniqueValueConstraint> .
//! ```
//!
//! followed by one triple per payload field. `N` is the ordinal the driving
//! renderer assigns, so output of one renderer is deterministic; outputs of
//! several renderers must not be concatenated into one graph without
//! relabelling.

use std::fmt::Display;

use crate::model::{Constraint, ConstraintKind, ConstraintTag, Decimal};

use super::{Backend, RenderConfig, RenderError};

const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
const XSD_DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";

/// Renders constraints as N-Triples statements
#[derive(Debug, Clone)]
pub struct NTriples {
    entity_namespace: String,
    vocabulary_namespace: String,
}

impl Default for NTriples {
    fn default() -> Self {
        Self::new(&RenderConfig::default())
    }
}

/// Statements about one blank node
struct Statements<'a> {
    backend: &'a NTriples,
    node: String,
    out: &'a mut String,
}

impl Statements<'_> {
    fn push(&mut self, predicate: &str, object: String) {
        self.out.push_str(&format!(
            "{} <{}{}> {} .\n",
            self.node, self.backend.vocabulary_namespace, predicate, object
        ));
    }

    fn entity(&mut self, predicate: &str, id: impl Display) {
        let object = self.backend.entity(id);
        self.push(predicate, object);
    }

    fn entities<T: Display>(&mut self, predicate: &str, ids: &[T]) {
        for id in ids {
            self.entity(predicate, id);
        }
    }

    fn decimal(&mut self, predicate: &str, value: &Decimal) {
        self.push(predicate, format!("\"{}\"^^<{}>", value, XSD_DECIMAL));
    }
}

impl NTriples {
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            entity_namespace: config.entity_namespace.clone(),
            vocabulary_namespace: config.vocabulary_namespace.clone(),
        }
    }

    fn entity(&self, id: impl Display) -> String {
        format!("<{}{}>", self.entity_namespace, id)
    }
}

/// Escape a string literal per N-Triples `ECHAR`
fn escape_literal(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            c => escaped.push(c),
        }
    }
    escaped
}

impl Backend for NTriples {
    fn name(&self) -> &'static str {
        "ntriples"
    }

    fn supports(&self, _tag: ConstraintTag) -> bool {
        true
    }

    fn format(&self, constraint: &Constraint, ordinal: usize, out: &mut String) -> Result<(), RenderError> {
        let node = format!("_:c{}", ordinal);
        out.push_str(&format!(
            "{} <{}constraint> {} .\n",
            self.entity(&constraint.property),
            self.vocabulary_namespace,
            node
        ));
        out.push_str(&format!(
            "{} <{}> <{}{}Constraint> .\n",
            node,
            RDF_TYPE,
            self.vocabulary_namespace,
            constraint.tag().camel_name()
        ));

        let mut s = Statements {
            backend: self,
            node,
            out,
        };
        match &constraint.kind {
            ConstraintKind::Type { class, relation } | ConstraintKind::ValueType { class, relation } => {
                s.entity("class", class);
                s.entity("relation", relation.property());
            }
            ConstraintKind::SingleValue
            | ConstraintKind::UniqueValue
            | ConstraintKind::MultiValue
            | ConstraintKind::Symmetric
            | ConstraintKind::ExistingFile => {}
            ConstraintKind::Inverse { inverse } => s.entity("inverseProperty", inverse),
            ConstraintKind::Format { pattern } => {
                s.push("pattern", format!("\"{}\"", escape_literal(pattern)))
            }
            ConstraintKind::OneOf { values } => s.entities("value", values),
            ConstraintKind::Range { min, max } => {
                s.decimal("min", min);
                s.decimal("max", max);
            }
            ConstraintKind::DiffWithinRange { base, min, max } => {
                s.entity("baseProperty", base);
                s.decimal("min", min);
                s.decimal("max", max);
            }
            ConstraintKind::TargetRequiredClaim { required, item } => {
                s.entity("requiredProperty", required);
                if let Some(item) = item {
                    s.entity("item", item);
                }
            }
            ConstraintKind::Item {
                required,
                item,
                exceptions,
            } => {
                s.entity("requiredProperty", required);
                if let Some(item) = item {
                    s.entity("item", item);
                }
                s.entities("exception", exceptions);
            }
            ConstraintKind::ConflictsWith {
                conflicting,
                values,
            } => {
                s.entity("conflictingProperty", conflicting);
                s.entities("value", values);
            }
            ConstraintKind::Qualifiers { allowed } => s.entities("allowedQualifier", allowed),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{ItemId, PropertyId};
    use crate::model::Relation;
    use pretty_assertions::assert_eq;

    fn p(s: &str) -> PropertyId {
        PropertyId::new(s).unwrap()
    }

    fn q(s: &str) -> ItemId {
        ItemId::new(s).unwrap()
    }

    fn render(property: &str, kind: ConstraintKind, ordinal: usize) -> String {
        let mut out = String::new();
        NTriples::default()
            .format(&Constraint::new(p(property), kind), ordinal, &mut out)
            .expect("Should render");
        out
    }

    #[test]
    fn test_unique_value() {
        let out = render("P78", ConstraintKind::UniqueValue, 1);
        assert_eq!(
            out,
            "<http://www.wikidata.org/entity/P78> <http://www.wikidata.org/constraints/v1#constraint> _:c1 .\n\
             _:c1 <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://www.wikidata.org/constraints/v1#UniqueValueConstraint> .\n"
        );
    }

    #[test]
    fn test_type_fields() {
        let out = render(
            "P30",
            ConstraintKind::Type {
                class: q("Q2221906"),
                relation: Relation::Instance,
            },
            3,
        );
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[2],
            "_:c3 <http://www.wikidata.org/constraints/v1#class> <http://www.wikidata.org/entity/Q2221906> ."
        );
        assert_eq!(
            lines[3],
            "_:c3 <http://www.wikidata.org/constraints/v1#relation> <http://www.wikidata.org/entity/P31> ."
        );
    }

    #[test]
    fn test_range_literals() {
        let out = render(
            "P2067",
            ConstraintKind::Range {
                min: Decimal::parse("0").unwrap(),
                max: Decimal::parse("1.5").unwrap(),
            },
            1,
        );
        assert!(out.contains(
            "_:c1 <http://www.wikidata.org/constraints/v1#max> \"1.5\"^^<http://www.w3.org/2001/XMLSchema#decimal> ."
        ));
    }

    #[test]
    fn test_pattern_escaped() {
        let out = render(
            "P214",
            ConstraintKind::Format {
                pattern: "a\"b\\d\tc".to_string(),
            },
            1,
        );
        assert!(out.ends_with(
            "_:c1 <http://www.wikidata.org/constraints/v1#pattern> \"a\\\"b\\\\d\\tc\" .\n"
        ));
    }

    #[test]
    fn test_every_value_gets_a_triple() {
        let out = render(
            "P21",
            ConstraintKind::OneOf {
                values: vec![q("Q1"), q("Q2"), q("Q3")],
            },
            1,
        );
        assert_eq!(out.matches("#value>").count(), 3);
    }

    #[test]
    fn test_empty_qualifier_list() {
        let out = render("P31", ConstraintKind::Qualifiers { allowed: vec![] }, 1);
        assert_eq!(out.lines().count(), 2);
        assert!(out.contains("#QualifiersConstraint>"));
    }

    #[test]
    fn test_custom_vocabulary() {
        let config = RenderConfig::new()
            .with_entity_namespace("http://example.org/e/")
            .with_vocabulary_namespace("http://example.org/v#");
        let mut out = String::new();
        NTriples::new(&config)
            .format(&Constraint::new(p("P1"), ConstraintKind::Symmetric), 7, &mut out)
            .unwrap();
        insta::assert_snapshot!(out.lines().next().unwrap(), @"<http://example.org/e/P1> <http://example.org/v#constraint> _:c7 .");
    }
}
