//! OWL 2 functional-syntax backend

use std::fmt::Display;

use crate::ids::{ItemId, PropertyId};
use crate::model::{Constraint, ConstraintKind, ConstraintTag, Decimal, Relation};

use super::{Backend, RenderConfig, RenderError};

const OWL_NAMESPACE: &str = "http://www.w3.org/2002/07/owl#";
const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema#";

/// Renders one OWL axiom per constraint, one per line
#[derive(Debug, Clone)]
pub struct FunctionalSyntax {
    prefix: String,
    entity_namespace: String,
    prelude: bool,
}

impl Default for FunctionalSyntax {
    fn default() -> Self {
        Self::new(&RenderConfig::default())
    }
}

impl FunctionalSyntax {
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            prefix: config.prefix.clone(),
            entity_namespace: config.entity_namespace.clone(),
            prelude: config.prelude,
        }
    }

    fn entity(&self, id: impl Display) -> String {
        format!("{}:{}", self.prefix, id)
    }

    /// `ObjectSomeValuesFrom(p owl:Thing)`: things having some value for `p`
    fn has_some(&self, property: &PropertyId) -> String {
        format!("ObjectSomeValuesFrom({} owl:Thing)", self.entity(property))
    }

    /// Things that are values of `p`
    fn value_of(&self, property: &PropertyId) -> String {
        format!(
            "ObjectSomeValuesFrom(ObjectInverseOf({}) owl:Thing)",
            self.entity(property)
        )
    }

    fn has_value(&self, property: &PropertyId, item: &ItemId) -> String {
        format!(
            "ObjectHasValue({} {})",
            self.entity(property),
            self.entity(item)
        )
    }

    fn one_of(&self, items: &[ItemId]) -> String {
        let items: Vec<String> = items.iter().map(|i| self.entity(i)).collect();
        format!("ObjectOneOf({})", items.join(" "))
    }

    /// Class of things carrying `required`, with value `item` if given
    fn carries(&self, required: &PropertyId, item: Option<&ItemId>) -> String {
        match item {
            Some(item) => self.has_value(required, item),
            None => self.has_some(required),
        }
    }

    fn decimal_range(&self, min: &Decimal, max: &Decimal) -> String {
        format!(
            "DatatypeRestriction(xsd:decimal xsd:minInclusive \"{}\"^^xsd:decimal xsd:maxInclusive \"{}\"^^xsd:decimal)",
            min, max
        )
    }

    /// Axiom for a class constraint on subjects (`subject`) under `relation`
    fn class_axiom(&self, subject: String, class: &ItemId, relation: Relation) -> String {
        format!(
            "SubClassOf({} {})",
            subject,
            self.has_value(&relation.property(), class)
        )
    }

    fn axiom(&self, constraint: &Constraint) -> Result<String, RenderError> {
        let p = &constraint.property;
        let axiom = match &constraint.kind {
            ConstraintKind::Type {
                class,
                relation: Relation::Instance,
            } => format!("ObjectPropertyDomain({} {})", self.entity(p), self.entity(class)),
            ConstraintKind::Type { class, relation } => {
                self.class_axiom(self.has_some(p), class, *relation)
            }
            ConstraintKind::ValueType {
                class,
                relation: Relation::Instance,
            } => format!("ObjectPropertyRange({} {})", self.entity(p), self.entity(class)),
            ConstraintKind::ValueType { class, relation } => {
                self.class_axiom(self.value_of(p), class, *relation)
            }
            ConstraintKind::SingleValue => format!("FunctionalObjectProperty({})", self.entity(p)),
            ConstraintKind::UniqueValue => {
                format!("InverseFunctionalObjectProperty({})", self.entity(p))
            }
            ConstraintKind::Symmetric => format!("SymmetricObjectProperty({})", self.entity(p)),
            ConstraintKind::Inverse { inverse } => format!(
                "InverseObjectProperties({} {})",
                self.entity(p),
                self.entity(inverse)
            ),
            ConstraintKind::Format { pattern } => format!(
                "DataPropertyRange({} DatatypeRestriction(xsd:string xsd:pattern \"{}\"))",
                self.entity(p),
                escape_literal(pattern)
            ),
            ConstraintKind::OneOf { values } => format!(
                "ObjectPropertyRange({} {})",
                self.entity(p),
                self.one_of(values)
            ),
            ConstraintKind::Range { min, max } => format!(
                "DataPropertyRange({} {})",
                self.entity(p),
                self.decimal_range(min, max)
            ),
            ConstraintKind::TargetRequiredClaim { required, item } => format!(
                "SubClassOf({} {})",
                self.value_of(p),
                self.carries(required, item.as_ref())
            ),
            ConstraintKind::Item {
                required,
                item,
                exceptions,
            } => {
                let subject = if exceptions.is_empty() {
                    self.has_some(p)
                } else {
                    format!(
                        "ObjectIntersectionOf({} ObjectComplementOf({}))",
                        self.has_some(p),
                        self.one_of(exceptions)
                    )
                };
                format!(
                    "SubClassOf({} {})",
                    subject,
                    self.carries(required, item.as_ref())
                )
            }
            ConstraintKind::ConflictsWith {
                conflicting,
                values,
            } => {
                let other = if values.is_empty() {
                    self.has_some(conflicting)
                } else {
                    format!(
                        "ObjectSomeValuesFrom({} {})",
                        self.entity(conflicting),
                        self.one_of(values)
                    )
                };
                format!("DisjointClasses({} {})", self.has_some(p), other)
            }
            ConstraintKind::MultiValue
            | ConstraintKind::ExistingFile
            | ConstraintKind::DiffWithinRange { .. }
            | ConstraintKind::Qualifiers { .. } => {
                return Err(RenderError::unsupported(constraint.tag(), self.name()))
            }
        };
        Ok(axiom)
    }
}

/// Escape a quoted literal, keeping the axiom on one line
fn escape_literal(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            c => escaped.push(c),
        }
    }
    escaped
}

impl Backend for FunctionalSyntax {
    fn name(&self) -> &'static str {
        "functional"
    }

    fn supports(&self, tag: ConstraintTag) -> bool {
        !matches!(
            tag,
            ConstraintTag::MultiValue
                | ConstraintTag::ExistingFile
                | ConstraintTag::DiffWithinRange
                | ConstraintTag::Qualifiers
        )
    }

    fn prelude(&self) -> Option<String> {
        if !self.prelude {
            return None;
        }
        Some(format!(
            "Prefix({}:=<{}>)\nPrefix(owl:=<{}>)\nPrefix(xsd:=<{}>)\n",
            self.prefix, self.entity_namespace, OWL_NAMESPACE, XSD_NAMESPACE
        ))
    }

    fn format(&self, constraint: &Constraint, _ordinal: usize, out: &mut String) -> Result<(), RenderError> {
        let axiom = self.axiom(constraint)?;
        out.push_str(&axiom);
        out.push('\n');
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> PropertyId {
        PropertyId::new(s).unwrap()
    }

    fn q(s: &str) -> ItemId {
        ItemId::new(s).unwrap()
    }

    fn render(property: &str, kind: ConstraintKind) -> String {
        let mut out = String::new();
        FunctionalSyntax::default()
            .format(&Constraint::new(p(property), kind), 1, &mut out)
            .expect("Should render");
        out
    }

    #[test]
    fn test_type_instance() {
        let out = render(
            "P30",
            ConstraintKind::Type {
                class: q("Q2221906"),
                relation: Relation::Instance,
            },
        );
        insta::assert_snapshot!(out.trim_end(), @"ObjectPropertyDomain(wd:P30 wd:Q2221906)");
    }

    #[test]
    fn test_type_subclass() {
        let out = render(
            "P128",
            ConstraintKind::Type {
                class: q("Q8054"),
                relation: Relation::Subclass,
            },
        );
        insta::assert_snapshot!(out.trim_end(), @"SubClassOf(ObjectSomeValuesFrom(wd:P128 owl:Thing) ObjectHasValue(wd:P279 wd:Q8054))");
    }

    #[test]
    fn test_value_type() {
        let out = render(
            "P40",
            ConstraintKind::ValueType {
                class: q("Q5"),
                relation: Relation::Instance,
            },
        );
        assert_eq!(out, "ObjectPropertyRange(wd:P40 wd:Q5)\n");

        let out = render(
            "P171",
            ConstraintKind::ValueType {
                class: q("Q16521"),
                relation: Relation::Subclass,
            },
        );
        assert_eq!(
            out,
            "SubClassOf(ObjectSomeValuesFrom(ObjectInverseOf(wd:P171) owl:Thing) ObjectHasValue(wd:P279 wd:Q16521))\n"
        );
    }

    #[test]
    fn test_unique_value() {
        let out = render("P78", ConstraintKind::UniqueValue);
        insta::assert_snapshot!(out.trim_end(), @"InverseFunctionalObjectProperty(wd:P78)");
    }

    #[test]
    fn test_format_escapes_pattern() {
        let out = render(
            "P214",
            ConstraintKind::Format {
                pattern: "[1-9]\\d{0,21}\"".to_string(),
            },
        );
        assert_eq!(
            out,
            "DataPropertyRange(wd:P214 DatatypeRestriction(xsd:string xsd:pattern \"[1-9]\\\\d{0,21}\\\"\"))\n"
        );
    }

    #[test]
    fn test_format_pattern_with_newline_stays_on_one_line() {
        let out = render(
            "P1",
            ConstraintKind::Format {
                pattern: "a\nb\r".to_string(),
            },
        );
        assert_eq!(out.lines().count(), 1);
        assert_eq!(
            out,
            "DataPropertyRange(wd:P1 DatatypeRestriction(xsd:string xsd:pattern \"a\\nb\\r\"))\n"
        );
    }

    #[test]
    fn test_one_of() {
        let out = render(
            "P21",
            ConstraintKind::OneOf {
                values: vec![q("Q6581097"), q("Q6581072")],
            },
        );
        insta::assert_snapshot!(out.trim_end(), @"ObjectPropertyRange(wd:P21 ObjectOneOf(wd:Q6581097 wd:Q6581072))");
    }

    #[test]
    fn test_range() {
        let out = render(
            "P1087",
            ConstraintKind::Range {
                min: Decimal::parse("-10.5").unwrap(),
                max: Decimal::parse("100").unwrap(),
            },
        );
        assert_eq!(
            out,
            "DataPropertyRange(wd:P1087 DatatypeRestriction(xsd:decimal xsd:minInclusive \"-10.5\"^^xsd:decimal xsd:maxInclusive \"100\"^^xsd:decimal))\n"
        );
    }

    #[test]
    fn test_item_with_exceptions() {
        let out = render(
            "P569",
            ConstraintKind::Item {
                required: p("P31"),
                item: Some(q("Q5")),
                exceptions: vec![q("Q1"), q("Q2")],
            },
        );
        assert_eq!(
            out,
            "SubClassOf(ObjectIntersectionOf(ObjectSomeValuesFrom(wd:P569 owl:Thing) ObjectComplementOf(ObjectOneOf(wd:Q1 wd:Q2))) ObjectHasValue(wd:P31 wd:Q5))\n"
        );
    }

    #[test]
    fn test_target_required_claim() {
        let out = render(
            "P22",
            ConstraintKind::TargetRequiredClaim {
                required: p("P21"),
                item: None,
            },
        );
        assert_eq!(
            out,
            "SubClassOf(ObjectSomeValuesFrom(ObjectInverseOf(wd:P22) owl:Thing) ObjectSomeValuesFrom(wd:P21 owl:Thing))\n"
        );
    }

    #[test]
    fn test_conflicts_with() {
        let out = render(
            "P570",
            ConstraintKind::ConflictsWith {
                conflicting: p("P31"),
                values: vec![q("Q4167410")],
            },
        );
        assert_eq!(
            out,
            "DisjointClasses(ObjectSomeValuesFrom(wd:P570 owl:Thing) ObjectSomeValuesFrom(wd:P31 ObjectOneOf(wd:Q4167410)))\n"
        );
    }

    #[test]
    fn test_custom_prefix() {
        let backend = FunctionalSyntax::new(&RenderConfig::new().with_prefix("ex"));
        let mut out = String::new();
        backend
            .format(&Constraint::new(p("P1"), ConstraintKind::Symmetric), 1, &mut out)
            .unwrap();
        assert_eq!(out, "SymmetricObjectProperty(ex:P1)\n");
    }

    #[test]
    fn test_supports_matches_format() {
        let backend = FunctionalSyntax::default();
        let kinds = [
            ConstraintKind::MultiValue,
            ConstraintKind::ExistingFile,
            ConstraintKind::Qualifiers { allowed: vec![] },
            ConstraintKind::DiffWithinRange {
                base: p("P569"),
                min: Decimal::parse("0").unwrap(),
                max: Decimal::parse("1").unwrap(),
            },
            ConstraintKind::SingleValue,
            ConstraintKind::Inverse { inverse: p("P40") },
        ];
        for kind in kinds {
            let constraint = Constraint::new(p("P1"), kind);
            let mut out = String::new();
            let result = backend.format(&constraint, 1, &mut out);
            assert_eq!(result.is_ok(), backend.supports(constraint.tag()));
        }
    }

    #[test]
    fn test_prelude() {
        let backend = FunctionalSyntax::new(&RenderConfig::new().with_prelude(true));
        let prelude = backend.prelude().unwrap();
        assert!(prelude.starts_with("Prefix(wd:=<http://www.wikidata.org/entity/>)\n"));
        assert!(FunctionalSyntax::default().prelude().is_none());
    }
}
