//! Typed constraint model
//!
//! A [`Constraint`] binds one [`ConstraintKind`] to the property it
//! constrains. Each kind carries exactly the fields it needs, so two
//! constraints compare equal only when kind and payload both match.

mod decimal;

use std::fmt;

pub use decimal::{Decimal, DecimalError};

use crate::ids::{ItemId, PropertyId};

/// How a subject must relate to a class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    /// instance of (P31)
    Instance,
    /// subclass of (P279)
    Subclass,
}

impl Relation {
    /// Parse the `relation=` parameter value
    pub fn from_keyword(s: &str) -> Option<Self> {
        match s {
            "instance" => Some(Relation::Instance),
            "subclass" => Some(Relation::Subclass),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Relation::Instance => "instance",
            Relation::Subclass => "subclass",
        }
    }

    /// The property expressing this relation
    pub fn property(self) -> PropertyId {
        match self {
            Relation::Instance => PropertyId::instance_of(),
            Relation::Subclass => PropertyId::subclass_of(),
        }
    }
}

/// Discriminant of [`ConstraintKind`], without payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConstraintTag {
    Type,
    ValueType,
    SingleValue,
    UniqueValue,
    MultiValue,
    Symmetric,
    ExistingFile,
    Inverse,
    Format,
    OneOf,
    Range,
    DiffWithinRange,
    TargetRequiredClaim,
    Item,
    ConflictsWith,
    Qualifiers,
}

impl ConstraintTag {
    pub const ALL: [ConstraintTag; 16] = [
        ConstraintTag::Type,
        ConstraintTag::ValueType,
        ConstraintTag::SingleValue,
        ConstraintTag::UniqueValue,
        ConstraintTag::MultiValue,
        ConstraintTag::Symmetric,
        ConstraintTag::ExistingFile,
        ConstraintTag::Inverse,
        ConstraintTag::Format,
        ConstraintTag::OneOf,
        ConstraintTag::Range,
        ConstraintTag::DiffWithinRange,
        ConstraintTag::TargetRequiredClaim,
        ConstraintTag::Item,
        ConstraintTag::ConflictsWith,
        ConstraintTag::Qualifiers,
    ];

    /// Template name under which declarations of this kind are written
    pub fn template_name(self) -> &'static str {
        match self {
            ConstraintTag::Type => "Type",
            ConstraintTag::ValueType => "Value type",
            ConstraintTag::SingleValue => "Single value",
            ConstraintTag::UniqueValue => "Unique value",
            ConstraintTag::MultiValue => "Multi value",
            ConstraintTag::Symmetric => "Symmetric",
            ConstraintTag::ExistingFile => "Existing file",
            ConstraintTag::Inverse => "Inverse",
            ConstraintTag::Format => "Format",
            ConstraintTag::OneOf => "One of",
            ConstraintTag::Range => "Range",
            ConstraintTag::DiffWithinRange => "Diff within range",
            ConstraintTag::TargetRequiredClaim => "Target required claim",
            ConstraintTag::Item => "Item",
            ConstraintTag::ConflictsWith => "Conflicts with",
            ConstraintTag::Qualifiers => "Qualifiers",
        }
    }

    /// UpperCamelCase name, used for vocabulary terms
    pub fn camel_name(self) -> &'static str {
        match self {
            ConstraintTag::Type => "Type",
            ConstraintTag::ValueType => "ValueType",
            ConstraintTag::SingleValue => "SingleValue",
            ConstraintTag::UniqueValue => "UniqueValue",
            ConstraintTag::MultiValue => "MultiValue",
            ConstraintTag::Symmetric => "Symmetric",
            ConstraintTag::ExistingFile => "ExistingFile",
            ConstraintTag::Inverse => "Inverse",
            ConstraintTag::Format => "Format",
            ConstraintTag::OneOf => "OneOf",
            ConstraintTag::Range => "Range",
            ConstraintTag::DiffWithinRange => "DiffWithinRange",
            ConstraintTag::TargetRequiredClaim => "TargetRequiredClaim",
            ConstraintTag::Item => "Item",
            ConstraintTag::ConflictsWith => "ConflictsWith",
            ConstraintTag::Qualifiers => "Qualifiers",
        }
    }
}

impl fmt::Display for ConstraintTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.template_name())
    }
}

/// Payload of a constraint, one variant per supported kind
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConstraintKind {
    /// Subjects using the property must be instances/subclasses of `class`
    Type { class: ItemId, relation: Relation },
    /// Values of the property must be instances/subclasses of `class`
    ValueType { class: ItemId, relation: Relation },
    SingleValue,
    UniqueValue,
    MultiValue,
    Symmetric,
    /// Values name files that must exist on the media repository
    ExistingFile,
    Inverse { inverse: PropertyId },
    /// Values must match `pattern` (a regular expression)
    Format { pattern: String },
    OneOf { values: Vec<ItemId> },
    Range { min: Decimal, max: Decimal },
    /// Value minus the value of `base` must lie within `[min, max]`
    DiffWithinRange {
        base: PropertyId,
        min: Decimal,
        max: Decimal,
    },
    /// Value items must carry `required`, optionally with value `item`
    TargetRequiredClaim {
        required: PropertyId,
        item: Option<ItemId>,
    },
    /// Subjects must also carry `required`, optionally with value `item`
    Item {
        required: PropertyId,
        item: Option<ItemId>,
        exceptions: Vec<ItemId>,
    },
    /// Subjects must not carry `conflicting` (with one of `values`, if given)
    ConflictsWith {
        conflicting: PropertyId,
        values: Vec<ItemId>,
    },
    /// Only the listed qualifiers may be used
    Qualifiers { allowed: Vec<PropertyId> },
}

impl ConstraintKind {
    pub fn tag(&self) -> ConstraintTag {
        match self {
            ConstraintKind::Type { .. } => ConstraintTag::Type,
            ConstraintKind::ValueType { .. } => ConstraintTag::ValueType,
            ConstraintKind::SingleValue => ConstraintTag::SingleValue,
            ConstraintKind::UniqueValue => ConstraintTag::UniqueValue,
            ConstraintKind::MultiValue => ConstraintTag::MultiValue,
            ConstraintKind::Symmetric => ConstraintTag::Symmetric,
            ConstraintKind::ExistingFile => ConstraintTag::ExistingFile,
            ConstraintKind::Inverse { .. } => ConstraintTag::Inverse,
            ConstraintKind::Format { .. } => ConstraintTag::Format,
            ConstraintKind::OneOf { .. } => ConstraintTag::OneOf,
            ConstraintKind::Range { .. } => ConstraintTag::Range,
            ConstraintKind::DiffWithinRange { .. } => ConstraintTag::DiffWithinRange,
            ConstraintKind::TargetRequiredClaim { .. } => ConstraintTag::TargetRequiredClaim,
            ConstraintKind::Item { .. } => ConstraintTag::Item,
            ConstraintKind::ConflictsWith { .. } => ConstraintTag::ConflictsWith,
            ConstraintKind::Qualifiers { .. } => ConstraintTag::Qualifiers,
        }
    }
}

/// A constraint on one property
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Constraint {
    pub property: PropertyId,
    pub kind: ConstraintKind,
}

impl Constraint {
    pub fn new(property: PropertyId, kind: ConstraintKind) -> Self {
        Self { property, kind }
    }

    pub fn tag(&self) -> ConstraintTag {
        self.kind.tag()
    }
}
