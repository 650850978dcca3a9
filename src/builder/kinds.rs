//! Builders for the standard constraint kinds

use crate::model::{ConstraintKind, ConstraintTag, Decimal};

use super::params::Params;
use super::{BuildError, BuilderFn};

/// A standard builder with a declaration it accepts
pub(crate) struct StandardBuilder {
    pub tag: ConstraintTag,
    pub sample: &'static str,
    pub build: BuilderFn,
}

pub(crate) const STANDARD: &[StandardBuilder] = &[
    StandardBuilder {
        tag: ConstraintTag::Type,
        sample: "{{Constraint:Type|class=Q5|relation=instance}}",
        build: type_constraint,
    },
    StandardBuilder {
        tag: ConstraintTag::ValueType,
        sample: "{{Constraint:Value type|class=Q5|relation=instance}}",
        build: value_type,
    },
    StandardBuilder {
        tag: ConstraintTag::SingleValue,
        sample: "{{Constraint:Single value}}",
        build: single_value,
    },
    StandardBuilder {
        tag: ConstraintTag::UniqueValue,
        sample: "{{Constraint:Unique value}}",
        build: unique_value,
    },
    StandardBuilder {
        tag: ConstraintTag::MultiValue,
        sample: "{{Constraint:Multi value}}",
        build: multi_value,
    },
    StandardBuilder {
        tag: ConstraintTag::Symmetric,
        sample: "{{Constraint:Symmetric}}",
        build: symmetric,
    },
    StandardBuilder {
        tag: ConstraintTag::ExistingFile,
        sample: "{{Constraint:Existing file}}",
        build: existing_file,
    },
    StandardBuilder {
        tag: ConstraintTag::Inverse,
        sample: "{{Constraint:Inverse|property=P40}}",
        build: inverse,
    },
    StandardBuilder {
        tag: ConstraintTag::Format,
        sample: "{{Constraint:Format|pattern=[1-9]\\d*}}",
        build: format,
    },
    StandardBuilder {
        tag: ConstraintTag::OneOf,
        sample: "{{Constraint:One of|values=Q6581097, Q6581072}}",
        build: one_of,
    },
    StandardBuilder {
        tag: ConstraintTag::Range,
        sample: "{{Constraint:Range|min=0|max=100}}",
        build: range,
    },
    StandardBuilder {
        tag: ConstraintTag::DiffWithinRange,
        sample: "{{Constraint:Diff within range|base_property=P569|min=0|max=150}}",
        build: diff_within_range,
    },
    StandardBuilder {
        tag: ConstraintTag::TargetRequiredClaim,
        sample: "{{Constraint:Target required claim|property=P31}}",
        build: target_required_claim,
    },
    StandardBuilder {
        tag: ConstraintTag::Item,
        sample: "{{Constraint:Item|property=P31|item=Q5}}",
        build: item,
    },
    StandardBuilder {
        tag: ConstraintTag::ConflictsWith,
        sample: "{{Constraint:Conflicts with|property=P31|item=Q4167410}}",
        build: conflicts_with,
    },
    StandardBuilder {
        tag: ConstraintTag::Qualifiers,
        sample: "{{Constraint:Qualifiers|list=P580, P582}}",
        build: qualifiers,
    },
];

/// `class` (item) and `relation` (`instance` | `subclass`), both mandatory
fn type_constraint(params: &mut Params<'_>) -> Result<ConstraintKind, BuildError> {
    let class = params.item("class")?;
    let relation = params.relation("relation")?;
    Ok(ConstraintKind::Type { class, relation })
}

fn value_type(params: &mut Params<'_>) -> Result<ConstraintKind, BuildError> {
    let class = params.item("class")?;
    let relation = params.relation("relation")?;
    Ok(ConstraintKind::ValueType { class, relation })
}

fn single_value(_: &mut Params<'_>) -> Result<ConstraintKind, BuildError> {
    Ok(ConstraintKind::SingleValue)
}

fn unique_value(_: &mut Params<'_>) -> Result<ConstraintKind, BuildError> {
    Ok(ConstraintKind::UniqueValue)
}

fn multi_value(_: &mut Params<'_>) -> Result<ConstraintKind, BuildError> {
    Ok(ConstraintKind::MultiValue)
}

fn symmetric(_: &mut Params<'_>) -> Result<ConstraintKind, BuildError> {
    Ok(ConstraintKind::Symmetric)
}

fn existing_file(_: &mut Params<'_>) -> Result<ConstraintKind, BuildError> {
    Ok(ConstraintKind::ExistingFile)
}

fn inverse(params: &mut Params<'_>) -> Result<ConstraintKind, BuildError> {
    let inverse = params.property_id("property")?;
    Ok(ConstraintKind::Inverse { inverse })
}

/// The pattern must compile as a regular expression
fn format(params: &mut Params<'_>) -> Result<ConstraintKind, BuildError> {
    let pattern = params.parse_required("pattern", |raw| {
        let pattern = raw.trim();
        regex::Regex::new(pattern)
            .map(|_| pattern.to_string())
            .map_err(|e| match e {
                regex::Error::Syntax(msg) => msg.lines().last().unwrap_or_default().to_string(),
                other => other.to_string(),
            })
    })?;
    Ok(ConstraintKind::Format { pattern })
}

fn one_of(params: &mut Params<'_>) -> Result<ConstraintKind, BuildError> {
    let values = params.items("values")?;
    Ok(ConstraintKind::OneOf { values })
}

/// `min` and `max`, both mandatory, with `min <= max`
fn bounds(params: &mut Params<'_>) -> Result<(Decimal, Decimal), BuildError> {
    let min = params.decimal("min")?;
    let max = params.decimal("max")?;
    if min > max {
        return Err(BuildError::InvalidParameterValue {
            key: "max".to_string(),
            value: max.to_string(),
            reason: format!("smaller than min ({})", min),
        });
    }
    Ok((min, max))
}

fn range(params: &mut Params<'_>) -> Result<ConstraintKind, BuildError> {
    let (min, max) = bounds(params)?;
    Ok(ConstraintKind::Range { min, max })
}

fn diff_within_range(params: &mut Params<'_>) -> Result<ConstraintKind, BuildError> {
    let base = params.property_id("base_property")?;
    let (min, max) = bounds(params)?;
    Ok(ConstraintKind::DiffWithinRange { base, min, max })
}

fn target_required_claim(params: &mut Params<'_>) -> Result<ConstraintKind, BuildError> {
    let required = params.property_id("property")?;
    let item = params.optional_item("item")?;
    Ok(ConstraintKind::TargetRequiredClaim { required, item })
}

fn item(params: &mut Params<'_>) -> Result<ConstraintKind, BuildError> {
    let required = params.property_id("property")?;
    let item = params.optional_item("item")?;
    let exceptions = params.optional_items("exceptions")?;
    Ok(ConstraintKind::Item {
        required,
        item,
        exceptions,
    })
}

fn conflicts_with(params: &mut Params<'_>) -> Result<ConstraintKind, BuildError> {
    let conflicting = params.property_id("property")?;
    let values = params.optional_items("item")?;
    Ok(ConstraintKind::ConflictsWith {
        conflicting,
        values,
    })
}

fn qualifiers(params: &mut Params<'_>) -> Result<ConstraintKind, BuildError> {
    let allowed = params.property_list("list")?;
    Ok(ConstraintKind::Qualifiers { allowed })
}
