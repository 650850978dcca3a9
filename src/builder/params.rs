//! Typed access to template parameters for builders

use std::fmt::Display;

use crate::ids::{ItemId, PropertyId};
use crate::model::{Decimal, Relation};
use crate::template::Template;

use super::BuildError;

/// Parameter view handed to a builder
///
/// Every key a builder asks for is recorded, so that the registry can tell
/// which parameters of the template went unrecognized.
#[derive(Debug)]
pub struct Params<'t> {
    property: &'t PropertyId,
    template: &'t Template,
    read: Vec<&'static str>,
}

/// Strip wiki-link brackets some pages put around identifiers
fn clean_id(raw: &str) -> &str {
    let s = raw.trim();
    s.strip_prefix("[[")
        .and_then(|s| s.strip_suffix("]]"))
        .unwrap_or(s)
        .trim()
}

/// Split a list value on commas and whitespace
fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
}

fn invalid(key: &str, value: &str, reason: impl Display) -> BuildError {
    BuildError::InvalidParameterValue {
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

impl<'t> Params<'t> {
    pub fn new(property: &'t PropertyId, template: &'t Template) -> Self {
        Self {
            property,
            template,
            read: Vec::new(),
        }
    }

    /// The constrained property
    pub fn property(&self) -> &'t PropertyId {
        self.property
    }

    fn lookup(&mut self, key: &'static str) -> Option<&'t str> {
        if !self.read.contains(&key) {
            self.read.push(key);
        }
        self.template.get(key)
    }

    /// A mandatory, non-blank parameter
    pub fn required(&mut self, key: &'static str) -> Result<&'t str, BuildError> {
        match self.lookup(key) {
            None => Err(BuildError::MissingParameter {
                key: key.to_string(),
            }),
            Some(v) if v.trim().is_empty() => Err(invalid(key, v, "empty value")),
            Some(v) => Ok(v),
        }
    }

    /// An optional parameter; a blank value counts as absent
    pub fn optional(&mut self, key: &'static str) -> Option<&'t str> {
        self.lookup(key).filter(|v| !v.trim().is_empty())
    }

    /// A mandatory parameter run through `parse`
    pub fn parse_required<T, E: Display>(
        &mut self,
        key: &'static str,
        parse: impl FnOnce(&str) -> Result<T, E>,
    ) -> Result<T, BuildError> {
        let raw = self.required(key)?;
        parse(raw).map_err(|e| invalid(key, raw, e))
    }

    pub fn item(&mut self, key: &'static str) -> Result<ItemId, BuildError> {
        self.parse_required(key, |raw| ItemId::new(clean_id(raw)))
    }

    pub fn optional_item(&mut self, key: &'static str) -> Result<Option<ItemId>, BuildError> {
        match self.optional(key) {
            None => Ok(None),
            Some(raw) => ItemId::new(clean_id(raw))
                .map(Some)
                .map_err(|e| invalid(key, raw, e)),
        }
    }

    pub fn property_id(&mut self, key: &'static str) -> Result<PropertyId, BuildError> {
        self.parse_required(key, |raw| PropertyId::new(clean_id(raw)))
    }

    pub fn decimal(&mut self, key: &'static str) -> Result<Decimal, BuildError> {
        self.parse_required(key, Decimal::parse)
    }

    pub fn relation(&mut self, key: &'static str) -> Result<Relation, BuildError> {
        self.parse_required(key, |raw| {
            Relation::from_keyword(raw.trim()).ok_or("expected 'instance' or 'subclass'")
        })
    }

    /// A mandatory, non-empty list of items
    pub fn items(&mut self, key: &'static str) -> Result<Vec<ItemId>, BuildError> {
        let raw = self.required(key)?;
        parse_list(key, raw, ItemId::new)
    }

    /// An optional list of items; absent or blank yields an empty list
    pub fn optional_items(&mut self, key: &'static str) -> Result<Vec<ItemId>, BuildError> {
        match self.optional(key) {
            None => Ok(Vec::new()),
            Some(raw) => parse_list(key, raw, ItemId::new),
        }
    }

    /// A mandatory list of properties that may be written empty (`key=`)
    pub fn property_list(&mut self, key: &'static str) -> Result<Vec<PropertyId>, BuildError> {
        match self.lookup(key) {
            None => Err(BuildError::MissingParameter {
                key: key.to_string(),
            }),
            Some(raw) if raw.trim().is_empty() => Ok(Vec::new()),
            Some(raw) => parse_list(key, raw, PropertyId::new),
        }
    }

    /// Parameters the builder never asked for
    ///
    /// Named keys come first in template order, then positional parameters
    /// as `#1`, `#2`, ...
    pub fn unrecognized(&self) -> Vec<String> {
        let named = self
            .template
            .named()
            .keys()
            .filter(|k| !self.read.iter().any(|r| r == k))
            .map(str::to_string);
        let positional = (1..=self.template.positional().len()).map(|i| format!("#{}", i));
        named.chain(positional).collect()
    }
}

fn parse_list<T, E: Display>(
    key: &str,
    raw: &str,
    parse: impl Fn(&str) -> Result<T, E>,
) -> Result<Vec<T>, BuildError> {
    let values = split_list(raw)
        .map(|entry| parse(clean_id(entry)).map_err(|e| invalid(key, raw, e)))
        .collect::<Result<Vec<_>, _>>()?;
    if values.is_empty() {
        return Err(invalid(key, raw, "empty list"));
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn property() -> PropertyId {
        PropertyId::new("P1").unwrap()
    }

    #[test]
    fn test_required_missing() {
        let p = property();
        let t = Template::new("X");
        let mut params = Params::new(&p, &t);
        assert_eq!(
            params.required("class"),
            Err(BuildError::MissingParameter {
                key: "class".to_string()
            })
        );
    }

    #[test]
    fn test_required_blank_is_invalid() {
        let p = property();
        let t = Template::new("X").with_named("class", "  ");
        let mut params = Params::new(&p, &t);
        assert!(matches!(
            params.required("class"),
            Err(BuildError::InvalidParameterValue { .. })
        ));
    }

    #[test]
    fn test_optional_blank_is_absent() {
        let p = property();
        let t = Template::new("X").with_named("item", "");
        let mut params = Params::new(&p, &t);
        assert_eq!(params.optional_item("item"), Ok(None));
    }

    #[test]
    fn test_item_accepts_link_brackets() {
        let p = property();
        let t = Template::new("X").with_named("class", "[[Q5]]");
        let mut params = Params::new(&p, &t);
        assert_eq!(params.item("class").unwrap().as_str(), "Q5");
    }

    #[test]
    fn test_item_list_mixed_separators() {
        let p = property();
        let t = Template::new("X").with_named("values", "Q1, Q2 Q3,,Q4");
        let mut params = Params::new(&p, &t);
        let values: Vec<String> = params
            .items("values")
            .unwrap()
            .iter()
            .map(|i| i.to_string())
            .collect();
        assert_eq!(values, vec!["Q1", "Q2", "Q3", "Q4"]);
    }

    #[test]
    fn test_item_list_bad_entry() {
        let p = property();
        let t = Template::new("X").with_named("values", "Q1, P2");
        let mut params = Params::new(&p, &t);
        match params.items("values") {
            Err(BuildError::InvalidParameterValue { key, value, .. }) => {
                assert_eq!(key, "values");
                assert_eq!(value, "Q1, P2");
            }
            other => panic!("Expected InvalidParameterValue, got {:?}", other),
        }
    }

    #[test]
    fn test_property_list_may_be_empty() {
        let p = property();
        let t = Template::new("X").with_named("list", "");
        let mut params = Params::new(&p, &t);
        assert_eq!(params.property_list("list"), Ok(vec![]));
    }

    #[test]
    fn test_relation_values() {
        let p = property();
        let t = Template::new("X").with_named("relation", "member");
        let mut params = Params::new(&p, &t);
        match params.relation("relation") {
            Err(BuildError::InvalidParameterValue { key, value, .. }) => {
                assert_eq!(key, "relation");
                assert_eq!(value, "member");
            }
            other => panic!("Expected InvalidParameterValue, got {:?}", other),
        }
    }

    #[test]
    fn test_unrecognized_tracks_reads() {
        let p = property();
        let t = Template::new("X")
            .with_positional("stray")
            .with_named("class", "Q5")
            .with_named("mandatory", "true");
        let mut params = Params::new(&p, &t);
        params.item("class").unwrap();
        assert_eq!(params.unrecognized(), vec!["mandatory", "#1"]);
    }
}
