//! Entity identifiers referenced by constraints
//!
//! Items and properties are addressed by a kind letter followed by a positive
//! number (`Q42`, `P31`). The compiler treats them as opaque value objects but
//! still validates every identifier it receives.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Errors produced when an identifier does not have the expected shape
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    #[error("empty {kind} identifier")]
    Empty { kind: &'static str },

    #[error("'{raw}' is not a valid {kind} identifier (expected {prefix} followed by a number)")]
    Malformed {
        kind: &'static str,
        prefix: char,
        raw: String,
    },
}

/// Validate `raw` against `<prefix><digits>` and return the canonical form
fn canonicalize(raw: &str, prefix: char, kind: &'static str) -> Result<String, IdError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(IdError::Empty { kind });
    }

    let malformed = || IdError::Malformed {
        kind,
        prefix,
        raw: raw.to_string(),
    };

    let mut chars = trimmed.chars();
    let first = chars.next().ok_or_else(malformed)?;
    if first.to_ascii_uppercase() != prefix {
        return Err(malformed());
    }

    let digits = chars.as_str();
    let valid = !digits.is_empty()
        && digits.bytes().all(|b| b.is_ascii_digit())
        && !digits.starts_with('0');
    if !valid {
        return Err(malformed());
    }

    Ok(format!("{}{}", prefix, digits))
}

/// Identifier of an item, e.g. `Q5`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(String);

impl ItemId {
    pub const PREFIX: char = 'Q';

    pub fn new(raw: &str) -> Result<Self, IdError> {
        canonicalize(raw, Self::PREFIX, "item").map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifier of a property, e.g. `P31`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PropertyId(String);

impl PropertyId {
    pub const PREFIX: char = 'P';

    pub fn new(raw: &str) -> Result<Self, IdError> {
        canonicalize(raw, Self::PREFIX, "property").map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `instance of`
    pub fn instance_of() -> Self {
        Self("P31".to_string())
    }

    /// `subclass of`
    pub fn subclass_of() -> Self {
        Self("P279".to_string())
    }
}

impl FromStr for ItemId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl FromStr for PropertyId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
