//! The generic parse tree of a declaration

use std::fmt;

/// Named parameters of a template
///
/// Keys are unique and case-sensitive. A repeated key keeps the last value at
/// the position of its first occurrence. Equality ignores order.
#[derive(Debug, Clone, Default)]
pub struct NamedParams {
    entries: Vec<(String, String)>,
}

impl NamedParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a parameter, returning the value it replaced
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl PartialEq for NamedParams {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl Eq for NamedParams {}

/// A parsed declaration: `{{name|positional...|key=value...}}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    name: String,
    positional: Vec<String>,
    named: NamedParams,
}

impl Template {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            positional: Vec::new(),
            named: NamedParams::new(),
        }
    }

    pub fn with_positional(mut self, value: impl Into<String>) -> Self {
        self.positional.push(value.into());
        self
    }

    pub fn with_named(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.named.insert(key, value);
        self
    }

    pub(crate) fn from_parts(name: String, positional: Vec<String>, named: NamedParams) -> Self {
        Self {
            name,
            positional,
            named,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn positional(&self) -> &[String] {
        &self.positional
    }

    pub fn named(&self) -> &NamedParams {
        &self.named
    }

    /// Look up a named parameter
    pub fn get(&self, key: &str) -> Option<&str> {
        self.named.get(key)
    }
}

/// Wrap a value in nowiki markers if it would otherwise be split or rejected
struct Protected<'a>(&'a str);

impl fmt::Display for Protected<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.0;
        let special = s.contains(|c: char| matches!(c, '|' | '=' | '{' | '}')) || s.contains("[[");
        if special && !s.contains("</nowiki>") {
            write!(f, "<nowiki>{}</nowiki>", s)
        } else {
            f.write_str(s)
        }
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{{{}", self.name)?;
        for value in &self.positional {
            write!(f, "|{}", Protected(value))?;
        }
        for (key, value) in self.named.iter() {
            write!(f, "|{}={}", key, Protected(value))?;
        }
        f.write_str("}}")
    }
}
