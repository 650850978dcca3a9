//! Decimal literals used as range bounds

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{0}' is not a decimal number")]
pub struct DecimalError(pub String);

/// A decimal number kept in canonical text form
///
/// Canonical form has no leading `+`, no redundant leading zeros in the
/// integer part, no trailing zeros in the fraction, and no negative zero.
/// Keeping the text (rather than a float) gives exact `Eq` and `Hash`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Decimal {
    negative: bool,
    integer: String,
    fraction: String,
}

impl Decimal {
    pub fn parse(raw: &str) -> Result<Self, DecimalError> {
        let err = || DecimalError(raw.to_string());
        let s = raw.trim();

        let (negative, unsigned) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };

        let (int_part, frac_part) = match unsigned.split_once('.') {
            Some((i, f)) => (i, f),
            None => (unsigned, ""),
        };

        let digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if (int_part.is_empty() && frac_part.is_empty()) || !digits(int_part) || !digits(frac_part) {
            return Err(err());
        }

        let integer = match int_part.trim_start_matches('0') {
            "" => "0".to_string(),
            rest => rest.to_string(),
        };
        let fraction = frac_part.trim_end_matches('0').to_string();
        let is_zero = integer == "0" && fraction.is_empty();

        Ok(Self {
            negative: negative && !is_zero,
            integer,
            fraction,
        })
    }

    fn cmp_magnitude(&self, other: &Self) -> Ordering {
        self.integer
            .len()
            .cmp(&other.integer.len())
            .then_with(|| self.integer.cmp(&other.integer))
            .then_with(|| {
                // Pad fractions to equal length before comparing digit strings
                let width = self.fraction.len().max(other.fraction.len());
                let a = format!("{:0<width$}", self.fraction, width = width);
                let b = format!("{:0<width$}", other.fraction, width = width);
                a.cmp(&b)
            })
    }
}

impl Ord for Decimal {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.negative, other.negative) {
            (false, true) => Ordering::Greater,
            (true, false) => Ordering::Less,
            (false, false) => self.cmp_magnitude(other),
            (true, true) => other.cmp_magnitude(self),
        }
    }
}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FromStr for Decimal {
    type Err = DecimalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            f.write_str("-")?;
        }
        f.write_str(&self.integer)?;
        if !self.fraction.is_empty() {
            write!(f, ".{}", self.fraction)?;
        }
        Ok(())
    }
}
