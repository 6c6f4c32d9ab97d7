//! Raw numeric input handling
//!
//! Amounts and percentages arrive as free text from the input layer and are
//! stored verbatim, so a saved profile reads back exactly as it was typed.
//! Conversion to a number happens in one place, [`parse_or_zero`], which
//! every validation and derivation step goes through.

use rust_decimal::Decimal;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Keeps digits and the first decimal point, dropping everything else
///
/// # Example
///
/// ```rust
/// use core_kernel::sanitize_numeric_input;
///
/// assert_eq!(sanitize_numeric_input("₹ 12,34,567.50"), "1234567.50");
/// assert_eq!(sanitize_numeric_input("1.2.3"), "1.23");
/// ```
pub fn sanitize_numeric_input(raw: &str) -> String {
    let mut seen_point = false;
    raw.chars()
        .filter(|c| match c {
            '0'..='9' => true,
            '.' if !seen_point => {
                seen_point = true;
                true
            }
            _ => false,
        })
        .collect()
}

/// Parses the longest leading numeric prefix of `raw`, or zero if there is none
///
/// Leading whitespace and a single sign are accepted. Parsing stops at the
/// first character that cannot extend the number, so `"12.5abc"` is `12.5`
/// and `"abc"` is zero. Values too large for a [`Decimal`] are zero.
pub fn parse_or_zero(raw: &str) -> Decimal {
    parse_prefix(raw).unwrap_or(Decimal::ZERO)
}

/// Parses `raw` and returns it only when it is strictly positive
pub fn parse_positive(raw: &str) -> Option<Decimal> {
    parse_prefix(raw).filter(|value| *value > Decimal::ZERO)
}

fn parse_prefix(raw: &str) -> Option<Decimal> {
    let text = raw.trim_start();
    let mut chars = text.char_indices().peekable();

    let mut negative = false;
    if let Some(&(_, sign)) = chars.peek() {
        if sign == '+' || sign == '-' {
            negative = sign == '-';
            chars.next();
        }
    }

    let mut integer = String::new();
    let mut fraction = String::new();
    let mut in_fraction = false;

    for (_, c) in chars {
        match c {
            '0'..='9' if in_fraction => fraction.push(c),
            '0'..='9' => integer.push(c),
            '.' if !in_fraction => in_fraction = true,
            _ => break,
        }
    }

    if integer.is_empty() && fraction.is_empty() {
        return None;
    }

    let mut literal = String::with_capacity(integer.len() + fraction.len() + 3);
    if negative {
        literal.push('-');
    }
    if integer.is_empty() {
        literal.push('0');
    } else {
        literal.push_str(&integer);
    }
    if !fraction.is_empty() {
        literal.push('.');
        literal.push_str(&fraction);
    }

    Decimal::from_str(&literal).ok()
}

/// A number exactly as the user typed it
///
/// Deserializes from either a JSON string or a JSON number, and always
/// serializes back as a string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RawNumber(String);

impl RawNumber {
    /// Wraps text without sanitizing it
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Wraps text after stripping everything but digits and one decimal point
    pub fn sanitized(text: &str) -> Self {
        Self(sanitize_numeric_input(text))
    }

    /// Builds a raw number from a decimal value
    pub fn from_decimal(value: Decimal) -> Self {
        Self(value.normalize().to_string())
    }

    /// An empty entry
    pub fn empty() -> Self {
        Self(String::new())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The numeric value, with unparsable text treated as zero
    pub fn value(&self) -> Decimal {
        parse_or_zero(&self.0)
    }

    /// The numeric value when it is strictly positive
    pub fn positive(&self) -> Option<Decimal> {
        parse_positive(&self.0)
    }
}

impl fmt::Display for RawNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RawNumber {
    fn from(text: &str) -> Self {
        Self(text.to_string())
    }
}

impl From<String> for RawNumber {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl From<Decimal> for RawNumber {
    fn from(value: Decimal) -> Self {
        Self::from_decimal(value)
    }
}

impl Serialize for RawNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for RawNumber {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(RawNumberVisitor)
    }
}

struct RawNumberVisitor;

impl<'de> Visitor<'de> for RawNumberVisitor {
    type Value = RawNumber;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a number or numeric string")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<RawNumber, E> {
        Ok(RawNumber(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<RawNumber, E> {
        Ok(RawNumber(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<RawNumber, E> {
        Ok(RawNumber(v.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<RawNumber, E> {
        Ok(RawNumber(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<RawNumber, E> {
        if v.is_finite() {
            Ok(RawNumber(v.to_string()))
        } else {
            Ok(RawNumber::empty())
        }
    }

    fn visit_unit<E: de::Error>(self) -> Result<RawNumber, E> {
        Ok(RawNumber::empty())
    }

    fn visit_none<E: de::Error>(self) -> Result<RawNumber, E> {
        Ok(RawNumber::empty())
    }
}
