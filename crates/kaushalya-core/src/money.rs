//! Safe money coercion.
//!
//! Every monetary field coming from the backend goes through [`Money`]. The
//! decoder never fails: numbers are taken as-is, strings are read with
//! `parseFloat` rules (longest leading numeric prefix), and everything else
//! becomes zero.

use std::fmt;
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// A rupee amount. Displays with exactly two decimal places.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Self = Self(Decimal::ZERO);

    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    #[must_use]
    pub const fn amount(self) -> Decimal {
        self.0
    }

    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    /// Coerce an arbitrary JSON value into an amount, falling back to zero.
    #[must_use]
    pub fn coerce(value: &Value) -> Self {
        match value {
            Value::Number(n) => Self::parse_lenient(&n.to_string()),
            Value::String(s) => Self::parse_lenient(s),
            Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => Self::ZERO,
        }
    }

    /// Parse the leading numeric prefix of `raw`; unparsable input is zero.
    #[must_use]
    pub fn parse_lenient(raw: &str) -> Self {
        numeric_prefix(raw)
            .and_then(|prefix| parse_decimal(&prefix))
            .map_or(Self::ZERO, Self)
    }

    /// Rounded to paise, half away from zero.
    #[must_use]
    pub fn rounded(self) -> Decimal {
        let mut rounded = self
            .0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(2);
        rounded
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rounded())
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl From<i64> for Money {
    fn from(value: i64) -> Self {
        Self(Decimal::from(value))
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    /// Strict parse, used for user input where a typo should be reported.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim()).map(Self)
    }
}

impl Serialize for Money {
    /// Serialized as a JSON number so exported sheets get numeric cells.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.0.to_f64().unwrap_or(0.0))
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::coerce(&value))
    }
}

/// Extracts `[sign] digits [. digits] [e [sign] digits]` from the start of
/// `raw` (after leading whitespace), normalised so `Decimal` can read it.
fn numeric_prefix(raw: &str) -> Option<String> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut i = 0;
    let mut out = String::new();

    if let Some(&sign) = bytes.first() {
        if sign == b'-' || sign == b'+' {
            if sign == b'-' {
                out.push('-');
            }
            i += 1;
        }
    }

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let int_digits = &s[int_start..i];

    let mut frac_digits = "";
    if i < bytes.len() && bytes[i] == b'.' {
        let frac_start = i + 1;
        let mut j = frac_start;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        frac_digits = &s[frac_start..j];
        i = j;
    }

    if int_digits.is_empty() && frac_digits.is_empty() {
        return None;
    }

    out.push_str(if int_digits.is_empty() { "0" } else { int_digits });
    if !frac_digits.is_empty() {
        out.push('.');
        out.push_str(frac_digits);
    }

    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        let mut exponent = String::from("e");
        if j < bytes.len() && (bytes[j] == b'-' || bytes[j] == b'+') {
            if bytes[j] == b'-' {
                exponent.push('-');
            }
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            exponent.push_str(&s[exp_start..j]);
            out.push_str(&exponent);
        }
    }

    Some(out)
}

fn parse_decimal(normalised: &str) -> Option<Decimal> {
    if normalised.contains('e') {
        Decimal::from_scientific(normalised).ok()
    } else {
        Decimal::from_str(normalised).ok()
    }
}
