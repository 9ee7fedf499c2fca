//! # Money Module
//!
//! Provides the `Money` type for the monetary fields of a bill
//! (`amount`, `vat`).
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  The store speaks JSON numbers in base units: 400, 12.5, 0.1           │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    Parse once at the edge (form input or wire value) into cents,       │
//! │    do everything else in i64, convert back only when serialising.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use billed_core::money::Money;
//!
//! let amount = Money::parse_input("400,50").unwrap();
//! assert_eq!(amount.cents(), 40050);
//! assert_eq!(amount.to_string(), "400.50");
//! ```

use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

// =============================================================================
// Parse Error
// =============================================================================

/// Why a piece of text or a wire value is not a monetary amount.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseMoneyError {
    #[error("value is empty")]
    Empty,

    #[error("'{0}' is not a number")]
    NotANumber(String),

    #[error("'{0}' has more than two decimals")]
    TooManyDecimals(String),

    #[error("'{0}' is too large")]
    Overflow(String),
}

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in cents (the smallest unit of the base currency).
///
/// ## Design Decisions
/// - **i64 (signed)**: the parser accepts negatives so the validator can
///   report them as such instead of "not a number"
/// - **Wire form**: JSON number in base units, integer when whole
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use billed_core::money::Money;
    ///
    /// let vat = Money::from_cents(8000); // 80.00
    /// assert_eq!(vat.cents(), 8000);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from whole base units.
    #[inline]
    pub const fn from_units(units: i64) -> Self {
        Money(units * 100)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-unit portion.
    #[inline]
    pub const fn units(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the cents portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns true when there is no cents portion.
    #[inline]
    pub const fn is_whole(&self) -> bool {
        self.0 % 100 == 0
    }

    /// Parses user-entered text into Money.
    ///
    /// ## Accepted Forms
    /// ```text
    /// "400"      → 400.00
    /// "400.5"    → 400.50
    /// "400,50"   → 400.50   (comma decimal separator)
    /// " 12 "     → 12.00    (surrounding whitespace ignored)
    /// "-3.2"     → -3.20    (sign kept, rejected later by validation)
    /// "12.345"   → TooManyDecimals
    /// "abc", "1e3", "12.", "" → NotANumber / Empty
    /// ```
    pub fn parse_input(input: &str) -> Result<Money, ParseMoneyError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ParseMoneyError::Empty);
        }

        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };

        let normalized = digits.replace(',', ".");
        let (whole, fraction) = match normalized.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (normalized.as_str(), ""),
        };

        let not_a_number = || ParseMoneyError::NotANumber(trimmed.to_string());

        if whole.is_empty() || !whole.chars().all(|c| c.is_ascii_digit()) {
            return Err(not_a_number());
        }
        if normalized.contains('.') && fraction.is_empty() {
            return Err(not_a_number());
        }
        if !fraction.chars().all(|c| c.is_ascii_digit()) {
            return Err(not_a_number());
        }
        if fraction.len() > 2 {
            return Err(ParseMoneyError::TooManyDecimals(trimmed.to_string()));
        }

        let overflow = || ParseMoneyError::Overflow(trimmed.to_string());
        let whole_units: i64 = whole.parse().map_err(|_| overflow())?;
        let fraction_cents: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| not_a_number())? * 10,
            _ => fraction.parse::<i64>().map_err(|_| not_a_number())?,
        };

        let cents = whole_units
            .checked_mul(100)
            .and_then(|c| c.checked_add(fraction_cents))
            .ok_or_else(overflow)?;

        Ok(Money(if negative { -cents } else { cents }))
    }

    /// Reads a wire value: a JSON number in base units or a numeric string.
    ///
    /// Stored records are not always consistent (`"vat": "80"` next to
    /// `"amount": 400`), so both are accepted.
    pub fn from_json(value: &Value) -> Result<Money, ParseMoneyError> {
        match value {
            Value::Null => Err(ParseMoneyError::Empty),
            Value::Number(n) => {
                if let Some(units) = n.as_i64() {
                    units
                        .checked_mul(100)
                        .map(Money)
                        .ok_or_else(|| ParseMoneyError::Overflow(n.to_string()))
                } else if let Some(float) = n.as_f64() {
                    let cents = (float * 100.0).round();
                    if cents.is_finite() && cents.abs() < i64::MAX as f64 {
                        Ok(Money(cents as i64))
                    } else {
                        Err(ParseMoneyError::Overflow(n.to_string()))
                    }
                } else {
                    Err(ParseMoneyError::Overflow(n.to_string()))
                }
            }
            Value::String(s) => Money::parse_input(s),
            other => Err(ParseMoneyError::NotANumber(other.to_string())),
        }
    }

    /// Converts to the wire form: integer when whole, decimal otherwise.
    pub fn to_json(&self) -> Value {
        if self.is_whole() {
            Value::from(self.units())
        } else {
            serde_json::Number::from_f64(self.0 as f64 / 100.0)
                .map(Value::Number)
                .unwrap_or(Value::Null)
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows whole amounts without decimals (`400`) and others with two (`12.50`).
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        if self.is_whole() {
            write!(f, "{}{}", sign, self.units().abs())
        } else {
            write!(f, "{}{}.{:02}", sign, self.units().abs(), self.cents_part())
        }
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_whole() {
            serializer.serialize_i64(self.units())
        } else {
            serializer.serialize_f64(self.0 as f64 / 100.0)
        }
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Money::from_json(&value).map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_input_accepted_forms() {
        assert_eq!(Money::parse_input("400").unwrap().cents(), 40000);
        assert_eq!(Money::parse_input("400.5").unwrap().cents(), 40050);
        assert_eq!(Money::parse_input("400,50").unwrap().cents(), 40050);
        assert_eq!(Money::parse_input(" 12 ").unwrap().cents(), 1200);
        assert_eq!(Money::parse_input("+7").unwrap().cents(), 700);
        assert_eq!(Money::parse_input("-3.2").unwrap().cents(), -320);
        assert_eq!(Money::parse_input("0.05").unwrap().cents(), 5);
    }

    #[test]
    fn test_parse_input_rejected_forms() {
        assert_eq!(Money::parse_input(""), Err(ParseMoneyError::Empty));
        assert_eq!(Money::parse_input("   "), Err(ParseMoneyError::Empty));
        assert!(matches!(
            Money::parse_input("abc"),
            Err(ParseMoneyError::NotANumber(_))
        ));
        assert!(matches!(
            Money::parse_input("1e3"),
            Err(ParseMoneyError::NotANumber(_))
        ));
        assert!(matches!(
            Money::parse_input("12."),
            Err(ParseMoneyError::NotANumber(_))
        ));
        assert!(matches!(
            Money::parse_input(".5"),
            Err(ParseMoneyError::NotANumber(_))
        ));
        assert!(matches!(
            Money::parse_input("12.345"),
            Err(ParseMoneyError::TooManyDecimals(_))
        ));
        assert!(matches!(
            Money::parse_input("99999999999999999999"),
            Err(ParseMoneyError::Overflow(_))
        ));
    }

    #[test]
    fn test_from_json() {
        assert_eq!(Money::from_json(&json!(400)).unwrap().cents(), 40000);
        assert_eq!(Money::from_json(&json!(12.5)).unwrap().cents(), 1250);
        assert_eq!(Money::from_json(&json!("80")).unwrap().cents(), 8000);
        assert_eq!(Money::from_json(&Value::Null), Err(ParseMoneyError::Empty));
        assert!(Money::from_json(&json!(true)).is_err());
    }

    #[test]
    fn test_to_json() {
        assert_eq!(Money::from_cents(40000).to_json(), json!(400));
        assert_eq!(Money::from_cents(1250).to_json(), json!(12.5));
    }

    #[test]
    fn test_serde_uses_wire_form() {
        let encoded = serde_json::to_string(&Money::from_cents(1999)).unwrap();
        assert_eq!(encoded, "19.99");

        let decoded: Money = serde_json::from_str("\"80\"").unwrap();
        assert_eq!(decoded, Money::from_units(80));
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(40000).to_string(), "400");
        assert_eq!(Money::from_cents(1250).to_string(), "12.50");
        assert_eq!(Money::from_cents(-320).to_string(), "-3.20");
        assert_eq!(Money::zero().to_string(), "0");
    }
}
