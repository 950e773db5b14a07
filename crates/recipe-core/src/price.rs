//! Fixed-point recipe price.
//!
//! Prices carry exactly two decimal places and at most five digits in total,
//! so the representable range is `0.00 ..= 999.99`. On the wire a price is
//! always the string `"5.99"`; incoming payloads may use a string or a JSON
//! number.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use schemars::{JsonSchema, Schema, SchemaGenerator, json_schema};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::CoreError;

/// Largest representable amount, in cents.
const MAX_CENTS: u32 = 99_999;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price {
    cents: u32,
}

impl Price {
    /// Build a price from a whole number of cents.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if the amount exceeds `999.99`.
    pub fn from_cents(cents: u32) -> Result<Self, CoreError> {
        if cents > MAX_CENTS {
            return Err(CoreError::validation(
                "price",
                "ensure that there are no more than 5 digits in total",
            ));
        }
        Ok(Self { cents })
    }

    #[must_use]
    pub const fn cents(self) -> u32 {
        self.cents
    }
}

impl FromStr for Price {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.starts_with('-') {
            return Err(CoreError::validation("price", "must not be negative"));
        }

        let (whole, frac) = s.split_once('.').unwrap_or((s, ""));
        if whole.is_empty() && frac.is_empty() {
            return Err(CoreError::validation("price", "a valid number is required"));
        }
        if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit())
        {
            return Err(CoreError::validation("price", "a valid number is required"));
        }
        if frac.len() > 2 {
            return Err(CoreError::validation(
                "price",
                "ensure that there are no more than 2 decimal places",
            ));
        }

        let whole = whole.trim_start_matches('0');
        if whole.len() > 3 {
            return Err(CoreError::validation(
                "price",
                "ensure that there are no more than 5 digits in total",
            ));
        }

        let whole: u32 = if whole.is_empty() {
            0
        } else {
            whole
                .parse()
                .map_err(|_| CoreError::validation("price", "a valid number is required"))?
        };
        let frac: u32 = match frac.len() {
            0 => 0,
            1 => frac.parse::<u32>().unwrap_or(0) * 10,
            _ => frac.parse().unwrap_or(0),
        };

        Ok(Self {
            cents: whole * 100 + frac,
        })
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.cents / 100, self.cents % 100)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

struct PriceVisitor;

impl Visitor<'_> for PriceVisitor {
    type Value = Price;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a decimal amount with at most two decimal places")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Price, E> {
        v.parse().map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Price, E> {
        v.to_string().parse().map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Price, E> {
        v.to_string().parse().map_err(E::custom)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Price, E> {
        // `{}` on f64 prints the shortest round-tripping form, so 5.99 stays "5.99".
        v.to_string().parse().map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(PriceVisitor)
    }
}

impl JsonSchema for Price {
    fn schema_name() -> Cow<'static, str> {
        "Price".into()
    }

    fn json_schema(_generator: &mut SchemaGenerator) -> Schema {
        json_schema!({
            "type": ["string", "number"],
            "pattern": r"^\d{1,3}(\.\d{1,2})?$",
            "minimum": 0,
            "maximum": 999.99,
            "description": "Decimal amount, two decimal places, at most 999.99. Serialized as a string; numbers are accepted on input."
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("5.00", 500)]
    #[case("5.99", 599)]
    #[case("12", 1200)]
    #[case("0.5", 50)]
    #[case(".75", 75)]
    #[case("999.99", 99_999)]
    #[case("0020.00", 2000)]
    fn parses_valid_amounts(#[case] raw: &str, #[case] cents: u32) {
        assert_eq!(raw.parse::<Price>().unwrap().cents(), cents);
    }

    #[rstest]
    #[case("-1.00")]
    #[case("1.999")]
    #[case("1000.00")]
    #[case("abc")]
    #[case("")]
    #[case(".")]
    #[case("1.2.3")]
    fn rejects_invalid_amounts(#[case] raw: &str) {
        assert!(raw.parse::<Price>().is_err(), "{raw} should be rejected");
    }

    #[test]
    fn displays_two_decimal_places() {
        assert_eq!("5".parse::<Price>().unwrap().to_string(), "5.00");
        assert_eq!("20.1".parse::<Price>().unwrap().to_string(), "20.10");
    }

    #[test]
    fn serializes_as_string() {
        let price: Price = "5.99".parse().unwrap();
        assert_eq!(serde_json::to_string(&price).unwrap(), "\"5.99\"");
    }

    #[test]
    fn deserializes_from_string_or_number() {
        let from_str: Price = serde_json::from_str("\"5.99\"").unwrap();
        let from_float: Price = serde_json::from_str("5.99").unwrap();
        let from_int: Price = serde_json::from_str("12").unwrap();
        assert_eq!(from_str, from_float);
        assert_eq!(from_int.to_string(), "12.00");
    }

    #[test]
    fn from_cents_enforces_ceiling() {
        assert!(Price::from_cents(99_999).is_ok());
        assert!(Price::from_cents(100_000).is_err());
    }
}
