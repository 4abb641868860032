//! Fixed-point transaction amounts.
//!
//! Amounts are held as an integer count of cents so the field `54` rendering
//! never depends on float formatting. Field `54` is at most 13 characters,
//! which bounds the integer part to 10 digits.

use std::fmt;
use std::str::FromStr;

use crate::error::{BrCodeError, Result};

/// Largest representable amount in cents (`9999999999.99`).
pub const MAX_CENTS: u64 = 999_999_999_999;

/// A strictly positive amount with two fractional digits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount {
    cents: u64,
}

impl Amount {
    /// Build from a cent count.
    pub fn from_cents(cents: u64) -> Result<Self> {
        if cents == 0 {
            return Err(BrCodeError::InvalidAmount("amount must be greater than zero".into()));
        }
        if cents > MAX_CENTS {
            return Err(BrCodeError::InvalidAmount(format!(
                "{cents} cents exceeds the 13-character amount field"
            )));
        }
        Ok(Self { cents })
    }

    /// Build from a floating-point value, rounded to the nearest cent.
    pub fn from_f64(value: f64) -> Result<Self> {
        if !value.is_finite() {
            return Err(BrCodeError::InvalidAmount(format!("{value} is not finite")));
        }
        if value <= 0.0 {
            return Err(BrCodeError::InvalidAmount(format!(
                "{value} is not greater than zero"
            )));
        }
        let cents = (value * 100.0).round();
        if cents > MAX_CENTS as f64 {
            return Err(BrCodeError::InvalidAmount(format!(
                "{value} exceeds the 13-character amount field"
            )));
        }
        Self::from_cents(cents as u64)
    }

    /// Amount in cents.
    pub fn cents(&self) -> u64 {
        self.cents
    }

    /// Amount as a float, for display and JSON boundaries only.
    pub fn as_f64(&self) -> f64 {
        self.cents as f64 / 100.0
    }
}

impl TryFrom<f64> for Amount {
    type Error = BrCodeError;

    fn try_from(value: f64) -> Result<Self> {
        Self::from_f64(value)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.cents / 100, self.cents % 100)
    }
}

impl FromStr for Amount {
    type Err = BrCodeError;

    /// Parse `"10"`, `"10.5"` or `"10.50"`. More than two fractional digits,
    /// signs, separators and exponents are rejected.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || BrCodeError::InvalidAmount(format!("{s:?} is not a decimal amount"));
        let (int_part, frac_part) = match s.split_once('.') {
            Some((i, f)) => (i, f),
            None => (s, ""),
        };
        if int_part.is_empty()
            || int_part.len() > 10
            || frac_part.len() > 2
            || !int_part.bytes().all(|b| b.is_ascii_digit())
            || !frac_part.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }
        let units: u64 = int_part.parse().map_err(|_| invalid())?;
        let frac: u64 = match frac_part.len() {
            0 => 0,
            1 => frac_part.parse::<u64>().map_err(|_| invalid())? * 10,
            _ => frac_part.parse().map_err(|_| invalid())?,
        };
        Self::from_cents(units * 100 + frac)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_two_decimals() {
        assert_eq!(Amount::from_cents(1000).unwrap().to_string(), "10.00");
        assert_eq!(Amount::from_cents(5).unwrap().to_string(), "0.05");
        assert_eq!(Amount::from_cents(123_456).unwrap().to_string(), "1234.56");
        assert_eq!(Amount::from_cents(MAX_CENTS).unwrap().to_string().len(), 13);
    }

    #[test]
    fn rounds_floats_to_cents() {
        assert_eq!(Amount::from_f64(10.0).unwrap().cents(), 1000);
        assert_eq!(Amount::from_f64(22.9).unwrap().to_string(), "22.90");
        assert_eq!(Amount::from_f64(0.1 + 0.2).unwrap().to_string(), "0.30");
        assert_eq!(Amount::from_f64(19.999).unwrap().to_string(), "20.00");
        assert_eq!(Amount::from_f64(22.9).unwrap().as_f64(), 22.9);
    }

    #[test]
    fn rejects_non_positive_and_non_finite() {
        for v in [0.0, -1.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY, 0.004] {
            assert!(
                matches!(Amount::from_f64(v), Err(BrCodeError::InvalidAmount(_))),
                "value {v}"
            );
        }
        assert!(Amount::from_cents(0).is_err());
        assert!(Amount::from_f64(1e12).is_err());
    }

    #[test]
    fn parses_decimal_strings() {
        assert_eq!("10".parse::<Amount>().unwrap().cents(), 1000);
        assert_eq!("10.5".parse::<Amount>().unwrap().cents(), 1050);
        assert_eq!("10.05".parse::<Amount>().unwrap().cents(), 1005);
        for bad in ["", ".5", "1.234", "-1", "1,00", "1e3", "0.00", "abc", "12345678901"] {
            assert!(bad.parse::<Amount>().is_err(), "input {bad:?}");
        }
    }
}
