//! Integer value amounts denominated in wei.
//!
//! Parsing goes through `rust_decimal` so that unit-suffixed inputs such as
//! `1.5 gwei` or `0.01ether` resolve exactly, without floating-point error.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Wei per gwei.
pub const GWEI: u128 = 1_000_000_000;

/// Wei per ether.
pub const ETHER: u128 = 1_000_000_000_000_000_000;

/// Errors produced while parsing an [`Amount`] from text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("malformed amount {0:?}")]
    Malformed(String),

    #[error("amount {0:?} is negative")]
    Negative(String),

    #[error("amount {0:?} is not a whole number of wei")]
    Fractional(String),

    #[error("amount {0:?} is out of range")]
    OutOfRange(String),
}

/// A non-negative quantity of value in the smallest unit (wei).
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use pool_ledger::Amount;
///
/// let amount = Amount::from_str("1.5 gwei").unwrap();
/// assert_eq!(amount, Amount::new(1_500_000_000));
/// assert_eq!(amount.to_string(), "1500000000");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(u128);

impl Amount {
    /// Zero value.
    pub const ZERO: Self = Amount(0);

    pub const fn new(wei: u128) -> Self {
        Amount(wei)
    }

    pub const fn gwei(gwei: u128) -> Self {
        Amount(gwei * GWEI)
    }

    /// Returns the raw wei count.
    pub const fn wei(self) -> u128 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Amount)
    }

    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Amount)
    }
}

impl From<u128> for Amount {
    fn from(wei: u128) -> Self {
        Amount(wei)
    }
}

/// Splits `"12.5gwei"` into the number and its unit multiplier.
fn split_unit(s: &str) -> (&str, u128) {
    let lower = s.to_ascii_lowercase();
    for (suffix, scale) in [("gwei", GWEI), ("ether", ETHER), ("eth", ETHER), ("wei", 1)] {
        if lower.ends_with(suffix) {
            return (s[..s.len() - suffix.len()].trim_end(), scale);
        }
    }
    (s, 1)
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (number, scale) = split_unit(trimmed);
        if number.is_empty() {
            return Err(AmountError::Malformed(trimmed.to_string()));
        }

        // Plain integers take the fast path and keep full u128 range.
        if scale == 1 {
            if let Ok(wei) = number.parse::<u128>() {
                return Ok(Amount(wei));
            }
        }

        let value = Decimal::from_str(number)
            .map_err(|_| AmountError::Malformed(trimmed.to_string()))?;
        if value.is_sign_negative() && !value.is_zero() {
            return Err(AmountError::Negative(trimmed.to_string()));
        }

        // Unit multipliers never exceed one ether, which fits in a u64.
        let scaled = value
            .checked_mul(Decimal::from(scale as u64))
            .ok_or_else(|| AmountError::OutOfRange(trimmed.to_string()))?;
        if !scaled.fract().is_zero() {
            return Err(AmountError::Fractional(trimmed.to_string()));
        }

        scaled
            .to_u128()
            .map(Amount)
            .ok_or_else(|| AmountError::OutOfRange(trimmed.to_string()))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amt(s: &str) -> Amount {
        Amount::from_str(s).unwrap()
    }

    #[test]
    fn test_plain_integer_is_wei() {
        assert_eq!(amt("1000000000"), Amount::new(GWEI));
        assert_eq!(amt("  42  "), Amount::new(42));
        assert_eq!(amt("0"), Amount::ZERO);
    }

    #[test]
    fn test_unit_suffixes_scale() {
        assert_eq!(amt("1gwei"), Amount::gwei(1));
        assert_eq!(amt("2 GWEI"), Amount::gwei(2));
        assert_eq!(amt("0.5 ether"), Amount::new(ETHER / 2));
        assert_eq!(amt("1eth"), Amount::new(ETHER));
        assert_eq!(amt("7wei"), Amount::new(7));
        assert_eq!(amt("1.5gwei"), Amount::new(1_500_000_000));
    }

    #[test]
    fn test_rejects_fractional_wei() {
        assert!(matches!(
            Amount::from_str("1.5"),
            Err(AmountError::Fractional(_))
        ));
        assert!(matches!(
            Amount::from_str("0.0000000001 gwei"),
            Err(AmountError::Fractional(_))
        ));
    }

    #[test]
    fn test_rejects_negative_and_garbage() {
        assert!(matches!(
            Amount::from_str("-1"),
            Err(AmountError::Negative(_))
        ));
        assert!(matches!(
            Amount::from_str("ten"),
            Err(AmountError::Malformed(_))
        ));
        assert!(matches!(
            Amount::from_str("gwei"),
            Err(AmountError::Malformed(_))
        ));
        assert!(matches!(
            Amount::from_str(""),
            Err(AmountError::Malformed(_))
        ));
    }

    #[test]
    fn test_checked_arithmetic() {
        let max = Amount::new(u128::MAX);
        assert_eq!(max.checked_add(Amount::new(1)), None);
        assert_eq!(Amount::ZERO.checked_sub(Amount::new(1)), None);
        assert_eq!(
            Amount::gwei(2).checked_sub(Amount::gwei(1)),
            Some(Amount::gwei(1))
        );
    }

    #[test]
    fn test_from_raw_wei() {
        assert_eq!(Amount::from(GWEI), Amount::gwei(1));
        assert_eq!(Amount::from(7u128).wei(), 7);
    }

    #[test]
    fn test_display_is_plain_wei() {
        assert_eq!(Amount::gwei(3).to_string(), "3000000000");
    }
}
