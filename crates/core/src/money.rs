use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

/// A monetary amount, rounded to two decimal places on construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Money(Decimal);

impl Money {
    pub fn from_paise(paise: i64) -> Self {
        Money(Decimal::from(paise) / Decimal::from(100))
    }

    pub fn to_paise(self) -> i64 {
        (self.0 * Decimal::from(100)).round().to_i64().unwrap()
    }

    pub fn from_decimal(decimal: Decimal) -> Self {
        Money(decimal.round_dp(2))
    }

    pub fn amount(self) -> Decimal {
        self.0
    }

    /// Parse an amount as printed on a receipt ("1,234.50", "45", "210.7").
    /// Thousands separators are stripped; anything else non-numeric fails.
    pub fn parse(s: &str) -> Option<Self> {
        let clean = s.trim().replace(',', "");
        if clean.is_empty() {
            return None;
        }
        Decimal::from_str(&clean).ok().map(Money::from_decimal)
    }

    pub fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Add for Money {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Money(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Money(self.0 - rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paise_round_trip() {
        assert_eq!(Money::from_paise(123450).to_paise(), 123450);
        assert_eq!(Money::from_paise(1).to_paise(), 1);
        assert_eq!(Money::zero().to_paise(), 0);
    }

    #[test]
    fn parse_with_thousands_separator() {
        assert_eq!(Money::parse("1,234.50"), Some(Money::from_paise(123450)));
        assert_eq!(Money::parse("12,34,567.00"), Some(Money::from_paise(123456700)));
    }

    #[test]
    fn parse_plain_amounts() {
        assert_eq!(Money::parse("45"), Some(Money::from_paise(4500)));
        assert_eq!(Money::parse("210.75"), Some(Money::from_paise(21075)));
        assert_eq!(Money::parse(" 99.00 "), Some(Money::from_paise(9900)));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(Money::parse(""), None);
        assert_eq!(Money::parse("abc"), None);
        assert_eq!(Money::parse("12.3.4"), None);
    }

    #[test]
    fn from_decimal_rounds_to_two_places() {
        let m = Money::from_decimal(Decimal::from_str("10.005").unwrap());
        // Banker's rounding at the half-paise boundary.
        assert_eq!(m.to_paise(), 1000);
        let m = Money::from_decimal(Decimal::from_str("10.009").unwrap());
        assert_eq!(m.to_paise(), 1001);
    }

    #[test]
    fn ordering_follows_value() {
        assert!(Money::parse("210.75").unwrap() > Money::parse("45.00").unwrap());
    }

    #[test]
    fn display_two_decimals() {
        assert_eq!(Money::from_paise(550).to_string(), "5.50");
        assert_eq!(Money::from_paise(123456).to_string(), "1234.56");
    }

    #[test]
    fn add_and_sub() {
        let a = Money::from_paise(500);
        let b = Money::from_paise(250);
        assert_eq!(a + b, Money::from_paise(750));
        assert_eq!(a - b, Money::from_paise(250));
    }
}
