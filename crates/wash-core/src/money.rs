//! # Money
//!
//! Amounts in Saudi riyals, stored in halalas (1/100 SAR).
//! The backend speaks decimal riyals; conversion happens at the serde edge.

use crate::messages::Language;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::iter::Sum;
use std::ops::{Add, Neg, Sub};

/// Halalas per riyal
const HALALAS_PER_RIYAL: i64 = 100;

/// An amount in halalas. May be negative (see [`crate::pricing`]).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Create from the smallest unit
    pub const fn from_halalas(halalas: i64) -> Self {
        Money(halalas)
    }

    /// Create from a decimal riyal amount, rounding to the nearest halala
    pub fn from_riyals(riyals: f64) -> Self {
        Money((riyals * HALALAS_PER_RIYAL as f64).round() as i64)
    }

    /// Amount in halalas
    pub const fn halalas(&self) -> i64 {
        self.0
    }

    /// Decimal riyal amount
    pub fn as_riyals(&self) -> f64 {
        self.0 as f64 / HALALAS_PER_RIYAL as f64
    }

    /// `percent`% of this amount, rounded to the nearest halala
    pub fn percent(&self, percent: f64) -> Money {
        Money((self.0 as f64 * percent / 100.0).round() as i64)
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Format for display (e.g., "120.00 SAR")
    pub fn display(&self, lang: Language) -> String {
        format!("{:.2} {}", self.as_riyals(), lang.currency_label())
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.as_riyals())
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Money {
        Money(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_riyals())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // The backend sends `null` for prices it has not set yet
        let riyals = Option::<f64>::deserialize(deserializer)?;
        Ok(riyals.map(Money::from_riyals).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_riyals_rounds() {
        assert_eq!(Money::from_riyals(12.5).halalas(), 1250);
        assert_eq!(Money::from_riyals(0.106).halalas(), 11);
    }

    #[test]
    fn test_percent() {
        assert_eq!(Money::from_riyals(120.0).percent(10.0), Money::from_riyals(12.0));
        assert_eq!(Money::from_halalas(999).percent(50.0), Money::from_halalas(500));
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_riyals(-50.0).display(Language::En), "-50.00 SAR");
        assert_eq!(Money::from_riyals(108.0).display(Language::Ar), "108.00 ر.س");
    }

    #[test]
    fn test_deserialize_decimal_and_null() {
        let m: Money = serde_json::from_str("19.99").unwrap();
        assert_eq!(m.halalas(), 1999);
        let m: Money = serde_json::from_str("null").unwrap();
        assert_eq!(m, Money::ZERO);
    }
}
