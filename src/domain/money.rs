use crate::error::VendingError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};

/// An exact monetary value.
///
/// Wraps `rust_decimal::Decimal` so that coin matching and change remainders
/// compare exactly. Used for balances, selection costs and change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

/// A strictly positive monetary amount, such as a product price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Money {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// `None` when the sum does not fit in a `Decimal`.
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }
}

impl Price {
    pub fn new(value: Decimal) -> Result<Self, VendingError> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(VendingError::ValidationError(
                "Price must be positive".to_string(),
            ))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Price {
    type Error = VendingError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl From<Price> for Money {
    fn from(price: Price) -> Self {
        Self(price.0)
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.scale() < 2 {
            write!(f, "{:.2}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&Money::from(*self), f)
    }
}

impl Add for Money {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Add::add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_money_arithmetic() {
        let m1 = Money::new(dec!(10.0));
        let m2 = Money::new(dec!(5.0));
        assert_eq!(m1 + m2, Money::new(dec!(15.0)));
        assert_eq!(m1 - m2, Money::new(dec!(5.0)));

        let mut m3 = m1;
        m3 -= Money::new(dec!(0.5));
        m3 += Money::new(dec!(1.0));
        assert_eq!(m3, Money::new(dec!(10.5)));
    }

    #[test]
    fn test_money_is_exact() {
        // 0.1 + 0.2 must be exactly 0.3
        let sum: Money = [dec!(0.1), dec!(0.2)].into_iter().map(Money::new).sum();
        assert_eq!(sum, Money::new(dec!(0.3)));
        assert_eq!(Money::new(dec!(1.0)), Money::new(dec!(1.00)));
    }

    #[test]
    fn test_checked_add_detects_overflow() {
        let one = Money::new(dec!(1));
        assert_eq!(one.checked_add(one), Some(Money::new(dec!(2))));
        assert_eq!(Money::new(Decimal::MAX).checked_add(one), None);
    }

    #[test]
    fn test_money_display() {
        assert_eq!(Money::new(dec!(6)).to_string(), "6.00");
        assert_eq!(Money::new(dec!(3.5)).to_string(), "3.50");
        assert_eq!(Money::new(dec!(0.50)).to_string(), "0.50");
        assert_eq!(Money::new(dec!(0.125)).to_string(), "0.125");
    }

    #[test]
    fn test_price_validation() {
        assert!(Price::new(dec!(1.0)).is_ok());
        assert!(matches!(
            Price::new(dec!(0.0)),
            Err(VendingError::ValidationError(_))
        ));
        assert!(matches!(
            Price::new(dec!(-1.0)),
            Err(VendingError::ValidationError(_))
        ));
    }

    #[test]
    fn test_price_deserialization_rejects_non_positive() {
        let price: Price = serde_json::from_str("\"3.50\"").unwrap();
        assert_eq!(Money::from(price), Money::new(dec!(3.50)));
        assert!(serde_json::from_str::<Price>("\"0\"").is_err());
    }
}
