use super::money::Money;
use crate::error::{Result, VendingError};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use std::fmt;

/// One accepted coin value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Denomination(Money);

impl Denomination {
    pub fn value(&self) -> Money {
        self.0
    }
}

impl From<Denomination> for Money {
    fn from(coin: Denomination) -> Self {
        coin.0
    }
}

impl fmt::Display for Denomination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// The fixed set of coins the machine accepts, kept sorted largest first.
#[derive(Debug, Clone, PartialEq)]
pub struct DenominationTable {
    descending: Vec<Denomination>,
}

impl DenominationTable {
    /// Builds a table from configured coin values.
    ///
    /// The values must be non-empty, strictly positive and unique
    /// (`1.0` and `1.00` count as the same value).
    pub fn new(values: impl IntoIterator<Item = Decimal>) -> Result<Self> {
        let mut descending = Vec::new();
        for value in values {
            if value <= Decimal::ZERO {
                return Err(VendingError::ValidationError(format!(
                    "Coin value must be positive, got {value}"
                )));
            }
            let coin = Denomination(Money::new(value));
            if descending.contains(&coin) {
                return Err(VendingError::ValidationError(format!(
                    "Duplicate coin value {coin}"
                )));
            }
            descending.push(coin);
        }
        if descending.is_empty() {
            return Err(VendingError::ValidationError(
                "At least one coin value must be configured".to_string(),
            ));
        }
        descending.sort_by(|a, b| b.cmp(a));
        Ok(Self { descending })
    }

    pub fn is_accepted(&self, value: Decimal) -> bool {
        self.lookup(value).is_some()
    }

    pub fn lookup(&self, value: Decimal) -> Option<Denomination> {
        self.descending
            .iter()
            .copied()
            .find(|coin| coin.value().value() == value)
    }

    pub fn descending(&self) -> &[Denomination] {
        &self.descending
    }

    /// Decomposes `amount` into coins, largest denomination first.
    ///
    /// Fails with `InexactChange` when the table cannot represent the whole
    /// amount; no partial list is ever returned.
    pub fn make_change(&self, amount: Money) -> Result<Vec<Denomination>> {
        let mut change = Vec::new();
        let mut remaining = amount;
        for coin in &self.descending {
            while remaining >= coin.value() {
                change.push(*coin);
                remaining -= coin.value();
            }
        }
        if remaining.is_zero() {
            Ok(change)
        } else {
            Err(VendingError::InexactChange { amount, remaining })
        }
    }
}

impl Default for DenominationTable {
    /// Moroccan dirham coins: 0.50, 1, 2, 5 and 10.
    fn default() -> Self {
        let descending = [dec!(10.00), dec!(5.00), dec!(2.00), dec!(1.00), dec!(0.50)]
            .into_iter()
            .map(|value| Denomination(Money::new(value)))
            .collect();
        Self { descending }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(coins: &[Denomination]) -> Vec<Decimal> {
        coins.iter().map(|c| c.value().value()).collect()
    }

    #[test]
    fn test_default_table_is_descending() {
        let table = DenominationTable::default();
        assert_eq!(
            values(table.descending()),
            vec![dec!(10), dec!(5), dec!(2), dec!(1), dec!(0.5)]
        );
    }

    #[test]
    fn test_lookup_is_exact() {
        let table = DenominationTable::default();
        assert!(table.is_accepted(dec!(0.5)));
        assert!(table.is_accepted(dec!(1.000)));
        assert!(!table.is_accepted(dec!(0.75)));
        assert!(!table.is_accepted(dec!(0.49999)));
        assert!(!table.is_accepted(dec!(20)));

        // The table's own scale is returned.
        let coin = table.lookup(dec!(1)).unwrap();
        assert_eq!(coin.to_string(), "1.00");
    }

    #[test]
    fn test_new_sorts_and_validates() {
        let table = DenominationTable::new([dec!(0.25), dec!(1), dec!(0.10)]).unwrap();
        assert_eq!(
            values(table.descending()),
            vec![dec!(1), dec!(0.25), dec!(0.10)]
        );

        assert!(matches!(
            DenominationTable::new(Vec::new()),
            Err(VendingError::ValidationError(_))
        ));
        assert!(matches!(
            DenominationTable::new([dec!(1.0), dec!(1.00)]),
            Err(VendingError::ValidationError(_))
        ));
        assert!(matches!(
            DenominationTable::new([dec!(0), dec!(1)]),
            Err(VendingError::ValidationError(_))
        ));
    }

    #[test]
    fn test_make_change_greedy() {
        let table = DenominationTable::default();
        let change = table.make_change(Money::new(dec!(18.50))).unwrap();
        assert_eq!(
            values(&change),
            vec![dec!(10), dec!(5), dec!(2), dec!(1), dec!(0.5)]
        );

        let change = table.make_change(Money::new(dec!(4.00))).unwrap();
        assert_eq!(values(&change), vec![dec!(2), dec!(2)]);
    }

    #[test]
    fn test_make_change_zero_is_empty() {
        let table = DenominationTable::default();
        assert!(table.make_change(Money::ZERO).unwrap().is_empty());
    }

    #[test]
    fn test_make_change_reports_remainder() {
        let table = DenominationTable::default();
        let err = table.make_change(Money::new(dec!(1.30))).unwrap_err();
        match err {
            VendingError::InexactChange { amount, remaining } => {
                assert_eq!(amount, Money::new(dec!(1.30)));
                assert_eq!(remaining, Money::new(dec!(0.30)));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
