use super::coin::Denomination;
use super::money::Money;
use super::product::{Product, ProductId};
use crate::error::{Result, Shortfall, VendingError};
use rust_decimal::Decimal;
use serde::Serialize;

/// The state of the one transaction in progress.
///
/// Tracks the coins inserted since the last reset, their total, and the
/// products tentatively selected against that total. Every mutation either
/// succeeds completely or leaves the state untouched.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SessionState {
    balance: Money,
    inserted_coins: Vec<Denomination>,
    selection: Vec<Product>,
}

/// Read-only copy of a session, with the selection grouped per product.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub balance: Money,
    pub selected_products: Vec<SelectedItem>,
    pub total_selected_cost: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectedItem {
    #[serde(flatten)]
    pub product: Product,
    pub quantity: usize,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance(&self) -> Money {
        self.balance
    }

    pub fn inserted_coins(&self) -> &[Denomination] {
        &self.inserted_coins
    }

    pub fn selection(&self) -> &[Product] {
        &self.selection
    }

    pub fn is_idle(&self) -> bool {
        self.balance.is_zero() && self.selection.is_empty()
    }

    pub fn selection_cost(&self) -> Money {
        self.selection.iter().map(Product::cost).sum()
    }

    /// Balance left once the current selection is paid for.
    pub fn spendable(&self) -> Money {
        self.balance - self.selection_cost()
    }

    /// Number of instances of `id` currently selected.
    pub fn quantity_of(&self, id: ProductId) -> usize {
        self.selection.iter().filter(|p| p.id == id).count()
    }

    /// Records an accepted coin and returns the new balance.
    pub fn insert(&mut self, coin: Denomination) -> Money {
        self.inserted_coins.push(coin);
        self.balance += coin.value();
        self.balance
    }

    /// Adds one more instance of `product` if the balance still covers the
    /// whole selection afterwards.
    ///
    /// A total that overflows `Decimal` can never be covered by the balance
    /// and is reported as a shortfall at `Decimal::MAX`.
    pub fn select(&mut self, product: Product) -> Result<()> {
        let selected_cost = self.selection_cost();
        let price = product.cost();
        match selected_cost.checked_add(price) {
            Some(needed) if needed <= self.balance => {
                self.selection.push(product);
                Ok(())
            }
            needed => Err(VendingError::InsufficientFunds(Shortfall::Selection {
                product: product.name,
                price,
                selected_cost,
                needed: needed.unwrap_or(Money::new(Decimal::MAX)),
                balance: self.balance,
            })),
        }
    }

    /// Removes the first selected instance of `id`, if any.
    pub fn deselect(&mut self, id: ProductId) -> Option<Product> {
        let index = self.selection.iter().position(|p| p.id == id)?;
        Some(self.selection.remove(index))
    }

    /// Checks that the selection can be dispensed and returns its change amount.
    pub fn amount_due_back(&self) -> Result<Money> {
        if self.selection.is_empty() {
            return Err(VendingError::NoItemSelected);
        }
        let needed = self.selection_cost();
        if self.balance < needed {
            return Err(VendingError::InsufficientFunds(Shortfall::Dispense {
                needed,
                balance: self.balance,
            }));
        }
        Ok(self.balance - needed)
    }

    /// Resets to the idle state, handing back the selection and the coins
    /// that were inserted.
    pub fn take(&mut self) -> (Vec<Product>, Vec<Denomination>) {
        let finished = std::mem::take(self);
        (finished.selection, finished.inserted_coins)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let mut selected_products: Vec<SelectedItem> = Vec::new();
        for product in &self.selection {
            match selected_products
                .iter_mut()
                .find(|item| item.product.id == product.id)
            {
                Some(item) => item.quantity += 1,
                None => selected_products.push(SelectedItem {
                    product: product.clone(),
                    quantity: 1,
                }),
            }
        }
        SessionSnapshot {
            balance: self.balance,
            selected_products,
            total_selected_cost: self.selection_cost(),
        }
    }
}
