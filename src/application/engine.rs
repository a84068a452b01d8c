use crate::domain::coin::{Denomination, DenominationTable};
use crate::domain::money::{Money, Price};
use crate::domain::ports::ProductCatalogBox;
use crate::domain::product::{NewProduct, Product, ProductId};
use crate::domain::session::{SessionSnapshot, SessionState};
use crate::error::{Result, VendingError};
use rust_decimal::Decimal;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{info, warn};

pub const DISPENSED_MESSAGE: &str = "Products dispensed. Thank you!";
pub const REFUNDED_MESSAGE: &str = "Transaction cancelled. Coins refunded.";
pub const NOTHING_TO_REFUND_MESSAGE: &str = "No coins inserted to refund. Transaction cancelled.";

/// A catalog product together with whether one more of it fits in the
/// remaining balance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductAvailability {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub purchasable: bool,
}

/// A product added to or removed from the selection, with the session as it
/// stood right after the change.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionUpdate {
    pub product: Product,
    pub state: SessionSnapshot,
}

impl SelectionUpdate {
    /// Instances of the changed product left in the selection.
    pub fn quantity_in_selection(&self) -> usize {
        self.state
            .selected_products
            .iter()
            .find(|item| item.product.id == self.product.id)
            .map_or(0, |item| item.quantity)
    }
}

/// Outcome of a successful dispense.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DispenseReceipt {
    pub dispensed_products: Vec<Product>,
    pub change_coins: Vec<Denomination>,
    pub message: String,
}

/// Outcome of a cancelled transaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Refund {
    pub refunded_coins: Vec<Denomination>,
    pub message: String,
}

impl Refund {
    pub fn is_empty(&self) -> bool {
        self.refunded_coins.is_empty()
    }
}

/// The vending machine's transaction engine.
///
/// Owns the single session of the machine behind one mutex. Every operation
/// holds the lock from start to finish, so the balance and the selection are
/// never observed out of step with each other.
pub struct VendingMachine {
    catalog: ProductCatalogBox,
    denominations: DenominationTable,
    session: Mutex<SessionState>,
}

impl VendingMachine {
    /// Creates a new `VendingMachine` instance.
    ///
    /// # Arguments
    ///
    /// * `catalog` - The products the machine can sell.
    /// * `denominations` - The coins the machine accepts and gives back.
    /// * `session` - The initial session, normally `SessionState::new()`.
    pub fn new(
        catalog: ProductCatalogBox,
        denominations: DenominationTable,
        session: SessionState,
    ) -> Self {
        Self {
            catalog,
            denominations,
            session: Mutex::new(session),
        }
    }

    /// Accepts a coin and returns the new balance.
    pub async fn insert_coin(&self, value: Decimal) -> Result<Money> {
        let mut session = self.session.lock().await;

        let Some(coin) = self.denominations.lookup(value) else {
            warn!(value = %value, "coin rejected");
            return Err(VendingError::InvalidCoin {
                value,
                accepted: self
                    .denominations
                    .descending()
                    .iter()
                    .map(Denomination::value)
                    .collect(),
            });
        };

        let balance = session.insert(coin);
        info!(coin = %coin, balance = %balance, "coin inserted");
        Ok(balance)
    }

    /// Lists every catalog product, flagging those that still fit in the
    /// balance left after the current selection.
    pub async fn list_available_products(&self) -> Result<Vec<ProductAvailability>> {
        let session = self.session.lock().await;
        let spendable = session.spendable();

        Ok(self
            .catalog
            .find_all()
            .await?
            .into_iter()
            .map(|product| ProductAvailability {
                purchasable: spendable >= product.cost(),
                id: product.id,
                name: product.name,
                price: product.price,
            })
            .collect())
    }

    /// Adds one instance of a product to the selection.
    pub async fn select_product(&self, id: ProductId) -> Result<SelectionUpdate> {
        let mut session = self.session.lock().await;

        let product = self
            .catalog
            .find_by_id(id)
            .await?
            .ok_or(VendingError::ProductNotFound(id))?;

        if let Err(e) = session.select(product.clone()) {
            warn!(product = id, reason = %e, "selection rejected");
            return Err(e);
        }

        info!(
            product = id,
            selection_cost = %session.selection_cost(),
            balance = %session.balance(),
            "product selected"
        );
        Ok(SelectionUpdate {
            product,
            state: session.snapshot(),
        })
    }

    /// Removes one instance of a product from the selection.
    ///
    /// Returns `None` when the product is not currently selected.
    pub async fn deselect_product(&self, id: ProductId) -> Option<SelectionUpdate> {
        let mut session = self.session.lock().await;
        let Some(product) = session.deselect(id) else {
            info!(product = id, "product not in selection");
            return None;
        };
        info!(
            product = id,
            selection_cost = %session.selection_cost(),
            "product deselected"
        );
        Some(SelectionUpdate {
            product,
            state: session.snapshot(),
        })
    }

    /// Hands out the selected products and the change, then resets the
    /// session.
    ///
    /// If the change cannot be made exactly the session is left as it was,
    /// so the customer can still cancel and get every coin back.
    pub async fn dispense(&self) -> Result<DispenseReceipt> {
        let mut session = self.session.lock().await;

        let change_coins = session
            .amount_due_back()
            .and_then(|change| self.denominations.make_change(change))
            .inspect_err(|e| warn!(reason = %e, "dispense rejected"))?;

        let (dispensed_products, _) = session.take();
        info!(
            items = dispensed_products.len(),
            change_coins = change_coins.len(),
            "products dispensed"
        );

        Ok(DispenseReceipt {
            dispensed_products,
            change_coins,
            message: DISPENSED_MESSAGE.to_string(),
        })
    }

    /// Gives back every inserted coin and resets the session.
    pub async fn cancel_transaction(&self) -> Refund {
        let mut session = self.session.lock().await;
        let (_, refunded_coins) = session.take();
        info!(coins = refunded_coins.len(), "transaction cancelled");

        let message = if refunded_coins.is_empty() {
            NOTHING_TO_REFUND_MESSAGE
        } else {
            REFUNDED_MESSAGE
        };
        Refund {
            refunded_coins,
            message: message.to_string(),
        }
    }

    /// Registers a new product in the catalog.
    pub async fn add_product(&self, name: &str, price: Decimal) -> Result<Product> {
        let product = NewProduct::new(name, Price::new(price)?)?;
        let saved = self.catalog.save(product).await?;
        info!(product = saved.id, name = %saved.name, price = %saved.price, "product added");
        Ok(saved)
    }

    pub async fn current_balance(&self) -> Money {
        self.session.lock().await.balance()
    }

    /// A copy of the current selection, in selection order.
    pub async fn selected_products(&self) -> Vec<Product> {
        self.session.lock().await.selection().to_vec()
    }

    /// A copy of the inserted coins, in insertion order.
    pub async fn inserted_coins(&self) -> Vec<Denomination> {
        self.session.lock().await.inserted_coins().to_vec()
    }

    pub async fn state(&self) -> SessionSnapshot {
        self.session.lock().await.snapshot()
    }
}
