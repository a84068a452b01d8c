use crate::application::engine::{DispenseReceipt, ProductAvailability, Refund};
use crate::domain::money::Money;
use crate::domain::product::{Product, ProductId};
use crate::domain::session::SessionSnapshot;
use crate::error::{Result, VendingError};
use serde::Serialize;
use std::io::Write;

/// The result of one script command, as reported to the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Outcome {
    Balance { current_balance: Money },
    Products { products: Vec<ProductAvailability> },
    Selected(SelectionChange),
    Deselected(SelectionChange),
    NotInSelection { product_id: ProductId, message: String },
    Dispensed(DispenseReceipt),
    Refunded(Refund),
    State(SessionSnapshot),
    ProductAdded { product: Product },
    Error { error: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionChange {
    pub message: String,
    pub product: Product,
    pub quantity_in_selection: usize,
    pub current_selected_items_cost: Money,
    pub current_balance: Money,
}

impl From<&VendingError> for Outcome {
    fn from(err: &VendingError) -> Self {
        Outcome::Error {
            error: err.kind().to_string(),
            message: err.public_message(),
        }
    }
}

/// Writes outcomes as JSON lines.
pub struct OutcomeWriter<W: Write> {
    writer: W,
}

impl<W: Write> OutcomeWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn write(&mut self, outcome: &Outcome) -> Result<()> {
        serde_json::to_writer(&mut self.writer, outcome)
            .map_err(|e| VendingError::InternalError(Box::new(e)))?;
        writeln!(self.writer)?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::Value;

    fn write_one(outcome: &Outcome) -> Value {
        let mut buffer = Vec::new();
        let mut writer = OutcomeWriter::new(&mut buffer);
        writer.write(outcome).unwrap();
        writer.flush().unwrap();
        let line = String::from_utf8(buffer).unwrap();
        assert!(line.ends_with('\n'));
        serde_json::from_str(&line).unwrap()
    }

    #[test]
    fn test_balance_outcome_is_tagged() {
        let value = write_one(&Outcome::Balance {
            current_balance: Money::new(dec!(6.00)),
        });
        assert_eq!(value["action"], "balance");
        assert_eq!(value["current_balance"], "6.00");
    }

    #[test]
    fn test_refund_outcome_flattens_struct() {
        let value = write_one(&Outcome::Refunded(Refund {
            refunded_coins: Vec::new(),
            message: "No coins inserted to refund. Transaction cancelled.".to_string(),
        }));
        assert_eq!(value["action"], "refunded");
        assert_eq!(value["refunded_coins"], Value::Array(Vec::new()));
    }

    #[test]
    fn test_error_outcome_uses_kind() {
        let value = write_one(&Outcome::from(&VendingError::NoItemSelected));
        assert_eq!(value["action"], "error");
        assert_eq!(value["error"], "no_item_selected");
        assert_eq!(value["message"], "No products selected for dispensing.");
    }
}
