use crate::domain::money::Money;
use crate::domain::product::ProductId;
use rust_decimal::Decimal;
use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, VendingError>;

#[derive(Error, Debug)]
pub enum VendingError {
    #[error("Invalid coin value: {value}. Accepted values: {}", join(.accepted))]
    InvalidCoin { value: Decimal, accepted: Vec<Money> },
    #[error("Product with ID {0} not found.")]
    ProductNotFound(ProductId),
    #[error("{0}")]
    InsufficientFunds(Shortfall),
    #[error("No products selected for dispensing.")]
    NoItemSelected,
    #[error("Could not make exact change for {amount}. Remaining: {remaining}")]
    InexactChange { amount: Money, remaining: Money },
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Internal error: {0}")]
    InternalError(Box<dyn std::error::Error + Send + Sync>),
}

/// Coarse classification of a [`VendingError`], used by callers that translate
/// failures into user-facing responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidCoin,
    ProductNotFound,
    InsufficientFunds,
    NoItemSelected,
    ValidationFailed,
    InternalError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidCoin => "invalid_coin",
            ErrorKind::ProductNotFound => "product_not_found",
            ErrorKind::InsufficientFunds => "insufficient_funds",
            ErrorKind::NoItemSelected => "no_item_selected",
            ErrorKind::ValidationFailed => "validation_failed",
            ErrorKind::InternalError => "internal_error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl VendingError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            VendingError::InvalidCoin { .. } => ErrorKind::InvalidCoin,
            VendingError::ProductNotFound(_) => ErrorKind::ProductNotFound,
            VendingError::InsufficientFunds(_) => ErrorKind::InsufficientFunds,
            VendingError::NoItemSelected => ErrorKind::NoItemSelected,
            VendingError::ValidationError(_) | VendingError::CsvError(_) => {
                ErrorKind::ValidationFailed
            }
            VendingError::InexactChange { .. }
            | VendingError::IoError(_)
            | VendingError::InternalError(_) => ErrorKind::InternalError,
        }
    }

    /// Message safe to show to a customer. Internal failures are reduced to a
    /// generic sentence; the details stay in the logs.
    pub fn public_message(&self) -> String {
        match self.kind() {
            ErrorKind::InternalError => {
                "An unexpected error occurred. Please try again later.".to_string()
            }
            _ => self.to_string(),
        }
    }
}

/// Details of a rejected selection or dispense.
#[derive(Debug, Clone, PartialEq)]
pub enum Shortfall {
    Selection {
        product: String,
        price: Money,
        selected_cost: Money,
        needed: Money,
        balance: Money,
    },
    Dispense {
        needed: Money,
        balance: Money,
    },
}

impl Shortfall {
    /// Amount still missing to cover the request.
    pub fn missing(&self) -> Money {
        match self {
            Shortfall::Selection {
                needed, balance, ..
            }
            | Shortfall::Dispense { needed, balance } => *needed - *balance,
        }
    }
}

impl fmt::Display for Shortfall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shortfall::Selection {
                product,
                price,
                selected_cost,
                needed,
                balance,
            } => write!(
                f,
                "Insufficient funds to add '{product}' ({price}). Current selection cost: {selected_cost}. Total needed: {needed}. Balance: {balance}"
            ),
            Shortfall::Dispense { needed, balance } => write!(
                f,
                "Insufficient funds to dispense. Total cost: {needed}, Current balance: {balance}"
            ),
        }
    }
}

fn join(values: &[Money]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
