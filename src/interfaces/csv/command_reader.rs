use crate::domain::product::ProductId;
use crate::error::{Result, VendingError};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

/// One step of a vending session script.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Insert(Decimal),
    Select(ProductId),
    Deselect(ProductId),
    Products,
    State,
    Dispense,
    Cancel,
    Add { name: String, price: Decimal },
}

#[derive(Debug, Deserialize)]
struct CommandRow {
    action: String,
    #[serde(default)]
    arg: Option<String>,
    #[serde(default)]
    price: Option<String>,
}

impl CommandRow {
    fn required_arg(&self) -> Result<&str> {
        self.arg.as_deref().ok_or_else(|| {
            VendingError::ValidationError(format!("'{}' requires an argument", self.action))
        })
    }

    fn product_id(&self) -> Result<ProductId> {
        let arg = self.required_arg()?;
        arg.parse().map_err(|_| {
            VendingError::ValidationError(format!("'{arg}' is not a valid product id"))
        })
    }
}

impl TryFrom<CommandRow> for Command {
    type Error = VendingError;

    fn try_from(row: CommandRow) -> Result<Self> {
        match row.action.to_ascii_lowercase().as_str() {
            "insert" => {
                let arg = row.required_arg()?;
                let value = arg.parse().map_err(|_| {
                    VendingError::ValidationError(format!("'{arg}' is not a valid coin value"))
                })?;
                Ok(Command::Insert(value))
            }
            "select" => Ok(Command::Select(row.product_id()?)),
            "deselect" => Ok(Command::Deselect(row.product_id()?)),
            "products" => Ok(Command::Products),
            "state" => Ok(Command::State),
            "dispense" => Ok(Command::Dispense),
            "cancel" => Ok(Command::Cancel),
            "add" => {
                let name = row.required_arg()?.to_string();
                let price = row.price.as_deref().ok_or_else(|| {
                    VendingError::ValidationError("'add' requires a price".to_string())
                })?;
                let price = price.parse().map_err(|_| {
                    VendingError::ValidationError(format!("'{price}' is not a valid price"))
                })?;
                Ok(Command::Add { name, price })
            }
            other => Err(VendingError::ValidationError(format!(
                "unknown action '{other}'"
            ))),
        }
    }
}

/// Reads session commands from a CSV source with an `action, arg, price` header.
///
/// Trailing columns may be omitted, so `dispense` alone is a valid row.
pub struct CommandReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> CommandReader<R> {
    /// Creates a new `CommandReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and parses commands.
    ///
    /// A malformed row yields an error item and does not end the iteration.
    pub fn commands(self) -> impl Iterator<Item = Result<Command>> {
        self.reader.into_deserialize().map(|result| {
            let row: CommandRow = result.map_err(VendingError::from)?;
            Command::try_from(row)
        })
    }
}
