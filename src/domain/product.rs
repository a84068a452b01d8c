use super::money::{Money, Price};
use crate::error::{Result, VendingError};
use serde::{Deserialize, Serialize};

pub type ProductId = u64;

/// A product as stored in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
}

impl Product {
    pub fn cost(&self) -> Money {
        self.price.into()
    }
}

/// A product that has not been saved yet. The catalog assigns its id.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub price: Price,
}

impl NewProduct {
    pub fn new(name: impl Into<String>, price: Price) -> Result<Self> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(VendingError::ValidationError(
                "Product name cannot be blank".to_string(),
            ));
        }
        Ok(Self { name, price })
    }

    pub fn with_id(self, id: ProductId) -> Product {
        Product {
            id,
            name: self.name,
            price: self.price,
        }
    }
}
