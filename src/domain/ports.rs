use super::product::{NewProduct, Product, ProductId};
use crate::error::Result;
use async_trait::async_trait;

/// Storage for the products the machine can sell.
///
/// The engine only reads from it, except when an administrator adds a product.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// All products, in catalog order.
    async fn find_all(&self) -> Result<Vec<Product>>;
    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>>;
    /// Persists a new product and returns it with its assigned id.
    async fn save(&self, product: NewProduct) -> Result<Product>;
}

pub type ProductCatalogBox = Box<dyn ProductCatalog>;
pub type ProductCatalogFactory = Box<dyn Fn() -> ProductCatalogBox + Send + Sync>;
