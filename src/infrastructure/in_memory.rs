use crate::domain::ports::ProductCatalog;
use crate::domain::product::{NewProduct, Product, ProductId};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct CatalogData {
    products: BTreeMap<ProductId, Product>,
    last_id: ProductId,
}

/// A thread-safe in-memory product catalog.
///
/// Ids are handed out sequentially starting at 1, so iterating the map in key
/// order yields products in the order they were added.
/// Clones share the same underlying store.
#[derive(Default, Clone)]
pub struct InMemoryProductCatalog {
    data: Arc<RwLock<CatalogData>>,
}

impl InMemoryProductCatalog {
    /// Creates a new, empty in-memory catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalog pre-filled with `products`, saved in order.
    pub async fn with_products(products: impl IntoIterator<Item = NewProduct>) -> Result<Self> {
        let catalog = Self::new();
        for product in products {
            catalog.save(product).await?;
        }
        Ok(catalog)
    }
}

#[async_trait]
impl ProductCatalog for InMemoryProductCatalog {
    async fn find_all(&self) -> Result<Vec<Product>> {
        let data = self.data.read().await;
        Ok(data.products.values().cloned().collect())
    }

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>> {
        let data = self.data.read().await;
        Ok(data.products.get(&id).cloned())
    }

    async fn save(&self, product: NewProduct) -> Result<Product> {
        let mut data = self.data.write().await;
        data.last_id += 1;
        let product = product.with_id(data.last_id);
        data.products.insert(product.id, product.clone());
        Ok(product)
    }
}
