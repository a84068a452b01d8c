use crate::domain::money::Price;
use crate::domain::product::NewProduct;
use crate::error::{Result, VendingError};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize)]
struct ProductRow {
    name: String,
    price: String,
}

/// Reads products to seed the catalog from a CSV source with a `name, price` header.
pub struct CatalogReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> CatalogReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(source);
        Self { reader }
    }

    pub fn products(self) -> impl Iterator<Item = Result<NewProduct>> {
        self.reader.into_deserialize().map(|result| {
            let row: ProductRow = result.map_err(VendingError::from)?;
            let price: Decimal = row.price.parse().map_err(|_| {
                VendingError::ValidationError(format!("'{}' is not a valid price", row.price))
            })?;
            NewProduct::new(row.name, Price::new(price)?)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::money::Money;
    use rust_decimal_macros::dec;

    #[test]
    fn test_reader_valid_catalog() {
        let data = "name, price\nWater, 3.50\nChips, 4.00";
        let products: Vec<NewProduct> = CatalogReader::new(data.as_bytes())
            .products()
            .map(|p| p.unwrap())
            .collect();

        assert_eq!(products.len(), 2);
        assert_eq!(products[0].name, "Water");
        assert_eq!(products[0].price.to_string(), "3.50");
        assert_eq!(Money::from(products[1].price), Money::new(dec!(4.00)));
    }

    #[test]
    fn test_reader_rejects_invalid_rows() {
        let data = "name, price\nFree, 0\n, 1.00\nOdd, abc";
        let results: Vec<Result<NewProduct>> = CatalogReader::new(data.as_bytes()).products().collect();

        assert!(matches!(results[0], Err(VendingError::ValidationError(_))));
        assert!(matches!(results[1], Err(VendingError::ValidationError(_))));
        assert!(matches!(results[2], Err(VendingError::ValidationError(_))));
    }
}
