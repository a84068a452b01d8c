#![allow(dead_code)]

use distributor::application::engine::VendingMachine;
use distributor::domain::coin::DenominationTable;
use distributor::domain::money::{Money, Price};
use distributor::domain::product::NewProduct;
use distributor::domain::session::SessionState;
use distributor::infrastructure::in_memory::InMemoryProductCatalog;
use rust_decimal::Decimal;
use std::fs::File;
use std::io::Error;
use std::path::Path;

/// Builds a machine with the default coins and one product per price,
/// named "Product 1", "Product 2", ... with ids in the same order.
pub async fn machine_with_prices(prices: &[Decimal]) -> VendingMachine {
    let products = prices.iter().enumerate().map(|(i, price)| {
        NewProduct::new(format!("Product {}", i + 1), Price::new(*price).unwrap()).unwrap()
    });
    let catalog = InMemoryProductCatalog::with_products(products).await.unwrap();
    VendingMachine::new(
        Box::new(catalog),
        DenominationTable::default(),
        SessionState::new(),
    )
}

/// Sum of the values of a list of coins.
pub fn total<T: Copy + Into<Money>>(coins: &[T]) -> Money {
    coins.iter().map(|c| (*c).into()).sum()
}

/// Writes a CSV file with the given header and rows.
pub fn write_csv(path: &Path, header: &[&str], rows: &[&[&str]]) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().flexible(true).from_writer(file);
    wtr.write_record(header)?;
    for row in rows {
        wtr.write_record(*row)?;
    }
    wtr.flush()?;
    Ok(())
}
