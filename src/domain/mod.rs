//! Domain types: money, coins, products and the session they flow through.

pub mod coin;
pub mod money;
pub mod ports;
pub mod product;
pub mod session;
