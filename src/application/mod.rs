//! Application layer containing the transaction orchestration.
//!
//! This module defines the `VendingMachine` engine, the single entry point
//! through which coins, selections, dispensing and refunds flow. It keeps the
//! machine's one session behind a `tokio` mutex so that callers on different
//! tasks always see a consistent balance and selection.

pub mod engine;
