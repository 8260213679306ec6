//! Basket Store Module
//!
//! Key/value persistence for session baskets, keyed by the client-chosen
//! basket id. Checkout consumes the basket (see `crate::orders`).

pub mod storage;

pub use storage::{BasketStorage, StorageError, StorageResult};
