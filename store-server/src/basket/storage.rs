//! redb-based storage layer for customer baskets
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `baskets` | `basket_id` | `CustomerBasket` (JSON) | Session baskets |
//!
//! Basket ids are chosen by the client and stable for the session, so the
//! store is a plain key/value table rather than a document collection. redb
//! commits are durable as soon as `commit()` returns, which is what keeps a
//! half-finished checkout from resurrecting a stale basket after a restart.

use async_trait::async_trait;
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use crate::db::models::CustomerBasket;
use crate::db::repository::{BasketStore, RepoError, RepoResult};

/// Table for storing baskets: key = basket_id, value = JSON-serialized CustomerBasket
const BASKETS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("baskets");

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for RepoError {
    fn from(err: StorageError) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Basket store backed by redb
#[derive(Clone)]
pub struct BasketStorage {
    db: Arc<Database>,
}

impl BasketStorage {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;

        // Create the table up front so reads never race table creation
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(BASKETS_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;

        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(BASKETS_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    fn read(&self, basket_id: &str) -> StorageResult<Option<CustomerBasket>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(BASKETS_TABLE)?;
        match table.get(basket_id)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    fn write(&self, basket: &CustomerBasket) -> StorageResult<()> {
        let bytes = serde_json::to_vec(basket)?;
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(BASKETS_TABLE)?;
            table.insert(basket.id.as_str(), bytes.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn remove(&self, basket_id: &str) -> StorageResult<bool> {
        let write_txn = self.db.begin_write()?;
        let existed = {
            let mut table = write_txn.open_table(BASKETS_TABLE)?;
            table.remove(basket_id)?.is_some()
        };
        write_txn.commit()?;
        Ok(existed)
    }
}

#[async_trait]
impl BasketStore for BasketStorage {
    async fn get(&self, basket_id: &str) -> RepoResult<Option<CustomerBasket>> {
        Ok(self.read(basket_id)?)
    }

    async fn put(&self, basket: &CustomerBasket) -> RepoResult<()> {
        Ok(self.write(basket)?)
    }

    async fn delete(&self, basket_id: &str) -> RepoResult<bool> {
        Ok(self.remove(basket_id)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::BasketItem;

    fn sample_basket(id: &str) -> CustomerBasket {
        let mut basket = CustomerBasket::new(id);
        basket.items.push(BasketItem {
            product_id: "product:p1".to_string(),
            product_name: "Keyboard".to_string(),
            price: 49.99,
            quantity: 2,
            picture_url: None,
            brand: Some("Acme".to_string()),
            product_type: Some("Peripherals".to_string()),
        });
        basket
    }

    #[tokio::test]
    async fn put_get_delete_round_trip() {
        let store = BasketStorage::open_in_memory().unwrap();

        assert!(store.get("b1").await.unwrap().is_none());

        let basket = sample_basket("b1");
        store.put(&basket).await.unwrap();

        let loaded = store.get("b1").await.unwrap().unwrap();
        assert_eq!(loaded.id, "b1");
        assert_eq!(loaded.items.len(), 1);
        assert_eq!(loaded.items[0].price, 49.99);

        assert!(store.delete("b1").await.unwrap());
        assert!(store.get("b1").await.unwrap().is_none());
        assert!(!store.delete("b1").await.unwrap());
    }

    #[tokio::test]
    async fn put_overwrites_existing_basket() {
        let store = BasketStorage::open_in_memory().unwrap();

        let mut basket = sample_basket("b2");
        store.put(&basket).await.unwrap();

        basket.payment_intent_id = Some("pi_123".to_string());
        basket.client_secret = Some("secret_123".to_string());
        store.put(&basket).await.unwrap();

        let loaded = store.get("b2").await.unwrap().unwrap();
        assert_eq!(loaded.payment_intent_id.as_deref(), Some("pi_123"));
        assert_eq!(loaded.client_secret.as_deref(), Some("secret_123"));
    }
}
