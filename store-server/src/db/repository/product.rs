//! Product Repository

use super::{BaseRepository, ProductStore, RepoError, RepoResult, record_key};
use crate::db::models::Product;
use async_trait::async_trait;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const PRODUCT_TABLE: &str = "product";

#[derive(Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Create a new product (catalog seeding; the checkout core never writes
    /// products)
    pub async fn create(&self, product: Product) -> RepoResult<Product> {
        if product.price < 0.0 {
            return Err(RepoError::Validation("price must be non-negative".into()));
        }
        let created: Option<Product> = self
            .base
            .db()
            .create(PRODUCT_TABLE)
            .content(product)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create product".to_string()))
    }
}

#[async_trait]
impl ProductStore for ProductRepository {
    async fn get_by_id(&self, id: &str) -> RepoResult<Option<Product>> {
        let key = record_key(PRODUCT_TABLE, id);
        let product: Option<Product> = self.base.db().select((PRODUCT_TABLE, key)).await?;
        Ok(product)
    }
}
