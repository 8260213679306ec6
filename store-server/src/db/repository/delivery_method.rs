//! Delivery Method Repository

use super::{BaseRepository, DeliveryMethodStore, RepoError, RepoResult, record_key};
use crate::db::models::DeliveryMethod;
use async_trait::async_trait;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const DELIVERY_METHOD_TABLE: &str = "delivery_method";

#[derive(Clone)]
pub struct DeliveryMethodRepository {
    base: BaseRepository,
}

impl DeliveryMethodRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Create a new delivery method (seeding)
    pub async fn create(&self, method: DeliveryMethod) -> RepoResult<DeliveryMethod> {
        let created: Option<DeliveryMethod> = self
            .base
            .db()
            .create(DELIVERY_METHOD_TABLE)
            .content(method)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create delivery method".to_string()))
    }
}

#[async_trait]
impl DeliveryMethodStore for DeliveryMethodRepository {
    async fn get_by_id(&self, id: &str) -> RepoResult<Option<DeliveryMethod>> {
        let key = record_key(DELIVERY_METHOD_TABLE, id);
        let method: Option<DeliveryMethod> =
            self.base.db().select((DELIVERY_METHOD_TABLE, key)).await?;
        Ok(method)
    }

    async fn find_all(&self) -> RepoResult<Vec<DeliveryMethod>> {
        let methods: Vec<DeliveryMethod> = self
            .base
            .db()
            .query("SELECT * FROM delivery_method ORDER BY price")
            .await?
            .take(0)?;
        Ok(methods)
    }
}
