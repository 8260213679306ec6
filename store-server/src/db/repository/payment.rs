//! Payment Repository
//!
//! 独立 payment 表，每张订单写入一条记录，之后不再变更。

use super::{BaseRepository, PaymentStore, RepoError, RepoResult};
use crate::db::models::Payment;
use async_trait::async_trait;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const PAYMENT_TABLE: &str = "payment";

#[derive(Clone)]
pub struct PaymentRepository {
    base: BaseRepository,
}

impl PaymentRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }
}

#[async_trait]
impl PaymentStore for PaymentRepository {
    async fn add(&self, payment: Payment) -> RepoResult<Payment> {
        let created: Option<Payment> = self
            .base
            .db()
            .create(PAYMENT_TABLE)
            .content(payment)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create payment record".to_string()))
    }
}
