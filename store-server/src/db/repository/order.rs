//! Order Repository

use super::{BaseRepository, OrderStore, RepoError, RepoResult, record_key};
use crate::db::models::{Order, OrderStatus};
use async_trait::async_trait;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

// "order" clashes with the ORDER BY keyword, so the table is plural
const ORDER_TABLE: &str = "orders";

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    fn record_id(id: &str) -> RecordId {
        RecordId::from_table_key(ORDER_TABLE, record_key(ORDER_TABLE, id))
    }
}

#[async_trait]
impl OrderStore for OrderRepository {
    async fn get_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let key = record_key(ORDER_TABLE, id);
        let order: Option<Order> = self.base.db().select((ORDER_TABLE, key)).await?;
        Ok(order)
    }

    async fn find_for_buyer(&self, id: &str, buyer_email: &str) -> RepoResult<Option<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM orders WHERE id = $id AND buyer_email = $email")
            .bind(("id", Self::record_id(id)))
            .bind(("email", buyer_email.to_string()))
            .await?
            .take(0)?;
        Ok(orders.into_iter().next())
    }

    async fn find_all_for_buyer(&self, buyer_email: &str) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM orders WHERE buyer_email = $email ORDER BY order_date DESC")
            .bind(("email", buyer_email.to_string()))
            .await?
            .take(0)?;
        Ok(orders)
    }

    async fn add(&self, order: Order) -> RepoResult<Order> {
        let created: Option<Order> = self.base.db().create(ORDER_TABLE).content(order).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    async fn set_status(&self, id: &str, status: OrderStatus) -> RepoResult<bool> {
        let updated: Vec<Order> = self
            .base
            .db()
            .query("UPDATE $rec SET status = $status RETURN AFTER")
            .bind(("rec", Self::record_id(id)))
            .bind(("status", status.as_str().to_string()))
            .await?
            .take(0)?;
        Ok(!updated.is_empty())
    }
}
