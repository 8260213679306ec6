//! Repository Module
//!
//! Typed store traits plus the SurrealDB-backed repositories implementing
//! them. One trait per entity, composed through explicit dependency
//! injection in [`crate::core::ServerState`] — there is deliberately no
//! runtime type-keyed repository registry.

pub mod delivery_method;
pub mod memory;
pub mod order;
pub mod payment;
pub mod product;

// Re-exports
pub use delivery_method::DeliveryMethodRepository;
pub use order::OrderRepository;
pub use payment::PaymentRepository;
pub use product::ProductRepository;

use async_trait::async_trait;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

use crate::db::models::{
    CustomerBasket, DeliveryMethod, Order, OrderStatus, Payment, Product,
};

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

// =============================================================================
// ID Convention: 全栈统一使用 "table:id" 格式
// =============================================================================
//
// 外部 ID 一律是字符串，可带或不带表前缀；仓库层用 record_key 归一化。

/// Strip the `table:` prefix from an id if present
pub fn record_key<'a>(table: &str, id: &'a str) -> &'a str {
    id.strip_prefix(table)
        .and_then(|rest| rest.strip_prefix(':'))
        .unwrap_or(id)
}

// =============================================================================
// Store Traits
// =============================================================================

/// Read access to the authoritative product catalog
#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn get_by_id(&self, id: &str) -> RepoResult<Option<Product>>;
}

/// Read access to the delivery methods on offer
#[async_trait]
pub trait DeliveryMethodStore: Send + Sync {
    async fn get_by_id(&self, id: &str) -> RepoResult<Option<DeliveryMethod>>;
    async fn find_all(&self) -> RepoResult<Vec<DeliveryMethod>>;
}

/// Order persistence. Orders are append-only apart from `status`.
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn get_by_id(&self, id: &str) -> RepoResult<Option<Order>>;
    /// Buyer-scoped lookup: returns the order only when it belongs to the
    /// given buyer email
    async fn find_for_buyer(&self, id: &str, buyer_email: &str) -> RepoResult<Option<Order>>;
    async fn find_all_for_buyer(&self, buyer_email: &str) -> RepoResult<Vec<Order>>;
    async fn add(&self, order: Order) -> RepoResult<Order>;
    /// Persist a new status. Returns false when the order does not exist.
    async fn set_status(&self, id: &str, status: OrderStatus) -> RepoResult<bool>;
}

/// Payment record persistence (write-once)
#[async_trait]
pub trait PaymentStore: Send + Sync {
    async fn add(&self, payment: Payment) -> RepoResult<Payment>;
}

/// Basket store keyed by the client-chosen basket id
#[async_trait]
pub trait BasketStore: Send + Sync {
    async fn get(&self, basket_id: &str) -> RepoResult<Option<CustomerBasket>>;
    async fn put(&self, basket: &CustomerBasket) -> RepoResult<()>;
    /// Returns false when no basket was stored under the id
    async fn delete(&self, basket_id: &str) -> RepoResult<bool>;
}

// =============================================================================
// Base Repository
// =============================================================================

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}
