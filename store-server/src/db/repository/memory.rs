//! In-memory store backends
//!
//! DashMap-backed implementations of every store trait. They power the unit
//! tests and local runs that don't want an on-disk database, mirroring the
//! on-disk backends' observable behavior (id assignment included).

use async_trait::async_trait;
use dashmap::DashMap;
use surrealdb::RecordId;
use uuid::Uuid;

use super::{
    BasketStore, DeliveryMethodStore, OrderStore, PaymentStore, ProductStore, RepoResult,
    record_key,
};
use crate::db::models::{
    CustomerBasket, DeliveryMethod, Order, OrderStatus, Payment, Product,
};

fn new_key() -> String {
    Uuid::new_v4().simple().to_string()
}

// =============================================================================
// Products
// =============================================================================

#[derive(Debug, Default)]
pub struct MemoryProductStore {
    products: DashMap<String, Product>,
}

impl MemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a product, assigning it a fresh record id
    pub fn insert(&self, mut product: Product) -> Product {
        let key = new_key();
        product.id = Some(RecordId::from_table_key("product", key.as_str()));
        self.products.insert(key, product.clone());
        product
    }

    /// Drop a product (simulates catalog entries disappearing under baskets)
    pub fn remove(&self, id: &str) -> Option<Product> {
        self.products
            .remove(record_key("product", id))
            .map(|(_, p)| p)
    }

    /// Overwrite the catalog price of an existing product
    pub fn set_price(&self, id: &str, price: f64) {
        if let Some(mut entry) = self.products.get_mut(record_key("product", id)) {
            entry.price = price;
        }
    }
}

#[async_trait]
impl ProductStore for MemoryProductStore {
    async fn get_by_id(&self, id: &str) -> RepoResult<Option<Product>> {
        Ok(self
            .products
            .get(record_key("product", id))
            .map(|p| p.clone()))
    }
}

// =============================================================================
// Delivery Methods
// =============================================================================

#[derive(Debug, Default)]
pub struct MemoryDeliveryMethodStore {
    methods: DashMap<String, DeliveryMethod>,
}

impl MemoryDeliveryMethodStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a delivery method, assigning it a fresh record id
    pub fn insert(&self, mut method: DeliveryMethod) -> DeliveryMethod {
        let key = new_key();
        method.id = Some(RecordId::from_table_key("delivery_method", key.as_str()));
        self.methods.insert(key, method.clone());
        method
    }
}

#[async_trait]
impl DeliveryMethodStore for MemoryDeliveryMethodStore {
    async fn get_by_id(&self, id: &str) -> RepoResult<Option<DeliveryMethod>> {
        Ok(self
            .methods
            .get(record_key("delivery_method", id))
            .map(|m| m.clone()))
    }

    async fn find_all(&self) -> RepoResult<Vec<DeliveryMethod>> {
        let mut methods: Vec<DeliveryMethod> =
            self.methods.iter().map(|m| m.clone()).collect();
        methods.sort_by(|a, b| a.price.total_cmp(&b.price));
        Ok(methods)
    }
}

// =============================================================================
// Orders
// =============================================================================

#[derive(Debug, Default)]
pub struct MemoryOrderStore {
    orders: DashMap<String, Order>,
}

impl MemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
    async fn get_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        Ok(self.orders.get(record_key("orders", id)).map(|o| o.clone()))
    }

    async fn find_for_buyer(&self, id: &str, buyer_email: &str) -> RepoResult<Option<Order>> {
        Ok(self
            .orders
            .get(record_key("orders", id))
            .filter(|o| o.buyer_email == buyer_email)
            .map(|o| o.clone()))
    }

    async fn find_all_for_buyer(&self, buyer_email: &str) -> RepoResult<Vec<Order>> {
        let mut orders: Vec<Order> = self
            .orders
            .iter()
            .filter(|o| o.buyer_email == buyer_email)
            .map(|o| o.clone())
            .collect();
        orders.sort_by(|a, b| b.order_date.cmp(&a.order_date));
        Ok(orders)
    }

    async fn add(&self, mut order: Order) -> RepoResult<Order> {
        let key = new_key();
        order.id = Some(RecordId::from_table_key("orders", key.as_str()));
        self.orders.insert(key, order.clone());
        Ok(order)
    }

    async fn set_status(&self, id: &str, status: OrderStatus) -> RepoResult<bool> {
        match self.orders.get_mut(record_key("orders", id)) {
            Some(mut order) => {
                order.status = status;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

// =============================================================================
// Payments
// =============================================================================

#[derive(Debug, Default)]
pub struct MemoryPaymentStore {
    payments: DashMap<String, Payment>,
}

impl MemoryPaymentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All stored payment records (test assertions)
    pub fn all(&self) -> Vec<Payment> {
        self.payments.iter().map(|p| p.clone()).collect()
    }
}

#[async_trait]
impl PaymentStore for MemoryPaymentStore {
    async fn add(&self, mut payment: Payment) -> RepoResult<Payment> {
        let key = new_key();
        payment.id = Some(RecordId::from_table_key("payment", key.as_str()));
        self.payments.insert(key, payment.clone());
        Ok(payment)
    }
}

// =============================================================================
// Baskets
// =============================================================================

#[derive(Debug, Default)]
pub struct MemoryBasketStore {
    baskets: DashMap<String, CustomerBasket>,
}

impl MemoryBasketStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BasketStore for MemoryBasketStore {
    async fn get(&self, basket_id: &str) -> RepoResult<Option<CustomerBasket>> {
        Ok(self.baskets.get(basket_id).map(|b| b.clone()))
    }

    async fn put(&self, basket: &CustomerBasket) -> RepoResult<()> {
        self.baskets.insert(basket.id.clone(), basket.clone());
        Ok(())
    }

    async fn delete(&self, basket_id: &str) -> RepoResult<bool> {
        Ok(self.baskets.remove(basket_id).is_some())
    }
}
