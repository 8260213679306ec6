//! Customer Basket Model
//!
//! A basket is owned by the client session: the id is client-chosen and
//! stable for the session, items are denormalized product snapshots, and the
//! whole document dies at checkout. Cached item prices are advisory only —
//! `PaymentManager::sync_intent` is the single path allowed to rewrite them.

use serde::{Deserialize, Serialize};

/// Denormalized snapshot of a product at the time it was added
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasketItem {
    pub product_id: String,
    pub product_name: String,
    /// Advisory price cached at add-time; reconciled against the catalog
    /// before any monetary calculation
    pub price: f64,
    pub quantity: i32,
    #[serde(default)]
    pub picture_url: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub product_type: Option<String>,
}

/// Mutable, session-scoped basket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerBasket {
    /// Client-chosen identifier, stable across the session
    pub id: String,
    #[serde(default)]
    pub items: Vec<BasketItem>,
    #[serde(default)]
    pub delivery_method_id: Option<String>,
    #[serde(default)]
    pub payment_intent_id: Option<String>,
    #[serde(default)]
    pub client_secret: Option<String>,
}

impl CustomerBasket {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            items: Vec::new(),
            delivery_method_id: None,
            payment_intent_id: None,
            client_secret: None,
        }
    }
}
