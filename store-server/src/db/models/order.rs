//! Order Model
//!
//! An order is the immutable record of a completed checkout. The totals are
//! fixed at creation time and never recalculated, even when catalog prices
//! move afterwards — they are the price actually charged. Only `status` may
//! change after creation.

use super::serde_helpers;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

// =============================================================================
// Order Status
// =============================================================================

/// Closed set of order status labels.
///
/// Validation is membership-only: any valid label may replace any other
/// valid label. There is no transition-edge enforcement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    /// Parse an exact status label. Returns `None` for anything outside the
    /// closed set (case-sensitive).
    pub fn parse(label: &str) -> Option<OrderStatus> {
        match label {
            "Pending" => Some(OrderStatus::Pending),
            "Processing" => Some(OrderStatus::Processing),
            "Shipped" => Some(OrderStatus::Shipped),
            "Delivered" => Some(OrderStatus::Delivered),
            "Cancelled" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Processing => "Processing",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Order
// =============================================================================

/// Line item priced at purchase time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: String,
    /// Catalog price at the moment the order was created
    pub price: f64,
    pub quantity: i32,
}

/// Persisted order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    pub buyer_email: String,
    pub order_date: DateTime<Utc>,
    pub delivery_method_id: String,
    pub order_items: Vec<OrderItem>,
    /// Σ(item.price × item.quantity), fixed at creation
    pub subtotal: f64,
    /// subtotal + delivery price, fixed at creation
    pub total: f64,
    pub status: OrderStatus,
    #[serde(default)]
    pub payment_intent_id: Option<String>,
    pub payment_id: String,
}

impl Order {
    /// Record id as a "table:key" string (empty before persistence)
    pub fn id_str(&self) -> String {
        self.id.as_ref().map(ToString::to_string).unwrap_or_default()
    }
}

// =============================================================================
// API Response Types
// =============================================================================

/// Order projected to its external representation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetail {
    pub order_id: String,
    pub buyer_email: String,
    pub order_date: DateTime<Utc>,
    pub delivery_method_id: String,
    /// Delivery price resolved at read time
    pub shipping_price: f64,
    pub items: Vec<OrderItem>,
    pub subtotal: f64,
    pub total: f64,
    pub status: OrderStatus,
    #[serde(default)]
    pub payment_intent_id: Option<String>,
    pub payment_id: String,
}
