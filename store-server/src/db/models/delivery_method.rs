//! Delivery Method Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Shipping option offered at checkout (read-only for this core)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryMethod {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    pub short_name: String,
    pub delivery_time: String,
    pub description: String,
    pub price: f64,
}

impl DeliveryMethod {
    /// Record id as a "table:key" string (empty before persistence)
    pub fn id_str(&self) -> String {
        self.id.as_ref().map(ToString::to_string).unwrap_or_default()
    }
}
