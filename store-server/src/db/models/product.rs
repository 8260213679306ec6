//! Product Model
//!
//! Authoritative catalog entry. This core only ever reads products: the
//! catalog price always wins over any price cached on a basket item.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Catalog product entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub picture_url: Option<String>,
    pub in_stock: i32,
    #[serde(default)]
    pub brand_id: Option<String>,
    #[serde(default)]
    pub type_id: Option<String>,
}

impl Product {
    /// Record id as a "table:key" string (empty before persistence)
    pub fn id_str(&self) -> String {
        self.id.as_ref().map(ToString::to_string).unwrap_or_default()
    }
}
