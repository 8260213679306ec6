//! Payment Model
//!
//! One record per order, written once at checkout and never mutated.

use super::serde_helpers;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Payment record created during order aggregation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    /// Remote intent carried over from the basket, when one was created
    #[serde(default)]
    pub payment_intent_id: Option<String>,
    pub amount: f64,
    pub currency: String,
    pub created_at: DateTime<Utc>,
}

impl Payment {
    /// Record id as a "table:key" string (empty before persistence)
    pub fn id_str(&self) -> String {
        self.id.as_ref().map(ToString::to_string).unwrap_or_default()
    }
}
