//! Payment Gateway Abstraction
//!
//! A payment intent is a remote, stateful charge attempt identified by an
//! opaque id and carrying a client secret for the payer's client. The
//! gateway only ever creates intents or updates their amount; everything
//! else about the charge lifecycle is the provider's business.

use async_trait::async_trait;
use thiserror::Error;

/// Remote intent handle returned on creation
#[derive(Debug, Clone)]
pub struct PaymentIntent {
    pub intent_id: String,
    pub client_secret: String,
}

/// Gateway errors
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The referenced intent no longer exists upstream (expired or
    /// invalidated). The reconciler recovers from this one case by creating
    /// a replacement intent; every other failure propagates.
    #[error("Payment intent not found: {0}")]
    IntentNotFound(String),

    #[error("Gateway request failed: {0}")]
    Request(String),

    #[error("Unexpected gateway response: {0}")]
    InvalidResponse(String),
}

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Remote payment provider
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create an intent for the given minor-unit amount
    async fn create_intent(&self, amount_minor: i64, currency: &str)
    -> GatewayResult<PaymentIntent>;

    /// Update the amount of an existing intent in place
    async fn update_intent_amount(&self, intent_id: &str, amount_minor: i64) -> GatewayResult<()>;
}
