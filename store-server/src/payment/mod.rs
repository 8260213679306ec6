//! Payment Module
//!
//! Remote payment-intent reconciliation: gateway abstraction, the Stripe
//! protocol client, an offline mock, and the reconciler itself.

pub mod gateway;
pub mod manager;
pub mod mock;
pub mod stripe;

// Re-exports
pub use gateway::{GatewayError, GatewayResult, PaymentGateway, PaymentIntent};
pub use manager::PaymentManager;
pub use mock::MockGateway;
pub use stripe::StripeGateway;
