//! Mock payment gateway
//!
//! Deterministic in-process gateway for tests and offline runs. Intent ids
//! are sequential (`pi_mock_1`, `pi_mock_2`, …). Supports two failure
//! injections: forgetting an intent (upstream expiry) and hard-failing
//! updates (provider outage).

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use super::gateway::{GatewayError, GatewayResult, PaymentGateway, PaymentIntent};

#[derive(Debug, Default)]
pub struct MockGateway {
    counter: AtomicU64,
    update_calls: AtomicU64,
    /// intent_id -> current amount in minor units
    intents: DashMap<String, i64>,
    fail_updates: AtomicBool,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many intents have been created
    pub fn created_count(&self) -> u64 {
        self.counter.load(Ordering::SeqCst)
    }

    /// How many update calls reached the gateway
    pub fn update_count(&self) -> u64 {
        self.update_calls.load(Ordering::SeqCst)
    }

    /// Current amount stored for an intent
    pub fn amount_of(&self, intent_id: &str) -> Option<i64> {
        self.intents.get(intent_id).map(|a| *a)
    }

    /// Drop an intent, simulating upstream expiry/invalidation
    pub fn forget(&self, intent_id: &str) {
        self.intents.remove(intent_id);
    }

    /// Make every subsequent update fail with a non-recoverable error
    pub fn set_fail_updates(&self, fail: bool) {
        self.fail_updates.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl PaymentGateway for MockGateway {
    async fn create_intent(
        &self,
        amount_minor: i64,
        _currency: &str,
    ) -> GatewayResult<PaymentIntent> {
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        let intent_id = format!("pi_mock_{n}");
        self.intents.insert(intent_id.clone(), amount_minor);
        Ok(PaymentIntent {
            client_secret: format!("{intent_id}_secret"),
            intent_id,
        })
    }

    async fn update_intent_amount(&self, intent_id: &str, amount_minor: i64) -> GatewayResult<()> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(GatewayError::Request("gateway unavailable".to_string()));
        }
        match self.intents.get_mut(intent_id) {
            Some(mut amount) => {
                *amount = amount_minor;
                Ok(())
            }
            None => Err(GatewayError::IntentNotFound(intent_id.to_string())),
        }
    }
}
