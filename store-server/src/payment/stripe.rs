//! Stripe-protocol gateway client
//!
//! Speaks the payment-intents subset of the Stripe HTTP API: form-encoded
//! create/update requests authenticated with the secret key. Works against
//! any Stripe-compatible endpoint (`api_base` is configurable for test
//! doubles).

use async_trait::async_trait;
use serde::Deserialize;

use super::gateway::{GatewayError, GatewayResult, PaymentGateway, PaymentIntent};

/// Stripe error code for a reference to a missing object
const RESOURCE_MISSING: &str = "resource_missing";

#[derive(Debug, Deserialize)]
struct IntentResponse {
    id: String,
    client_secret: String,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

/// Payment gateway backed by the Stripe payment-intents API
pub struct StripeGateway {
    api_base: String,
    secret_key: String,
    client: reqwest::Client,
}

impl StripeGateway {
    pub fn new(api_base: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
            secret_key: secret_key.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Read a failed response body and classify the error
    async fn classify_failure(intent_id: Option<&str>, resp: reqwest::Response) -> GatewayError {
        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();

        if let Some(id) = intent_id {
            let missing = serde_json::from_str::<ErrorBody>(&text)
                .map(|body| {
                    body.error.code.as_deref() == Some(RESOURCE_MISSING)
                        || body
                            .error
                            .message
                            .as_deref()
                            .is_some_and(|m| m.contains("No such payment_intent"))
                })
                .unwrap_or(false);
            if missing {
                return GatewayError::IntentNotFound(id.to_string());
            }
        }

        GatewayError::Request(format!("{} - {}", status, text))
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn create_intent(
        &self,
        amount_minor: i64,
        currency: &str,
    ) -> GatewayResult<PaymentIntent> {
        let resp = self
            .client
            .post(format!("{}/v1/payment_intents", self.api_base))
            .basic_auth(&self.secret_key, None::<&str>)
            .form(&[
                ("amount", amount_minor.to_string()),
                ("currency", currency.to_string()),
                ("payment_method_types[]", "card".to_string()),
            ])
            .send()
            .await
            .map_err(|e| GatewayError::Request(format!("Gateway connection failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(Self::classify_failure(None, resp).await);
        }

        let intent: IntentResponse = resp
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        tracing::info!(intent_id = %intent.id, amount = amount_minor, "Payment intent created");

        Ok(PaymentIntent {
            intent_id: intent.id,
            client_secret: intent.client_secret,
        })
    }

    async fn update_intent_amount(&self, intent_id: &str, amount_minor: i64) -> GatewayResult<()> {
        let resp = self
            .client
            .post(format!("{}/v1/payment_intents/{}", self.api_base, intent_id))
            .basic_auth(&self.secret_key, None::<&str>)
            .form(&[("amount", amount_minor.to_string())])
            .send()
            .await
            .map_err(|e| GatewayError::Request(format!("Gateway connection failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(Self::classify_failure(Some(intent_id), resp).await);
        }

        tracing::info!(intent_id = %intent_id, amount = amount_minor, "Payment intent amount updated");

        Ok(())
    }
}
