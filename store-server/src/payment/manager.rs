//! Payment Reconciliation
//!
//! Keeps a basket's remote payment intent in sync with what the basket would
//! actually cost right now: items are re-priced from the catalog, shipping
//! is resolved from the selected delivery method, and the intent amount is
//! created or updated to match before the client confirms the charge.

use std::sync::Arc;

use crate::db::models::CustomerBasket;
use crate::db::repository::{BasketStore, DeliveryMethodStore, ProductStore};
use crate::orders::money;
use crate::payment::gateway::{GatewayError, PaymentGateway};
use crate::utils::{AppError, AppResult};

/// Reconciles basket contents with the remote payment intent
pub struct PaymentManager {
    baskets: Arc<dyn BasketStore>,
    products: Arc<dyn ProductStore>,
    delivery_methods: Arc<dyn DeliveryMethodStore>,
    gateway: Arc<dyn PaymentGateway>,
    currency: String,
}

impl std::fmt::Debug for PaymentManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentManager")
            .field("currency", &self.currency)
            .finish()
    }
}

impl PaymentManager {
    pub fn new(
        baskets: Arc<dyn BasketStore>,
        products: Arc<dyn ProductStore>,
        delivery_methods: Arc<dyn DeliveryMethodStore>,
        gateway: Arc<dyn PaymentGateway>,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            baskets,
            products,
            delivery_methods,
            gateway,
            currency: currency.into(),
        }
    }

    /// Re-price the basket and create or update its remote payment intent.
    ///
    /// This is the only code path allowed to mutate basket item prices; every
    /// other path treats them as read-only snapshots. Returns the persisted
    /// basket, carrying the (possibly replaced) intent id and client secret.
    pub async fn sync_intent(&self, basket_id: &str) -> AppResult<CustomerBasket> {
        let Some(mut basket) = self.baskets.get(basket_id).await? else {
            return Err(AppError::not_found(format!("Basket {} not found", basket_id)));
        };

        // Shipping price: 0 when no method is selected or the reference has
        // gone stale
        let shipping_price = match &basket.delivery_method_id {
            Some(id) => self
                .delivery_methods
                .get_by_id(id)
                .await?
                .map(|m| m.price)
                .unwrap_or(0.0),
            None => 0.0,
        };

        // Drift correction: the catalog price always wins. Items whose
        // product no longer resolves keep their cached price here; order
        // aggregation is where they get dropped.
        for item in &mut basket.items {
            if let Some(product) = self.products.get_by_id(&item.product_id).await? {
                if item.price != product.price {
                    tracing::debug!(
                        product_id = %item.product_id,
                        cached = item.price,
                        catalog = product.price,
                        "Correcting basket item price drift"
                    );
                    item.price = product.price;
                }
            }
        }

        let items_total = basket
            .items
            .iter()
            .map(|i| money::line_total(i.price, i.quantity))
            .sum::<rust_decimal::Decimal>();
        let amount = money::amount_minor_units(items_total + money::to_decimal(shipping_price));

        match basket.payment_intent_id.clone() {
            None => {
                let intent = self
                    .gateway
                    .create_intent(amount, &self.currency)
                    .await
                    .map_err(|e| AppError::gateway(e.to_string()))?;
                tracing::info!(basket_id = %basket.id, intent_id = %intent.intent_id, amount, "Payment intent created for basket");
                basket.payment_intent_id = Some(intent.intent_id);
                basket.client_secret = Some(intent.client_secret);
            }
            Some(intent_id) => match self.gateway.update_intent_amount(&intent_id, amount).await {
                Ok(()) => {}
                Err(GatewayError::IntentNotFound(_)) => {
                    // The remote intent expired upstream; replace it with a
                    // fresh one for the same amount
                    tracing::warn!(
                        basket_id = %basket.id,
                        intent_id = %intent_id,
                        "Stored payment intent no longer exists upstream, creating a replacement"
                    );
                    let intent = self
                        .gateway
                        .create_intent(amount, &self.currency)
                        .await
                        .map_err(|e| AppError::gateway(e.to_string()))?;
                    basket.payment_intent_id = Some(intent.intent_id);
                    basket.client_secret = Some(intent.client_secret);
                }
                Err(e) => return Err(AppError::gateway(e.to_string())),
            },
        }

        self.baskets.put(&basket).await?;
        Ok(basket)
    }
}
