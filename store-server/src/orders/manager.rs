//! OrderManager - Basket-to-order aggregation and the status workflow
//!
//! # Checkout Flow
//!
//! ```text
//! create_order(request)
//!     ├─ 1. Validate input (email, ids)
//!     ├─ 2. Load basket          → absent/empty: declined (None)
//!     ├─ 3. Re-price items from the catalog (vanished products dropped)
//!     ├─ 4. Load delivery method → absent: declined (None)
//!     ├─ 5. Compute subtotal/total (fixed here, never recomputed)
//!     ├─ 6. Persist Payment record (carries the basket's intent id)
//!     ├─ 7. Persist Order (status = Pending)
//!     ├─ 8. Delete basket (checkout consumes it)
//!     └─ 9. Project to OrderDetail
//! ```
//!
//! Steps 6–8 are independent sequential writes with no rollback; a crash in
//! between leaves an orphaned payment record or a surviving basket. That
//! window is an accepted consistency gap of the design.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use crate::db::models::{
    DeliveryMethod, Order, OrderDetail, OrderItem, OrderStatus, Payment,
};
use crate::db::repository::{
    BasketStore, DeliveryMethodStore, OrderStore, PaymentStore, ProductStore,
};
use crate::notify::Notifier;
use crate::orders::money;
use crate::utils::{AppError, AppResult};

/// Order placement input
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PlaceOrder {
    #[validate(email)]
    pub buyer_email: String,
    #[validate(length(min = 1))]
    pub delivery_method_id: String,
    #[validate(length(min = 1))]
    pub basket_id: String,
}

/// Order aggregation, queries and the status workflow
pub struct OrderManager {
    products: Arc<dyn ProductStore>,
    delivery_methods: Arc<dyn DeliveryMethodStore>,
    orders: Arc<dyn OrderStore>,
    payments: Arc<dyn PaymentStore>,
    baskets: Arc<dyn BasketStore>,
    notifier: Arc<dyn Notifier>,
    currency: String,
}

impl std::fmt::Debug for OrderManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderManager")
            .field("currency", &self.currency)
            .finish()
    }
}

impl OrderManager {
    pub fn new(
        products: Arc<dyn ProductStore>,
        delivery_methods: Arc<dyn DeliveryMethodStore>,
        orders: Arc<dyn OrderStore>,
        payments: Arc<dyn PaymentStore>,
        baskets: Arc<dyn BasketStore>,
        notifier: Arc<dyn Notifier>,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            products,
            delivery_methods,
            orders,
            payments,
            baskets,
            notifier,
            currency: currency.into(),
        }
    }

    // ========== Order Creation ==========

    /// Convert a basket into a priced, persisted order.
    ///
    /// Returns `Ok(None)` — declined, no side effects — when the basket is
    /// missing/empty or the delivery method does not resolve. Basket items
    /// whose product has vanished from the catalog are silently dropped;
    /// retained items are priced at the current catalog price, never the
    /// basket's cached price.
    pub async fn create_order(&self, request: &PlaceOrder) -> AppResult<Option<OrderDetail>> {
        request
            .validate()
            .map_err(|e| AppError::validation(e.to_string()))?;

        let Some(basket) = self.baskets.get(&request.basket_id).await? else {
            tracing::warn!(basket_id = %request.basket_id, "Order creation declined: basket not found");
            return Ok(None);
        };
        if basket.items.is_empty() {
            tracing::warn!(basket_id = %request.basket_id, "Order creation declined: basket is empty");
            return Ok(None);
        }

        let mut items = Vec::with_capacity(basket.items.len());
        for item in &basket.items {
            match self.products.get_by_id(&item.product_id).await? {
                Some(product) => items.push(OrderItem {
                    product_id: product.id_str(),
                    price: product.price,
                    quantity: item.quantity,
                }),
                None => {
                    tracing::debug!(
                        product_id = %item.product_id,
                        "Dropping basket item: product no longer in catalog"
                    );
                }
            }
        }

        let Some(delivery_method) = self
            .delivery_methods
            .get_by_id(&request.delivery_method_id)
            .await?
        else {
            tracing::warn!(
                delivery_method_id = %request.delivery_method_id,
                "Order creation declined: delivery method not found"
            );
            return Ok(None);
        };

        let subtotal = items
            .iter()
            .map(|i| money::line_total(i.price, i.quantity))
            .sum::<Decimal>();
        let total = subtotal + money::to_decimal(delivery_method.price);

        let payment = self
            .payments
            .add(Payment {
                id: None,
                payment_intent_id: basket.payment_intent_id.clone(),
                amount: money::to_f64(total),
                currency: self.currency.clone(),
                created_at: Utc::now(),
            })
            .await?;

        let order = self
            .orders
            .add(Order {
                id: None,
                buyer_email: request.buyer_email.clone(),
                order_date: Utc::now(),
                delivery_method_id: delivery_method.id_str(),
                order_items: items,
                subtotal: money::to_f64(subtotal),
                total: money::to_f64(total),
                status: OrderStatus::Pending,
                payment_intent_id: basket.payment_intent_id.clone(),
                payment_id: payment.id_str(),
            })
            .await?;

        self.baskets.delete(&basket.id).await?;

        tracing::info!(
            order_id = %order.id_str(),
            buyer = %order.buyer_email,
            total = order.total,
            "Order created"
        );

        Ok(Some(self.project(order, Some(delivery_method)).await?))
    }

    // ========== Queries ==========

    /// Buyer-scoped order lookup
    pub async fn get_order_for_buyer(
        &self,
        order_id: &str,
        buyer_email: &str,
    ) -> AppResult<Option<OrderDetail>> {
        match self.orders.find_for_buyer(order_id, buyer_email).await? {
            Some(order) => Ok(Some(self.project(order, None).await?)),
            None => Ok(None),
        }
    }

    /// Unscoped order lookup (admin paths and the status workflow)
    pub async fn get_order(&self, order_id: &str) -> AppResult<Option<OrderDetail>> {
        match self.orders.get_by_id(order_id).await? {
            Some(order) => Ok(Some(self.project(order, None).await?)),
            None => Ok(None),
        }
    }

    /// All orders for a buyer, newest first
    pub async fn get_orders_for_buyer(&self, buyer_email: &str) -> AppResult<Vec<OrderDetail>> {
        let orders = self.orders.find_all_for_buyer(buyer_email).await?;
        let mut details = Vec::with_capacity(orders.len());
        for order in orders {
            details.push(self.project(order, None).await?);
        }
        Ok(details)
    }

    /// Delivery methods on offer
    pub async fn get_delivery_methods(&self) -> AppResult<Vec<DeliveryMethod>> {
        Ok(self.delivery_methods.find_all().await?)
    }

    // ========== Status Workflow ==========

    /// Apply a status change and notify the buyer.
    ///
    /// Unknown labels are rejected before any store access; a missing order
    /// yields `Ok(false)`. The notification is best-effort: once the status
    /// write has committed, a failed send is logged and never undoes or
    /// fails the change.
    pub async fn update_status(&self, order_id: &str, new_status: &str) -> AppResult<bool> {
        let Some(status) = OrderStatus::parse(new_status) else {
            return Err(AppError::validation(format!(
                "Invalid order status: {new_status}"
            )));
        };

        let Some(order) = self.orders.get_by_id(order_id).await? else {
            tracing::warn!(order_id = %order_id, "Status update failed: order not found");
            return Ok(false);
        };

        if !self.orders.set_status(order_id, status).await? {
            return Ok(false);
        }

        tracing::info!(order_id = %order_id, status = %status, "Order status updated");

        let subject = format!("Order #{} Status Update", order_id);
        let body = format!("Your order status has been updated to: {}", status);
        if let Err(e) = self.notifier.send(&order.buyer_email, &subject, &body).await {
            tracing::error!(
                order_id = %order_id,
                to = %order.buyer_email,
                error = %e,
                "Failed to send status notification"
            );
        }

        Ok(true)
    }

    // ========== Projection ==========

    /// Project an order to its external representation, resolving the
    /// shipping price from the stored delivery-method reference
    async fn project(
        &self,
        order: Order,
        delivery_method: Option<DeliveryMethod>,
    ) -> AppResult<OrderDetail> {
        let method = match delivery_method {
            Some(method) => method,
            None => self
                .delivery_methods
                .get_by_id(&order.delivery_method_id)
                .await?
                .ok_or_else(|| {
                    AppError::not_found(format!(
                        "Delivery method {} not found",
                        order.delivery_method_id
                    ))
                })?,
        };

        Ok(OrderDetail {
            order_id: order.id_str(),
            buyer_email: order.buyer_email,
            order_date: order.order_date,
            delivery_method_id: order.delivery_method_id,
            shipping_price: method.price,
            items: order.order_items,
            subtotal: order.subtotal,
            total: order.total,
            status: order.status,
            payment_intent_id: order.payment_intent_id,
            payment_id: order.payment_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{BasketItem, CustomerBasket, Product};
    use crate::db::repository::memory::{
        MemoryBasketStore, MemoryDeliveryMethodStore, MemoryOrderStore, MemoryPaymentStore,
        MemoryProductStore,
    };
    use crate::notify::MemoryNotifier;

    struct Fixture {
        products: Arc<MemoryProductStore>,
        delivery_methods: Arc<MemoryDeliveryMethodStore>,
        orders: Arc<MemoryOrderStore>,
        payments: Arc<MemoryPaymentStore>,
        baskets: Arc<MemoryBasketStore>,
        notifier: Arc<MemoryNotifier>,
        manager: OrderManager,
    }

    fn fixture() -> Fixture {
        let products = Arc::new(MemoryProductStore::new());
        let delivery_methods = Arc::new(MemoryDeliveryMethodStore::new());
        let orders = Arc::new(MemoryOrderStore::new());
        let payments = Arc::new(MemoryPaymentStore::new());
        let baskets = Arc::new(MemoryBasketStore::new());
        let notifier = Arc::new(MemoryNotifier::new());
        let manager = OrderManager::new(
            products.clone(),
            delivery_methods.clone(),
            orders.clone(),
            payments.clone(),
            baskets.clone(),
            notifier.clone(),
            "usd",
        );
        Fixture {
            products,
            delivery_methods,
            orders,
            payments,
            baskets,
            notifier,
            manager,
        }
    }

    fn product(name: &str, price: f64) -> Product {
        Product {
            id: None,
            name: name.to_string(),
            description: None,
            price,
            picture_url: None,
            in_stock: 10,
            brand_id: None,
            type_id: None,
        }
    }

    fn delivery(price: f64) -> DeliveryMethod {
        DeliveryMethod {
            id: None,
            short_name: "Standard".to_string(),
            delivery_time: "3-5 days".to_string(),
            description: "Standard shipping".to_string(),
            price,
        }
    }

    fn basket_item(product_id: &str, price: f64, quantity: i32) -> BasketItem {
        BasketItem {
            product_id: product_id.to_string(),
            product_name: "Item".to_string(),
            price,
            quantity,
            picture_url: None,
            brand: None,
            product_type: None,
        }
    }

    fn place_order(delivery_method_id: &str, basket_id: &str) -> PlaceOrder {
        PlaceOrder {
            buyer_email: "buyer@example.com".to_string(),
            delivery_method_id: delivery_method_id.to_string(),
            basket_id: basket_id.to_string(),
        }
    }

    #[tokio::test]
    async fn create_order_prices_from_catalog_and_consumes_basket() {
        let f = fixture();
        let p = f.products.insert(product("Mug", 10.0));
        let dm = f.delivery_methods.insert(delivery(5.0));

        let mut basket = CustomerBasket::new("b1");
        basket.items.push(basket_item(&p.id_str(), 10.0, 2));
        basket.payment_intent_id = Some("pi_existing".to_string());
        f.baskets.put(&basket).await.unwrap();

        let detail = f
            .manager
            .create_order(&place_order(&dm.id_str(), "b1"))
            .await
            .unwrap()
            .expect("order should be created");

        assert_eq!(detail.subtotal, 20.0);
        assert_eq!(detail.total, 25.0);
        assert_eq!(detail.shipping_price, 5.0);
        assert_eq!(detail.status, OrderStatus::Pending);
        assert_eq!(detail.buyer_email, "buyer@example.com");
        assert_eq!(detail.items.len(), 1);
        assert_eq!(detail.items[0].quantity, 2);
        assert_eq!(detail.payment_intent_id.as_deref(), Some("pi_existing"));
        assert!(!detail.payment_id.is_empty());

        // Checkout consumed the basket
        assert!(f.baskets.get("b1").await.unwrap().is_none());

        // Payment record carries the intent id and the charged total
        let payments = f.payments.all();
        assert_eq!(payments.len(), 1);
        assert_eq!(payments[0].payment_intent_id.as_deref(), Some("pi_existing"));
        assert_eq!(payments[0].amount, 25.0);
        assert_eq!(payments[0].currency, "usd");
    }

    #[tokio::test]
    async fn catalog_price_wins_over_cached_basket_price() {
        let f = fixture();
        let p = f.products.insert(product("Mug", 12.0));
        let dm = f.delivery_methods.insert(delivery(0.0));

        let mut basket = CustomerBasket::new("b1");
        // Stale cached price
        basket.items.push(basket_item(&p.id_str(), 8.0, 3));
        f.baskets.put(&basket).await.unwrap();

        let detail = f
            .manager
            .create_order(&place_order(&dm.id_str(), "b1"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(detail.items[0].price, 12.0);
        assert_eq!(detail.subtotal, 36.0);
    }

    #[tokio::test]
    async fn vanished_products_are_dropped_from_the_order() {
        let f = fixture();
        let keep = f.products.insert(product("Mug", 10.0));
        let gone = f.products.insert(product("Lamp", 30.0));
        let dm = f.delivery_methods.insert(delivery(5.0));

        let mut basket = CustomerBasket::new("b1");
        basket.items.push(basket_item(&keep.id_str(), 10.0, 1));
        basket.items.push(basket_item(&gone.id_str(), 30.0, 1));
        f.baskets.put(&basket).await.unwrap();

        f.products.remove(&gone.id_str());

        let detail = f
            .manager
            .create_order(&place_order(&dm.id_str(), "b1"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(detail.items.len(), 1);
        assert_eq!(detail.items[0].product_id, keep.id_str());
        assert_eq!(detail.subtotal, 10.0);
        assert_eq!(detail.total, 15.0);
    }

    #[tokio::test]
    async fn order_with_every_item_dropped_is_still_created() {
        let f = fixture();
        let dm = f.delivery_methods.insert(delivery(5.0));

        let mut basket = CustomerBasket::new("b1");
        basket.items.push(basket_item("product:gone", 10.0, 2));
        f.baskets.put(&basket).await.unwrap();

        let detail = f
            .manager
            .create_order(&place_order(&dm.id_str(), "b1"))
            .await
            .unwrap()
            .unwrap();

        assert!(detail.items.is_empty());
        assert_eq!(detail.subtotal, 0.0);
        assert_eq!(detail.total, 5.0);
    }

    #[tokio::test]
    async fn missing_basket_declines_without_writes() {
        let f = fixture();
        let dm = f.delivery_methods.insert(delivery(5.0));

        let result = f
            .manager
            .create_order(&place_order(&dm.id_str(), "missing"))
            .await
            .unwrap();

        assert!(result.is_none());
        assert!(f.orders.is_empty());
        assert!(f.payments.all().is_empty());
    }

    #[tokio::test]
    async fn empty_basket_declines_without_writes() {
        let f = fixture();
        let dm = f.delivery_methods.insert(delivery(5.0));
        f.baskets.put(&CustomerBasket::new("b1")).await.unwrap();

        let result = f
            .manager
            .create_order(&place_order(&dm.id_str(), "b1"))
            .await
            .unwrap();

        assert!(result.is_none());
        assert!(f.orders.is_empty());
        assert!(f.payments.all().is_empty());
        // Declined checkout leaves the basket alone
        assert!(f.baskets.get("b1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn missing_delivery_method_declines_and_keeps_basket() {
        let f = fixture();
        let p = f.products.insert(product("Mug", 10.0));

        let mut basket = CustomerBasket::new("b1");
        basket.items.push(basket_item(&p.id_str(), 10.0, 1));
        f.baskets.put(&basket).await.unwrap();

        let result = f
            .manager
            .create_order(&place_order("delivery_method:gone", "b1"))
            .await
            .unwrap();

        assert!(result.is_none());
        assert!(f.orders.is_empty());
        assert!(f.payments.all().is_empty());
        assert!(f.baskets.get("b1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn malformed_email_is_rejected_before_any_store_access() {
        let f = fixture();
        let request = PlaceOrder {
            buyer_email: "not-an-email".to_string(),
            delivery_method_id: "delivery_method:d1".to_string(),
            basket_id: "b1".to_string(),
        };

        let err = f.manager.create_order(&request).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn buyer_scoped_queries_only_see_own_orders() {
        let f = fixture();
        let p = f.products.insert(product("Mug", 10.0));
        let dm = f.delivery_methods.insert(delivery(5.0));

        let mut basket = CustomerBasket::new("b1");
        basket.items.push(basket_item(&p.id_str(), 10.0, 1));
        f.baskets.put(&basket).await.unwrap();

        let detail = f
            .manager
            .create_order(&place_order(&dm.id_str(), "b1"))
            .await
            .unwrap()
            .unwrap();

        let mine = f
            .manager
            .get_order_for_buyer(&detail.order_id, "buyer@example.com")
            .await
            .unwrap();
        assert!(mine.is_some());

        let not_mine = f
            .manager
            .get_order_for_buyer(&detail.order_id, "other@example.com")
            .await
            .unwrap();
        assert!(not_mine.is_none());

        let all = f
            .manager
            .get_orders_for_buyer("buyer@example.com")
            .await
            .unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].order_id, detail.order_id);
    }

    #[tokio::test]
    async fn update_status_rejects_unknown_labels() {
        let f = fixture();
        let err = f.manager.update_status("orders:o1", "Refunded").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn update_status_on_missing_order_returns_false() {
        let f = fixture();
        let applied = f.manager.update_status("orders:missing", "Shipped").await.unwrap();
        assert!(!applied);
        assert!(f.notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn update_status_persists_and_notifies_buyer() {
        let f = fixture();
        let p = f.products.insert(product("Mug", 10.0));
        let dm = f.delivery_methods.insert(delivery(5.0));

        let mut basket = CustomerBasket::new("b1");
        basket.items.push(basket_item(&p.id_str(), 10.0, 1));
        f.baskets.put(&basket).await.unwrap();

        let detail = f
            .manager
            .create_order(&place_order(&dm.id_str(), "b1"))
            .await
            .unwrap()
            .unwrap();

        let applied = f
            .manager
            .update_status(&detail.order_id, "Shipped")
            .await
            .unwrap();
        assert!(applied);

        let reloaded = f.manager.get_order(&detail.order_id).await.unwrap().unwrap();
        assert_eq!(reloaded.status, OrderStatus::Shipped);

        let sent = f.notifier.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "buyer@example.com");
        assert!(sent[0].subject.contains(&detail.order_id));
        assert!(sent[0].body.contains("Shipped"));
    }

    #[tokio::test]
    async fn notification_failure_does_not_undo_the_status_change() {
        let f = fixture();
        let p = f.products.insert(product("Mug", 10.0));
        let dm = f.delivery_methods.insert(delivery(5.0));

        let mut basket = CustomerBasket::new("b1");
        basket.items.push(basket_item(&p.id_str(), 10.0, 1));
        f.baskets.put(&basket).await.unwrap();

        let detail = f
            .manager
            .create_order(&place_order(&dm.id_str(), "b1"))
            .await
            .unwrap()
            .unwrap();

        f.notifier.set_failing(true);

        let applied = f
            .manager
            .update_status(&detail.order_id, "Cancelled")
            .await
            .unwrap();
        assert!(applied);

        let reloaded = f.manager.get_order(&detail.order_id).await.unwrap().unwrap();
        assert_eq!(reloaded.status, OrderStatus::Cancelled);
    }

    #[tokio::test]
    async fn delivery_methods_are_listed_cheapest_first() {
        let f = fixture();
        f.delivery_methods.insert(delivery(9.99));
        f.delivery_methods.insert(delivery(4.99));

        let methods = f.manager.get_delivery_methods().await.unwrap();
        assert_eq!(methods.len(), 2);
        assert_eq!(methods[0].price, 4.99);
        assert_eq!(methods[1].price, 9.99);
    }
}
