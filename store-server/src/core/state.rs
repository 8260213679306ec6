//! Server state — explicit dependency injection
//!
//! `ServerState` is the composition root: it owns one shared handle per
//! store/gateway/notifier and hands out the managers wired against them.
//! Every dependency is a statically typed trait object — there is no
//! runtime type-keyed repository lookup anywhere.

use std::sync::Arc;

use crate::basket::BasketStorage;
use crate::core::Config;
use crate::db::DbService;
use crate::db::repository::{
    BasketStore, DeliveryMethodRepository, DeliveryMethodStore, OrderRepository, OrderStore,
    PaymentRepository, PaymentStore, ProductRepository, ProductStore,
};
use crate::notify::{LogNotifier, Notifier};
use crate::orders::OrderManager;
use crate::payment::{PaymentGateway, PaymentManager, StripeGateway};
use crate::utils::{AppError, AppResult};

/// Shared server state: configuration plus one handle per collaborator
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub products: Arc<dyn ProductStore>,
    pub delivery_methods: Arc<dyn DeliveryMethodStore>,
    pub orders: Arc<dyn OrderStore>,
    pub payments: Arc<dyn PaymentStore>,
    pub baskets: Arc<dyn BasketStore>,
    pub gateway: Arc<dyn PaymentGateway>,
    pub notifier: Arc<dyn Notifier>,
}

impl std::fmt::Debug for ServerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerState")
            .field("config", &self.config)
            .finish()
    }
}

impl ServerState {
    /// Initialize the default backends:
    ///
    /// 1. Working directory layout
    /// 2. Embedded SurrealDB (catalog, orders, payments)
    /// 3. redb basket store
    /// 4. Stripe-protocol gateway and log notifier
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        config
            .ensure_work_dir_structure()
            .map_err(|e| AppError::internal(format!("Failed to create work directory: {e}")))?;

        let db_path = config.store_db_path();
        let db_service = DbService::new(&db_path.to_string_lossy()).await?;
        let db = db_service.db;

        let baskets = BasketStorage::open(config.basket_db_path())
            .map_err(|e| AppError::database(format!("Failed to open basket store: {e}")))?;

        let gateway = StripeGateway::new(
            config.payment_api_base.clone(),
            config.payment_secret_key.clone(),
        );

        Ok(Self {
            config: config.clone(),
            products: Arc::new(ProductRepository::new(db.clone())),
            delivery_methods: Arc::new(DeliveryMethodRepository::new(db.clone())),
            orders: Arc::new(OrderRepository::new(db.clone())),
            payments: Arc::new(PaymentRepository::new(db)),
            baskets: Arc::new(baskets),
            gateway: Arc::new(gateway),
            notifier: Arc::new(LogNotifier::new()),
        })
    }

    /// Order aggregation / status workflow wired against this state
    pub fn order_manager(&self) -> OrderManager {
        OrderManager::new(
            self.products.clone(),
            self.delivery_methods.clone(),
            self.orders.clone(),
            self.payments.clone(),
            self.baskets.clone(),
            self.notifier.clone(),
            self.config.currency.clone(),
        )
    }

    /// Payment reconciler wired against this state
    pub fn payment_manager(&self) -> PaymentManager {
        PaymentManager::new(
            self.baskets.clone(),
            self.products.clone(),
            self.delivery_methods.clone(),
            self.gateway.clone(),
            self.config.currency.clone(),
        )
    }
}
