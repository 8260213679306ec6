//! End-to-end checkout flow over the real storage backends
//!
//! Exercises the full basket → intent sync → order → status path against an
//! on-disk SurrealDB (RocksDB) catalog and a redb basket store, with the
//! mock payment gateway standing in for the remote provider.

use std::sync::Arc;

use anyhow::Result;
use tempfile::TempDir;

use store_server::basket::BasketStorage;
use store_server::core::{Config, ServerState};
use store_server::db::DbService;
use store_server::db::models::{BasketItem, CustomerBasket, DeliveryMethod, OrderStatus, Product};
use store_server::db::repository::{
    BasketStore, DeliveryMethodRepository, OrderRepository, PaymentRepository, ProductRepository,
};
use store_server::notify::MemoryNotifier;
use store_server::payment::MockGateway;

struct TestEnv {
    _tmp: TempDir,
    state: ServerState,
    products: Arc<ProductRepository>,
    delivery_methods: Arc<DeliveryMethodRepository>,
    gateway: Arc<MockGateway>,
    notifier: Arc<MemoryNotifier>,
}

async fn setup() -> Result<TestEnv> {
    let tmp = TempDir::new()?;
    let config = Config::with_overrides(tmp.path().to_string_lossy().to_string());
    config.ensure_work_dir_structure()?;

    let db_service = DbService::new(&config.store_db_path().to_string_lossy()).await?;
    let db = db_service.db;

    let products = Arc::new(ProductRepository::new(db.clone()));
    let delivery_methods = Arc::new(DeliveryMethodRepository::new(db.clone()));
    let baskets = Arc::new(BasketStorage::open(config.basket_db_path())?);
    let gateway = Arc::new(MockGateway::new());
    let notifier = Arc::new(MemoryNotifier::new());

    let state = ServerState {
        config,
        products: products.clone(),
        delivery_methods: delivery_methods.clone(),
        orders: Arc::new(OrderRepository::new(db.clone())),
        payments: Arc::new(PaymentRepository::new(db)),
        baskets: baskets.clone(),
        gateway: gateway.clone(),
        notifier: notifier.clone(),
    };

    Ok(TestEnv {
        _tmp: tmp,
        state,
        products,
        delivery_methods,
        gateway,
        notifier,
    })
}

fn sample_product(name: &str, price: f64) -> Product {
    Product {
        id: None,
        name: name.to_string(),
        description: Some("Catalog item".to_string()),
        price,
        picture_url: None,
        in_stock: 25,
        brand_id: None,
        type_id: None,
    }
}

fn sample_delivery(price: f64) -> DeliveryMethod {
    DeliveryMethod {
        id: None,
        short_name: "Standard".to_string(),
        delivery_time: "3-5 days".to_string(),
        description: "Standard shipping".to_string(),
        price,
    }
}

#[tokio::test]
async fn full_checkout_flow() -> Result<()> {
    let env = setup().await?;

    // Seed the catalog
    let product = env.products.create(sample_product("Mug", 10.0)).await?;
    let delivery = env.delivery_methods.create(sample_delivery(5.0)).await?;

    // Client builds a basket with a stale cached price
    let mut basket = CustomerBasket::new("session-1");
    basket.items.push(BasketItem {
        product_id: product.id_str(),
        product_name: product.name.clone(),
        price: 8.0,
        quantity: 2,
        picture_url: None,
        brand: None,
        product_type: None,
    });
    basket.delivery_method_id = Some(delivery.id_str());
    env.state.baskets.put(&basket).await?;

    // Reconcile before checkout: price drift corrected, intent created
    let payment_manager = env.state.payment_manager();
    let synced = payment_manager.sync_intent("session-1").await?;
    assert_eq!(synced.items[0].price, 10.0);
    assert_eq!(synced.payment_intent_id.as_deref(), Some("pi_mock_1"));
    // (2 × 10.00 + 5.00) × 100
    assert_eq!(env.gateway.amount_of("pi_mock_1"), Some(2500));

    // Checkout
    let order_manager = env.state.order_manager();
    let detail = order_manager
        .create_order(&store_server::PlaceOrder {
            buyer_email: "buyer@example.com".to_string(),
            delivery_method_id: delivery.id_str(),
            basket_id: "session-1".to_string(),
        })
        .await?
        .expect("order should be created");

    assert_eq!(detail.subtotal, 20.0);
    assert_eq!(detail.total, 25.0);
    assert_eq!(detail.shipping_price, 5.0);
    assert_eq!(detail.status, OrderStatus::Pending);
    assert_eq!(detail.payment_intent_id.as_deref(), Some("pi_mock_1"));
    assert!(!detail.payment_id.is_empty());

    // Checkout consumed the basket
    assert!(env.state.baskets.get("session-1").await?.is_none());

    // The buyer sees the order
    let mine = order_manager
        .get_orders_for_buyer("buyer@example.com")
        .await?;
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].order_id, detail.order_id);

    // Status workflow with notification
    let applied = order_manager
        .update_status(&detail.order_id, "Processing")
        .await?;
    assert!(applied);

    let reloaded = order_manager
        .get_order(&detail.order_id)
        .await?
        .expect("order should still exist");
    assert_eq!(reloaded.status, OrderStatus::Processing);

    let sent = env.notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "buyer@example.com");
    assert!(sent[0].body.contains("Processing"));

    Ok(())
}

#[tokio::test]
async fn declined_paths_leave_no_traces() -> Result<()> {
    let env = setup().await?;
    let delivery = env.delivery_methods.create(sample_delivery(5.0)).await?;

    let order_manager = env.state.order_manager();

    // No such basket: declined, nothing written
    let result = order_manager
        .create_order(&store_server::PlaceOrder {
            buyer_email: "buyer@example.com".to_string(),
            delivery_method_id: delivery.id_str(),
            basket_id: "no-such-session".to_string(),
        })
        .await?;
    assert!(result.is_none());

    // No such order: status update reports false, nobody is notified
    let applied = order_manager
        .update_status("orders:missing", "Shipped")
        .await?;
    assert!(!applied);
    assert!(env.notifier.sent().is_empty());

    // Unknown label: rejected outright
    let err = order_manager
        .update_status("orders:missing", "Teleported")
        .await
        .unwrap_err();
    assert!(matches!(err, store_server::AppError::Validation(_)));

    Ok(())
}
