//! Store Server - e-commerce checkout backend core
//!
//! # 架构概述
//!
//! The crate implements the basket-to-order transition and payment
//! reconciliation workflow of an e-commerce backend:
//!
//! - **basket** (`basket`): redb-backed session basket store
//! - **db** (`db`): embedded SurrealDB entities and typed store traits
//! - **orders** (`orders`): order aggregation, queries, status workflow
//! - **payment** (`payment`): remote payment-intent reconciliation
//! - **notify** (`notify`): best-effort buyer notifications
//!
//! # Module structure
//!
//! ```text
//! store-server/src/
//! ├── core/          # Config, ServerState (DI composition root)
//! ├── db/            # SurrealDB bootstrap, models, repositories
//! ├── basket/        # redb basket store
//! ├── orders/        # Aggregation + status workflow + money helpers
//! ├── payment/       # Gateway trait, Stripe client, mock, reconciler
//! ├── notify/        # Notifier trait and senders
//! └── utils/         # Errors, logging
//! ```
//!
//! The HTTP surface, identity and catalog browsing live outside this crate;
//! everything here is consumed through [`ServerState`] and the managers.

pub mod basket;
pub mod core;
pub mod db;
pub mod notify;
pub mod orders;
pub mod payment;
pub mod utils;

// Re-export public types
pub use crate::core::{Config, ServerState};
pub use crate::orders::{OrderManager, PlaceOrder};
pub use crate::payment::PaymentManager;
pub use crate::utils::{AppError, AppResult};

// Re-export logger functions
pub use crate::utils::logger::{init_logger, init_logger_with_file};
