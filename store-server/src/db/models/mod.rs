//! Database Models
//!
//! Entity structs shared by every store backend. Record ids are SurrealDB
//! `RecordId`s surfaced to callers as "table:id" strings.

pub mod basket;
pub mod delivery_method;
pub mod order;
pub mod payment;
pub mod product;
pub mod serde_helpers;

// Re-exports
pub use basket::{BasketItem, CustomerBasket};
pub use delivery_method::DeliveryMethod;
pub use order::{Order, OrderDetail, OrderItem, OrderStatus};
pub use payment::Payment;
pub use product::Product;
