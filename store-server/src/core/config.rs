//! Server configuration
//!
//! # Environment variables
//!
//! Every setting can be overridden through the environment:
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | WORK_DIR | /var/lib/storefront | Working directory (databases, logs) |
//! | ENVIRONMENT | development | development \| staging \| production |
//! | CURRENCY | usd | Currency code for charges |
//! | PAYMENT_API_BASE | https://api.stripe.com | Payment gateway base URL |
//! | PAYMENT_SECRET_KEY | (empty) | Payment gateway secret key |

use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory holding the databases and logs
    pub work_dir: String,
    /// development | staging | production
    pub environment: String,
    /// Currency code used for every charge (single-currency deployment)
    pub currency: String,
    /// Payment gateway base URL (Stripe-compatible)
    pub payment_api_base: String,
    /// Payment gateway secret key
    pub payment_secret_key: String,
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/storefront".into()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            currency: std::env::var("CURRENCY").unwrap_or_else(|_| "usd".into()),
            payment_api_base: std::env::var("PAYMENT_API_BASE")
                .unwrap_or_else(|_| "https://api.stripe.com".into()),
            payment_secret_key: std::env::var("PAYMENT_SECRET_KEY").unwrap_or_default(),
        }
    }

    /// Override the working directory (test scenarios)
    pub fn with_overrides(work_dir: impl Into<String>) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config
    }

    /// Directory holding both databases
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    /// Path of the embedded SurrealDB store
    pub fn store_db_path(&self) -> PathBuf {
        self.database_dir().join("store.db")
    }

    /// Path of the redb basket store
    pub fn basket_db_path(&self) -> PathBuf {
        self.database_dir().join("baskets.redb")
    }

    /// Create the working directory layout if it doesn't exist yet
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
