//! Core Module
//!
//! Configuration and the dependency-injection composition root.

pub mod config;
pub mod state;

pub use config::Config;
pub use state::ServerState;
