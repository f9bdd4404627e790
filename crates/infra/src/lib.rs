//! # Voyagr Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - SQLite token store (r2d2 pool)
//! - Retrying HTTP client
//! - External provider integrations (Amadeus, Duffel, AwardWallet)
//! - Environment-based configuration loading
//!
//! ## Architecture
//! - Implements traits defined in `voyagr-core`
//! - Depends on `voyagr-domain` and `voyagr-core`
//! - Contains all "impure" code (I/O, HTTP, SQL)

pub mod config;
pub mod database;
pub mod errors;
pub mod http;
pub mod integrations;

// Re-export commonly used items
pub use database::*;
pub use errors::InfraError;
pub use http::*;
pub use integrations::*;
