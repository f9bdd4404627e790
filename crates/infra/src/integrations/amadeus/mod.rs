//! Amadeus flight-offers integration
//!
//! The one provider in this system requiring the OAuth client-credentials
//! flow: bearer tokens are cached in the SQLite token store and refreshed
//! proactively when inside the expiry safety margin.

pub mod auth;
pub mod client;
pub mod types;

pub use auth::{AccessTokenProvider, AmadeusTokenManager};
pub use client::AmadeusClient;

pub(crate) const PROVIDER: &str = "amadeus";
