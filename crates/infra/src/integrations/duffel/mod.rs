//! Duffel flight-offers integration
//!
//! Duffel authenticates with a static bearer API key; there is no token
//! refresh cycle. One POST to the offer-request endpoint both registers the
//! search and returns offers.

pub mod client;
pub mod types;

pub use client::DuffelClient;

pub(crate) const PROVIDER: &str = "duffel";
