//! External provider integrations
//!
//! One module per provider. Every client receives an explicitly constructed
//! [`crate::http::HttpClient`] and returns canonical domain models; raw wire
//! shapes never leave their module.

pub mod amadeus;
pub mod awardwallet;
pub mod duffel;

pub use amadeus::{AccessTokenProvider, AmadeusClient, AmadeusTokenManager};
pub use awardwallet::AwardWalletClient;
pub use duffel::DuffelClient;
