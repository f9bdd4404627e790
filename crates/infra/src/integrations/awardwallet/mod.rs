//! AwardWallet loyalty-account aggregator integration
//!
//! Three operations forming the OAuth authorization-code flow: mint a hosted
//! consent URL, exchange the one-time callback code for a stable user id,
//! then list that user's linked loyalty accounts. None of the operations
//! retries automatically; a re-sent exchange could double-consume a
//! single-use code.

pub mod client;
pub mod types;

pub use client::AwardWalletClient;

pub(crate) const PROVIDER: &str = "awardwallet";
