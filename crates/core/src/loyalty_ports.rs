//! Loyalty aggregator port interface
//!
//! OAuth authorization-code flow against the loyalty-account aggregator:
//! mint a hosted-consent URL, exchange the one-time callback code for a
//! stable external user id, then list that user's linked accounts.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use voyagr_domain::{LoyaltyAccount, Result};

/// Stable identity returned by the authorization-code exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionInfo {
    pub external_user_id: String,
}

/// Trait for the loyalty-account aggregator.
///
/// None of these operations retries automatically: they are low-frequency,
/// user-initiated flows, and a silent retry could double-consume a
/// single-use authorization code.
#[async_trait]
pub trait LoyaltyGateway: Send + Sync {
    /// Ask the aggregator to mint a hosted-consent URL using the configured
    /// callback URL.
    async fn create_auth_url(&self) -> Result<String>;

    /// Exchange a one-time authorization code for the external user id.
    /// An invalid or expired code is fatal, never retried.
    async fn get_connection_info(&self, code: &str) -> Result<ConnectionInfo>;

    /// Fetch every linked loyalty account for the external user.
    async fn get_connected_user(&self, external_user_id: &str) -> Result<Vec<LoyaltyAccount>>;
}
