//! Token store port interface
//!
//! Persistence abstraction over the cached OAuth token table, keyed by
//! provider environment. Implemented by the SQLite repository in the infra
//! crate.

use async_trait::async_trait;
use voyagr_domain::{CachedToken, Result};

/// Trait for cached OAuth token persistence.
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Return the most recently created token for the environment whose
    /// expiry is still in the future. Absence is a normal outcome, not an
    /// error.
    async fn get_valid_token(&self, environment: &str) -> Result<Option<CachedToken>>;

    /// Insert a new token row. Always inserts rather than updating in place
    /// so a concurrent reader never observes a token-less window; stale rows
    /// are removed by the asynchronous cleanup sweep.
    async fn save_token(
        &self,
        environment: &str,
        access_token: &str,
        token_type: &str,
        expires_in_secs: i64,
    ) -> Result<CachedToken>;

    /// Bulk-delete expired rows. Invoked by an external maintenance trigger,
    /// never synchronously on insert. Returns the number of rows removed.
    async fn delete_expired_tokens(&self) -> Result<usize>;
}
