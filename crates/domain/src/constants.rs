//! Application constants
//!
//! Centralized location for all domain-level constants used by the
//! aggregation layer.

// Token lifecycle
/// Refresh a cached OAuth token when less than this many seconds remain
/// before expiry, so a token never expires mid-request.
pub const TOKEN_REFRESH_MARGIN_SECS: i64 = 300;

// Retry policy
/// Retries beyond the first attempt (3 attempts total).
pub const MAX_RETRIES: u32 = 2;
pub const BASE_BACKOFF_MS: u64 = 250;

// Search defaults
pub const DEFAULT_MAX_OFFERS: usize = 50;
/// Upper bound on one provider's share of an aggregated search, including
/// retry sleeps.
pub const DEFAULT_SEARCH_TIMEOUT_SECS: u64 = 45;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

// Persistence defaults
pub const DEFAULT_DB_POOL_SIZE: u32 = 4;
