//! Cached OAuth bearer token

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// One OAuth bearer token for one (provider, environment) pair.
///
/// Created on a successful client-credentials exchange; read on every
/// search; deleted in bulk by a maintenance sweep once expired. At most one
/// token is "current" per environment at query time (the store returns the
/// most recently created row whose expiry is in the future).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedToken {
    pub id: i64,
    /// Environment tag ("test"/"prod").
    pub environment: String,
    pub access_token: String,
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl CachedToken {
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }

    /// True when the remaining lifetime is below the safety margin and the
    /// token should be proactively refreshed.
    pub fn expires_within(&self, now: DateTime<Utc>, margin_secs: i64) -> bool {
        self.expires_at <= now + Duration::seconds(margin_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(expires_in_secs: i64) -> CachedToken {
        let now = Utc::now();
        CachedToken {
            id: 1,
            environment: "test".into(),
            access_token: "tok".into(),
            token_type: "Bearer".into(),
            expires_at: now + Duration::seconds(expires_in_secs),
            created_at: now,
        }
    }

    #[test]
    fn token_outside_margin_is_fresh() {
        let t = token(1800);
        let now = Utc::now();
        assert!(t.is_valid(now));
        assert!(!t.expires_within(now, 300));
    }

    #[test]
    fn token_inside_margin_needs_refresh() {
        let t = token(120);
        let now = Utc::now();
        assert!(t.is_valid(now));
        assert!(t.expires_within(now, 300));
    }

    #[test]
    fn expired_token_is_invalid() {
        let t = token(-60);
        assert!(!t.is_valid(Utc::now()));
    }
}
