//! Configuration structures
//!
//! Provider credentials and persistence settings are environment-provided;
//! the loader in the infra crate fills these structs. Each provider config is
//! optional at load time and mandatory at first use, so a missing credential
//! fails the call that needs it with an actionable message instead of
//! failing startup.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_DB_POOL_SIZE;

/// Which provider environment to target (sandbox vs. live inventory).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiEnvironment {
    Test,
    Production,
}

impl ApiEnvironment {
    /// Stable tag used as the token-table key.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Test => "test",
            Self::Production => "prod",
        }
    }
}

impl std::str::FromStr for ApiEnvironment {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "test" | "sandbox" => Ok(Self::Test),
            "prod" | "production" => Ok(Self::Production),
            other => Err(format!("unknown API environment: {other}")),
        }
    }
}

/// Amadeus OAuth client-credentials configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmadeusConfig {
    pub client_id: String,
    pub client_secret: String,
    pub environment: ApiEnvironment,
}

impl AmadeusConfig {
    /// Base URL for the configured environment.
    pub fn base_url(&self) -> &'static str {
        match self.environment {
            ApiEnvironment::Test => "https://test.api.amadeus.com",
            ApiEnvironment::Production => "https://api.amadeus.com",
        }
    }
}

/// Duffel static bearer API key configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuffelConfig {
    pub api_key: String,
}

/// AwardWallet loyalty aggregator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwardWalletConfig {
    pub api_key: String,
    /// Callback URL the hosted consent page redirects to with the one-time
    /// authorization code.
    pub callback_url: String,
}

/// SQLite token-store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
    pub pool_size: u32,
}

impl DatabaseConfig {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into(), pool_size: DEFAULT_DB_POOL_SIZE }
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub amadeus: Option<AmadeusConfig>,
    pub duffel: Option<DuffelConfig>,
    pub awardwallet: Option<AwardWalletConfig>,
}
