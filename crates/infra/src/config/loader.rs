//! Configuration loader
//!
//! Loads application configuration from environment variables.
//!
//! ## Environment Variables
//! - `VOYAGR_DB_PATH`: Token-store database file path (required)
//! - `VOYAGR_DB_POOL_SIZE`: Connection pool size (optional)
//! - `AMADEUS_CLIENT_ID` / `AMADEUS_CLIENT_SECRET`: OAuth credentials
//! - `AMADEUS_ENV`: `test` or `production` (defaults to `test`)
//! - `DUFFEL_API_KEY`: Static bearer key
//! - `AWARDWALLET_API_KEY` / `AWARDWALLET_CALLBACK_URL`: Loyalty aggregator
//!
//! Provider sections are optional at load time: a missing credential pair
//! leaves that provider unconfigured rather than failing startup, and the
//! first call that needs it reports the missing variable by name.

use std::str::FromStr;

use tracing::{debug, info};
use voyagr_domain::constants::DEFAULT_DB_POOL_SIZE;
use voyagr_domain::{
    AmadeusConfig, ApiEnvironment, AwardWalletConfig, Config, DatabaseConfig, DuffelConfig,
    Result, VoyagrError,
};

/// Load configuration from the process environment.
///
/// # Errors
/// Returns `VoyagrError::Config` if the database path is missing or any
/// present variable has an invalid value.
pub fn load() -> Result<Config> {
    let config = load_from_env()?;
    info!(
        amadeus = config.amadeus.is_some(),
        duffel = config.duffel.is_some(),
        awardwallet = config.awardwallet.is_some(),
        "configuration loaded from environment"
    );
    Ok(config)
}

/// Load configuration from environment variables.
///
/// Only the database path is required; each provider section is assembled
/// only when its credentials are fully present.
pub fn load_from_env() -> Result<Config> {
    let db_path = env_var("VOYAGR_DB_PATH")?;
    let db_pool_size = match std::env::var("VOYAGR_DB_POOL_SIZE") {
        Ok(raw) => raw
            .parse::<u32>()
            .map_err(|e| VoyagrError::Config(format!("Invalid pool size: {}", e)))?,
        Err(_) => DEFAULT_DB_POOL_SIZE,
    };

    Ok(Config {
        database: DatabaseConfig { path: db_path, pool_size: db_pool_size },
        amadeus: load_amadeus()?,
        duffel: load_duffel(),
        awardwallet: load_awardwallet()?,
    })
}

fn load_amadeus() -> Result<Option<AmadeusConfig>> {
    let (client_id, client_secret) = match (
        std::env::var("AMADEUS_CLIENT_ID"),
        std::env::var("AMADEUS_CLIENT_SECRET"),
    ) {
        (Ok(id), Ok(secret)) => (id, secret),
        _ => {
            debug!("Amadeus credentials not set, provider unconfigured");
            return Ok(None);
        }
    };

    let environment = match std::env::var("AMADEUS_ENV") {
        Ok(raw) => ApiEnvironment::from_str(&raw).map_err(VoyagrError::Config)?,
        Err(_) => ApiEnvironment::Test,
    };

    Ok(Some(AmadeusConfig { client_id, client_secret, environment }))
}

fn load_duffel() -> Option<DuffelConfig> {
    match std::env::var("DUFFEL_API_KEY") {
        Ok(api_key) => Some(DuffelConfig { api_key }),
        Err(_) => {
            debug!("Duffel credentials not set, provider unconfigured");
            None
        }
    }
}

fn load_awardwallet() -> Result<Option<AwardWalletConfig>> {
    let api_key = match std::env::var("AWARDWALLET_API_KEY") {
        Ok(key) => key,
        Err(_) => {
            debug!("AwardWallet credentials not set, aggregator unconfigured");
            return Ok(None);
        }
    };

    // The key is useless without a callback; treat a half-configured pair
    // as an error rather than silently skipping the aggregator.
    let callback_url = env_var("AWARDWALLET_CALLBACK_URL")?;
    Ok(Some(AwardWalletConfig { api_key, callback_url }))
}

/// Get required environment variable.
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        VoyagrError::Config(format!("Missing required environment variable: {}", key))
    })
}
