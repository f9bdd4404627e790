//! Example: Running an aggregated flight search
//!
//! Wires the configured providers into the aggregation facade and runs a
//! one-way search, printing the merged offers as JSON.
//!
//! # Setup
//!
//! 1. Set up environment variables: ```bash export VOYAGR_DB_PATH=voyagr.db
//!    export AMADEUS_CLIENT_ID=... export AMADEUS_CLIENT_SECRET=... export
//!    DUFFEL_API_KEY=... ```
//!
//! 2. Run this example: ```bash cargo run --example search_offers ```

use std::sync::Arc;

use chrono::{Duration, Utc};
use voyagr_core::{FlightProvider, SearchService};
use voyagr_domain::{CabinClass, SearchRequest};
use voyagr_infra::integrations::amadeus::{AmadeusClient, AmadeusTokenManager};
use voyagr_core::LoyaltyGateway;
use voyagr_infra::integrations::awardwallet::AwardWalletClient;
use voyagr_infra::integrations::duffel::DuffelClient;
use voyagr_infra::{config, DbManager, HttpClient, SqliteTokenRepository};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let app_config = config::load()?;

    let db = DbManager::new(&app_config.database.path, app_config.database.pool_size)?;
    db.run_migrations()?;
    let token_store = Arc::new(SqliteTokenRepository::new(Arc::new(db)));

    let mut providers: Vec<Arc<dyn FlightProvider>> = Vec::new();

    if let Some(amadeus) = &app_config.amadeus {
        let token_manager = Arc::new(AmadeusTokenManager::new(
            amadeus.clone(),
            Arc::clone(&token_store) as Arc<dyn voyagr_core::TokenRepository>,
            HttpClient::new()?,
        ));
        providers.push(Arc::new(AmadeusClient::new(amadeus, token_manager, HttpClient::new()?)));
        println!("✓ Amadeus configured ({})", amadeus.environment.tag());
    }

    if app_config.duffel.is_some() {
        providers.push(Arc::new(DuffelClient::new(app_config.duffel.as_ref(), HttpClient::new()?)));
        println!("✓ Duffel configured");
    }

    if let Some(awardwallet) = app_config.awardwallet.clone() {
        let gateway = AwardWalletClient::new(awardwallet)?;
        let url = gateway.create_auth_url().await?;
        println!("✓ AwardWallet configured, consent URL: {url}");
    }

    if providers.is_empty() {
        println!("ℹ️  No providers configured, set AMADEUS_* or DUFFEL_API_KEY");
        return Ok(());
    }

    let service = SearchService::new(providers);
    println!("Searching providers: {:?}\n", service.provider_names());

    let mut request = SearchRequest::one_way(
        "FRA",
        "JFK",
        (Utc::now() + Duration::days(30)).date_naive(),
        CabinClass::Economy,
        1,
    );
    request.max_results = Some(10);

    let offers = service.search_all(&request).await?;
    println!("Found {} offers:", offers.len());
    for offer in &offers {
        println!("{}", serde_json::to_string_pretty(offer)?);
    }

    Ok(())
}
