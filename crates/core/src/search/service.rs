//! Aggregation facade - fans one logical search out to every configured
//! provider and merges the survivors into a single canonical result list.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tracing::{debug, warn};
use voyagr_domain::constants::{DEFAULT_MAX_OFFERS, DEFAULT_SEARCH_TIMEOUT_SECS};
use voyagr_domain::{FlightOffer, ProviderError, Result, SearchRequest, VoyagrError};

use super::ports::FlightProvider;

/// Aggregation facade over the configured flight providers.
///
/// Providers run concurrently and independently: one provider's fatal error
/// (or deadline overrun) excludes that provider from the result set without
/// aborting its siblings. Provider identity is never attached to returned
/// offers; callers see one unified catalog.
pub struct SearchService {
    providers: Vec<Arc<dyn FlightProvider>>,
    provider_timeout: Duration,
}

impl SearchService {
    /// Create a facade over the given providers.
    pub fn new(providers: Vec<Arc<dyn FlightProvider>>) -> Self {
        Self { providers, provider_timeout: Duration::from_secs(DEFAULT_SEARCH_TIMEOUT_SECS) }
    }

    /// Bound each provider's share of the search, including retry sleeps.
    pub fn with_provider_timeout(mut self, timeout: Duration) -> Self {
        self.provider_timeout = timeout;
        self
    }

    /// Search every registered provider.
    pub async fn search_all(&self, request: &SearchRequest) -> Result<Vec<FlightOffer>> {
        self.dispatch(request, &self.providers).await
    }

    /// Search a requested subset of providers by name. Unknown names are
    /// ignored; they come from caller UI input, not configuration.
    pub async fn search_selected(
        &self,
        request: &SearchRequest,
        names: &HashSet<&str>,
    ) -> Result<Vec<FlightOffer>> {
        let selected: Vec<Arc<dyn FlightProvider>> = self
            .providers
            .iter()
            .filter(|p| names.contains(p.name()))
            .cloned()
            .collect();

        // A selection that matches nothing is an empty result, not a
        // configuration error; that error is reserved for a facade built
        // with no providers at all.
        if selected.is_empty() {
            request.validate()?;
            return Ok(Vec::new());
        }

        self.dispatch(request, &selected).await
    }

    /// Names of the registered providers.
    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    async fn dispatch(
        &self,
        request: &SearchRequest,
        providers: &[Arc<dyn FlightProvider>],
    ) -> Result<Vec<FlightOffer>> {
        request.validate()?;

        if providers.is_empty() {
            return Err(VoyagrError::Config("no flight providers configured".into()));
        }

        let searches = providers.iter().map(|provider| {
            let provider = Arc::clone(provider);
            async move {
                let name = provider.name();
                let outcome =
                    tokio::time::timeout(self.provider_timeout, provider.search(request)).await;
                match outcome {
                    Ok(result) => (name, result),
                    Err(_) => (
                        name,
                        Err(ProviderError::network(
                            name,
                            format!("search exceeded {:?} deadline", self.provider_timeout),
                        )),
                    ),
                }
            }
        });

        let mut offers = Vec::new();
        let mut failures: Vec<ProviderError> = Vec::new();

        for (name, result) in join_all(searches).await {
            match result {
                Ok(provider_offers) => {
                    debug!(provider = name, count = provider_offers.len(), "provider search ok");
                    offers.extend(provider_offers);
                }
                Err(err) => {
                    warn!(
                        provider = name,
                        status = err.status,
                        error = %err,
                        "provider excluded from aggregated results"
                    );
                    failures.push(err);
                }
            }
        }

        // Best available results from whichever providers succeeded; a hard
        // failure only when every provider failed.
        if offers.is_empty() && failures.len() == providers.len() {
            let summary = failures
                .iter()
                .map(|f| format!("{}: {}", f.provider, f.message))
                .collect::<Vec<_>>()
                .join("; ");
            return Err(VoyagrError::Provider(ProviderError {
                provider: "all".into(),
                status: None,
                message: format!("all providers failed ({summary})"),
                retryable: false,
            }));
        }

        offers.truncate(request.max_results.unwrap_or(DEFAULT_MAX_OFFERS));

        Ok(offers)
    }
}
