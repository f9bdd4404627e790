//! Amadeus flight-offers search client

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use tracing::{debug, warn};
use voyagr_core::FlightProvider;
use voyagr_domain::{AmadeusConfig, FlightOffer, ProviderError, SearchRequest};

use super::auth::AccessTokenProvider;
use super::types::{self, Dictionaries, FlightOffersResponse};
use super::PROVIDER;
use crate::http::HttpClient;

const SEARCH_PATH: &str = "/v2/shopping/flight-offers";

/// Amadeus search client. Auth comes from the injected token provider;
/// transient failures are retried by the shared [`HttpClient`].
pub struct AmadeusClient {
    http: HttpClient,
    token_provider: Arc<dyn AccessTokenProvider>,
    base_url: String,
}

impl AmadeusClient {
    pub fn new(
        config: &AmadeusConfig,
        token_provider: Arc<dyn AccessTokenProvider>,
        http: HttpClient,
    ) -> Self {
        Self { http, token_provider, base_url: config.base_url().to_string() }
    }

    /// Point the client at a different API host (mock servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn issue_search(
        &self,
        request: &SearchRequest,
        access_token: &str,
    ) -> Result<reqwest::Response, ProviderError> {
        let endpoint = format!("{}{}", self.base_url, SEARCH_PATH);
        let payload = types::build_request(request);

        let builder = self
            .http
            .request(Method::POST, &endpoint)
            .header("Authorization", format!("Bearer {access_token}"))
            .json(&payload);

        self.http
            .send(builder)
            .await
            .map_err(|err| ProviderError::network(PROVIDER, err.to_string()))
    }

    async fn map_response(
        &self,
        response: reqwest::Response,
        request: &SearchRequest,
    ) -> Result<Vec<FlightOffer>, ProviderError> {
        let body: FlightOffersResponse = response.json().await.map_err(|err| {
            ProviderError::network(PROVIDER, format!("invalid search response: {err}"))
        })?;

        let dictionaries = body.dictionaries.unwrap_or_else(Dictionaries::default);
        let mut offers: Vec<FlightOffer> = body
            .data
            .into_iter()
            .filter_map(|raw| types::map_offer(raw, &dictionaries))
            .collect();

        // Truncate after mapping so the cap reflects validated offers.
        if let Some(cap) = request.max_results {
            offers.truncate(cap);
        }

        debug!(count = offers.len(), "mapped Amadeus offers");
        Ok(offers)
    }
}

#[async_trait]
impl FlightProvider for AmadeusClient {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn search(
        &self,
        request: &SearchRequest,
    ) -> Result<Vec<FlightOffer>, ProviderError> {
        let token = self.token_provider.access_token().await?;
        let response = self.issue_search(request, &token).await?;

        // 401 means the token expired under us: force one refresh and
        // re-issue, never a blind retry. A second 401 right after a fresh
        // token is fatal.
        let response = if response.status().as_u16() == 401 {
            warn!("Amadeus rejected token, forcing refresh");
            let token = self.token_provider.force_refresh().await?;
            self.issue_search(request, &token).await?
        } else {
            response
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "unknown error".to_string());
            return Err(ProviderError::http(PROVIDER, status.as_u16(), body));
        }

        self.map_response(response, request).await
    }
}
