//! Duffel flight-offers search client

use async_trait::async_trait;
use reqwest::Method;
use tracing::debug;
use voyagr_core::FlightProvider;
use voyagr_domain::{DuffelConfig, FlightOffer, ProviderError, SearchRequest};

use super::types::{self, OfferResponse};
use super::PROVIDER;
use crate::http::HttpClient;

const DEFAULT_BASE_URL: &str = "https://api.duffel.com";
const OFFER_REQUEST_PATH: &str = "/air/offer_requests";
const API_VERSION: &str = "v2";

/// Duffel search client. A single offer-request POST returns offers inline;
/// auth is a static bearer API key with no refresh cycle.
pub struct DuffelClient {
    http: HttpClient,
    api_key: Option<String>,
    base_url: String,
}

impl DuffelClient {
    pub fn new(config: Option<&DuffelConfig>, http: HttpClient) -> Self {
        Self {
            http,
            api_key: config.map(|c| c.api_key.clone()),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the client at a different API host (mock servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn api_key(&self) -> Result<&str, ProviderError> {
        self.api_key.as_deref().ok_or_else(|| {
            ProviderError::config(PROVIDER, "DUFFEL_API_KEY is required but not set")
        })
    }
}

#[async_trait]
impl FlightProvider for DuffelClient {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn search(
        &self,
        request: &SearchRequest,
    ) -> Result<Vec<FlightOffer>, ProviderError> {
        let api_key = self.api_key()?;
        let endpoint = format!("{}{}?return_offers=true", self.base_url, OFFER_REQUEST_PATH);
        let payload = types::build_request(request);

        let builder = self
            .http
            .request(Method::POST, &endpoint)
            .header("Authorization", format!("Bearer {api_key}"))
            .header("Duffel-Version", API_VERSION)
            .json(&payload);

        let response = self
            .http
            .send(builder)
            .await
            .map_err(|err| ProviderError::network(PROVIDER, err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "unknown error".to_string());
            return Err(ProviderError::http(PROVIDER, status.as_u16(), body));
        }

        let body: OfferResponse = response.json().await.map_err(|err| {
            ProviderError::network(PROVIDER, format!("invalid offer response: {err}"))
        })?;

        let mut offers: Vec<FlightOffer> =
            body.data.offers.into_iter().filter_map(types::map_offer).collect();

        if let Some(cap) = request.max_results {
            offers.truncate(cap);
        }

        debug!(count = offers.len(), "mapped Duffel offers");
        Ok(offers)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use chrono::NaiveDate;
    use voyagr_domain::CabinClass;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client(base_url: &str, api_key: Option<&str>) -> DuffelClient {
        let config = api_key.map(|key| DuffelConfig { api_key: key.to_string() });
        let http = HttpClient::builder()
            .base_backoff(Duration::from_millis(5))
            .build()
            .expect("http client");
        DuffelClient::new(config.as_ref(), http).with_base_url(base_url)
    }

    fn request() -> SearchRequest {
        SearchRequest::one_way(
            "FRA",
            "JFK",
            NaiveDate::from_ymd_opt(2025, 3, 15).unwrap(),
            CabinClass::Business,
            2,
        )
    }

    fn offer_body() -> serde_json::Value {
        serde_json::json!({
            "data": {
                "id": "orq_1",
                "offers": [{
                    "id": "off_123",
                    "total_amount": "289.40",
                    "total_currency": "USD",
                    "owner": {"name": "American Airlines", "iata_code": "AA"},
                    "slices": [{
                        "segments": [{
                            "origin": {"iata_code": "FRA"},
                            "destination": {"iata_code": "JFK"},
                            "departing_at": "2025-03-15T09:45:00",
                            "arriving_at": "2025-03-15T12:35:00",
                            "marketing_carrier_flight_number": "71"
                        }]
                    }]
                }]
            }
        })
    }

    #[tokio::test]
    async fn missing_api_key_fails_before_any_request() {
        let server = MockServer::start().await;
        let client = client(&server.uri(), None);

        let err = client.search(&request()).await.unwrap_err();
        assert!(!err.is_retryable());
        assert!(err.message.contains("DUFFEL_API_KEY"));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn sends_versioned_authorized_offer_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/air/offer_requests"))
            .and(header("Authorization", "Bearer duffel-key"))
            .and(header("Duffel-Version", "v2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(offer_body()))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server.uri(), Some("duffel-key"));
        let offers = client.search(&request()).await.expect("offers");

        assert_eq!(offers.len(), 1);
        assert_eq!(offers[0].airline, "American Airlines");
        assert_eq!(offers[0].segments[0].carrier_code, "AA");

        // Payload carries one adult entry per passenger.
        let requests = server.received_requests().await.unwrap();
        let body: serde_json::Value = requests[0].body_json().unwrap();
        assert_eq!(body["data"]["passengers"].as_array().unwrap().len(), 2);
        assert_eq!(body["data"]["cabin_class"], "business");
    }

    #[tokio::test]
    async fn rate_limit_is_retried() {
        let server = MockServer::start().await;
        let attempts = Arc::new(AtomicUsize::new(0));
        let attempts_clone = attempts.clone();
        Mock::given(method("POST"))
            .and(path("/air/offer_requests"))
            .respond_with(move |_req: &wiremock::Request| -> ResponseTemplate {
                if attempts_clone.fetch_add(1, Ordering::SeqCst) == 0 {
                    ResponseTemplate::new(429)
                } else {
                    ResponseTemplate::new(200).set_body_json(offer_body())
                }
            })
            .expect(2)
            .mount(&server)
            .await;

        let client = client(&server.uri(), Some("duffel-key"));
        let offers = client.search(&request()).await.expect("second attempt succeeds");
        assert_eq!(offers.len(), 1);
    }

    #[tokio::test]
    async fn validation_error_is_fatal_with_zero_retries() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/air/offer_requests"))
            .respond_with(ResponseTemplate::new(422).set_body_string("cabin_class invalid"))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server.uri(), Some("duffel-key"));
        let err = client.search(&request()).await.unwrap_err();

        assert_eq!(err.status, Some(422));
        assert!(!err.is_retryable());
        assert!(err.message.contains("cabin_class invalid"));
    }
}
