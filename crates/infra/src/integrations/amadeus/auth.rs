//! Amadeus OAuth token lifecycle
//!
//! Returns a currently-valid bearer token for the configured environment,
//! transparently refreshing when the store has none or the cached token is
//! inside the five-minute expiry margin. Every refresh inserts one new row
//! into the token store; concurrent refreshes for the same environment are
//! tolerated (both succeed, both are valid) because token validity is
//! idempotent and harmless duplication is cheaper than coordination.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Method;
use serde::Deserialize;
use tracing::{debug, info};
use voyagr_core::TokenRepository;
use voyagr_domain::constants::TOKEN_REFRESH_MARGIN_SECS;
use voyagr_domain::{AmadeusConfig, ProviderError};

use super::PROVIDER;
use crate::http::HttpClient;

const TOKEN_PATH: &str = "/v1/security/oauth2/token";

/// Provides OAuth bearer tokens for Amadeus API calls.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// Retrieve a bearer token, reusing the cached one when fresh.
    async fn access_token(&self) -> Result<String, ProviderError>;

    /// Skip the cache and exchange credentials for a new token. Used by the
    /// 401-recovery path; a blind retry of the failing request would be
    /// wrong there.
    async fn force_refresh(&self) -> Result<String, ProviderError>;
}

/// Database-backed token manager for the Amadeus client-credentials flow.
pub struct AmadeusTokenManager {
    config: AmadeusConfig,
    store: Arc<dyn TokenRepository>,
    http: HttpClient,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    token_type: String,
    expires_in: i64,
}

impl AmadeusTokenManager {
    pub fn new(config: AmadeusConfig, store: Arc<dyn TokenRepository>, http: HttpClient) -> Self {
        let base_url = config.base_url().to_string();
        Self { config, store, http, base_url }
    }

    /// Point the manager at a different token endpoint (mock servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn request_token(&self) -> Result<String, ProviderError> {
        let endpoint = format!("{}{}", self.base_url, TOKEN_PATH);
        let environment = self.config.environment.tag();

        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
        ];

        let builder = self.http.request(Method::POST, &endpoint).form(&form);
        let response = self
            .http
            .send(builder)
            .await
            .map_err(|err| ProviderError::network(PROVIDER, err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            // Fatal for the current search: no silent fallback to a stale
            // token.
            let body = response.text().await.unwrap_or_else(|_| "unknown error".to_string());
            return Err(ProviderError::http(
                PROVIDER,
                status.as_u16(),
                format!("token request failed: {body}"),
            ));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|err| ProviderError::network(PROVIDER, format!("invalid token response: {err}")))?;

        let saved = self
            .store
            .save_token(environment, &token.access_token, &token.token_type, token.expires_in)
            .await
            .map_err(|err| store_error(format!("failed to persist token: {err}")))?;

        info!(
            environment,
            expires_at = %saved.expires_at,
            "obtained new Amadeus access token"
        );

        Ok(saved.access_token)
    }
}

#[async_trait]
impl AccessTokenProvider for AmadeusTokenManager {
    async fn access_token(&self) -> Result<String, ProviderError> {
        let environment = self.config.environment.tag();
        let cached = self
            .store
            .get_valid_token(environment)
            .await
            .map_err(|err| store_error(format!("token store read failed: {err}")))?;

        if let Some(token) = cached {
            if !token.expires_within(Utc::now(), TOKEN_REFRESH_MARGIN_SECS) {
                debug!(environment, "reusing cached Amadeus access token");
                return Ok(token.access_token);
            }
            debug!(environment, "cached token inside expiry margin, refreshing");
        }

        self.request_token().await
    }

    async fn force_refresh(&self) -> Result<String, ProviderError> {
        self.request_token().await
    }
}

fn store_error(message: String) -> ProviderError {
    ProviderError { provider: PROVIDER.into(), status: None, message, retryable: false }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use voyagr_domain::{ApiEnvironment, CachedToken, Result as DomainResult};
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    /// In-memory token store tracking saves.
    #[derive(Default)]
    struct MemoryTokenStore {
        tokens: Mutex<Vec<CachedToken>>,
    }

    #[async_trait]
    impl TokenRepository for MemoryTokenStore {
        async fn get_valid_token(&self, environment: &str) -> DomainResult<Option<CachedToken>> {
            let now = Utc::now();
            let tokens = self.tokens.lock().unwrap();
            Ok(tokens
                .iter()
                .filter(|t| t.environment == environment && t.is_valid(now))
                .max_by_key(|t| (t.created_at, t.id))
                .cloned())
        }

        async fn save_token(
            &self,
            environment: &str,
            access_token: &str,
            token_type: &str,
            expires_in_secs: i64,
        ) -> DomainResult<CachedToken> {
            let mut tokens = self.tokens.lock().unwrap();
            let now = Utc::now();
            let token = CachedToken {
                id: tokens.len() as i64 + 1,
                environment: environment.to_string(),
                access_token: access_token.to_string(),
                token_type: token_type.to_string(),
                expires_at: now + chrono::Duration::seconds(expires_in_secs),
                created_at: now,
            };
            tokens.push(token.clone());
            Ok(token)
        }

        async fn delete_expired_tokens(&self) -> DomainResult<usize> {
            let now = Utc::now();
            let mut tokens = self.tokens.lock().unwrap();
            let before = tokens.len();
            tokens.retain(|t| t.is_valid(now));
            Ok(before - tokens.len())
        }
    }

    fn config() -> AmadeusConfig {
        AmadeusConfig {
            client_id: "client-id".into(),
            client_secret: "client-secret".into(),
            environment: ApiEnvironment::Test,
        }
    }

    fn manager(store: Arc<MemoryTokenStore>, base_url: &str) -> AmadeusTokenManager {
        let http = HttpClient::builder()
            .base_backoff(std::time::Duration::from_millis(5))
            .build()
            .expect("http client");
        AmadeusTokenManager::new(config(), store, http).with_base_url(base_url)
    }

    #[tokio::test]
    async fn fresh_cached_token_avoids_token_endpoint() {
        let server = MockServer::start().await;
        // No mock mounted: any HTTP call would fail the test via the error
        // path below.
        let store = Arc::new(MemoryTokenStore::default());
        store.save_token("test", "cached-token", "Bearer", 1800).await.unwrap();

        let manager = manager(Arc::clone(&store), &server.uri());
        let token = manager.access_token().await.expect("cached token");

        assert_eq!(token, "cached-token");
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_token_triggers_exactly_one_refresh() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/security/oauth2/token"))
            .and(body_string_contains("grant_type=client_credentials"))
            .and(body_string_contains("client_id=client-id"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "fresh-token",
                "token_type": "Bearer",
                "expires_in": 1799
            })))
            .expect(1)
            .mount(&server)
            .await;

        let store = Arc::new(MemoryTokenStore::default());
        let manager = manager(Arc::clone(&store), &server.uri());

        let token = manager.access_token().await.expect("refreshed token");
        assert_eq!(token, "fresh-token");

        // The refresh result is persisted.
        let cached = store.get_valid_token("test").await.unwrap().unwrap();
        assert_eq!(cached.access_token, "fresh-token");
    }

    #[tokio::test]
    async fn near_expiry_token_is_proactively_refreshed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/security/oauth2/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "fresh-token",
                "token_type": "Bearer",
                "expires_in": 1799
            })))
            .expect(1)
            .mount(&server)
            .await;

        let store = Arc::new(MemoryTokenStore::default());
        // 2 minutes remaining, inside the 5-minute margin.
        store.save_token("test", "stale-soon", "Bearer", 120).await.unwrap();

        let manager = manager(Arc::clone(&store), &server.uri());
        let token = manager.access_token().await.expect("refreshed token");
        assert_eq!(token, "fresh-token");
    }

    #[tokio::test]
    async fn token_endpoint_failure_is_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/security/oauth2/token"))
            .respond_with(
                ResponseTemplate::new(401).set_body_string("invalid client credentials"),
            )
            .mount(&server)
            .await;

        let store = Arc::new(MemoryTokenStore::default());
        let manager = manager(store, &server.uri());

        let err = manager.access_token().await.unwrap_err();
        assert_eq!(err.status, Some(401));
        assert!(!err.is_retryable());
        assert!(err.message.contains("invalid client credentials"));
    }
}
