//! AwardWallet loyalty gateway client

use async_trait::async_trait;
use reqwest::Method;
use tracing::debug;
use voyagr_core::{ConnectionInfo, LoyaltyGateway};
use voyagr_domain::{AwardWalletConfig, LoyaltyAccount, ProviderError, Result, VoyagrError};

use super::types::{self, AuthUrlResponse, ConnectedUserResponse, ConnectionInfoResponse};
use super::PROVIDER;
use crate::http::HttpClient;

const DEFAULT_BASE_URL: &str = "https://business.awardwallet.com/api/export/v1";

/// Client for the loyalty-account aggregator.
///
/// Every call runs with a single attempt: the code-exchange endpoint
/// consumes its authorization code on first use, so a transport-level
/// retry could burn the code without the caller ever seeing a response.
pub struct AwardWalletClient {
    http: HttpClient,
    config: AwardWalletConfig,
    base_url: String,
}

impl AwardWalletClient {
    pub fn new(config: AwardWalletConfig) -> Result<Self> {
        let http = HttpClient::builder().max_attempts(1).build()?;
        Ok(Self { http, config, base_url: DEFAULT_BASE_URL.to_string() })
    }

    /// Point the client at a different API host (mock servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn issue(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        let response = self
            .http
            .send(builder.header("X-Authentication", &self.config.api_key))
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "unknown error".to_string());
            return Err(VoyagrError::from(ProviderError::http(
                PROVIDER,
                status.as_u16(),
                body,
            )));
        }

        Ok(response)
    }
}

#[async_trait]
impl LoyaltyGateway for AwardWalletClient {
    async fn create_auth_url(&self) -> Result<String> {
        let endpoint = format!("{}/create-auth-url", self.base_url);
        let payload = serde_json::json!({
            "platform": "web",
            "redirectUrl": self.config.callback_url,
        });

        let builder = self.http.request(Method::POST, &endpoint).json(&payload);
        let response = self.issue(builder).await?;

        let body: AuthUrlResponse = response
            .json()
            .await
            .map_err(|err| VoyagrError::Provider(invalid_body(err)))?;

        debug!("minted loyalty consent url");
        Ok(body.url)
    }

    async fn get_connection_info(&self, code: &str) -> Result<ConnectionInfo> {
        let endpoint = format!("{}/get-connection-info/{}", self.base_url, code);

        let builder = self.http.request(Method::GET, &endpoint);
        let response = self.issue(builder).await?;

        let body: ConnectionInfoResponse = response
            .json()
            .await
            .map_err(|err| VoyagrError::Provider(invalid_body(err)))?;

        Ok(ConnectionInfo { external_user_id: body.user_id })
    }

    async fn get_connected_user(&self, external_user_id: &str) -> Result<Vec<LoyaltyAccount>> {
        let endpoint = format!("{}/connectedUser/{}", self.base_url, external_user_id);

        let builder = self.http.request(Method::GET, &endpoint);
        let response = self.issue(builder).await?;

        let body: ConnectedUserResponse = response
            .json()
            .await
            .map_err(|err| VoyagrError::Provider(invalid_body(err)))?;

        let accounts: Vec<LoyaltyAccount> =
            body.accounts.into_iter().map(types::map_account).collect();
        debug!(count = accounts.len(), "listed linked loyalty accounts");
        Ok(accounts)
    }
}

fn invalid_body(err: reqwest::Error) -> ProviderError {
    ProviderError::network(PROVIDER, format!("invalid aggregator response: {err}"))
}
