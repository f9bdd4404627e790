//! End-to-end token lifecycle against a real SQLite store and a mock
//! token endpoint.

use std::sync::Arc;

use tempfile::TempDir;
use voyagr_core::TokenRepository;
use voyagr_domain::{AmadeusConfig, ApiEnvironment};
use voyagr_infra::integrations::amadeus::{AccessTokenProvider, AmadeusTokenManager};
use voyagr_infra::{DbManager, HttpClient, SqliteTokenRepository};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn store() -> (TempDir, Arc<SqliteTokenRepository>) {
    let dir = TempDir::new().expect("temp dir");
    let db = DbManager::new(dir.path().join("voyagr.db"), 2).expect("db manager");
    db.run_migrations().expect("migrations");
    (dir, Arc::new(SqliteTokenRepository::new(Arc::new(db))))
}

fn manager(store: Arc<SqliteTokenRepository>, base_url: &str) -> AmadeusTokenManager {
    let config = AmadeusConfig {
        client_id: "client-id".into(),
        client_secret: "client-secret".into(),
        environment: ApiEnvironment::Test,
    };
    let http = HttpClient::builder()
        .base_backoff(std::time::Duration::from_millis(5))
        .build()
        .expect("http client");
    AmadeusTokenManager::new(config, store, http).with_base_url(base_url)
}

fn token_response(token: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "access_token": token,
        "token_type": "Bearer",
        "expires_in": 1799
    }))
}

#[tokio::test]
async fn first_access_mints_and_persists_then_cache_serves_the_rest() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/security/oauth2/token"))
        .respond_with(token_response("minted-token"))
        .expect(1)
        .mount(&server)
        .await;

    let (_dir, store) = store();

    let first = manager(Arc::clone(&store), &server.uri());
    assert_eq!(first.access_token().await.expect("minted"), "minted-token");

    // A separate manager over the same database picks up the row instead of
    // hitting the token endpoint again.
    let second = manager(Arc::clone(&store), &server.uri());
    assert_eq!(second.access_token().await.expect("cached"), "minted-token");

    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn concurrent_refreshes_both_succeed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/security/oauth2/token"))
        .respond_with(token_response("shared-token"))
        .mount(&server)
        .await;

    let (_dir, store) = store();
    let a = manager(Arc::clone(&store), &server.uri());
    let b = manager(Arc::clone(&store), &server.uri());

    // Empty store, two simultaneous callers. No locking: both may refresh,
    // both must succeed, and a valid row must remain afterwards.
    let (ra, rb) = futures::join!(a.access_token(), b.access_token());
    assert_eq!(ra.expect("a"), "shared-token");
    assert_eq!(rb.expect("b"), "shared-token");

    let cached = store.get_valid_token("test").await.expect("read").expect("row");
    assert_eq!(cached.access_token, "shared-token");
}

#[tokio::test]
async fn expired_sweep_keeps_valid_rows() {
    let (_dir, store) = store();

    store.save_token("test", "dead-1", "Bearer", -60).await.expect("save");
    store.save_token("test", "dead-2", "Bearer", -3600).await.expect("save");
    store.save_token("test", "alive", "Bearer", 1800).await.expect("save");
    store.save_token("prod", "alive-prod", "Bearer", 1800).await.expect("save");

    let removed = store.delete_expired_tokens().await.expect("sweep");
    assert_eq!(removed, 2);

    assert_eq!(
        store.get_valid_token("test").await.expect("read").expect("row").access_token,
        "alive"
    );
    assert_eq!(
        store.get_valid_token("prod").await.expect("read").expect("row").access_token,
        "alive-prod"
    );
}
