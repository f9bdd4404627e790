//! Token store implementation
//!
//! Persists cached OAuth bearer tokens keyed by provider environment.
//! Saves are insert-only so a concurrent reader mid-transaction never
//! observes a token-less window; old rows are removed by the asynchronous
//! cleanup sweep, never synchronously on insert.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Row};
use tokio::task;
use voyagr_core::TokenRepository;
use voyagr_domain::{CachedToken, Result, VoyagrError};

use super::manager::{map_sql_error, DbConnection, DbManager};

/// SQLite-backed token repository.
pub struct SqliteTokenRepository {
    db: Arc<DbManager>,
}

impl SqliteTokenRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TokenRepository for SqliteTokenRepository {
    async fn get_valid_token(&self, environment: &str) -> Result<Option<CachedToken>> {
        let db = Arc::clone(&self.db);
        let environment = environment.to_string();

        task::spawn_blocking(move || -> Result<Option<CachedToken>> {
            let conn = db.get_connection()?;
            query_valid_token(&conn, &environment, Utc::now())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn save_token(
        &self,
        environment: &str,
        access_token: &str,
        token_type: &str,
        expires_in_secs: i64,
    ) -> Result<CachedToken> {
        let db = Arc::clone(&self.db);
        let environment = environment.to_string();
        let access_token = access_token.to_string();
        let token_type = token_type.to_string();

        task::spawn_blocking(move || -> Result<CachedToken> {
            let conn = db.get_connection()?;
            insert_token(&conn, &environment, &access_token, &token_type, expires_in_secs)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn delete_expired_tokens(&self) -> Result<usize> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<usize> {
            let conn = db.get_connection()?;
            delete_expired(&conn, Utc::now())
        })
        .await
        .map_err(map_join_error)?
    }
}

// ============================================================================
// SQL Operations (synchronous)
// ============================================================================

fn query_valid_token(
    conn: &DbConnection,
    environment: &str,
    now: DateTime<Utc>,
) -> Result<Option<CachedToken>> {
    // created_at ties are broken by id so two refreshes landing in the same
    // second still resolve deterministically.
    let sql = "SELECT id, environment, access_token, token_type, expires_at, created_at
               FROM oauth_tokens
               WHERE environment = ?1 AND expires_at > ?2
               ORDER BY created_at DESC, id DESC
               LIMIT 1";

    let mut stmt = conn.prepare(sql).map_err(map_sql_error)?;
    let mut rows = stmt
        .query_map(params![environment, now.timestamp()], map_token_row)
        .map_err(map_sql_error)?;

    match rows.next() {
        Some(row) => Ok(Some(row.map_err(map_sql_error)?)),
        None => Ok(None),
    }
}

fn insert_token(
    conn: &DbConnection,
    environment: &str,
    access_token: &str,
    token_type: &str,
    expires_in_secs: i64,
) -> Result<CachedToken> {
    let now = Utc::now();
    let expires_at = now.timestamp() + expires_in_secs;

    conn.execute(
        "INSERT INTO oauth_tokens (environment, access_token, token_type, expires_at, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![environment, access_token, token_type, expires_at, now.timestamp()],
    )
    .map_err(map_sql_error)?;

    let id = conn.last_insert_rowid();

    Ok(CachedToken {
        id,
        environment: environment.to_string(),
        access_token: access_token.to_string(),
        token_type: token_type.to_string(),
        expires_at: timestamp_to_datetime(expires_at)?,
        created_at: timestamp_to_datetime(now.timestamp())?,
    })
}

fn delete_expired(conn: &DbConnection, now: DateTime<Utc>) -> Result<usize> {
    conn.execute("DELETE FROM oauth_tokens WHERE expires_at <= ?1", params![now.timestamp()])
        .map_err(map_sql_error)
}

fn map_token_row(row: &Row<'_>) -> rusqlite::Result<CachedToken> {
    let expires_at: i64 = row.get(4)?;
    let created_at: i64 = row.get(5)?;

    Ok(CachedToken {
        id: row.get(0)?,
        environment: row.get(1)?,
        access_token: row.get(2)?,
        token_type: row.get(3)?,
        expires_at: DateTime::<Utc>::from_timestamp(expires_at, 0).unwrap_or_default(),
        created_at: DateTime::<Utc>::from_timestamp(created_at, 0).unwrap_or_default(),
    })
}

fn timestamp_to_datetime(secs: i64) -> Result<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(secs, 0)
        .ok_or_else(|| VoyagrError::Internal(format!("timestamp out of range: {secs}")))
}

fn map_join_error(err: task::JoinError) -> VoyagrError {
    VoyagrError::Internal(format!("database task panicked: {err}"))
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn repository() -> (TempDir, SqliteTokenRepository) {
        let dir = TempDir::new().unwrap();
        let manager = Arc::new(DbManager::new(dir.path().join("tokens.db"), 2).unwrap());
        manager.run_migrations().unwrap();
        (dir, SqliteTokenRepository::new(manager))
    }

    #[tokio::test]
    async fn absence_is_a_normal_outcome() {
        let (_dir, repo) = repository();
        let token = repo.get_valid_token("test").await.unwrap();
        assert!(token.is_none());
    }

    #[tokio::test]
    async fn saves_and_reads_back_a_token() {
        let (_dir, repo) = repository();

        let saved = repo.save_token("test", "abc123", "Bearer", 1799).await.unwrap();
        assert_eq!(saved.environment, "test");
        assert_eq!(saved.access_token, "abc123");

        let current = repo.get_valid_token("test").await.unwrap().unwrap();
        assert_eq!(current.id, saved.id);
        assert_eq!(current.access_token, "abc123");
    }

    #[tokio::test]
    async fn expired_tokens_are_never_returned() {
        let (_dir, repo) = repository();
        repo.save_token("test", "stale", "Bearer", -60).await.unwrap();

        assert!(repo.get_valid_token("test").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn newest_valid_token_wins() {
        let (_dir, repo) = repository();
        repo.save_token("test", "older", "Bearer", 1800).await.unwrap();
        repo.save_token("test", "newer", "Bearer", 1800).await.unwrap();

        let current = repo.get_valid_token("test").await.unwrap().unwrap();
        assert_eq!(current.access_token, "newer");
    }

    #[tokio::test]
    async fn environments_are_isolated() {
        let (_dir, repo) = repository();
        repo.save_token("test", "sandbox-token", "Bearer", 1800).await.unwrap();

        assert!(repo.get_valid_token("prod").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_inserts_rather_than_replacing() {
        let (_dir, repo) = repository();
        let first = repo.save_token("test", "one", "Bearer", 1800).await.unwrap();
        let second = repo.save_token("test", "two", "Bearer", 1800).await.unwrap();

        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn sweep_removes_only_expired_rows() {
        let (_dir, repo) = repository();
        repo.save_token("test", "expired-1", "Bearer", -120).await.unwrap();
        repo.save_token("test", "expired-2", "Bearer", -60).await.unwrap();
        repo.save_token("test", "live", "Bearer", 1800).await.unwrap();

        let removed = repo.delete_expired_tokens().await.unwrap();
        assert_eq!(removed, 2);

        let current = repo.get_valid_token("test").await.unwrap().unwrap();
        assert_eq!(current.access_token, "live");
    }
}
