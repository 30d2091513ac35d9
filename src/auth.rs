//! Session cookie authentication and viewer resolution.
//!
//! The dictionary core only ever sees a [`Viewer`]; this module turns the
//! incoming session cookie into one, falling back to the anonymous
//! general-public viewer when there is no valid session.

use std::collections::HashSet;

use sqlx::SqlitePool;
use tower_cookies::Cookies;

use signbank_backend::dictionary::{Capability, Viewer};

pub const SESSION_COOKIE_NAME: &str = "session_token";

/// Session lifetime: 7 days
const SESSION_TTL_SECONDS: i64 = 7 * 24 * 60 * 60;

/// A resolved login session
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: String,
    pub username: String,
}

/// Verify a session token against the store
async fn verify_session_token(token: &str, pool: &SqlitePool) -> Result<Session, String> {
    let row: Option<(String, String, bool)> = sqlx::query_as(
        "SELECT u.id, u.username, u.enabled FROM user_sessions s \
         JOIN users u ON u.id = s.user_id \
         WHERE s.token = ? AND s.expires_at > ?",
    )
    .bind(token)
    .bind(chrono::Utc::now().timestamp())
    .fetch_optional(pool)
    .await
    .map_err(|_| "Failed to verify session".to_string())?;

    match row {
        Some((user_id, username, true)) => Ok(Session { user_id, username }),
        Some((_, _, false)) => Err("Account is disabled".to_string()),
        None => Err("Invalid or expired session".to_string()),
    }
}

/// Load the capability grants for a user
pub async fn load_capabilities(user_id: &str, pool: &SqlitePool) -> HashSet<Capability> {
    let rows: Vec<(String,)> =
        sqlx::query_as("SELECT capability FROM user_capabilities WHERE user_id = ?")
            .bind(user_id)
            .fetch_all(pool)
            .await
            .unwrap_or_default();

    let mut capabilities = HashSet::new();
    for (name,) in rows {
        match Capability::parse(&name) {
            Some(capability) => {
                capabilities.insert(capability);
            }
            None => tracing::warn!("Unknown capability grant ignored: {}", name),
        }
    }
    capabilities
}

/// Resolve the session behind the request's cookie, if any
pub async fn current_session(cookies: &Cookies, pool: &SqlitePool) -> Option<Session> {
    let token = cookies.get(SESSION_COOKIE_NAME)?.value().to_string();
    match verify_session_token(&token, pool).await {
        Ok(session) => Some(session),
        Err(msg) => {
            tracing::debug!("Session rejected: {}", msg);
            None
        }
    }
}

/// Resolve the viewer a request runs as, anonymous when not logged in
pub async fn current_viewer(cookies: &Cookies, pool: &SqlitePool) -> Viewer {
    match current_session(cookies, pool).await {
        Some(session) => {
            let capabilities = load_capabilities(&session.user_id, pool).await;
            Viewer::authenticated(capabilities)
        }
        None => Viewer::anonymous(),
    }
}

/// Create a session for a user, replacing any previous one
pub async fn create_session(user_id: &str, pool: &SqlitePool) -> Result<String, String> {
    use rand::Rng;
    let token: String = rand::thread_rng()
        .sample_iter(&rand::distributions::Alphanumeric)
        .take(64)
        .map(char::from)
        .collect();

    let now = chrono::Utc::now();
    let expires_at = now.timestamp() + SESSION_TTL_SECONDS;

    let _ = sqlx::query("DELETE FROM user_sessions WHERE user_id = ?")
        .bind(user_id)
        .execute(pool)
        .await;

    sqlx::query(
        "INSERT INTO user_sessions (token, user_id, expires_at, created_at) VALUES (?, ?, ?, ?)",
    )
    .bind(&token)
    .bind(user_id)
    .bind(expires_at)
    .bind(now.to_rfc3339())
    .execute(pool)
    .await
    .map_err(|_| "Failed to create session".to_string())?;

    Ok(token)
}

/// Delete a session (logout)
pub async fn delete_session(token: &str, pool: &SqlitePool) -> Result<(), String> {
    sqlx::query("DELETE FROM user_sessions WHERE token = ?")
        .bind(token)
        .execute(pool)
        .await
        .map_err(|_| "Failed to delete session".to_string())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use signbank_backend::db;

    async fn memory_pool() -> SqlitePool {
        // One connection so every query sees the same in-memory database
        sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap()
    }

    async fn setup_user(pool: &SqlitePool, username: &str, enabled: bool) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        let now = chrono::Utc::now().to_rfc3339();
        sqlx::query(
            "INSERT INTO users (id, username, password_hash, enabled, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(username)
        .bind("x")
        .bind(enabled)
        .bind(&now)
        .bind(&now)
        .execute(pool)
        .await
        .unwrap();
        id
    }

    #[tokio::test]
    async fn test_session_round_trip() {
        let pool = memory_pool().await;
        db::run_migrations(&pool).await.unwrap();
        let user_id = setup_user(&pool, "staff", true).await;

        let token = create_session(&user_id, &pool).await.unwrap();
        let session = verify_session_token(&token, &pool).await.unwrap();
        assert_eq!(session.username, "staff");

        // A second login invalidates the first token
        let token2 = create_session(&user_id, &pool).await.unwrap();
        assert!(verify_session_token(&token, &pool).await.is_err());
        assert!(verify_session_token(&token2, &pool).await.is_ok());

        delete_session(&token2, &pool).await.unwrap();
        assert!(verify_session_token(&token2, &pool).await.is_err());
    }

    #[tokio::test]
    async fn test_disabled_user_session_is_rejected() {
        let pool = memory_pool().await;
        db::run_migrations(&pool).await.unwrap();
        let user_id = setup_user(&pool, "gone", false).await;

        let token = create_session(&user_id, &pool).await.unwrap();
        assert!(verify_session_token(&token, &pool).await.is_err());
    }

    #[tokio::test]
    async fn test_capabilities_ignore_unknown_grants() {
        let pool = memory_pool().await;
        db::run_migrations(&pool).await.unwrap();
        let user_id = setup_user(&pool, "staff", true).await;

        for name in ["search_gloss", "update_video"] {
            sqlx::query("INSERT INTO user_capabilities (user_id, capability) VALUES (?, ?)")
                .bind(&user_id)
                .bind(name)
                .execute(&pool)
                .await
                .unwrap();
        }

        let capabilities = load_capabilities(&user_id, &pool).await;
        assert_eq!(capabilities.len(), 1);
        assert!(capabilities.contains(&Capability::SearchGloss));
    }
}
