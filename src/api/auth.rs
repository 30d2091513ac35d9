use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_cookies::{Cookie, Cookies};

use signbank_backend::models::User;

use crate::auth::{
    create_session, current_session, delete_session, load_capabilities, SESSION_COOKIE_NAME,
};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Json(req): Json<LoginRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let user: Option<User> = sqlx::query_as(
        "SELECT id, username, password_hash, enabled, created_at, updated_at \
         FROM users WHERE username = ?",
    )
    .bind(&req.username)
    .fetch_optional(&state.db)
    .await
    .map_err(|e| {
        tracing::error!("Login query failed: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Internal error" })),
        )
    })?;

    let Some(user) = user else {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Invalid username or password" })),
        ));
    };

    if !user.enabled {
        return Err((
            StatusCode::FORBIDDEN,
            Json(json!({ "error": "Account is disabled" })),
        ));
    }

    let valid = bcrypt::verify(&req.password, &user.password_hash).unwrap_or(false);
    if !valid {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Invalid username or password" })),
        ));
    }

    let token = create_session(&user.id, &state.db).await.map_err(|e| {
        tracing::error!("Failed to create session: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Internal error" })),
        )
    })?;

    let mut cookie = Cookie::new(SESSION_COOKIE_NAME, token);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookies.add(cookie);

    tracing::info!("User logged in: {}", req.username);

    Ok(Json(json!({ "success": true, "username": req.username })))
}

pub async fn logout(State(state): State<Arc<AppState>>, cookies: Cookies) -> Json<Value> {
    if let Some(cookie) = cookies.get(SESSION_COOKIE_NAME) {
        let _ = delete_session(cookie.value(), &state.db).await;
        let mut removal = Cookie::new(SESSION_COOKIE_NAME, "");
        removal.set_path("/");
        cookies.remove(removal);
    }
    Json(json!({ "success": true }))
}

/// GET /api/auth/me - who the current session belongs to
pub async fn me(State(state): State<Arc<AppState>>, cookies: Cookies) -> Json<Value> {
    match current_session(&cookies, &state.db).await {
        Some(session) => {
            let capabilities: Vec<&str> = load_capabilities(&session.user_id, &state.db)
                .await
                .into_iter()
                .map(|c| c.as_str())
                .collect();
            Json(json!({
                "authenticated": true,
                "username": session.username,
                "capabilities": capabilities,
            }))
        }
        None => Json(json!({ "authenticated": false })),
    }
}
