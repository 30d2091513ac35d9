use axum::{
    routing::{get, post},
    Router,
};
use sqlx::sqlite::SqlitePool;
use std::sync::Arc;
use tower_cookies::CookieManagerLayer;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod auth;
mod state;

use signbank_backend::config;
use signbank_backend::db;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "signbank_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let app_config = config::config();
    tracing::info!(
        "Server will listen on {}:{}",
        app_config.server.host,
        app_config.server.port
    );

    // Create data directory if not exists
    let data_dir = app_config.get_data_dir();
    if !data_dir.exists() {
        std::fs::create_dir_all(&data_dir)?;
        tracing::info!("Created data directory: {:?}", data_dir);
    }

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| app_config.get_database_url());

    let pool = SqlitePool::connect(&database_url).await?;

    db::run_migrations(&pool).await?;

    let state = Arc::new(AppState::new(pool));

    let app = Router::new()
        .route("/api/health", get(api::server::health_check))
        .route("/api/auth/login", post(api::auth::login))
        .route("/api/auth/logout", post(api::auth::logout))
        .route("/api/auth/me", get(api::auth::me))
        .route("/api/dictionary/search", get(api::dictionary::search))
        .route("/api/dictionary/categories", get(api::dictionary::categories))
        .route("/api/dictionary/words/:keyword/:n", get(api::dictionary::word))
        .route("/api/dictionary/gloss/:idgloss", get(api::dictionary::gloss_detail))
        .layer(TraceLayer::new_for_http())
        .layer(CookieManagerLayer::new())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let bind_addr = app_config.get_bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    tracing::info!("Server running at http://{}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
