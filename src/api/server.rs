use axum::Json;
use serde_json::{json, Value};

/// GET /api/health - liveness check
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "signbank-backend",
        "version": env!("CARGO_PKG_VERSION"),
        "build_time": env!("BUILD_TIME"),
    }))
}
