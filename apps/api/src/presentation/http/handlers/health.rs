use crate::presentation::http::state::AppState;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    database: &'static str,
    timestamp: DateTime<Utc>,
    version: &'static str,
}

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let db_status = match state.warehouses.ping().await {
        Ok(()) => "connected",
        Err(e) => {
            tracing::error!("Health check failed: Database unreachable: {}", e);
            "disconnected"
        }
    };

    let healthy = db_status == "connected";
    let response = HealthResponse {
        status: if healthy { "OK" } else { "degraded" },
        database: db_status,
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION"),
    };

    let code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (code, Json(response))
}
