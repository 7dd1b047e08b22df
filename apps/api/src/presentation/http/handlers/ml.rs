use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};

use crate::infrastructure::ml::traits::{MlEndpoint, PredictionModel};
use crate::presentation::http::{
    errors::AppError,
    extractors::{ApiJson, ApiPath},
    state::AppState,
};

pub async fn ml_health(State(state): State<AppState>) -> Response {
    let base_url = state.ml_engine.base_url();
    match state.ml_engine.health().await {
        Ok(health) => {
            let mut body = match health {
                Value::Object(map) => map,
                other => {
                    let mut map = serde_json::Map::new();
                    map.insert("engine".into(), other);
                    map
                }
            };
            body.insert("status".into(), json!("connected"));
            body.insert("ml_engine_url".into(), json!(base_url));
            Json(Value::Object(body)).into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "ML engine health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "unreachable",
                    "error": e.to_string(),
                    "ml_engine_url": base_url,
                })),
            )
                .into_response()
        }
    }
}

async fn forward(state: &AppState, endpoint: MlEndpoint, body: Value) -> Result<Json<Value>, AppError> {
    Ok(Json(state.ml_engine.call(endpoint, body).await?))
}

pub async fn analyze(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<Value>,
) -> Result<Json<Value>, AppError> {
    forward(&state, MlEndpoint::Analyze, body).await
}

pub async fn root_cause(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<Value>,
) -> Result<Json<Value>, AppError> {
    forward(&state, MlEndpoint::RootCause, body).await
}

pub async fn predict(
    State(state): State<AppState>,
    ApiPath(model): ApiPath<String>,
    ApiJson(body): ApiJson<Value>,
) -> Result<Json<Value>, AppError> {
    let model: PredictionModel = model.parse().map_err(AppError::BadRequest)?;
    forward(&state, MlEndpoint::Predict(model), body).await
}
