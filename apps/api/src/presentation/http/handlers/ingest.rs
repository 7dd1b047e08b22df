use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;

use crate::application::ingest_score::{
    dto::{IngestRequest, IngestResponse},
    use_case::IngestScoreUseCase,
};
use crate::presentation::http::{errors::AppError, extractors::ApiJson, state::AppState};

pub async fn ingest_score(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<IngestRequest>,
) -> Result<(StatusCode, Json<IngestResponse>), AppError> {
    let response = IngestScoreUseCase::new(
        state.warehouses.clone(),
        state.snapshots.clone(),
        state.alerts.clone(),
        state.ml_engine.clone(),
    )
    .execute(body, Utc::now())
    .await?;
    Ok((StatusCode::CREATED, Json(response)))
}
