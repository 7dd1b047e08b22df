use axum::{Json, extract::State};
use chrono::Utc;

use crate::application::agent_insight::{
    dto::{HistoryResponse, InsightRequest, InsightResponse, LimitQuery},
    use_case::AgentInsightUseCase,
};
use crate::presentation::http::{
    errors::AppError,
    extractors::{ApiJson, ApiQuery},
    middleware::auth::CurrentUser,
    state::AppState,
};

pub(crate) fn agent(state: &AppState) -> AgentInsightUseCase {
    AgentInsightUseCase::new(state.ml_engine.clone(), state.agent_logs.clone())
}

pub async fn insight(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiJson(body): ApiJson<InsightRequest>,
) -> Result<Json<InsightResponse>, AppError> {
    let answer = agent(&state).insight(Some(user.id), body, Utc::now()).await?;
    Ok(Json(answer))
}

pub async fn history(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiQuery(query): ApiQuery<LimitQuery>,
) -> Result<Json<HistoryResponse>, AppError> {
    let history = agent(&state).history(user.id, query.limit).await?;
    Ok(Json(HistoryResponse { history }))
}
