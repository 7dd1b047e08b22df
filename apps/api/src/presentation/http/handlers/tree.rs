use axum::{Json, extract::State};
use chrono::Utc;

use super::lookback;
use crate::application::metric_tree::{
    dto::{DaysQuery, MetricTrend, TreeOverview, TreeQuery, TrendQuery, WarehouseTree},
    use_case::{GetMetricTrendUseCase, GetTreeOverviewUseCase, GetWarehouseTreeUseCase},
};
use crate::presentation::http::{
    errors::AppError,
    extractors::{ApiPath, ApiQuery},
    state::AppState,
};

pub async fn get_tree(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<TreeQuery>,
) -> Result<Json<TreeOverview>, AppError> {
    let overview = GetTreeOverviewUseCase::new(
        state.warehouses.clone(),
        state.snapshots.clone(),
        state.definitions.clone(),
    )
    .execute(query.warehouse_id, Utc::now())
    .await?;
    Ok(Json(overview))
}

pub async fn get_warehouse_tree(
    State(state): State<AppState>,
    ApiPath(warehouse_id): ApiPath<String>,
    ApiQuery(query): ApiQuery<DaysQuery>,
) -> Result<Json<WarehouseTree>, AppError> {
    let days = lookback(query.days)?;
    let tree = GetWarehouseTreeUseCase::new(
        state.warehouses.clone(),
        state.snapshots.clone(),
        state.definitions.clone(),
    )
    .execute(&warehouse_id, days, Utc::now())
    .await?;
    Ok(Json(tree))
}

pub async fn get_trend(
    State(state): State<AppState>,
    ApiPath(metric_id): ApiPath<String>,
    ApiQuery(query): ApiQuery<TrendQuery>,
) -> Result<Json<MetricTrend>, AppError> {
    let warehouse_id = query
        .warehouse_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::BadRequest("warehouseId is required".into()))?;
    let days = lookback(query.days)?;

    let trend = GetMetricTrendUseCase::new(state.snapshots.clone())
        .execute(&metric_id, &warehouse_id, days, Utc::now())
        .await?;
    Ok(Json(trend))
}
