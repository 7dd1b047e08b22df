use axum::{Json, extract::State};
use chrono::Utc;

use super::lookback;
use crate::application::{
    metric_tree::dto::DaysQuery,
    reports::{
        dto::{ExportQuery, WarehouseExport, WarehouseReport},
        use_case::ReportsUseCase,
    },
};
use crate::presentation::http::{
    errors::AppError,
    extractors::{ApiPath, ApiQuery},
    state::AppState,
};

fn reports(state: &AppState) -> ReportsUseCase {
    ReportsUseCase::new(
        state.warehouses.clone(),
        state.snapshots.clone(),
        state.alerts.clone(),
    )
}

pub async fn warehouse_report(
    State(state): State<AppState>,
    ApiPath(warehouse_id): ApiPath<String>,
    ApiQuery(query): ApiQuery<DaysQuery>,
) -> Result<Json<WarehouseReport>, AppError> {
    let days = lookback(query.days)?;
    let report = reports(&state).summary(&warehouse_id, days, Utc::now()).await?;
    Ok(Json(report))
}

pub async fn export_warehouse(
    State(state): State<AppState>,
    ApiPath(warehouse_id): ApiPath<String>,
    ApiQuery(query): ApiQuery<ExportQuery>,
) -> Result<Json<WarehouseExport>, AppError> {
    match query.format.as_deref().unwrap_or("json") {
        "json" => {}
        other => {
            return Err(AppError::BadRequest(format!(
                "Unsupported export format: {}. Supported formats: json",
                other
            )));
        }
    }
    let export = reports(&state).export(&warehouse_id, Utc::now()).await?;
    Ok(Json(export))
}
