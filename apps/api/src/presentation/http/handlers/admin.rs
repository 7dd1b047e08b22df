//! Manager-only endpoints under `/api/admin`.

use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;
use serde_json::{Value, json};
use uuid::Uuid;

use super::agent::agent;
use crate::application::{
    accounts::{
        dto::{UpdateProfileRequest, UpdateRoleRequest, UserResponse},
        use_case::AccountsUseCase,
    },
    agent_insight::dto::{LimitQuery, LogsResponse},
    alerts::use_case::AlertsUseCase,
    forecast::{
        dto::{RollingAverageRequest, WarehouseInput, WarehouseSetupRequest, WarehouseSetupResponse},
        use_case::{ForecastUseCase, WarehouseSetupUseCase},
    },
    snapshots::{
        dto::{SnapshotResponse, UpdateMetricsRequest},
        use_case::RecordSnapshotUseCase,
    },
    warehouses::{
        dto::{WarehouseList, WarehouseResponse},
        use_case::WarehousesUseCase,
    },
};
use crate::domain::{
    metrics::aggregation::Forecast,
    user::entity::{Role, UserProfile},
    warehouse::entity::WarehouseChanges,
};
use crate::presentation::http::{
    errors::AppError,
    extractors::{ApiJson, ApiPath, ApiQuery},
    middleware::auth::CurrentUser,
    state::AppState,
};

fn accounts(state: &AppState) -> AccountsUseCase {
    AccountsUseCase::new(state.users.clone(), state.config.bcrypt_cost)
}

// === Warehouses ===

pub async fn list_warehouses(State(state): State<AppState>) -> Result<Json<WarehouseList>, AppError> {
    let warehouses = WarehousesUseCase::new(state.warehouses.clone()).list_all().await?;
    Ok(Json(WarehouseList { warehouses }))
}

pub async fn create_warehouse(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<WarehouseInput>,
) -> Result<(StatusCode, Json<WarehouseResponse>), AppError> {
    let warehouse = WarehousesUseCase::new(state.warehouses.clone())
        .create_with_id(body)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(WarehouseResponse {
            message: "Warehouse created successfully".into(),
            warehouse,
        }),
    ))
}

pub async fn update_warehouse(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
    ApiJson(changes): ApiJson<WarehouseChanges>,
) -> Result<Json<WarehouseResponse>, AppError> {
    let warehouse = WarehousesUseCase::new(state.warehouses.clone())
        .update(&id, changes)
        .await?;
    Ok(Json(WarehouseResponse {
        message: "Warehouse updated successfully".into(),
        warehouse,
    }))
}

pub async fn warehouse_setup(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<WarehouseSetupRequest>,
) -> Result<Json<WarehouseSetupResponse>, AppError> {
    let response = WarehouseSetupUseCase::new(state.warehouses.clone(), state.snapshots.clone())
        .execute(body, Utc::now())
        .await?;
    Ok(Json(response))
}

// === Metrics ===

pub async fn get_metrics(
    State(state): State<AppState>,
    ApiPath(warehouse_id): ApiPath<String>,
) -> Result<Json<SnapshotResponse>, AppError> {
    let snapshot = state.snapshots.latest_for(&warehouse_id).await?;
    Ok(Json(SnapshotResponse { snapshot }))
}

pub async fn update_metrics(
    State(state): State<AppState>,
    ApiPath(warehouse_id): ApiPath<String>,
    ApiJson(body): ApiJson<UpdateMetricsRequest>,
) -> Result<Json<Value>, AppError> {
    let snapshot = RecordSnapshotUseCase::new(state.warehouses.clone(), state.snapshots.clone())
        .execute(&warehouse_id, body.metric_tree, Utc::now())
        .await?;
    Ok(Json(json!({
        "message": "Metrics updated successfully",
        "snapshot": snapshot,
    })))
}

pub async fn rolling_average(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RollingAverageRequest>,
) -> Result<Json<Forecast>, AppError> {
    let forecast = ForecastUseCase::new(state.snapshots.clone())
        .execute(&body.warehouse_id, &body.input, Utc::now())
        .await?;
    Ok(Json(forecast))
}

// === Alerts ===

pub async fn list_alerts(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let alerts = AlertsUseCase::new(state.alerts.clone()).list().await?;
    Ok(Json(json!({ "alerts": alerts })))
}

pub async fn resolve_alert(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Value>, AppError> {
    let alert = AlertsUseCase::new(state.alerts.clone())
        .resolve(id, Utc::now())
        .await?;
    Ok(Json(json!({ "message": "Alert resolved", "alert": alert })))
}

pub async fn delete_alert(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Value>, AppError> {
    AlertsUseCase::new(state.alerts.clone()).delete(id).await?;
    Ok(Json(json!({ "message": "Alert deleted" })))
}

// === Users ===

pub async fn list_users(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let users: Vec<UserProfile> = state
        .users
        .list()
        .await?
        .iter()
        .map(|u| u.profile())
        .collect();
    Ok(Json(json!({ "users": users })))
}

pub async fn change_role(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<UpdateRoleRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let role: Role = body
        .role
        .parse()
        .map_err(|_| AppError::BadRequest("Role must be analyst or manager".into()))?;
    let user = accounts(&state).change_role(id, role).await?;
    Ok(Json(UserResponse::new("Role updated", user.profile())))
}

pub async fn delete_user(
    State(state): State<AppState>,
    CurrentUser(current): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Value>, AppError> {
    accounts(&state).delete(current.id, id).await?;
    Ok(Json(json!({ "message": "User deleted" })))
}

pub async fn update_profile(
    State(state): State<AppState>,
    CurrentUser(current): CurrentUser,
    ApiJson(body): ApiJson<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let user = accounts(&state).update_profile(current.id, body).await?;
    Ok(Json(UserResponse::new("Profile updated", user.profile())))
}

// === Agent log ===

pub async fn list_logs(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<LimitQuery>,
) -> Result<Json<LogsResponse>, AppError> {
    let logs = agent(&state).recent(query.limit).await?;
    Ok(Json(LogsResponse { logs }))
}
