use axum::{Json, extract::State, http::StatusCode};

use crate::application::warehouses::{
    dto::{CreateWarehouseRequest, WarehouseList, WarehouseResponse},
    use_case::WarehousesUseCase,
};
use crate::presentation::http::{
    errors::AppError,
    extractors::{ApiJson, ApiPath},
    state::AppState,
};
use serde_json::{Value, json};

pub async fn list_warehouses(State(state): State<AppState>) -> Result<Json<WarehouseList>, AppError> {
    let warehouses = WarehousesUseCase::new(state.warehouses.clone()).list_active().await?;
    Ok(Json(WarehouseList { warehouses }))
}

pub async fn get_warehouse(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> Result<Json<Value>, AppError> {
    let warehouse = WarehousesUseCase::new(state.warehouses.clone()).get(&id).await?;
    Ok(Json(json!({ "warehouse": warehouse })))
}

pub async fn create_warehouse(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreateWarehouseRequest>,
) -> Result<(StatusCode, Json<WarehouseResponse>), AppError> {
    let warehouse = WarehousesUseCase::new(state.warehouses.clone())
        .create_next(body)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(WarehouseResponse {
            message: "Warehouse created successfully".into(),
            warehouse,
        }),
    ))
}
