use crate::domain::{
    metrics::aggregation::Forecast,
    warehouse::entity::{Warehouse, Zone},
};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Inputs shared by the rolling-average calculator and warehouse setup.
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
pub struct ForecastInput {
    pub metric_id: String,
    pub staff_count: i64,
    pub hours_of_day: u32,
    pub day_of_week: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RollingAverageRequest {
    pub warehouse_id: String,
    #[serde(flatten)]
    pub input: ForecastInput,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
pub struct WarehouseInput {
    pub id: String,
    pub name: String,
    pub zone: Zone,
    pub city: String,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
pub struct WarehouseSetupRequest {
    pub warehouse: WarehouseInput,
    pub metrics: ForecastInput,
}

#[derive(Debug, Clone, Serialize)]
pub struct WarehouseSetupResponse {
    pub message: String,
    pub warehouse: Warehouse,
    pub result: Forecast,
}
