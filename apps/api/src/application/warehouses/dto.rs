use crate::domain::warehouse::entity::{Warehouse, Zone};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use validator::Validate;

/// Body of the public create endpoint; the id is assigned by the server.
#[derive(Debug, Clone, Deserialize, Validate, TS)]
#[ts(export)]
pub struct CreateWarehouseRequest {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    pub zone: Zone,
    #[validate(length(min = 1, max = 120))]
    pub city: String,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct WarehouseResponse {
    pub message: String,
    pub warehouse: Warehouse,
}

#[derive(Debug, Clone, Serialize)]
pub struct WarehouseList {
    pub warehouses: Vec<Warehouse>,
}
