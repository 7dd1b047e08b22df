use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use ts_rs::TS;

/// A fulfilment site that reports metric trees.
///
/// # Invariants
/// - `id` is the human-readable key (`wh_001`), never a UUID
/// - inactive warehouses keep their history but drop out of the overview
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Warehouse {
    pub id: String,
    pub name: String,
    pub zone: Zone,
    pub city: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Zone {
    North,
    South,
    East,
    West,
}

impl Zone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Zone::North => "North",
            Zone::South => "South",
            Zone::East => "East",
            Zone::West => "West",
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Zone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "North" => Ok(Zone::North),
            "South" => Ok(Zone::South),
            "East" => Ok(Zone::East),
            "West" => Ok(Zone::West),
            other => Err(format!("unknown zone '{}'", other)),
        }
    }
}

/// Fields needed to create or upsert a warehouse.
#[derive(Debug, Clone, PartialEq)]
pub struct NewWarehouse {
    pub id: String,
    pub name: String,
    pub zone: Zone,
    pub city: String,
    pub is_active: bool,
}

/// Partial update; `None` leaves the column alone.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct WarehouseChanges {
    pub name: Option<String>,
    pub zone: Option<Zone>,
    pub city: Option<String>,
    pub is_active: Option<bool>,
}

impl WarehouseChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.zone.is_none() && self.city.is_none() && self.is_active.is_none()
    }
}
