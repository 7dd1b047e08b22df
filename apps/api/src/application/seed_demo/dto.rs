use serde::Serialize;

/// Credentials for the demo manager account. The hash comes from configuration.
#[derive(Debug, Clone)]
pub struct SeedManager {
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeedDetails {
    pub user: Option<String>,
    pub warehouses: usize,
    pub metric_definitions: usize,
    pub snapshots: usize,
    pub alerts: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeedResponse {
    pub message: String,
    pub details: SeedDetails,
}
