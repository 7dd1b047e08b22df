use crate::domain::agent::entity::AgentLog;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Deserialize)]
pub struct InsightRequest {
    pub metric: String,
    pub message: Option<String>,
    pub score: Option<f64>,
    pub warehouse_id: Option<String>,
    /// Any other node fields (`label_score`, `zone`, ...) forwarded verbatim.
    #[serde(flatten)]
    pub context: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InsightResponse {
    pub metric: String,
    pub root_cause: String,
    pub recommendation: String,
    pub confidence: Option<f64>,
    pub ml_powered: bool,
    pub response: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub history: Vec<AgentLog>,
}

#[derive(Debug, Serialize)]
pub struct LogsResponse {
    pub logs: Vec<AgentLog>,
}
