use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{fmt, str::FromStr};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum MlEngineError {
    #[error("ML engine unreachable: {0}")]
    Unreachable(String),
    #[error("ML engine returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("ML engine response could not be decoded: {0}")]
    Decode(String),
}

impl MlEngineError {
    /// Status the proxy should answer with.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Unreachable(_) => 503,
            Self::Status { status, .. } => *status,
            Self::Decode(_) => 502,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictionModel {
    Poi,
    PoiActual,
    Wpt,
    Otd,
}

impl PredictionModel {
    pub const ALL: [PredictionModel; 4] = [Self::Poi, Self::PoiActual, Self::Wpt, Self::Otd];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Poi => "poi",
            Self::PoiActual => "poi-actual",
            Self::Wpt => "wpt",
            Self::Otd => "otd",
        }
    }
}

impl fmt::Display for PredictionModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PredictionModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| {
                let valid: Vec<&str> = Self::ALL.iter().map(|m| m.as_str()).collect();
                format!("Invalid model: {}. Valid models: {}", s, valid.join(", "))
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MlEndpoint {
    Analyze,
    RootCause,
    Predict(PredictionModel),
}

impl MlEndpoint {
    pub fn path(&self) -> String {
        match self {
            Self::Analyze => "/api/analyze".to_string(),
            Self::RootCause => "/api/root-cause".to_string(),
            Self::Predict(model) => format!("/api/predict/{}", model),
        }
    }
}

/// Body for `/api/analyze`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyzeRequest {
    pub score: f64,
    pub rolling_avg_7d: f64,
    pub hour_of_day: u32,
    pub day_of_week: u32,
    pub orders_volume: i64,
    pub staff_count: i64,
    pub warehouse_id: String,
    pub metric_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyAnalysis {
    pub is_anomaly: bool,
    pub confidence_score: f64,
    pub z_score: f64,
}

impl AnomalyAnalysis {
    /// Neutral answer used whenever the engine cannot be asked.
    pub fn fallback() -> Self {
        Self {
            is_anomaly: false,
            confidence_score: 0.5,
            z_score: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RootCause {
    pub root_cause: String,
    pub recommendation: String,
    #[serde(default)]
    pub confidence: Option<f64>,
}

impl RootCause {
    pub fn fallback() -> Self {
        Self {
            root_cause: "Unknown".to_string(),
            recommendation: "No specific recommendation available for this metric.".to_string(),
            confidence: None,
        }
    }
}

/// Client for the external scoring service. Calls are best effort and never retried.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MlEngine: Send + Sync {
    fn base_url(&self) -> String;

    async fn health(&self) -> Result<Value, MlEngineError>;

    /// POST `body` to `endpoint` and return the decoded JSON answer.
    async fn call(&self, endpoint: MlEndpoint, body: Value) -> Result<Value, MlEngineError>;
}

/// Anomaly analysis, degrading to [`AnomalyAnalysis::fallback`] on any failure.
pub async fn analyze_or_fallback(engine: &dyn MlEngine, request: &AnalyzeRequest) -> AnomalyAnalysis {
    let body = match serde_json::to_value(request) {
        Ok(body) => body,
        Err(e) => {
            tracing::warn!(error = %e, "Could not encode analyze request, using fallback");
            return AnomalyAnalysis::fallback();
        }
    };

    match engine.call(MlEndpoint::Analyze, body).await {
        Ok(value) => serde_json::from_value(value).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Unexpected analyze payload, using fallback");
            AnomalyAnalysis::fallback()
        }),
        Err(e) => {
            tracing::warn!(error = %e, "ML analysis unavailable, using fallback");
            AnomalyAnalysis::fallback()
        }
    }
}

/// Root-cause classification; `None` when the engine could not answer.
pub async fn root_cause(engine: &dyn MlEngine, context: Value) -> Option<RootCause> {
    match engine.call(MlEndpoint::RootCause, context).await {
        Ok(value) => match serde_json::from_value(value) {
            Ok(cause) => Some(cause),
            Err(e) => {
                tracing::warn!(error = %e, "Unexpected root-cause payload");
                None
            }
        },
        Err(e) => {
            tracing::warn!(error = %e, "ML root-cause unavailable");
            None
        }
    }
}
