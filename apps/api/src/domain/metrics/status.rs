use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use ts_rs::TS;

/// Scores at or above this are healthy.
pub const HEALTHY_THRESHOLD: f64 = 80.0;
/// Scores at or above this (and below [`HEALTHY_THRESHOLD`]) are a warning.
pub const WARN_THRESHOLD: f64 = 60.0;

/// Health classification shared by every metric node and by the snapshot root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum MetricStatus {
    Healthy,
    Warn,
    Critical,
}

impl MetricStatus {
    /// Fixed-threshold classification. Total: NaN falls through to `Critical`.
    pub fn classify(score: f64) -> Self {
        if score >= HEALTHY_THRESHOLD {
            MetricStatus::Healthy
        } else if score >= WARN_THRESHOLD {
            MetricStatus::Warn
        } else {
            MetricStatus::Critical
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricStatus::Healthy => "healthy",
            MetricStatus::Warn => "warn",
            MetricStatus::Critical => "critical",
        }
    }

    pub fn needs_attention(&self) -> bool {
        !matches!(self, MetricStatus::Healthy)
    }
}

impl fmt::Display for MetricStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "healthy" => Ok(MetricStatus::Healthy),
            "warn" => Ok(MetricStatus::Warn),
            "critical" => Ok(MetricStatus::Critical),
            other => Err(format!("unknown metric status '{}'", other)),
        }
    }
}

pub fn classify_status(score: f64) -> MetricStatus {
    MetricStatus::classify(score)
}
