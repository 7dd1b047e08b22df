use crate::domain::metrics::status::MetricStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use ts_rs::TS;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Alert {
    pub id: Uuid,
    pub warehouse_id: String,
    pub metric_id: String,
    pub severity: AlertSeverity,
    pub score: f64,
    pub ai_summary: Option<String>,
    /// `None` while the alert is open.
    pub resolved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Alert {
    pub fn is_open(&self) -> bool {
        self.resolved_at.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum AlertSeverity {
    Warn,
    Critical,
}

impl AlertSeverity {
    /// Healthy metrics never raise an alert.
    pub fn for_status(status: MetricStatus) -> Option<Self> {
        match status {
            MetricStatus::Healthy => None,
            MetricStatus::Warn => Some(AlertSeverity::Warn),
            MetricStatus::Critical => Some(AlertSeverity::Critical),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AlertSeverity::Warn => "warn",
            AlertSeverity::Critical => "critical",
        }
    }
}

impl fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertSeverity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "warn" => Ok(AlertSeverity::Warn),
            "critical" => Ok(AlertSeverity::Critical),
            other => Err(format!("unknown alert severity '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewAlert {
    pub warehouse_id: String,
    pub metric_id: String,
    pub severity: AlertSeverity,
    pub score: f64,
    pub ai_summary: Option<String>,
}
