//! Rolling average, predicted score, trend and report summaries.
//!
//! Everything here is pure: callers load the snapshots, these functions
//! fold them.

use super::snapshot::MetricSnapshot;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use ts_rs::TS;
use validator::Validate;

pub const BASELINE_STAFF: f64 = 50.0;
pub const MAX_STAFF_FACTOR: f64 = 1.2;
pub const PEAK_HOUR_FACTOR: f64 = 1.1;
pub const OFF_PEAK_HOUR_FACTOR: f64 = 0.9;
pub const WEEKDAY_FACTOR: f64 = 1.0;
pub const WEEKEND_FACTOR: f64 = 0.85;
pub const MAX_SCORE: f64 = 100.0;

/// Round half away from zero to two decimals.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Mean of `metric_id` across the snapshots that carry a score for it.
///
/// Returns exactly `0.0` when no snapshot has a data point.
pub fn rolling_average(snapshots: &[MetricSnapshot], metric_id: &str) -> f64 {
    let scores: Vec<f64> = snapshots
        .iter()
        .filter_map(|s| s.metric_tree.score_of(metric_id))
        .collect();

    if scores.is_empty() {
        return 0.0;
    }

    round2(scores.iter().sum::<f64>() / scores.len() as f64)
}

/// Staffing and calendar context for a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate, TS)]
#[ts(export)]
pub struct OperatingConditions {
    #[validate(range(min = 0))]
    pub staff_count: i64,
    #[validate(range(min = 0, max = 23))]
    pub hour_of_day: u32,
    /// 0 = Sunday
    #[validate(range(min = 0, max = 6))]
    pub day_of_week: u32,
}

impl OperatingConditions {
    pub fn new(staff_count: i64, hour_of_day: u32, day_of_week: u32) -> Result<Self, validator::ValidationErrors> {
        let conditions = Self {
            staff_count,
            hour_of_day,
            day_of_week,
        };
        conditions.validate()?;
        Ok(conditions)
    }

    pub fn staff_factor(&self) -> f64 {
        (self.staff_count as f64 / BASELINE_STAFF).min(MAX_STAFF_FACTOR)
    }

    pub fn hour_factor(&self) -> f64 {
        if (9..=18).contains(&self.hour_of_day) {
            PEAK_HOUR_FACTOR
        } else {
            OFF_PEAK_HOUR_FACTOR
        }
    }

    pub fn day_factor(&self) -> f64 {
        if (1..=5).contains(&self.day_of_week) {
            WEEKDAY_FACTOR
        } else {
            WEEKEND_FACTOR
        }
    }
}

/// Rolling average adjusted for staffing and calendar, capped at 100.
pub fn predicted_score(rolling_avg: f64, conditions: &OperatingConditions) -> f64 {
    let raw = rolling_avg * conditions.staff_factor() * conditions.hour_factor() * conditions.day_factor();
    round2(raw.min(MAX_SCORE))
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Forecast {
    pub rolling_7d_avg: f64,
    pub predicted_score: f64,
}

impl Forecast {
    pub fn compute(snapshots: &[MetricSnapshot], metric_id: &str, conditions: &OperatingConditions) -> Self {
        let rolling_7d_avg = rolling_average(snapshots, metric_id);
        Self {
            rolling_7d_avg,
            predicted_score: predicted_score(rolling_7d_avg, conditions),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub score: f64,
    pub timestamp: DateTime<Utc>,
}

/// One point per snapshot that scores `metric_id`, oldest first.
pub fn trend(snapshots: &[MetricSnapshot], metric_id: &str) -> Vec<TrendPoint> {
    let mut points: Vec<TrendPoint> = snapshots
        .iter()
        .filter_map(|s| {
            s.metric_tree.score_of(metric_id).map(|score| TrendPoint {
                date: s.timestamp.date_naive(),
                score,
                timestamp: s.timestamp,
            })
        })
        .collect();
    points.sort_by_key(|p| p.timestamp);
    points
}

/// Newest snapshot per warehouse.
pub fn latest_by_warehouse(snapshots: &[MetricSnapshot]) -> HashMap<&str, &MetricSnapshot> {
    let mut latest: HashMap<&str, &MetricSnapshot> = HashMap::new();
    for snapshot in snapshots {
        latest
            .entry(snapshot.warehouse_id.as_str())
            .and_modify(|current| {
                if snapshot.timestamp > current.timestamp {
                    *current = snapshot;
                }
            })
            .or_insert(snapshot);
    }
    latest
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScoreSummary {
    pub avg_score: f64,
    pub min_score: f64,
    pub max_score: f64,
    pub critical_incidents: usize,
    pub total_alerts: usize,
    pub data_points: usize,
}

impl ScoreSummary {
    /// Summary over root scores. An empty range yields zeros but still counts alerts.
    pub fn from_root_scores(root_scores: &[f64], critical_alerts: usize, total_alerts: usize) -> Self {
        if root_scores.is_empty() {
            return Self {
                avg_score: 0.0,
                min_score: 0.0,
                max_score: 0.0,
                critical_incidents: 0,
                total_alerts,
                data_points: 0,
            };
        }

        let sum: f64 = root_scores.iter().sum();
        Self {
            avg_score: round2(sum / root_scores.len() as f64),
            min_score: root_scores.iter().copied().fold(f64::INFINITY, f64::min),
            max_score: root_scores.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            critical_incidents: critical_alerts,
            total_alerts,
            data_points: root_scores.len(),
        }
    }
}
