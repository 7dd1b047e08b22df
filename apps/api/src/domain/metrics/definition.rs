use super::status::MetricStatus;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt, str::FromStr};
use ts_rs::TS;
use validator::Validate;

/// Identifier of the root metric (Perfect Order Index).
pub const ROOT_METRIC_ID: &str = "poi";

lazy_static! {
    static ref METRIC_ID_REGEX: regex::Regex = regex::Regex::new(r"^[a-z][a-z0-9_]{0,31}$").unwrap();
}

/// A metric key as it appears in a tree: lowercase, starts with a letter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct MetricId {
    #[validate(regex(path = *METRIC_ID_REGEX))]
    pub value: String,
}

impl MetricId {
    pub fn new(value: impl Into<String>) -> Result<Self, validator::ValidationErrors> {
        let id = Self {
            value: value.into(),
        };
        id.validate()?;
        Ok(id)
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum MetricUnit {
    #[serde(rename = "%")]
    Percent,
    #[serde(rename = "hrs")]
    Hours,
    #[serde(rename = "count")]
    Count,
}

impl MetricUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricUnit::Percent => "%",
            MetricUnit::Hours => "hrs",
            MetricUnit::Count => "count",
        }
    }
}

impl fmt::Display for MetricUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "%" => Ok(MetricUnit::Percent),
            "hrs" => Ok(MetricUnit::Hours),
            "count" => Ok(MetricUnit::Count),
            other => Err(format!("unknown metric unit '{}'", other)),
        }
    }
}

/// Static description of one metric in the hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MetricDefinition {
    pub metric_id: String,
    pub name: String,
    pub parent_id: Option<String>,
    pub impact_weight: f64,
    pub threshold_warn: f64,
    pub threshold_crit: f64,
    pub unit: MetricUnit,
}

impl MetricDefinition {
    fn new(
        metric_id: &str,
        name: &str,
        parent_id: Option<&str>,
        impact_weight: f64,
        threshold_warn: f64,
        threshold_crit: f64,
        unit: MetricUnit,
    ) -> Self {
        Self {
            metric_id: metric_id.to_string(),
            name: name.to_string(),
            parent_id: parent_id.map(str::to_string),
            impact_weight,
            threshold_warn,
            threshold_crit,
            unit,
        }
    }

    /// Classifies against this metric's own thresholds rather than the fixed ones.
    pub fn classify(&self, score: f64) -> MetricStatus {
        if score < self.threshold_crit {
            MetricStatus::Critical
        } else if score < self.threshold_warn {
            MetricStatus::Warn
        } else {
            MetricStatus::Healthy
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// The nine metrics every warehouse reports.
pub fn standard_catalog() -> Vec<MetricDefinition> {
    use MetricUnit::*;
    vec![
        MetricDefinition::new(ROOT_METRIC_ID, "Perfect Order Index", None, 1.0, 80.0, 60.0, Percent),
        MetricDefinition::new("otd", "On-Time Delivery", Some("poi"), 0.60, 85.0, 70.0, Percent),
        MetricDefinition::new("oa", "Order Accuracy", Some("poi"), 0.25, 95.0, 88.0, Percent),
        MetricDefinition::new("dfr", "Damage-Free Rate", Some("poi"), 0.15, 97.0, 90.0, Percent),
        MetricDefinition::new("wpt", "Warehouse Processing Time", Some("otd"), 0.55, 80.0, 60.0, Percent),
        MetricDefinition::new("tt", "Transit Time", Some("otd"), 0.45, 85.0, 70.0, Percent),
        MetricDefinition::new("pick", "Picking Efficiency", Some("wpt"), 0.30, 90.0, 70.0, Percent),
        MetricDefinition::new("label", "Label Generation", Some("wpt"), 0.40, 90.0, 60.0, Hours),
        MetricDefinition::new("pack", "Packing Speed", Some("wpt"), 0.30, 90.0, 70.0, Percent),
    ]
}

/// Definitions keyed by metric id.
#[derive(Debug, Clone, Default)]
pub struct MetricCatalog {
    definitions: HashMap<String, MetricDefinition>,
}

impl MetricCatalog {
    pub fn get(&self, metric_id: &str) -> Option<&MetricDefinition> {
        self.definitions.get(metric_id)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn children_of<'a>(&'a self, parent_id: &'a str) -> impl Iterator<Item = &'a MetricDefinition> + 'a {
        self.definitions
            .values()
            .filter(move |d| d.parent_id.as_deref() == Some(parent_id))
    }
}

impl FromIterator<MetricDefinition> for MetricCatalog {
    fn from_iter<I: IntoIterator<Item = MetricDefinition>>(iter: I) -> Self {
        Self {
            definitions: iter
                .into_iter()
                .map(|d| (d.metric_id.clone(), d))
                .collect(),
        }
    }
}
