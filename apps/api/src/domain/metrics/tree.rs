//! The flat metric tree stored inside each snapshot.
//!
//! The tree is a map from metric id to node. Hierarchy lives in the
//! definitions (parent pointers), never in the tree itself, so reading a
//! node is a single key lookup and writers may add diagnostic fields
//! (`avgTime`, `errorCode`, ...) without schema changes.

use super::definition::{MetricCatalog, MetricDefinition, ROOT_METRIC_ID};
use super::status::MetricStatus;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// One metric entry. Extra fields are kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<MetricStatus>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MetricNode {
    pub fn scored(score: f64, status: MetricStatus) -> Self {
        Self {
            score: Some(score),
            status: Some(status),
            extra: Map::new(),
        }
    }

    pub fn with_field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.extra.insert(key.to_string(), value.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricTree(BTreeMap<String, MetricNode>);

impl MetricTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, metric_id: &str) -> Option<&MetricNode> {
        self.0.get(metric_id)
    }

    pub fn score_of(&self, metric_id: &str) -> Option<f64> {
        self.0.get(metric_id).and_then(|n| n.score)
    }

    pub fn insert(&mut self, metric_id: impl Into<String>, node: MetricNode) {
        self.0.insert(metric_id.into(), node);
    }

    pub fn with(mut self, metric_id: impl Into<String>, node: MetricNode) -> Self {
        self.insert(metric_id, node);
        self
    }

    /// Copy of `self` with one metric replaced; the rest is carried forward as-is.
    pub fn carry_forward(&self, metric_id: &str, node: MetricNode) -> Self {
        self.clone().with(metric_id, node)
    }

    /// Root score, 0 when the tree carries no scored `poi`.
    pub fn root_score(&self) -> f64 {
        self.score_of(ROOT_METRIC_ID).unwrap_or(0.0)
    }

    pub fn root_status(&self) -> MetricStatus {
        MetricStatus::classify(self.root_score())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &MetricNode)> {
        self.0.iter()
    }

    /// Attach the matching definition to every recognised entry.
    ///
    /// Shallow and non-recursive: nested values inside a node are not
    /// inspected. The receiver is left untouched.
    pub fn enrich(&self, catalog: &MetricCatalog) -> EnrichedTree {
        EnrichedTree(
            self.0
                .iter()
                .map(|(id, node)| {
                    (
                        id.clone(),
                        EnrichedNode {
                            node: node.clone(),
                            definition: catalog.get(id).cloned(),
                        },
                    )
                })
                .collect(),
        )
    }
}

impl FromIterator<(String, MetricNode)> for MetricTree {
    fn from_iter<I: IntoIterator<Item = (String, MetricNode)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedNode {
    #[serde(flatten)]
    pub node: MetricNode,
    #[serde(rename = "_definition", skip_serializing_if = "Option::is_none")]
    pub definition: Option<MetricDefinition>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct EnrichedTree(BTreeMap<String, EnrichedNode>);

impl EnrichedTree {
    pub fn get(&self, metric_id: &str) -> Option<&EnrichedNode> {
        self.0.get(metric_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
