pub mod aggregation;
pub mod definition;
pub mod repository;
pub mod snapshot;
pub mod status;
pub mod tree;

pub use aggregation::{Forecast, OperatingConditions, TrendPoint, predicted_score, rolling_average, trend};
pub use definition::{MetricCatalog, MetricDefinition, ROOT_METRIC_ID};
pub use snapshot::{MetricSnapshot, NewSnapshot};
pub use status::{MetricStatus, classify_status};
pub use tree::{EnrichedTree, MetricNode, MetricTree};
