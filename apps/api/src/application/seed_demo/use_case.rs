use super::dto::{SeedDetails, SeedManager, SeedResponse};
use crate::domain::{
    alert::{
        entity::{AlertSeverity, NewAlert},
        repository::AlertRepository,
    },
    metrics::{
        aggregation::round2,
        definition::{MetricCatalog, standard_catalog},
        repository::{MetricDefinitionRepository, SnapshotRepository},
        snapshot::NewSnapshot,
        status::MetricStatus,
        tree::{MetricNode, MetricTree},
    },
    shared::errors::DomainError,
    user::{
        entity::{NewUser, Role, normalize_email},
        repository::UserRepository,
    },
    warehouse::{
        entity::{NewWarehouse, Zone},
        repository::WarehouseRepository,
    },
};
use chrono::{DateTime, Duration, NaiveTime, Utc};
use std::sync::Arc;

const DEGRADING_WAREHOUSE: &str = "wh_001";

/// (day offset, label, wpt, otd, poi)
const DEGRADING_HISTORY: [(i64, f64, f64, f64, f64); 7] = [
    (-6, 95.0, 92.0, 90.0, 93.0),
    (-5, 94.0, 91.0, 89.0, 92.0),
    (-4, 92.0, 89.0, 87.0, 91.0),
    (-3, 88.0, 82.0, 80.0, 87.0),
    (-2, 61.0, 55.0, 60.0, 76.0),
    (-1, 12.0, 25.0, 48.0, 69.0),
    (0, 5.0, 18.0, 45.0, 67.0),
];

const LABEL_ALERT_SUMMARY: &str = "Label Generation at Bangalore Central has dropped to 5% due to a 401 API error \
from North Zone courier. Estimated 340+ orders delayed. Immediate API key rotation required.";

fn demo_warehouses() -> Vec<NewWarehouse> {
    [
        ("wh_001", "Bangalore Central", Zone::South, "Bangalore"),
        ("wh_002", "Delhi North Hub", Zone::North, "Delhi"),
        ("wh_003", "Mumbai West", Zone::West, "Mumbai"),
    ]
    .into_iter()
    .map(|(id, name, zone, city)| NewWarehouse {
        id: id.to_string(),
        name: name.to_string(),
        zone,
        city: city.to_string(),
        is_active: true,
    })
    .collect()
}

/// Idempotently loads the demo dataset. Re-running replaces the demo
/// snapshots and the demo alert instead of duplicating them.
pub struct SeedDemoUseCase {
    users: Arc<dyn UserRepository>,
    warehouses: Arc<dyn WarehouseRepository>,
    definitions: Arc<dyn MetricDefinitionRepository>,
    snapshots: Arc<dyn SnapshotRepository>,
    alerts: Arc<dyn AlertRepository>,
}

impl SeedDemoUseCase {
    pub fn new(
        users: Arc<dyn UserRepository>,
        warehouses: Arc<dyn WarehouseRepository>,
        definitions: Arc<dyn MetricDefinitionRepository>,
        snapshots: Arc<dyn SnapshotRepository>,
        alerts: Arc<dyn AlertRepository>,
    ) -> Self {
        Self {
            users,
            warehouses,
            definitions,
            snapshots,
            alerts,
        }
    }

    pub async fn execute(&self, manager: Option<SeedManager>, now: DateTime<Utc>) -> Result<SeedResponse, DomainError> {
        let user = match manager {
            Some(manager) => Some(self.ensure_manager(manager).await?),
            None => {
                tracing::warn!("No seed manager password hash configured, skipping manager account");
                None
            }
        };

        let warehouses = demo_warehouses();
        for warehouse in &warehouses {
            if self.warehouses.find_by_id(&warehouse.id).await?.is_none() {
                self.warehouses.create(warehouse).await?;
            }
        }

        let definitions = standard_catalog();
        self.definitions.upsert_many(&definitions).await?;
        let catalog: MetricCatalog = definitions.iter().cloned().collect();

        let mut snapshot_count = 0;
        self.snapshots.delete_for_warehouse(DEGRADING_WAREHOUSE).await?;
        for snapshot in degrading_history(&catalog, now) {
            self.snapshots.insert(&snapshot).await?;
            snapshot_count += 1;
        }

        for (warehouse_id, target) in [("wh_002", 94.5), ("wh_003", 89.2)] {
            self.snapshots.delete_for_warehouse(warehouse_id).await?;
            self.snapshots
                .insert(&NewSnapshot::derive(warehouse_id, now, healthy_tree(&catalog, target)))
                .await?;
            snapshot_count += 1;
        }

        self.alerts
            .delete_for_metric(DEGRADING_WAREHOUSE, "label")
            .await?;
        self.alerts
            .create(&NewAlert {
                warehouse_id: DEGRADING_WAREHOUSE.to_string(),
                metric_id: "label".to_string(),
                severity: AlertSeverity::Critical,
                score: 5.0,
                ai_summary: Some(LABEL_ALERT_SUMMARY.to_string()),
            })
            .await?;

        tracing::info!(snapshots = snapshot_count, "Demo data generated");

        Ok(SeedResponse {
            message: "Demo data generated successfully!".to_string(),
            details: SeedDetails {
                user,
                warehouses: warehouses.len(),
                metric_definitions: definitions.len(),
                snapshots: snapshot_count,
                alerts: 1,
            },
        })
    }

    async fn ensure_manager(&self, manager: SeedManager) -> Result<String, DomainError> {
        let email = normalize_email(&manager.email);
        if self.users.find_by_email(&email).await?.is_none() {
            self.users
                .create(&NewUser {
                    email: email.clone(),
                    password_hash: manager.password_hash,
                    role: Role::Manager,
                    name: "Admin".to_string(),
                })
                .await?;
            tracing::info!(%email, "Created seed manager account");
        }
        Ok(email)
    }
}

fn node(catalog: &MetricCatalog, metric_id: &str, score: f64) -> MetricNode {
    let (status, name, weight) = match catalog.get(metric_id) {
        Some(def) => (def.classify(score), def.name.clone(), Some(def.impact_weight)),
        None => (MetricStatus::classify(score), metric_id.to_string(), None),
    };
    let node = MetricNode::scored(score, status).with_field("name", name);
    match weight {
        // The root carries no weight field.
        Some(w) if metric_id != "poi" => node.with_field("impactWeight", w),
        _ => node,
    }
}

fn degrading_history(catalog: &MetricCatalog, now: DateTime<Utc>) -> Vec<NewSnapshot> {
    let morning = NaiveTime::from_hms_opt(9, 30, 0).unwrap_or_default();

    DEGRADING_HISTORY
        .iter()
        .map(|&(offset, label, wpt, otd, poi)| {
            let timestamp = (now + Duration::days(offset))
                .date_naive()
                .and_time(morning)
                .and_utc();
            let today = offset == 0;

            let mut wpt_node = node(catalog, "wpt", wpt).with_field("target", "30min");
            let mut label_node = node(catalog, "label", label);
            if today {
                wpt_node = wpt_node.with_field("avgTime", "6.2hrs");
                label_node = label_node
                    .with_field("avgTime", "6.2hrs")
                    .with_field("errorCode", "401_UNAUTHORIZED")
                    .with_field("affectedZone", "North");
            }

            let tree = MetricTree::new()
                .with("poi", node(catalog, "poi", poi))
                .with("otd", node(catalog, "otd", otd))
                .with("oa", node(catalog, "oa", 99.0))
                .with("dfr", node(catalog, "dfr", 99.5))
                .with("wpt", wpt_node)
                .with("tt", node(catalog, "tt", 95.0))
                .with("pick", node(catalog, "pick", 98.0))
                .with("pack", node(catalog, "pack", 96.0))
                .with("label", label_node);

            NewSnapshot::derive(DEGRADING_WAREHOUSE, timestamp, tree)
        })
        .collect()
}

/// A stable, healthy tree centred on `target`.
fn healthy_tree(catalog: &MetricCatalog, target: f64) -> MetricTree {
    let clamp = |v: f64| round2(v.clamp(0.0, 100.0));
    [
        ("poi", target),
        ("otd", target + 2.0),
        ("oa", 98.0),
        ("dfr", 99.0),
        ("wpt", target - 1.0),
        ("tt", 95.0),
        ("pick", 94.0),
        ("pack", 92.0),
        ("label", 96.0),
    ]
    .into_iter()
    .map(|(id, score)| (id.to_string(), node(catalog, id, clamp(score))))
    .collect()
}
