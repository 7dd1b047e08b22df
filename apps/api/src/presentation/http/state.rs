use crate::{
    config::Config,
    domain::{
        agent::repository::AgentLogRepository, alert::repository::AlertRepository,
        metrics::repository::{MetricDefinitionRepository, SnapshotRepository},
        user::repository::UserRepository, warehouse::repository::WarehouseRepository,
    },
    infrastructure::{ml::traits::MlEngine, security::rate_limiter::RateLimitStore},
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub rate_limiter: Arc<dyn RateLimitStore>,
    pub warehouses: Arc<dyn WarehouseRepository>,
    pub snapshots: Arc<dyn SnapshotRepository>,
    pub definitions: Arc<dyn MetricDefinitionRepository>,
    pub alerts: Arc<dyn AlertRepository>,
    pub users: Arc<dyn UserRepository>,
    pub agent_logs: Arc<dyn AgentLogRepository>,
    pub ml_engine: Arc<dyn MlEngine>,
}
