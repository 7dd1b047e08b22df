use crate::domain::{
    agent::{
        entity::{AgentLog, NewAgentLog},
        repository::AgentLogRepository,
    },
    shared::errors::DomainError,
};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{info, instrument};
use uuid::Uuid;

const COLUMNS: &str = "id, user_id, user_message, agent_response, context_node, tokens_used, created_at";

pub struct SqlxAgentLogRepository {
    pub pool: PgPool,
}

impl SqlxAgentLogRepository {
    pub fn new(pool: PgPool) -> Self {
        info!("Initializing SqlxAgentLogRepository with connection pool");
        Self { pool }
    }
}

#[async_trait]
impl AgentLogRepository for SqlxAgentLogRepository {
    #[instrument(skip(self, log), fields(context_node = %log.context_node, tokens = log.tokens_used))]
    async fn record(&self, log: &NewAgentLog) -> Result<AgentLog, DomainError> {
        let sql = format!(
            "INSERT INTO agent_logs (id, user_id, user_message, agent_response, context_node, tokens_used) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
            COLUMNS
        );
        sqlx::query_as::<_, AgentLog>(&sql)
            .bind(Uuid::now_v7())
            .bind(log.user_id)
            .bind(&log.user_message)
            .bind(&log.agent_response)
            .bind(&log.context_node)
            .bind(log.tokens_used)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::InfrastructureError(e.to_string()))
    }

    #[instrument(skip(self), fields(user_id = %user_id))]
    async fn list_for_user(&self, user_id: Uuid, limit: i64) -> Result<Vec<AgentLog>, DomainError> {
        let sql = format!(
            "SELECT {} FROM agent_logs WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2",
            COLUMNS
        );
        sqlx::query_as::<_, AgentLog>(&sql)
            .bind(user_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::InfrastructureError(e.to_string()))
    }

    #[instrument(skip(self))]
    async fn list_recent(&self, limit: i64) -> Result<Vec<AgentLog>, DomainError> {
        let sql = format!("SELECT {} FROM agent_logs ORDER BY created_at DESC LIMIT $1", COLUMNS);
        sqlx::query_as::<_, AgentLog>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::InfrastructureError(e.to_string()))
    }
}
