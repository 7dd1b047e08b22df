use super::entity::{AgentLog, NewAgentLog};
use crate::domain::shared::errors::DomainError;
use async_trait::async_trait;
use uuid::Uuid;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AgentLogRepository: Send + Sync {
    async fn record(&self, log: &NewAgentLog) -> Result<AgentLog, DomainError>;
    /// Newest first.
    async fn list_for_user(&self, user_id: Uuid, limit: i64) -> Result<Vec<AgentLog>, DomainError>;
    /// Newest first, across every user.
    async fn list_recent(&self, limit: i64) -> Result<Vec<AgentLog>, DomainError>;
}
