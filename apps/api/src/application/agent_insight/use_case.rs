use super::dto::{InsightRequest, InsightResponse};
use crate::domain::{
    agent::{
        entity::{AgentLog, NewAgentLog, clamp_limit},
        repository::AgentLogRepository,
    },
    shared::errors::DomainError,
};
use crate::infrastructure::ml::traits::{MlEngine, RootCause, root_cause};
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

pub struct AgentInsightUseCase {
    ml_engine: Arc<dyn MlEngine>,
    logs: Arc<dyn AgentLogRepository>,
}

impl AgentInsightUseCase {
    pub fn new(ml_engine: Arc<dyn MlEngine>, logs: Arc<dyn AgentLogRepository>) -> Self {
        Self { ml_engine, logs }
    }

    /// Ask the root-cause classifier about one metric node and log the exchange.
    pub async fn insight(
        &self,
        user_id: Option<Uuid>,
        request: InsightRequest,
        now: DateTime<Utc>,
    ) -> Result<InsightResponse, DomainError> {
        if request.metric.trim().is_empty() {
            return Err(DomainError::ValidationError("metric is required".into()));
        }

        let mut context = request.context.clone();
        context.insert("metric".into(), Value::from(request.metric.clone()));
        if let Some(score) = request.score {
            context.insert("score".into(), Value::from(score));
        }
        if let Some(warehouse_id) = &request.warehouse_id {
            context.insert("warehouse_id".into(), Value::from(warehouse_id.clone()));
        }

        let (cause, ml_powered) = match root_cause(self.ml_engine.as_ref(), Value::Object(context)).await {
            Some(cause) => (cause, true),
            None => (RootCause::fallback(), false),
        };

        let response = format!(
            "Root cause: {}. Recommendation: {}",
            cause.root_cause, cause.recommendation
        );
        let message = request
            .message
            .clone()
            .unwrap_or_else(|| format!("Insight request for {}", request.metric));

        // Logging failures never fail the answer.
        if let Err(e) = self
            .logs
            .record(&NewAgentLog::new(user_id, message, response.clone(), Some(request.metric.clone())))
            .await
        {
            tracing::warn!(error = %e, "Failed to log agent interaction");
        }

        Ok(InsightResponse {
            metric: request.metric,
            root_cause: cause.root_cause,
            recommendation: cause.recommendation,
            confidence: cause.confidence,
            ml_powered,
            response,
            timestamp: now,
        })
    }

    pub async fn history(&self, user_id: Uuid, limit: Option<i64>) -> Result<Vec<AgentLog>, DomainError> {
        self.logs.list_for_user(user_id, clamp_limit(limit)).await
    }

    pub async fn recent(&self, limit: Option<i64>) -> Result<Vec<AgentLog>, DomainError> {
        self.logs.list_recent(clamp_limit(limit)).await
    }
}
