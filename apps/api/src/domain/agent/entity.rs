use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

pub const DEFAULT_CONTEXT_NODE: &str = "general";
pub const DEFAULT_HISTORY_LIMIT: i64 = 50;
pub const MAX_HISTORY_LIMIT: i64 = 200;

/// One question/answer exchange with the insight agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, sqlx::FromRow)]
#[ts(export)]
pub struct AgentLog {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub user_message: String,
    pub agent_response: String,
    pub context_node: String,
    pub tokens_used: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewAgentLog {
    pub user_id: Option<Uuid>,
    pub user_message: String,
    pub agent_response: String,
    pub context_node: String,
    pub tokens_used: i32,
}

impl NewAgentLog {
    pub fn new(user_id: Option<Uuid>, user_message: String, agent_response: String, context_node: Option<String>) -> Self {
        let tokens_used = estimate_tokens(&user_message, &agent_response);
        Self {
            user_id,
            user_message,
            agent_response,
            context_node: context_node.unwrap_or_else(|| DEFAULT_CONTEXT_NODE.to_string()),
            tokens_used,
        }
    }
}

/// Rough token count: one token per four characters, rounded up.
pub fn estimate_tokens(message: &str, response: &str) -> i32 {
    let chars = message.chars().count() + response.chars().count();
    chars.div_ceil(4).try_into().unwrap_or(i32::MAX)
}

/// Clamp a caller-supplied page size into `1..=MAX_HISTORY_LIMIT`.
pub fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_HISTORY_LIMIT).clamp(1, MAX_HISTORY_LIMIT)
}
