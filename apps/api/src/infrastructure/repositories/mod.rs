pub mod sqlx_agent_log_repository;
pub mod sqlx_alert_repository;
pub mod sqlx_metric_definition_repository;
pub mod sqlx_snapshot_repository;
pub mod sqlx_user_repository;
pub mod sqlx_warehouse_repository;

use crate::domain::shared::errors::DomainError;

/// Postgres `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|db| db.code())
        .is_some_and(|code| code == UNIQUE_VIOLATION)
}

/// Text columns holding enum values; a bad value means the row was written
/// outside this service.
pub(crate) fn parse_column<T>(column: &str, value: &str) -> Result<T, DomainError>
where
    T: std::str::FromStr<Err = String>,
{
    value
        .parse()
        .map_err(|e| DomainError::InfrastructureError(format!("corrupt {} column: {}", column, e)))
}
