pub mod admin;
pub mod agent;
pub mod auth;
pub mod health;
pub mod ingest;
pub mod ml;
pub mod reports;
pub mod seed;
pub mod tree;
pub mod warehouses;

use crate::domain::shared::{errors::DomainError, time_window::LookbackDays};
use crate::presentation::http::errors::AppError;

/// `?days=` with the default window when absent.
pub(crate) fn lookback(days: Option<i64>) -> Result<LookbackDays, AppError> {
    match days {
        Some(days) => LookbackDays::new(days).map_err(|e| DomainError::from(e).into()),
        None => Ok(LookbackDays::default()),
    }
}
