use axum::{Json, extract::State};
use chrono::Utc;

use crate::application::seed_demo::{
    dto::{SeedManager, SeedResponse},
    use_case::SeedDemoUseCase,
};
use crate::presentation::http::{errors::AppError, state::AppState};

pub async fn seed_demo(State(state): State<AppState>) -> Result<Json<SeedResponse>, AppError> {
    let manager = state
        .config
        .seed_manager_password_hash
        .clone()
        .map(|password_hash| SeedManager {
            email: state.config.seed_manager_email.clone(),
            password_hash,
        });

    let response = SeedDemoUseCase::new(
        state.users.clone(),
        state.warehouses.clone(),
        state.definitions.clone(),
        state.snapshots.clone(),
        state.alerts.clone(),
    )
    .execute(manager, Utc::now())
    .await?;
    Ok(Json(response))
}
