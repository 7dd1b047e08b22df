use axum::{
    Json,
    extract::State,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde_json::json;

use crate::application::accounts::{
    dto::{LoginRequest, SignupRequest, UserResponse},
    use_case::AccountsUseCase,
};
use crate::presentation::http::{
    errors::AppError,
    extractors::ApiJson,
    middleware::auth::{CurrentUser, clear_session_cookie, issue_token, session_cookie},
    state::AppState,
};

fn with_cookie(mut response: Response, cookie: String) -> Result<Response, AppError> {
    let value = HeaderValue::from_str(&cookie)
        .map_err(|e| AppError::Internal(format!("Invalid cookie header: {}", e)))?;
    response.headers_mut().insert(header::SET_COOKIE, value);
    Ok(response)
}

pub async fn signup(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<SignupRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let user = AccountsUseCase::new(state.users.clone(), state.config.bcrypt_cost)
        .signup(body)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(UserResponse::new("Account created successfully", user.profile())),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> Result<Response, AppError> {
    if body.email.trim().is_empty() || body.password.is_empty() {
        return Err(AppError::BadRequest("Email and password are required".into()));
    }

    let now = Utc::now();
    let user = AccountsUseCase::new(state.users.clone(), state.config.bcrypt_cost)
        .authenticate(&body.email, &body.password, now)
        .await?;
    let token = issue_token(&user, &state.config.jwt_secret, state.config.jwt_ttl_hours, now)?;
    tracing::info!(user_id = %user.id, role = %user.role, "User logged in");

    with_cookie(
        Json(UserResponse::new("Login successful", user.profile())).into_response(),
        session_cookie(&token, state.config.jwt_ttl_hours, state.config.cookie_secure),
    )
}

pub async fn logout(State(state): State<AppState>) -> Result<Response, AppError> {
    with_cookie(
        Json(json!({ "message": "Logged out successfully" })).into_response(),
        clear_session_cookie(state.config.cookie_secure),
    )
}

pub async fn me(CurrentUser(user): CurrentUser) -> Json<serde_json::Value> {
    Json(json!({ "user": user.profile() }))
}
