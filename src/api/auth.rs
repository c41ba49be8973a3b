use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;
use serde_json::json;

use super::error_response;
use crate::auth::{create_jwt, Claims};
use crate::domain::{CurrentUser, DomainError, Profile};
use crate::infrastructure::AppState;
use crate::services::session_service;

#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    email: String,
    password: String,
    #[serde(default)]
    display_name: String,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    email: String,
    password: String,
}

fn session_response(status: StatusCode, profile: &Profile) -> axum::response::Response {
    let user = CurrentUser::from(profile);
    match create_jwt(&user) {
        Ok(token) => (status, Json(json!({ "token": token, "user": user }))).into_response(),
        Err(e) => error_response(DomainError::Internal(e)),
    }
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created"),
        (status = 400, description = "Invalid email or password"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> impl IntoResponse {
    match session_service::register(
        state.profile_repo.as_ref(),
        &payload.email,
        &payload.password,
        &payload.display_name,
    )
    .await
    {
        Ok(profile) => {
            tracing::info!("Registered {}", profile.email);
            session_response(StatusCode::CREATED, &profile)
        }
        Err(e) => error_response(e),
    }
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> impl IntoResponse {
    tracing::info!("Login attempt for {}", payload.email);

    match session_service::authenticate(
        state.profile_repo.as_ref(),
        &payload.email,
        &payload.password,
    )
    .await
    {
        Ok(profile) => session_response(StatusCode::OK, &profile),
        Err(e) => {
            tracing::warn!("Login failed for {}: {}", payload.email, e);
            error_response(e)
        }
    }
}

pub async fn me(claims: Claims) -> impl IntoResponse {
    (StatusCode::OK, Json(json!(CurrentUser::from(claims)))).into_response()
}
