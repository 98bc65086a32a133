//! Profile handlers for the authenticated caller.

use crate::{
    api::validation,
    auth::middleware::AuthUser,
    types::{DataResponse, Result, UpdatePasswordRequest, UpdateProfileRequest, UserResponse},
    AppState,
};
use axum::{extract::State, http::StatusCode, Json};

/// Get the caller's profile.
#[utoipa::path(
    get,
    path = "/api/users/me",
    responses(
        (status = 200, description = "Current user", body = DataResponse<UserResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Account no longer exists")
    ),
    tag = "users",
    security(("bearer" = []))
)]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> Result<Json<DataResponse<UserResponse>>> {
    let user = state.accounts.get_profile(&identity).await?;
    Ok(Json(DataResponse::new(user.into())))
}

/// Update the caller's username and email.
#[utoipa::path(
    put,
    path = "/api/users/me",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = DataResponse<UserResponse>),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Username or email already taken")
    ),
    tag = "users",
    security(("bearer" = []))
)]
pub async fn update_me(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<DataResponse<UserResponse>>> {
    validation::username(&payload.username)?;
    validation::email(&payload.email)?;

    let user = state
        .accounts
        .update_profile(&identity, &payload.username, &payload.email)
        .await?;

    Ok(Json(DataResponse::new(user.into())))
}

/// Change the caller's password.
#[utoipa::path(
    put,
    path = "/api/users/me/password",
    request_body = UpdatePasswordRequest,
    responses(
        (status = 204, description = "Password changed"),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized or current password incorrect")
    ),
    tag = "users",
    security(("bearer" = []))
)]
pub async fn update_password(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Json(payload): Json<UpdatePasswordRequest>,
) -> Result<StatusCode> {
    validation::password(&payload.new_password)?;

    state
        .accounts
        .update_password(&identity, &payload.current_password, &payload.new_password)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
