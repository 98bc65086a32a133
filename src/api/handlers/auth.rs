use crate::{
    api::validation,
    types::{DataResponse, LoginRequest, LoginResponse, RegisterRequest, Result, UserResponse},
    AppState,
};
use axum::{extract::State, http::StatusCode, Json};

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = DataResponse<UserResponse>),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Username or email already taken")
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<DataResponse<UserResponse>>)> {
    validation::username(&payload.username)?;
    validation::email(&payload.email)?;
    validation::password(&payload.password)?;

    let user = state
        .accounts
        .register(&payload.username, &payload.email, &payload.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse::new(UserResponse::from(user))),
    ))
}

/// Login with email and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    validation::email(&payload.email)?;

    let outcome = state
        .accounts
        .login(&payload.email, &payload.password)
        .await?;

    Ok(Json(LoginResponse {
        token: outcome.token,
        user: outcome.user.into(),
    }))
}
