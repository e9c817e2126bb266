//! User registration, login and lookup endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppResult,
    models::user::{Credentials, NewUser, User},
    storage::StorageError,
    AppState,
};

/// Identifier of a registered or authenticated user
#[derive(Debug, Serialize, ToSchema)]
pub struct UserIdResponse {
    pub id: Uuid,
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/users/register",
    tag = "users",
    request_body = NewUser,
    responses(
        (status = 201, description = "User registered", body = UserIdResponse),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<NewUser>, JsonRejection>,
) -> AppResult<(StatusCode, Json<UserIdResponse>)> {
    let Json(user) = payload?;
    user.validate()?;

    let id = state.storage.save_user(user).await?;
    tracing::info!(user_id = %id, "user registered");

    Ok((StatusCode::CREATED, Json(UserIdResponse { id })))
}

/// Check credentials and return the user identifier
#[utoipa::path(
    post,
    path = "/users/login",
    tag = "users",
    request_body = Credentials,
    responses(
        (status = 200, description = "Credentials accepted", body = UserIdResponse),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Wrong password"),
        (status = 404, description = "Unknown email")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> AppResult<Json<UserIdResponse>> {
    let Json(credentials) = payload?;
    credentials.validate()?;

    let id = state.storage.validate_user(credentials).await?;
    tracing::debug!(user_id = %id, "user logged in");

    Ok(Json(UserIdResponse { id }))
}

/// Get user details by ID
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User details", body = User),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<User>> {
    // A malformed identifier cannot name any user
    let id = Uuid::parse_str(&id).map_err(|_| StorageError::UserNotFound)?;

    let user = state.storage.get_user(id).await?;
    Ok(Json(user))
}
