//! User model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Registered reader
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct User {
    #[sqlx(rename = "uid")]
    pub id: Uuid,
    pub email: String,
    /// Argon2 PHC string, never sent to clients
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub age: i32,
}

/// Registration request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct NewUser {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(range(min = 16, message = "User must be at least 16 years old"))]
    pub age: i32,
}

/// Login request; the email is only a lookup key here
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct Credentials {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}
