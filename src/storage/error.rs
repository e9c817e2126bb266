//! Storage error taxonomy

use std::time::Duration;

use thiserror::Error;

/// Errors returned by every storage backend.
///
/// The first seven variants are domain outcomes that callers are expected to
/// handle. The rest are infrastructure failures and carry no domain meaning.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("user already exists")]
    UserExists,

    #[error("user does not exist")]
    UserDoesNotExist,

    #[error("user not found")]
    UserNotFound,

    #[error("invalid password")]
    InvalidPassword,

    #[error("book does not exist")]
    BookDoesNotExist,

    #[error("empty book list")]
    EmptyBookList,

    #[error("copy count would exceed {}", i32::MAX)]
    CopyCountOverflow,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("query timed out after {0:?}")]
    Timeout(Duration),

    #[error("password hashing failed: {0}")]
    PasswordHash(String),

    #[error("internal storage error: {0}")]
    Internal(String),
}

impl StorageError {
    /// Whether this is an anticipated domain outcome rather than an
    /// infrastructure failure
    pub fn is_domain(&self) -> bool {
        matches!(
            self,
            StorageError::UserExists
                | StorageError::UserDoesNotExist
                | StorageError::UserNotFound
                | StorageError::InvalidPassword
                | StorageError::BookDoesNotExist
                | StorageError::EmptyBookList
                | StorageError::CopyCountOverflow
        )
    }
}

/// Result type alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
