//! Storage layer.
//!
//! Every request handler talks to storage through the [`Storage`] trait and
//! never knows which backend is active. Two backends are provided:
//! [`PgStorage`] over PostgreSQL and [`MemoryStorage`], a volatile fallback.

pub mod error;
pub mod memory;
pub mod migrations;
pub mod password;
pub mod postgres;

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Book, Credentials, NewBook, NewUser, User};

pub use error::{StorageError, StorageResult};
pub use memory::MemoryStorage;
pub use migrations::{run_migrations, MigrationOutcome};
pub use postgres::PgStorage;

/// Operations shared by all storage backends
#[async_trait]
pub trait Storage: Send + Sync {
    /// Register a user and return its generated identifier.
    ///
    /// Fails with [`StorageError::UserExists`] if the email is taken.
    async fn save_user(&self, user: NewUser) -> StorageResult<Uuid>;

    /// Check credentials and return the matching user's identifier.
    ///
    /// Fails with [`StorageError::UserDoesNotExist`] for an unknown email and
    /// [`StorageError::InvalidPassword`] when the password does not match.
    async fn validate_user(&self, credentials: Credentials) -> StorageResult<Uuid>;

    /// Fails with [`StorageError::UserNotFound`] if the identifier is unknown
    async fn get_user(&self, id: Uuid) -> StorageResult<User>;

    /// Add a book, or add copies to the existing entry with the same title
    /// and author
    async fn save_book(&self, book: NewBook) -> StorageResult<()>;

    /// All catalog entries in no particular order.
    ///
    /// Fails with [`StorageError::EmptyBookList`] when the catalog is empty.
    async fn get_books(&self) -> StorageResult<Vec<Book>>;

    /// Fails with [`StorageError::BookDoesNotExist`] if the identifier is unknown
    async fn get_book(&self, id: Uuid) -> StorageResult<Book>;
}

/// Which backend is serving requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Postgres,
    Memory,
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendKind::Postgres => write!(f, "postgres"),
            BackendKind::Memory => write!(f, "memory"),
        }
    }
}
