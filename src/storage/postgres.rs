//! PostgreSQL storage backend

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use super::{
    error::{StorageError, StorageResult},
    password, Storage,
};
use crate::{
    config::DatabaseConfig,
    models::{Book, Credentials, NewBook, NewUser, User},
};

/// Upper bound for a single storage operation, connection wait included
pub const QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLSTATE class for integrity constraint violations
const INTEGRITY_CONSTRAINT_CLASS: &str = "23";

/// SQLSTATE for integer overflow
const NUMERIC_VALUE_OUT_OF_RANGE: &str = "22003";

/// Durable implementation of [`Storage`] over a connection pool
#[derive(Clone)]
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    /// Open a connection pool; fails if the database is unreachable
    pub async fn connect(config: &DatabaseConfig) -> StorageResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect(&config.url)
            .await?;

        Ok(Self::from_pool(pool))
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Run a query future, failing with [`StorageError::Timeout`] past [`QUERY_TIMEOUT`]
async fn bounded<T, F>(query: F) -> StorageResult<T>
where
    F: Future<Output = StorageResult<T>>,
{
    tokio::time::timeout(QUERY_TIMEOUT, query)
        .await
        .map_err(|_| StorageError::Timeout(QUERY_TIMEOUT))?
}

fn sqlstate_matches(error: &sqlx::Error, prefix: &str) -> bool {
    match error {
        sqlx::Error::Database(db_error) => db_error
            .code()
            .is_some_and(|code| code.starts_with(prefix)),
        _ => false,
    }
}

fn is_integrity_violation(error: &sqlx::Error) -> bool {
    sqlstate_matches(error, INTEGRITY_CONSTRAINT_CLASS)
}

fn is_numeric_overflow(error: &sqlx::Error) -> bool {
    sqlstate_matches(error, NUMERIC_VALUE_OUT_OF_RANGE)
}

#[async_trait]
impl Storage for PgStorage {
    async fn save_user(&self, user: NewUser) -> StorageResult<Uuid> {
        let password_hash = password::hash_password(user.password).await?;
        let id = Uuid::new_v4();

        bounded(async {
            sqlx::query("INSERT INTO users (uid, email, password_hash, age) VALUES ($1, $2, $3, $4)")
                .bind(id)
                .bind(&user.email)
                .bind(&password_hash)
                .bind(user.age)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    if is_integrity_violation(&e) {
                        StorageError::UserExists
                    } else {
                        StorageError::Database(e)
                    }
                })?;
            Ok::<_, StorageError>(())
        })
        .await?;

        tracing::debug!(user_id = %id, "user registered");
        Ok(id)
    }

    async fn validate_user(&self, credentials: Credentials) -> StorageResult<Uuid> {
        let (id, hash) = bounded(async {
            sqlx::query_as::<_, (Uuid, String)>(
                "SELECT uid, password_hash FROM users WHERE email = $1",
            )
            .bind(&credentials.email)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StorageError::UserDoesNotExist)
        })
        .await?;

        if !password::verify_password(credentials.password, hash).await? {
            return Err(StorageError::InvalidPassword);
        }

        Ok(id)
    }

    async fn get_user(&self, id: Uuid) -> StorageResult<User> {
        bounded(async {
            sqlx::query_as::<_, User>(
                "SELECT uid, email, password_hash, age FROM users WHERE uid = $1",
            )
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StorageError::UserNotFound)
        })
        .await
    }

    async fn save_book(&self, book: NewBook) -> StorageResult<()> {
        let copies = book.copies();

        // Single statement, so concurrent first inserts of a pair cannot
        // produce two rows
        let (id, count) = bounded(async {
            let row = sqlx::query_as::<_, (Uuid, i32)>(
                r#"
                INSERT INTO books (bid, title, author, description, age, count)
                VALUES ($1, $2, $3, $4, $5, $6)
                ON CONFLICT (title, author)
                DO UPDATE SET count = books.count + EXCLUDED.count
                RETURNING bid, count
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(&book.title)
            .bind(&book.author)
            .bind(&book.description)
            .bind(book.age)
            .bind(copies)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if is_numeric_overflow(&e) {
                    StorageError::CopyCountOverflow
                } else {
                    StorageError::Database(e)
                }
            })?;
            Ok::<_, StorageError>(row)
        })
        .await?;

        tracing::debug!(book_id = %id, count, "book saved");
        Ok(())
    }

    async fn get_books(&self) -> StorageResult<Vec<Book>> {
        let books = bounded(async {
            let books = sqlx::query_as::<_, Book>(
                "SELECT bid, title, author, description, age, count FROM books",
            )
            .fetch_all(&self.pool)
            .await?;
            Ok::<_, StorageError>(books)
        })
        .await?;

        if books.is_empty() {
            return Err(StorageError::EmptyBookList);
        }
        Ok(books)
    }

    async fn get_book(&self, id: Uuid) -> StorageResult<Book> {
        bounded(async {
            sqlx::query_as::<_, Book>(
                "SELECT bid, title, author, description, age, count FROM books WHERE bid = $1",
            )
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StorageError::BookDoesNotExist)
        })
        .await
    }
}
