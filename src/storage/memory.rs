//! In-memory storage backend.
//!
//! [`MemoryStorage`] keeps users and books in two `HashMap`s guarded by a
//! single `RwLock`. It is used when PostgreSQL is unreachable and in tests.
//! Data is lost when the store is dropped.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use uuid::Uuid;

use super::{
    error::{StorageError, StorageResult},
    password, Storage,
};
use crate::models::{Book, Credentials, NewBook, NewUser, User};

#[derive(Debug, Default)]
struct Collections {
    users: HashMap<Uuid, User>,
    books: HashMap<Uuid, Book>,
}

impl Collections {
    fn find_user_by_email(&self, email: &str) -> Option<&User> {
        self.users.values().find(|user| user.email == email)
    }

    fn find_book_mut(&mut self, book: &NewBook) -> Option<&mut Book> {
        self.books.values_mut().find(|existing| book.matches(existing))
    }
}

/// Volatile implementation of [`Storage`]
#[derive(Debug, Default)]
pub struct MemoryStorage {
    inner: RwLock<Collections>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StorageResult<RwLockReadGuard<'_, Collections>> {
        self.inner
            .read()
            .map_err(|e| StorageError::Internal(format!("lock poisoned: {}", e)))
    }

    fn write(&self) -> StorageResult<RwLockWriteGuard<'_, Collections>> {
        self.inner
            .write()
            .map_err(|e| StorageError::Internal(format!("lock poisoned: {}", e)))
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn save_user(&self, user: NewUser) -> StorageResult<Uuid> {
        // Cheap rejection before paying for the hash
        let taken = self.read()?.find_user_by_email(&user.email).is_some();
        if taken {
            return Err(StorageError::UserExists);
        }

        let password_hash = password::hash_password(user.password).await?;

        let mut collections = self.write()?;
        // Another registration may have won while we were hashing
        if collections.find_user_by_email(&user.email).is_some() {
            return Err(StorageError::UserExists);
        }

        let id = Uuid::new_v4();
        collections.users.insert(
            id,
            User {
                id,
                email: user.email,
                password_hash,
                age: user.age,
            },
        );

        tracing::debug!(user_id = %id, "user registered in memory");
        Ok(id)
    }

    async fn validate_user(&self, credentials: Credentials) -> StorageResult<Uuid> {
        let (id, hash) = {
            let collections = self.read()?;
            let user = collections
                .find_user_by_email(&credentials.email)
                .ok_or(StorageError::UserDoesNotExist)?;
            (user.id, user.password_hash.clone())
        };

        if !password::verify_password(credentials.password, hash).await? {
            return Err(StorageError::InvalidPassword);
        }

        Ok(id)
    }

    async fn get_user(&self, id: Uuid) -> StorageResult<User> {
        self.read()?
            .users
            .get(&id)
            .cloned()
            .ok_or(StorageError::UserNotFound)
    }

    async fn save_book(&self, book: NewBook) -> StorageResult<()> {
        let copies = book.copies();
        let mut collections = self.write()?;

        if let Some(existing) = collections.find_book_mut(&book) {
            existing.count = existing
                .count
                .checked_add(copies)
                .ok_or(StorageError::CopyCountOverflow)?;
            tracing::debug!(book_id = %existing.id, count = existing.count, "book count incremented");
            return Ok(());
        }

        let id = Uuid::new_v4();
        collections.books.insert(
            id,
            Book {
                id,
                title: book.title,
                author: book.author,
                description: book.description,
                age: book.age,
                count: copies,
            },
        );

        tracing::debug!(book_id = %id, "book added to memory catalog");
        Ok(())
    }

    async fn get_books(&self) -> StorageResult<Vec<Book>> {
        let books: Vec<Book> = self.read()?.books.values().cloned().collect();
        if books.is_empty() {
            return Err(StorageError::EmptyBookList);
        }
        Ok(books)
    }

    async fn get_book(&self, id: Uuid) -> StorageResult<Book> {
        self.read()?
            .books
            .get(&id)
            .cloned()
            .ok_or(StorageError::BookDoesNotExist)
    }
}
