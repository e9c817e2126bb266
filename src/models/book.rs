//! Book model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Catalog entry, one per (title, author) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    #[sqlx(rename = "bid")]
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub description: String,
    /// Recommended minimum reader age
    pub age: i32,
    /// Number of copies held
    pub count: i32,
}

/// Add book request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct NewBook {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Author is required"))]
    pub author: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    #[validate(range(min = 0, message = "Age cannot be negative"))]
    pub age: i32,
    /// Copies to add; anything below 1 counts as a single copy
    #[serde(default)]
    pub count: Option<i32>,
}

impl NewBook {
    /// Number of copies this request contributes to the catalog
    pub fn copies(&self) -> i32 {
        self.count.unwrap_or(1).max(1)
    }

    /// Whether `book` is the catalog entry this request refers to
    pub fn matches(&self, book: &Book) -> bool {
        book.title == self.title && book.author == self.author
    }
}
