//! Book catalog endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult, ErrorResponse},
    models::book::{Book, NewBook},
    storage::StorageError,
    AppState,
};

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// List every book in the catalog
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    responses(
        (status = 200, description = "All books", body = Vec<Book>),
        (status = 404, description = "Catalog is empty")
    )
)]
pub async fn list_books(State(state): State<AppState>) -> AppResult<Json<Vec<Book>>> {
    let books = state.storage.get_books().await?;
    Ok(Json(books))
}

/// Get book details by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = String, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Book>> {
    let id = Uuid::parse_str(&id).map_err(|_| StorageError::BookDoesNotExist)?;

    let book = state.storage.get_book(id).await?;
    Ok(Json(book))
}

/// Add a book, or more copies of a book already in the catalog
#[utoipa::path(
    post,
    path = "/add-book",
    tag = "books",
    request_body = NewBook,
    responses(
        (status = 200, description = "Book added", body = MessageResponse),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Copy count would overflow", body = ErrorResponse)
    )
)]
pub async fn add_book(
    State(state): State<AppState>,
    payload: Result<Json<NewBook>, JsonRejection>,
) -> AppResult<Json<MessageResponse>> {
    let Json(book) = payload?;
    book.validate()?;

    let message = format!("book {} {} was added", book.author, book.title);
    state.storage.save_book(book).await?;

    Ok(Json(MessageResponse { message }))
}

/// Return a borrowed book
#[utoipa::path(
    post,
    path = "/book-return",
    tag = "books",
    responses(
        (status = 501, description = "Book returns are not supported yet")
    )
)]
pub async fn book_return() -> AppResult<Json<MessageResponse>> {
    Err(AppError::NotImplemented("book returns are not supported yet".to_string()))
}
