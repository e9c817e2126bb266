//! API integration tests against the in-memory backend

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use bookshelf_server::{
    api,
    storage::{BackendKind, MemoryStorage},
    AppState,
};

fn test_app() -> Router {
    api::create_router(AppState {
        storage: Arc::new(MemoryStorage::new()),
        backend: BackendKind::Memory,
    })
}

/// Send a request and return the status and JSON body (Null when empty)
async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn register(app: &Router, email: &str, password: &str, age: i32) -> (StatusCode, Value) {
    send(
        app,
        Method::POST,
        "/users/register",
        Some(json!({ "email": email, "password": password, "age": age })),
    )
    .await
}

async fn login(app: &Router, email: &str, password: &str) -> (StatusCode, Value) {
    send(
        app,
        Method::POST,
        "/users/login",
        Some(json!({ "email": email, "password": password })),
    )
    .await
}

async fn add_book(app: &Router, title: &str, author: &str) -> (StatusCode, Value) {
    send(
        app,
        Method::POST,
        "/add-book",
        Some(json!({
            "title": title,
            "author": author,
            "description": "Politics and ecology on a desert planet",
            "age": 14
        })),
    )
    .await
}

#[tokio::test]
async fn test_health_check() {
    let app = test_app();
    let (status, body) = send(&app, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["backend"], "memory");
}

#[tokio::test]
async fn test_register_and_login_flow() {
    let app = test_app();

    let (status, body) = register(&app, "a@x.com", "pw123456", 20).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["id"].as_str().unwrap().to_string();

    let (status, body) = login(&app, "a@x.com", "pw123456").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id.as_str());

    let (status, body) = login(&app, "a@x.com", "wrong-password").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "InvalidPassword");

    let (status, _) = login(&app, "nobody@x.com", "pw123456").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = login(&app, "not-an-email", "pw123456").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NoSuchUser");
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let app = test_app();

    let (status, _) = register(&app, "a@x.com", "pw123456", 20).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = register(&app, "a@x.com", "another-pass", 30).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "UserExists");
}

#[tokio::test]
async fn test_register_validation() {
    let app = test_app();

    let (status, _) = register(&app, "a@x.com", "pw123456", 15).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = register(&app, "a@x.com", "short", 20).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = register(&app, "not-an-email", "pw123456", 20).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::POST,
        "/users/register",
        Some(json!({ "email": "a@x.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_user() {
    let app = test_app();
    let (_, body) = register(&app, "a@x.com", "pw123456", 20).await;
    let id = body["id"].as_str().unwrap();

    let (status, user) = send(&app, Method::GET, &format!("/users/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["email"], "a@x.com");
    assert_eq!(user["age"], 20);
    assert!(user.get("password_hash").is_none());
}

#[tokio::test]
async fn test_get_unknown_user() {
    let app = test_app();

    let uri = format!("/users/{}", uuid::Uuid::new_v4());
    let (status, _) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::GET, "/users/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_books_flow() {
    let app = test_app();

    let (status, body) = send(&app, Method::GET, "/books", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "EmptyCatalog");

    let (status, body) = add_book(&app, "Dune", "Herbert").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "book Herbert Dune was added");

    let (status, _) = add_book(&app, "Dune", "Herbert").await;
    assert_eq!(status, StatusCode::OK);

    let (status, books) = send(&app, Method::GET, "/books", None).await;
    assert_eq!(status, StatusCode::OK);
    let books = books.as_array().unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0]["title"], "Dune");
    assert_eq!(books[0]["count"], 2);

    let id = books[0]["id"].as_str().unwrap();
    let (status, book) = send(&app, Method::GET, &format!("/books/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(book["author"], "Herbert");
    assert_eq!(book["count"], 2);
}

#[tokio::test]
async fn test_add_book_count_overflow() {
    let app = test_app();
    let book = json!({ "title": "Dune", "author": "Herbert", "count": i32::MAX });

    let (status, _) = send(&app, Method::POST, "/add-book", Some(book.clone())).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Method::POST, "/add-book", Some(book)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "CountOverflow");

    let (status, books) = send(&app, Method::GET, "/books", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(books[0]["count"], i32::MAX);

    let (status, _) = add_book(&app, "Emma", "Austen").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_get_unknown_book() {
    let app = test_app();

    let uri = format!("/books/{}", uuid::Uuid::new_v4());
    let (status, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NoSuchBook");
}

#[tokio::test]
async fn test_add_book_validation() {
    let app = test_app();

    let (status, _) = add_book(&app, "", "Herbert").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::POST, "/add-book", Some(json!({ "title": 42 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_book_return_not_implemented() {
    let app = test_app();
    let (status, _) = send(&app, Method::POST, "/book-return", None).await;
    assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
}
