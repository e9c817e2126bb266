//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{books, health, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bookshelf API",
        version = "0.1.0",
        description = "Book lending REST API"
    ),
    paths(
        health::health_check,
        users::register,
        users::login,
        users::get_user,
        books::list_books,
        books::get_book,
        books::add_book,
        books::book_return,
    ),
    components(
        schemas(
            crate::models::user::User,
            crate::models::user::NewUser,
            crate::models::user::Credentials,
            crate::models::book::Book,
            crate::models::book::NewBook,
            users::UserIdResponse,
            books::MessageResponse,
            health::HealthResponse,
            crate::storage::BackendKind,
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "users", description = "Registration and login"),
        (name = "books", description = "Book catalog")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
