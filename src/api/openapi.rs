//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, authors, books, health, readers, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bookshelf API",
        version = "1.0.0",
        description = "Library backend REST API for readers and authors"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::signup,
        auth::login,
        // Users
        users::profile,
        users::update_profile,
        users::delete_account,
        users::logout,
        // Catalog
        books::list_books,
        books::search_books,
        // Authors
        authors::create_book,
        authors::list_books,
        authors::update_book,
        authors::delete_book,
        // Readers
        readers::borrow_book,
        readers::return_book,
        readers::borrowed_books,
    ),
    components(
        schemas(
            // Auth
            auth::TokenResponse,
            crate::models::user::SignupRequest,
            crate::models::user::LoginRequest,
            crate::models::user::Role,
            // Users
            users::ProfileResponse,
            users::MessageResponse,
            users::DeleteAccountResponse,
            crate::models::user::AccountProfile,
            crate::models::user::AccountShort,
            crate::models::user::UpdateProfile,
            // Books
            books::BookPage,
            crate::models::book::Book,
            crate::models::book::BookSummary,
            crate::models::book::BookWithBorrowers,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            crate::models::book::BookRef,
            crate::models::book::Pagination,
            // Authors
            authors::BookResponse,
            authors::AuthorBooksResponse,
            authors::UpdateBookResponse,
            // Readers
            readers::LoanResponse,
            readers::BorrowedBooksResponse,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Signup and login"),
        (name = "users", description = "Account self-service"),
        (name = "catalog", description = "Public catalog browsing"),
        (name = "authors", description = "Author book management"),
        (name = "readers", description = "Borrowing and returning")
    )
)]
pub struct ApiDoc;

/// Registers the `bearer_auth` scheme referenced by protected paths
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
