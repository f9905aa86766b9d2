//! API handlers for Bookshelf REST endpoints

pub mod auth;
pub mod authors;
pub mod books;
pub mod guards;
pub mod health;
pub mod openapi;
pub mod readers;
pub mod users;

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts},
    http::request::Parts,
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{error::AppError, models::Identity, AppState};

/// Extractor for the identity attached by [`guards::require_auth`]
pub struct AuthenticatedUser(pub Identity);

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(AuthenticatedUser)
            .ok_or_else(|| AppError::Authentication("Access denied, no token provided".to_string()))
    }
}

/// JSON body extractor whose rejections go through [`AppError`]
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let auth_gate = middleware::from_fn_with_state(state.clone(), guards::require_auth);

    let auth_routes = Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login));

    let user_routes = Router::new()
        .route("/profile", get(users::profile))
        .route("/update", put(users::update_profile))
        .route("/delete", delete(users::delete_account))
        .route("/logout", post(users::logout))
        .route_layer(auth_gate.clone());

    let public_routes = Router::new()
        .route("/books", get(books::list_books))
        .route("/books/search", get(books::search_books));

    // Layers run outermost-last: the auth gate runs before the role gate
    let author_routes = Router::new()
        .route("/books", get(authors::list_books))
        .route("/books/create", post(authors::create_book))
        .route("/books/update", put(authors::update_book))
        .route("/books/delete", delete(authors::delete_book))
        .route_layer(middleware::from_fn(guards::require_author))
        .route_layer(auth_gate.clone());

    let reader_routes = Router::new()
        .route("/books", get(readers::borrowed_books))
        .route("/books/borrow", post(readers::borrow_book))
        .route("/books/return", post(readers::return_book))
        .route_layer(middleware::from_fn(guards::require_reader))
        .route_layer(auth_gate);

    let api_v1 = Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .nest("/auth", auth_routes)
        .nest("/users", user_routes)
        .nest("/public", public_routes)
        .nest("/authors", author_routes)
        .nest("/readers", reader_routes)
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
