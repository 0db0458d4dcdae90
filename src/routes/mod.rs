use axum::{Router, http::Uri, routing::get};

use crate::{error::AppError, state::AppState};

pub mod doc;
pub mod health;
pub mod home;
pub mod items;
pub mod orders;
pub mod params;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new().nest("/orders", orders::router())
}

/// Full application router: root page, health probe, `/api` resources,
/// Scalar reference and the JSON 404 fallback. Tower layers and state
/// are attached by the caller.
pub fn app_router() -> Router<AppState> {
    Router::new()
        .route("/", get(home::index))
        .route("/health", get(health::health_check))
        .nest("/api", create_api_router())
        .merge(doc::scalar_docs())
        .fallback(not_found)
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("Path '{}' does not exist.", uri.path()))
}
