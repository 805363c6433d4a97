//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check
//!
//! # Listing
//! GET  /                       - Product listing (?name=&category=)
//! POST /products/delete        - Bulk delete checked products
//!
//! # Editor
//! GET  /product/new            - New product form
//! POST /product/new            - Create product (multipart)
//! GET  /product/edit/{id}      - Edit product form
//! POST /product/edit/{id}      - Update product (multipart)
//! ```

pub mod editor;
pub mod products;

use askama::Template;
use axum::{Router, response::Html, routing::get};

use crate::{error::AppError, state::AppState};

/// All view routes, without state applied.
pub fn routes() -> Router<AppState> {
    Router::new().merge(products::router()).merge(editor::router())
}

/// Application router with state applied and no middleware layers.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(routes())
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the Catalog API.
pub async fn health() -> &'static str {
    "ok"
}

fn render(template: &impl Template) -> Result<Html<String>, AppError> {
    Ok(Html(template.render()?))
}
