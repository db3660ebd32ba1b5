//! HTTP route handlers for the admin panel.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                    - Health check (unauthenticated)
//!
//! # Auth (hosted-auth session)
//! POST /auth/login                - Sign in with email + password
//! POST /auth/logout               - Sign out
//! GET  /auth/session              - Who is signed in (re-validates the token)
//! POST /auth/password             - Change password (re-verifies the old one)
//!
//! # Dashboard
//! GET  /dashboard                 - Summary metrics + panels
//!
//! # Products
//! GET    /products                - Product listing (refetches the cache)
//! POST   /products                - Create product (multipart, optional image)
//! PUT    /products/{id}           - Update product (multipart, optional image)
//! DELETE /products/{id}           - Delete product
//!
//! # Orders
//! GET    /orders                  - Order listing with status/date filters
//! GET    /orders/{id}             - Order detail
//! DELETE /orders/{id}             - Delete order
//! PUT    /orders/{id}/status      - Change status (runs stock reconciliation)
//! GET    /orders/{id}/whatsapp    - wa.me deep link with pre-filled message
//!
//! # Settings
//! GET  /settings                  - Store contact/info settings
//! PUT  /settings                  - Update settings
//! ```

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

pub mod auth;
pub mod dashboard;
pub mod orders;
pub mod products;
pub mod settings;

/// Assemble all admin routes (the session/trace layers are applied by the
/// caller).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/session", get(auth::session_info))
        .route("/auth/password", post(auth::change_password))
        .route("/dashboard", get(dashboard::index))
        .route("/products", get(products::index).post(products::create))
        .route(
            "/products/{id}",
            put(products::update).delete(products::delete),
        )
        .route("/orders", get(orders::index))
        .route("/orders/{id}", get(orders::show).delete(orders::delete))
        .route("/orders/{id}/status", put(orders::change_status))
        .route("/orders/{id}/whatsapp", get(orders::whatsapp_link))
        .route("/settings", get(settings::show).put(settings::update))
}
