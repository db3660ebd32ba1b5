//! Dashboard route handler.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use crate::{
    error::AppError,
    middleware::auth::RequireAdminAuth,
    models::{Order, Product},
    services::dashboard::{DashboardMetrics, recent_orders, top_products},
    state::AppState,
};

/// Everything the dashboard view needs in one response.
#[derive(Debug, Serialize)]
pub struct DashboardView {
    pub metrics: DashboardMetrics,
    pub top_products: Vec<Product>,
    pub recent_orders: Vec<Order>,
}

/// Refresh both caches and compute the summary.
#[instrument(skip_all)]
pub async fn index(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<Json<DashboardView>, AppError> {
    state.cache().refresh_all(state.supabase()).await?;

    let products = state.cache().products().await;
    let orders = state.cache().orders().await;

    Ok(Json(DashboardView {
        metrics: DashboardMetrics::compute(&products, &orders),
        top_products: top_products(&products),
        recent_orders: recent_orders(&orders),
    }))
}
