//! Order route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use bude_peyek_core::{OrderId, OrderStatus, Phone};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use crate::{
    error::AppError,
    middleware::auth::RequireAdminAuth,
    models::Order,
    services::{orders, whatsapp},
    state::AppState,
};

/// Query-string filters for the order listing. All optional; dates are
/// inclusive calendar days (`YYYY-MM-DD`).
#[derive(Debug, Default, Deserialize)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub from: Option<NaiveDate>,
    pub until: Option<NaiveDate>,
}

impl OrderFilter {
    fn matches(&self, order: &Order) -> bool {
        if let Some(status) = self.status {
            if order.status != status {
                return false;
            }
        }
        if self.from.is_some() || self.until.is_some() {
            // orders without a timestamp never match a date filter
            let Some(created) = order.created_at else {
                return false;
            };
            let day = created.date_naive();
            if self.from.is_some_and(|from| day < from) {
                return false;
            }
            if self.until.is_some_and(|until| day > until) {
                return false;
            }
        }
        true
    }
}

/// List orders (newest first, as cached), optionally filtered.
#[instrument(skip_all)]
pub async fn index(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Query(filter): Query<OrderFilter>,
) -> Result<Json<Vec<Order>>, AppError> {
    state.cache().refresh_orders(state.supabase()).await?;
    let orders = state.cache().orders().await;
    Ok(Json(
        orders.into_iter().filter(|o| filter.matches(o)).collect(),
    ))
}

/// Order detail by id (refetches the cache, like the listing).
#[instrument(skip_all)]
pub async fn show(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Order>, AppError> {
    state.cache().refresh_orders(state.supabase()).await?;
    let order = state
        .cache()
        .order_by_id(OrderId::new(id))
        .await
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))?;
    Ok(Json(order))
}

/// Request body for a status change.
#[derive(Debug, Deserialize)]
pub struct StatusInput {
    pub status: OrderStatus,
}

/// Change an order's status, reconciling product stock along the way.
#[instrument(skip_all)]
pub async fn change_status(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<StatusInput>,
) -> Result<StatusCode, AppError> {
    orders::change_order_status(&state, OrderId::new(id), input.status).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete an order. No stock is restored; cancel first if it should be.
#[instrument(skip_all)]
pub async fn delete(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    orders::delete_order(&state, OrderId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Build the wa.me deep link for an order.
///
/// The fallback number is the settings phone when set, else the
/// `STORE_PHONE` from configuration.
#[instrument(skip_all)]
pub async fn whatsapp_link(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.cache().refresh_orders(state.supabase()).await?;
    let order = state
        .cache()
        .order_by_id(OrderId::new(id))
        .await
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))?;

    let settings = state.settings().get().await;
    let fallback = Phone::parse(&settings.phone)
        .ok()
        .or_else(|| state.config().store_phone.clone());

    let url = whatsapp::order_link(&order, fallback.as_ref())?;
    Ok(Json(json!({ "url": url })))
}
