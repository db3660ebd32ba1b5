//! Order status changes and the stock reconciliation workflow.
//!
//! Changing an order's status is the only operation in the panel with real
//! invariants:
//!
//! - stock must never go negative;
//! - moving into a stock-counted status (processing/shipped/completed)
//!   deducts the order's quantity from the product;
//! - cancelling a stock-counted order restores it.
//!
//! The adjustment itself is planned by a pure function
//! ([`plan_stock_adjustment`]) and then persisted in a fixed order: the
//! product patch goes out **before** the order-status patch. A failure in
//! between leaves stock adjusted with the status unchanged - retrying then
//! short-circuits on the unchanged status instead of deducting twice. The
//! two writes are not a transaction; the backend's REST surface offers
//! none, and the gap is surfaced to the operator rather than rolled back.

use bude_peyek_core::{OrderId, OrderStatus, ProductStatus};
use chrono::Utc;
use tracing::instrument;

use crate::error::AppError;
use crate::models::{Order, OrderStatusPatch, Product, ProductPatch};
use crate::state::AppState;
use crate::supabase::{ORDERS_TABLE, PRODUCTS_TABLE};

/// A planned change to a product's stock row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockAdjustment {
    /// Stock level after the adjustment.
    pub new_stock: i64,
    /// Product status change, when the adjustment implies one: `inactive`
    /// when a deduction exhausts stock, `active` when a cancellation
    /// restocks. `None` leaves the status alone.
    pub new_status: Option<ProductStatus>,
}

/// Why a stock adjustment cannot be made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockPlanError {
    /// The product does not track stock but the transition needs to deduct.
    Untracked,
    /// Not enough stock on hand for the order's quantity.
    Insufficient {
        /// Units currently on hand.
        available: i64,
        /// Units the order needs.
        requested: i64,
    },
}

/// Decide what (if anything) happens to a product's stock when an order
/// moves from `old` to `new` status.
///
/// Pure function over the inputs; `Ok(None)` means the transition touches
/// no stock at all.
///
/// # Errors
///
/// Returns a [`StockPlanError`] when a deduction is required but the stock
/// is untracked or insufficient. In that case nothing may change.
pub fn plan_stock_adjustment(
    old: OrderStatus,
    new: OrderStatus,
    stock: Option<i64>,
    quantity: i64,
) -> Result<Option<StockAdjustment>, StockPlanError> {
    let was_counted = old.is_stock_counted();
    let will_be_counted = new.is_stock_counted();

    if !was_counted && will_be_counted {
        // Deduction: the quantity becomes reserved against inventory.
        let available = stock.ok_or(StockPlanError::Untracked)?;
        if available < quantity {
            return Err(StockPlanError::Insufficient {
                available,
                requested: quantity,
            });
        }
        let new_stock = available - quantity;
        return Ok(Some(StockAdjustment {
            new_stock,
            new_status: (new_stock <= 0).then_some(ProductStatus::Inactive),
        }));
    }

    if was_counted && new == OrderStatus::Cancelled {
        // Restock: release the reservation back into inventory.
        return Ok(Some(StockAdjustment {
            new_stock: stock.unwrap_or(0) + quantity,
            new_status: Some(ProductStatus::Active),
        }));
    }

    Ok(None)
}

/// Whether a transition from `old` to `new` could touch stock at all
/// (used to decide if an unresolvable product reference must abort).
const fn adjustment_required(old: OrderStatus, new: OrderStatus) -> bool {
    (!old.is_stock_counted() && new.is_stock_counted())
        || (old.is_stock_counted() && matches!(new, OrderStatus::Cancelled))
}

/// Transition an order to a new status, reconciling product stock.
///
/// Steps: short-circuit on same status, validate the transition, resolve
/// the product, plan the adjustment, persist product-then-order, refresh
/// both caches.
///
/// # Errors
///
/// - [`AppError::NotFound`] - unknown order, or unresolvable product when
///   an adjustment is required
/// - [`AppError::Validation`] - illegal transition, untracked stock, or
///   insufficient stock (nothing was changed)
/// - [`AppError::Remote`] - a remote write failed; when the order patch
///   fails after the product patch succeeded, stock stays adjusted and
///   the order keeps its old status
#[instrument(skip(state))]
pub async fn change_order_status(
    state: &AppState,
    order_id: OrderId,
    new_status: OrderStatus,
) -> Result<(), AppError> {
    let supabase = state.supabase();
    let cache = state.cache();

    let order: Order = cache
        .order_by_id(order_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("order {order_id}")))?;

    let old_status = order.status;
    if old_status == new_status {
        tracing::debug!(%order_id, status = %new_status, "status unchanged, nothing to do");
        return Ok(());
    }

    if !old_status.can_transition_to(new_status) {
        return Err(AppError::Validation(format!(
            "order {order_id} cannot move from {old_status} to {new_status}"
        )));
    }

    let product: Option<Product> = cache
        .resolve_product(order.product_id, order.product_name.as_deref())
        .await;

    let needs_product = adjustment_required(old_status, new_status);
    let adjustment = match &product {
        Some(product) => {
            plan_stock_adjustment(old_status, new_status, product.stock, order.quantity).map_err(
                |e| match e {
                    StockPlanError::Untracked => AppError::Validation(format!(
                        "stock is not tracked for \"{}\"",
                        product.name
                    )),
                    StockPlanError::Insufficient {
                        available,
                        requested,
                    } => AppError::Validation(format!(
                        "insufficient stock for \"{}\": {available} on hand, {requested} needed",
                        product.name
                    )),
                },
            )?
        }
        None if needs_product => {
            return Err(AppError::NotFound(format!(
                "product referenced by order {order_id}"
            )));
        }
        None => None,
    };

    // Product first, order second: a failure between the two writes leaves
    // stock adjusted with the status unchanged, so a retry short-circuits
    // instead of deducting again.
    if let (Some(adjustment), Some(product)) = (adjustment, product) {
        let patch = ProductPatch {
            stock: Some(Some(adjustment.new_stock)),
            status: adjustment.new_status,
            updated_at: Some(Utc::now()),
            ..Default::default()
        };
        supabase
            .update(PRODUCTS_TABLE, product.id.as_i64(), &patch)
            .await?;
        tracing::info!(
            product_id = %product.id,
            new_stock = adjustment.new_stock,
            "stock reconciled for status change"
        );
    }

    supabase
        .update(
            ORDERS_TABLE,
            order_id.as_i64(),
            &OrderStatusPatch { status: new_status },
        )
        .await?;
    tracing::info!(%order_id, from = %old_status, to = %new_status, "order status changed");

    cache.refresh_all(supabase).await?;
    Ok(())
}

/// Delete an order and refresh the order cache.
///
/// # Errors
///
/// Returns the gateway error on remote failure.
#[instrument(skip(state))]
pub async fn delete_order(state: &AppState, order_id: OrderId) -> Result<(), AppError> {
    state
        .supabase()
        .delete(ORDERS_TABLE, order_id.as_i64())
        .await?;
    tracing::info!(%order_id, "order deleted");
    state.cache().refresh_orders(state.supabase()).await?;
    Ok(())
}
