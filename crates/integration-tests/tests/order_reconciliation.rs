//! Order-status / stock reconciliation, end to end against the stub
//! backend: real gateway, real cache, real planner.

use bude_peyek_admin::error::AppError;
use bude_peyek_admin::services::dashboard::DashboardMetrics;
use bude_peyek_admin::services::orders::{change_order_status, delete_order};
use bude_peyek_core::{OrderId, OrderStatus, Rupiah};
use bude_peyek_integration_tests::TestContext;
use serde_json::{Value, json};

fn product_row(id: i64, stock: Value, status: &str) -> Value {
    json!({
        "id": id,
        "name": format!("Peyek {id}"),
        "price": 15_000,
        "stock": stock,
        "status": status,
        "icon": "fa-box",
    })
}

fn order_row(id: i64, product_id: Value, quantity: i64, status: &str) -> Value {
    json!({
        "id": id,
        "customer_name": "Siti",
        "phone": "081234567890",
        "address": "Jl. Melati 5",
        "product_id": product_id,
        "product_name": format!("Peyek {product_id}"),
        "quantity": quantity,
        "total": quantity * 15_000,
        "status": status,
        "created_at": "2025-06-01T08:00:00Z",
    })
}

async fn context_with(product: Value, order: Value) -> TestContext {
    let ctx = TestContext::new().await;
    ctx.backend.seed_product(product).await;
    ctx.backend.seed_order(order).await;
    ctx.state
        .cache()
        .refresh_all(ctx.state.supabase())
        .await
        .expect("cache refresh");
    ctx.backend.clear_ops().await;
    ctx
}

async fn backend_stock(ctx: &TestContext, id: i64) -> Option<i64> {
    ctx.backend
        .product(id)
        .await
        .expect("product row")
        .get("stock")
        .and_then(Value::as_i64)
}

async fn backend_order_status(ctx: &TestContext, id: i64) -> String {
    ctx.backend
        .order(id)
        .await
        .expect("order row")
        .get("status")
        .and_then(Value::as_str)
        .expect("status field")
        .to_string()
}

#[tokio::test]
async fn test_entering_processing_deducts_stock() {
    let ctx = context_with(
        product_row(1, json!(10), "active"),
        order_row(50, json!(1), 3, "pending"),
    )
    .await;

    change_order_status(&ctx.state, OrderId::new(50), OrderStatus::Processing)
        .await
        .expect("status change");

    assert_eq!(backend_stock(&ctx, 1).await, Some(7));
    assert_eq!(backend_order_status(&ctx, 50).await, "processing");

    // product write lands before the order write
    let ops = ctx.backend.ops().await;
    assert_eq!(ops, vec!["PATCH products", "PATCH orders"]);
}

#[tokio::test]
async fn test_exhausting_stock_deactivates_product() {
    let ctx = context_with(
        product_row(1, json!(3), "active"),
        order_row(50, json!(1), 3, "pending"),
    )
    .await;

    change_order_status(&ctx.state, OrderId::new(50), OrderStatus::Processing)
        .await
        .expect("status change");

    let product = ctx.backend.product(1).await.expect("product row");
    assert_eq!(product.get("stock").and_then(Value::as_i64), Some(0));
    assert_eq!(
        product.get("status").and_then(Value::as_str),
        Some("inactive")
    );
}

#[tokio::test]
async fn test_insufficient_stock_changes_nothing() {
    let ctx = context_with(
        product_row(1, json!(2), "active"),
        order_row(50, json!(1), 3, "pending"),
    )
    .await;

    let err = change_order_status(&ctx.state, OrderId::new(50), OrderStatus::Processing)
        .await
        .expect_err("should be rejected");
    assert!(matches!(err, AppError::Validation(_)), "got {err:?}");

    assert_eq!(backend_stock(&ctx, 1).await, Some(2));
    assert_eq!(backend_order_status(&ctx, 50).await, "pending");
    assert!(ctx.backend.ops().await.is_empty());
}

#[tokio::test]
async fn test_untracked_stock_blocks_deduction() {
    let ctx = context_with(
        product_row(1, Value::Null, "active"),
        order_row(50, json!(1), 3, "pending"),
    )
    .await;

    let err = change_order_status(&ctx.state, OrderId::new(50), OrderStatus::Processing)
        .await
        .expect_err("should be rejected");
    assert!(matches!(err, AppError::Validation(_)), "got {err:?}");
    assert_eq!(backend_order_status(&ctx, 50).await, "pending");
}

#[tokio::test]
async fn test_cancelling_counted_order_restocks_and_reactivates() {
    let ctx = context_with(
        product_row(1, json!(0), "inactive"),
        order_row(50, json!(1), 3, "processing"),
    )
    .await;

    change_order_status(&ctx.state, OrderId::new(50), OrderStatus::Cancelled)
        .await
        .expect("status change");

    let product = ctx.backend.product(1).await.expect("product row");
    assert_eq!(product.get("stock").and_then(Value::as_i64), Some(3));
    assert_eq!(product.get("status").and_then(Value::as_str), Some("active"));
    assert_eq!(backend_order_status(&ctx, 50).await, "cancelled");
}

#[tokio::test]
async fn test_counted_to_counted_leaves_stock_alone() {
    let ctx = context_with(
        product_row(1, json!(7), "active"),
        order_row(50, json!(1), 3, "processing"),
    )
    .await;

    change_order_status(&ctx.state, OrderId::new(50), OrderStatus::Shipped)
        .await
        .expect("status change");

    assert_eq!(backend_stock(&ctx, 1).await, Some(7));
    assert_eq!(backend_order_status(&ctx, 50).await, "shipped");
    assert_eq!(ctx.backend.ops().await, vec!["PATCH orders"]);
}

#[tokio::test]
async fn test_cancelled_is_terminal() {
    let ctx = context_with(
        product_row(1, json!(7), "active"),
        order_row(50, json!(1), 3, "cancelled"),
    )
    .await;

    let err = change_order_status(&ctx.state, OrderId::new(50), OrderStatus::Processing)
        .await
        .expect_err("should be rejected");
    assert!(matches!(err, AppError::Validation(_)), "got {err:?}");
    assert!(ctx.backend.ops().await.is_empty());
}

#[tokio::test]
async fn test_counted_order_cannot_return_to_pending() {
    let ctx = context_with(
        product_row(1, json!(7), "active"),
        order_row(50, json!(1), 3, "completed"),
    )
    .await;

    let err = change_order_status(&ctx.state, OrderId::new(50), OrderStatus::Pending)
        .await
        .expect_err("should be rejected");
    assert!(matches!(err, AppError::Validation(_)), "got {err:?}");
}

#[tokio::test]
async fn test_same_status_is_a_noop() {
    let ctx = context_with(
        product_row(1, json!(7), "active"),
        order_row(50, json!(1), 3, "pending"),
    )
    .await;

    change_order_status(&ctx.state, OrderId::new(50), OrderStatus::Pending)
        .await
        .expect("no-op");
    assert!(ctx.backend.ops().await.is_empty());
}

#[tokio::test]
async fn test_unresolvable_product_blocks_deduction() {
    let ctx = TestContext::new().await;
    ctx.backend
        .seed_order(json!({
            "id": 50,
            "customer_name": "Siti",
            "phone": "081234567890",
            "address": "Jl. Melati 5",
            "product_id": 999,
            "quantity": 3,
            "total": 45_000,
            "status": "pending",
        }))
        .await;
    ctx.state
        .cache()
        .refresh_all(ctx.state.supabase())
        .await
        .expect("cache refresh");

    let err = change_order_status(&ctx.state, OrderId::new(50), OrderStatus::Processing)
        .await
        .expect_err("should be rejected");
    assert!(matches!(err, AppError::NotFound(_)), "got {err:?}");
    assert_eq!(backend_order_status(&ctx, 50).await, "pending");
}

#[tokio::test]
async fn test_name_fallback_resolves_product() {
    // older storefront rows carry no product_id, only the name
    let ctx = TestContext::new().await;
    ctx.backend
        .seed_product(product_row(1, json!(10), "active"))
        .await;
    ctx.backend
        .seed_order(json!({
            "id": 50,
            "customer_name": "Siti",
            "phone": "081234567890",
            "address": "Jl. Melati 5",
            "product_name": "Peyek 1",
            "quantity": 4,
            "total": 60_000,
            "status": "pending",
        }))
        .await;
    ctx.state
        .cache()
        .refresh_all(ctx.state.supabase())
        .await
        .expect("cache refresh");

    change_order_status(&ctx.state, OrderId::new(50), OrderStatus::Processing)
        .await
        .expect("status change");
    assert_eq!(backend_stock(&ctx, 1).await, Some(6));
}

#[tokio::test]
async fn test_delete_order_removes_backend_row() {
    let ctx = context_with(
        product_row(1, json!(7), "active"),
        order_row(50, json!(1), 3, "pending"),
    )
    .await;

    delete_order(&ctx.state, OrderId::new(50))
        .await
        .expect("delete");
    assert!(ctx.backend.order(50).await.is_none());
}

#[tokio::test]
async fn test_unusable_totals_count_as_zero_in_revenue() {
    let ctx = TestContext::new().await;
    for (id, total) in [
        (1, json!(45_000)),
        (2, json!("60000")), // numeric string, still counts
        (3, json!("n/a")),   // garbage, tolerated as zero
        (4, Value::Null),
    ] {
        ctx.backend
            .seed_order(json!({
                "id": id,
                "customer_name": "Siti",
                "phone": "081234567890",
                "address": "Jl. Melati 5",
                "quantity": 1,
                "total": total,
                "status": "pending",
            }))
            .await;
    }
    ctx.state
        .cache()
        .refresh_all(ctx.state.supabase())
        .await
        .expect("cache refresh");

    let orders = ctx.state.cache().orders().await;
    assert_eq!(orders.len(), 4);

    let metrics = DashboardMetrics::compute(&[], &orders);
    assert_eq!(metrics.total_revenue, Rupiah::new(105_000));
    assert_eq!(metrics.total_revenue_display, "Rp 105.000");
}
