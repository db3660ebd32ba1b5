//! Admin HTTP API tests: session auth, catalog, orders, settings.

use bude_peyek_integration_tests::{ADMIN_EMAIL, ADMIN_PASSWORD, TestContext};
use reqwest::StatusCode;
use serde_json::{Value, json};

fn sample_product(id: i64, stock: i64) -> Value {
    json!({
        "id": id,
        "name": format!("Peyek {id}"),
        "price": 15_000,
        "stock": stock,
        "status": "active",
        "icon": "fa-box",
    })
}

fn sample_order(id: i64, product_id: i64, status: &str) -> Value {
    json!({
        "id": id,
        "customer_name": "Budi",
        "phone": "081234567890",
        "address": "Jl. Kenanga 2",
        "product_id": product_id,
        "product_name": format!("Peyek {product_id}"),
        "quantity": 2,
        "total": 30_000,
        "status": status,
        "created_at": "2025-06-01T08:00:00Z",
    })
}

#[tokio::test]
async fn test_protected_routes_require_a_session() {
    let ctx = TestContext::new().await;

    for path in ["/dashboard", "/products", "/orders", "/settings"] {
        let resp = ctx
            .http
            .get(format!("{}{path}", ctx.admin_url))
            .send()
            .await
            .expect("request");
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "path {path}");
    }
}

#[tokio::test]
async fn test_bad_credentials_are_rejected() {
    let ctx = TestContext::new().await;
    let resp = ctx
        .http
        .post(format!("{}/auth/login", ctx.admin_url))
        .json(&json!({ "email": ADMIN_EMAIL, "password": "salah-total" }))
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_session_info_revalidates_the_hosted_token() {
    let ctx = TestContext::new().await;
    ctx.login().await;

    let resp = ctx
        .http
        .get(format!("{}/auth/session", ctx.admin_url))
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("json body");
    assert_eq!(body.get("email"), Some(&json!(ADMIN_EMAIL)));

    // cookie still set, hosted token gone (e.g. process restart): 401
    ctx.state.supabase().clear_session().await;
    let resp = ctx
        .http
        .get(format!("{}/auth/session", ctx.admin_url))
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_dashboard_summarizes_the_store() {
    let ctx = TestContext::new().await;
    ctx.backend.seed_product(sample_product(1, 5)).await; // low stock
    ctx.backend.seed_product(sample_product(2, 50)).await;
    ctx.backend.seed_order(sample_order(10, 1, "pending")).await;
    ctx.backend.seed_order(sample_order(11, 2, "completed")).await;
    ctx.login().await;

    let resp = ctx
        .http
        .get(format!("{}/dashboard", ctx.admin_url))
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("json body");
    let metrics = body.get("metrics").expect("metrics");
    assert_eq!(metrics.get("active_products"), Some(&json!(2)));
    assert_eq!(metrics.get("total_orders"), Some(&json!(2)));
    assert_eq!(metrics.get("low_stock"), Some(&json!(1)));
    assert_eq!(metrics.get("total_revenue"), Some(&json!(60_000)));
    assert_eq!(
        metrics.get("total_revenue_display"),
        Some(&json!("Rp 60.000"))
    );
    assert_eq!(
        body.get("recent_orders").and_then(Value::as_array).map(Vec::len),
        Some(2)
    );
}

#[tokio::test]
async fn test_order_listing_filters_by_status() {
    let ctx = TestContext::new().await;
    ctx.backend.seed_order(sample_order(10, 1, "pending")).await;
    ctx.backend
        .seed_order(sample_order(11, 1, "processing"))
        .await;
    ctx.backend
        .seed_order(sample_order(12, 1, "processing"))
        .await;
    ctx.login().await;

    let resp = ctx
        .http
        .get(format!("{}/orders?status=processing", ctx.admin_url))
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), StatusCode::OK);

    let orders: Vec<Value> = resp.json().await.expect("json body");
    assert_eq!(orders.len(), 2);
    assert!(
        orders
            .iter()
            .all(|o| o.get("status") == Some(&json!("processing")))
    );
}

#[tokio::test]
async fn test_status_change_over_http_reconciles_stock() {
    let ctx = TestContext::new().await;
    ctx.backend.seed_product(sample_product(1, 10)).await;
    ctx.backend.seed_order(sample_order(10, 1, "pending")).await;
    ctx.login().await;

    let resp = ctx
        .http
        .put(format!("{}/orders/10/status", ctx.admin_url))
        .json(&json!({ "status": "processing" }))
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let product = ctx.backend.product(1).await.expect("product row");
    assert_eq!(product.get("stock"), Some(&json!(8)));
}

#[tokio::test]
async fn test_illegal_transition_is_a_400() {
    let ctx = TestContext::new().await;
    ctx.backend.seed_product(sample_product(1, 10)).await;
    ctx.backend
        .seed_order(sample_order(10, 1, "cancelled"))
        .await;
    ctx.login().await;

    let resp = ctx
        .http
        .put(format!("{}/orders/10/status", ctx.admin_url))
        .json(&json!({ "status": "shipped" }))
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = resp.json().await.expect("json body");
    assert!(body.get("error").is_some());
}

#[tokio::test]
async fn test_whatsapp_link_uses_the_customer_phone() {
    let ctx = TestContext::new().await;
    ctx.backend.seed_order(sample_order(10, 1, "pending")).await;
    ctx.login().await;

    let resp = ctx
        .http
        .get(format!("{}/orders/10/whatsapp", ctx.admin_url))
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("json body");
    let url = body.get("url").and_then(Value::as_str).expect("url");
    assert!(url.starts_with("https://wa.me/6281234567890?text="), "got {url}");
    assert!(url.contains("Budi"));
}

#[tokio::test]
async fn test_whatsapp_link_falls_back_to_store_settings_phone() {
    let ctx = TestContext::new().await;
    let mut order = sample_order(10, 1, "pending");
    if let Some(obj) = order.as_object_mut() {
        obj.insert("phone".to_string(), json!("-"));
    }
    ctx.backend.seed_order(order).await;
    ctx.login().await;

    let resp = ctx
        .http
        .put(format!("{}/settings", ctx.admin_url))
        .json(&json!({
            "store_name": "Bude Peyek",
            "phone": "081111111111",
            "email": "halo@budepeyek.id",
            "address": "Yogyakarta",
        }))
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = ctx
        .http
        .get(format!("{}/orders/10/whatsapp", ctx.admin_url))
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("json body");
    let url = body.get("url").and_then(Value::as_str).expect("url");
    assert!(url.starts_with("https://wa.me/6281111111111?text="), "got {url}");
}

#[tokio::test]
async fn test_settings_reject_an_unusable_phone() {
    let ctx = TestContext::new().await;
    ctx.login().await;

    let resp = ctx
        .http
        .put(format!("{}/settings", ctx.admin_url))
        .json(&json!({
            "store_name": "Bude Peyek",
            "phone": "not-a-number",
            "email": "",
            "address": "",
        }))
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_product_create_via_multipart() {
    let ctx = TestContext::new().await;
    ctx.login().await;

    let form = reqwest::multipart::Form::new()
        .text("name", "Peyek Udang")
        .text("description", "Gurih, renyah")
        .text("price", "18000")
        .text("stock", "25")
        .text("badge", "Baru");
    let resp = ctx
        .http
        .post(format!("{}/products", ctx.admin_url))
        .multipart(form)
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = ctx
        .http
        .get(format!("{}/products", ctx.admin_url))
        .send()
        .await
        .expect("request");
    let products: Vec<Value> = resp.json().await.expect("json body");
    let created = products
        .iter()
        .find(|p| p.get("name") == Some(&json!("Peyek Udang")))
        .expect("created product");
    assert_eq!(created.get("price"), Some(&json!(18_000)));
    assert_eq!(created.get("stock"), Some(&json!(25)));
    assert_eq!(created.get("status"), Some(&json!("active")));
    assert_eq!(created.get("icon"), Some(&json!("fa-box")));
}

#[tokio::test]
async fn test_product_edit_clears_omitted_columns() {
    let ctx = TestContext::new().await;
    ctx.backend
        .seed_product(json!({
            "id": 1,
            "name": "Peyek Kacang",
            "description": "Renyah, gurih",
            "price": 15_000,
            "stock": 10,
            "status": "active",
            "icon": "fa-box",
        }))
        .await;
    ctx.login().await;

    // no stock or description fields: stock becomes untracked, the
    // description is cleared (full-object edit semantics)
    let form = reqwest::multipart::Form::new()
        .text("name", "Peyek Kacang")
        .text("price", "15000");
    let resp = ctx
        .http
        .put(format!("{}/products/1", ctx.admin_url))
        .multipart(form)
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let product = ctx.backend.product(1).await.expect("product row");
    assert_eq!(product.get("stock"), Some(&Value::Null));
    assert_eq!(product.get("description"), Some(&Value::Null));
}

#[tokio::test]
async fn test_order_detail_sees_orders_newer_than_the_cache() {
    let ctx = TestContext::new().await;
    ctx.login().await;
    // arrives after sign-in, so the cached snapshot does not have it yet
    ctx.backend.seed_order(sample_order(10, 1, "pending")).await;

    let resp = ctx
        .http
        .get(format!("{}/orders/10", ctx.admin_url))
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("json body");
    assert_eq!(body.get("id"), Some(&json!(10)));
}

#[tokio::test]
async fn test_bad_product_form_is_a_400() {
    let ctx = TestContext::new().await;
    ctx.login().await;

    // missing price
    let form = reqwest::multipart::Form::new().text("name", "Peyek Tanpa Harga");
    let resp = ctx
        .http
        .post(format!("{}/products", ctx.admin_url))
        .multipart(form)
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_broken_bucket_degrades_to_inline_image() {
    let ctx = TestContext::new().await;
    ctx.backend.set_fail_uploads(true);
    ctx.login().await;

    let image = reqwest::multipart::Part::bytes(vec![0x89, 0x50, 0x4e, 0x47])
        .file_name("foto.png")
        .mime_str("image/png")
        .expect("part");
    let form = reqwest::multipart::Form::new()
        .text("name", "Peyek Teri")
        .text("price", "20000")
        .part("image", image);
    let resp = ctx
        .http
        .post(format!("{}/products", ctx.admin_url))
        .multipart(form)
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = ctx
        .http
        .get(format!("{}/products", ctx.admin_url))
        .send()
        .await
        .expect("request");
    let products: Vec<Value> = resp.json().await.expect("json body");
    let created = products
        .iter()
        .find(|p| p.get("name") == Some(&json!("Peyek Teri")))
        .expect("created product");
    let image_url = created
        .get("image_url")
        .and_then(Value::as_str)
        .expect("image_url");
    assert!(image_url.starts_with("data:image/png;base64,"), "got {image_url}");
}

#[tokio::test]
async fn test_password_change_takes_effect() {
    let ctx = TestContext::new().await;
    ctx.login().await;

    let resp = ctx
        .http
        .post(format!("{}/auth/password", ctx.admin_url))
        .json(&json!({
            "old_password": ADMIN_PASSWORD,
            "new_password": "rahasia-baru",
            "confirm_password": "rahasia-baru",
        }))
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = ctx
        .http
        .post(format!("{}/auth/logout", ctx.admin_url))
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    // the old password no longer works, the new one does
    let resp = ctx
        .http
        .post(format!("{}/auth/login", ctx.admin_url))
        .json(&json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }))
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = ctx
        .http
        .post(format!("{}/auth/login", ctx.admin_url))
        .json(&json!({ "email": ADMIN_EMAIL, "password": "rahasia-baru" }))
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_wrong_old_password_blocks_the_change() {
    let ctx = TestContext::new().await;
    ctx.login().await;

    let resp = ctx
        .http
        .post(format!("{}/auth/password", ctx.admin_url))
        .json(&json!({
            "old_password": "bukan-itu",
            "new_password": "rahasia-baru",
            "confirm_password": "rahasia-baru",
        }))
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
