//! Product route handlers.

use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
};
use bude_peyek_core::ProductId;
use tracing::instrument;

use crate::{
    error::AppError,
    middleware::auth::RequireAdminAuth,
    models::Product,
    services::catalog::{self, ProductInput, UploadedImage},
    state::AppState,
};

/// List all products, refetching the cache first (read-through copy).
#[instrument(skip_all)]
pub async fn index(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<Product>>, AppError> {
    state.cache().refresh_products(state.supabase()).await?;
    Ok(Json(state.cache().products().await))
}

/// Create a product from a multipart form (fields + optional image file).
#[instrument(skip_all)]
pub async fn create(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<StatusCode, AppError> {
    let (input, image) = read_product_form(multipart).await?;
    catalog::create_product(&state, input, image).await?;
    Ok(StatusCode::CREATED)
}

/// Update a product; without a new image the existing one is kept.
#[instrument(skip_all)]
pub async fn update(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> Result<StatusCode, AppError> {
    let (input, image) = read_product_form(multipart).await?;
    catalog::update_product(&state, ProductId::new(id), input, image).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete a product.
#[instrument(skip_all)]
pub async fn delete(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    catalog::delete_product(&state, ProductId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Pull the product fields and the optional image out of a multipart form.
///
/// Text fields: `name`, `description`, `price`, `stock`, `icon`, `badge`.
/// File field: `image`.
async fn read_product_form(
    mut multipart: Multipart,
) -> Result<(ProductInput, Option<UploadedImage>), AppError> {
    let mut input = ProductInput::default();
    let mut image = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("malformed form: {e}")))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == "image" {
            let filename = field.file_name().unwrap_or("upload").to_string();
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("unreadable image: {e}")))?;
            // an empty file input still submits a zero-length part
            if !bytes.is_empty() {
                image = Some(UploadedImage {
                    bytes: bytes.to_vec(),
                    filename,
                    content_type,
                });
            }
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| AppError::Validation(format!("malformed field {name}: {e}")))?;

        match name.as_str() {
            "name" => input.name = value,
            "description" => input.description = non_empty(value),
            "price" => {
                input.price = value.trim().parse().map_err(|_| {
                    AppError::Validation("price must be a whole number of rupiah".into())
                })?;
            }
            "stock" => {
                input.stock = match non_empty(value) {
                    Some(raw) => Some(raw.trim().parse().map_err(|_| {
                        AppError::Validation("stock must be a whole number".into())
                    })?),
                    None => None,
                };
            }
            "icon" => input.icon = non_empty(value),
            "badge" => input.badge = non_empty(value),
            _ => tracing::debug!(field = %name, "ignoring unknown form field"),
        }
    }

    Ok((input, image))
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
