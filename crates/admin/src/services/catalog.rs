//! Product catalog management.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use bude_peyek_core::{ProductId, ProductStatus, Rupiah};
use chrono::Utc;
use tracing::instrument;

use crate::error::AppError;
use crate::models::{NewProduct, ProductPatch};
use crate::state::AppState;
use crate::supabase::{PRODUCT_IMAGES_BUCKET, PRODUCTS_TABLE};

/// Default Font Awesome icon for products without one.
const DEFAULT_ICON: &str = "fa-box";

/// Validated form fields for creating or updating a product.
#[derive(Debug, Clone, Default)]
pub struct ProductInput {
    pub name: String,
    pub description: Option<String>,
    /// Whole rupiah.
    pub price: i64,
    /// `None` leaves stock untracked.
    pub stock: Option<i64>,
    pub icon: Option<String>,
    pub badge: Option<String>,
}

impl ProductInput {
    /// Client-side validation, run before any remote call.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] on a missing name, non-positive
    /// price, or negative stock.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("product name is required".into()));
        }
        if self.price <= 0 {
            return Err(AppError::Validation("price must be positive".into()));
        }
        if let Some(stock) = self.stock {
            if stock < 0 {
                return Err(AppError::Validation("stock cannot be negative".into()));
            }
        }
        Ok(())
    }
}

/// An image file received from the operator's form.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub content_type: String,
}

/// Create a product, uploading its image first when one was attached.
///
/// # Errors
///
/// Returns a validation error before any remote call, or the gateway
/// error from the insert. An image *upload* failure is not an error: the
/// image is embedded inline instead (degraded mode).
#[instrument(skip(state, image), fields(name = %input.name))]
pub async fn create_product(
    state: &AppState,
    input: ProductInput,
    image: Option<UploadedImage>,
) -> Result<(), AppError> {
    input.validate()?;

    let image_url = match image {
        Some(image) => Some(upload_or_inline(state, image).await),
        None => None,
    };

    let record = NewProduct {
        name: input.name.trim().to_string(),
        description: input.description,
        price: Rupiah::new(input.price),
        stock: input.stock,
        status: ProductStatus::Active,
        badge: input.badge,
        icon: input.icon.unwrap_or_else(|| DEFAULT_ICON.to_string()),
        image_url,
    };

    state.supabase().insert(PRODUCTS_TABLE, &record).await?;
    tracing::info!(name = %record.name, "product created");

    state.cache().refresh_products(state.supabase()).await?;
    Ok(())
}

/// Update a product. Without a new image the existing `image_url` is kept.
///
/// # Errors
///
/// Returns a validation error, [`AppError::NotFound`] for an id absent
/// from the cache, or the gateway error from the update.
#[instrument(skip(state, image), fields(%id))]
pub async fn update_product(
    state: &AppState,
    id: ProductId,
    input: ProductInput,
    image: Option<UploadedImage>,
) -> Result<(), AppError> {
    input.validate()?;

    let existing = state
        .cache()
        .product_by_id(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    let image_url = match image {
        Some(image) => Some(upload_or_inline(state, image).await),
        None => existing.image_url,
    };

    // Full-object edit semantics: an empty form field clears the column
    // (description, badge) or makes the stock untracked.
    let patch = ProductPatch {
        name: Some(input.name.trim().to_string()),
        description: Some(input.description),
        price: Some(Rupiah::new(input.price)),
        stock: Some(input.stock),
        badge: Some(input.badge),
        icon: Some(input.icon.unwrap_or_else(|| DEFAULT_ICON.to_string())),
        image_url,
        updated_at: Some(Utc::now()),
        ..Default::default()
    };

    state.supabase().update(PRODUCTS_TABLE, id.as_i64(), &patch).await?;
    tracing::info!(%id, "product updated");

    state.cache().refresh_products(state.supabase()).await?;
    Ok(())
}

/// Delete a product and refresh the product cache.
///
/// # Errors
///
/// Returns the gateway error on remote failure.
#[instrument(skip(state))]
pub async fn delete_product(state: &AppState, id: ProductId) -> Result<(), AppError> {
    state.supabase().delete(PRODUCTS_TABLE, id.as_i64()).await?;
    tracing::info!(%id, "product deleted");
    state.cache().refresh_products(state.supabase()).await?;
    Ok(())
}

/// Upload the image to the bucket, or fall back to an inline data URL when
/// the blob store rejects it. The fallback is a deliberate degraded-mode
/// contract: a broken bucket must not block catalog edits.
async fn upload_or_inline(state: &AppState, image: UploadedImage) -> String {
    let result = state
        .supabase()
        .upload_blob(
            PRODUCT_IMAGES_BUCKET,
            image.bytes.clone(),
            &image.filename,
            &image.content_type,
        )
        .await;

    match result {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!(error = %e, "image upload failed, embedding inline");
            format!(
                "data:{};base64,{}",
                image.content_type,
                BASE64_STANDARD.encode(&image.bytes)
            )
        }
    }
}
