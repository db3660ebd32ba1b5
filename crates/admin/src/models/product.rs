//! Product rows of the remote `products` table.

use bude_peyek_core::{ProductId, ProductStatus, Rupiah};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A product as stored in the remote `products` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Server-assigned id.
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Whole-rupiah price.
    pub price: Rupiah,
    /// Units on hand; `None` means stock is not tracked for this product.
    #[serde(default)]
    pub stock: Option<i64>,
    #[serde(default)]
    pub status: ProductStatus,
    /// Optional marketing label ("Terlaris", "Baru", ...).
    #[serde(default)]
    pub badge: Option<String>,
    /// Font Awesome icon name shown when there is no image.
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Whether stock is tracked and within the low-stock band (`0 < stock
    /// <= threshold`). A product at exactly zero is out of stock, not low.
    #[must_use]
    pub fn is_low_stock(&self, threshold: i64) -> bool {
        self.stock.is_some_and(|s| s > 0 && s <= threshold)
    }

    /// Whether stock is tracked and exhausted.
    #[must_use]
    pub fn is_out_of_stock(&self) -> bool {
        self.stock.is_some_and(|s| s <= 0)
    }
}

/// A product to insert; omits the server-assigned columns.
#[derive(Debug, Clone, Serialize)]
pub struct NewProduct {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: Rupiah,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
    pub status: ProductStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    pub icon: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// A partial product update; only set fields are sent, and the remote
/// server merges them into the row.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProductPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// `Some(None)` clears the description; `None` leaves it untouched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Rupiah>,
    /// `Some(None)` makes the stock untracked; `None` leaves it untouched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<Option<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ProductStatus>,
    /// `Some(None)` clears the badge; `None` leaves it untouched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}
