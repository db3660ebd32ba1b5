//! Order rows of the remote `orders` table.

use bude_peyek_core::{OrderId, OrderStatus, ProductId, Rupiah};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// An order as stored in the remote `orders` table.
///
/// The product reference is weak: `product_id` may be null on rows written
/// by older storefront variants, which only recorded the denormalized
/// `product_name`. Resolution is id-first with an exact-name fallback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Server-assigned id.
    pub id: OrderId,
    pub customer_name: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    pub address: String,
    #[serde(default)]
    pub product_id: Option<ProductId>,
    #[serde(default)]
    pub product_name: Option<String>,
    pub quantity: i64,
    /// Taken as persisted; the panel never recomputes `price * quantity`.
    /// Missing or non-numeric totals count as zero in aggregations.
    #[serde(default, deserialize_with = "lenient_total")]
    pub total: Option<Rupiah>,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Order {
    /// The total used in revenue aggregation (missing counts as zero).
    #[must_use]
    pub fn total_or_zero(&self) -> Rupiah {
        self.total.unwrap_or(Rupiah::ZERO)
    }
}

/// Patch that moves an order to a new status.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct OrderStatusPatch {
    pub status: OrderStatus,
}

/// Accept number, numeric string, null, or garbage for `total`; anything
/// unusable becomes `None` rather than failing the whole row.
fn lenient_total<'de, D>(deserializer: D) -> Result<Option<Rupiah>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let total = match value {
        serde_json::Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .map(Rupiah::new),
        serde_json::Value::String(s) => s.trim().parse::<i64>().ok().map(Rupiah::new),
        _ => None,
    };
    Ok(total)
}
