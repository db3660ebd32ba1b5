//! WhatsApp deep links for contacting customers about their orders.

use bude_peyek_core::Phone;

use crate::error::AppError;
use crate::models::Order;

/// Build a `wa.me` deep link for an order, with a pre-filled message.
///
/// Uses the order's phone number normalized to the international `62`
/// prefix, falling back to `fallback_phone` (the store's own number from
/// settings or configuration) when the order's number is unusable.
///
/// # Errors
///
/// Returns [`AppError::Validation`] when neither number is usable.
pub fn order_link(order: &Order, fallback_phone: Option<&Phone>) -> Result<String, AppError> {
    let phone = match Phone::parse(&order.phone) {
        Ok(phone) => phone,
        Err(e) => fallback_phone.cloned().ok_or_else(|| {
            AppError::Validation(format!(
                "order {} has no usable phone number ({e}) and no store fallback is configured",
                order.id
            ))
        })?,
    };

    Ok(format!(
        "https://wa.me/{}?text={}",
        phone.as_str(),
        urlencoding::encode(&order_message(order))
    ))
}

/// The pre-filled message for an order.
fn order_message(order: &Order) -> String {
    let product = order.product_name.as_deref().unwrap_or("pesanan Anda");
    format!(
        "Halo {}, ini Bude Peyek. Pesanan #{} ({} x{}, total {}) sedang kami proses. Terima kasih!",
        order.customer_name,
        order.id,
        product,
        order.quantity,
        order.total_or_zero().display(),
    )
}
