//! Status enums for products and orders.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Product availability status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    /// Listed on the storefront.
    #[default]
    Active,
    /// Hidden from the storefront (e.g., sold out).
    Inactive,
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => f.write_str("active"),
            Self::Inactive => f.write_str("inactive"),
        }
    }
}

/// Order fulfillment status.
///
/// The interesting property for inventory purposes is not the individual
/// value but whether a status *counts against stock*: an order that is being
/// processed, has shipped, or is completed holds its quantity reserved;
/// a pending or cancelled order does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Received but not yet confirmed by the operator.
    #[default]
    Pending,
    /// Confirmed and being prepared.
    Processing,
    /// Handed to the courier.
    Shipped,
    /// Delivered and done.
    Completed,
    /// Cancelled; any reserved stock is released.
    Cancelled,
}

impl OrderStatus {
    /// Whether this status reserves the order's quantity against product
    /// stock.
    #[must_use]
    pub const fn is_stock_counted(&self) -> bool {
        matches!(self, Self::Processing | Self::Shipped | Self::Completed)
    }

    /// Whether an operator may move an order from `self` to `to`.
    ///
    /// Pending orders may move anywhere. Processing, shipped, and completed
    /// orders move freely among themselves and to cancelled. Cancelled is
    /// terminal. A same-status "transition" is allowed and treated as a
    /// no-op by the reconciliation workflow.
    #[must_use]
    pub const fn can_transition_to(&self, to: Self) -> bool {
        match (self, to) {
            (Self::Pending, _) => true,
            (Self::Cancelled, to) => matches!(to, Self::Cancelled),
            (
                Self::Processing | Self::Shipped | Self::Completed,
                Self::Processing | Self::Shipped | Self::Completed | Self::Cancelled,
            ) => true,
            _ => false,
        }
    }

    /// All status values, in workflow order.
    #[must_use]
    pub const fn all() -> [Self; 5] {
        [
            Self::Pending,
            Self::Processing,
            Self::Shipped,
            Self::Completed,
            Self::Cancelled,
        ]
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => f.write_str("pending"),
            Self::Processing => f.write_str("processing"),
            Self::Shipped => f.write_str("shipped"),
            Self::Completed => f.write_str("completed"),
            Self::Cancelled => f.write_str("cancelled"),
        }
    }
}
