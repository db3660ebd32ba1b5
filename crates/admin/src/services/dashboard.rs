//! Dashboard summary metrics.

use bude_peyek_core::Rupiah;
use serde::Serialize;

use crate::models::{Order, Product};

/// Products at or below this many units are highlighted as low stock.
pub const LOW_STOCK_THRESHOLD: i64 = 10;

/// How many entries the dashboard panels show.
const PANEL_SIZE: usize = 5;

/// Summary numbers for the dashboard cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardMetrics {
    /// Products with status `active`.
    pub active_products: usize,
    /// All fetched orders, regardless of status.
    pub total_orders: usize,
    /// Products with `0 < stock <= LOW_STOCK_THRESHOLD`.
    pub low_stock: usize,
    /// Products with tracked stock at zero.
    pub out_of_stock: usize,
    /// Sum of order totals; missing totals count as zero.
    pub total_revenue: Rupiah,
    /// Human-readable revenue (e.g., `Rp 1.250.000`).
    pub total_revenue_display: String,
}

impl DashboardMetrics {
    /// Compute the metrics from cache snapshots.
    #[must_use]
    pub fn compute(products: &[Product], orders: &[Order]) -> Self {
        let total_revenue: Rupiah = orders.iter().map(Order::total_or_zero).sum();

        Self {
            active_products: products
                .iter()
                .filter(|p| p.status == bude_peyek_core::ProductStatus::Active)
                .count(),
            total_orders: orders.len(),
            low_stock: products
                .iter()
                .filter(|p| p.is_low_stock(LOW_STOCK_THRESHOLD))
                .count(),
            out_of_stock: products.iter().filter(|p| p.is_out_of_stock()).count(),
            total_revenue,
            total_revenue_display: total_revenue.display(),
        }
    }
}

/// The first few active products, for the "top products" panel.
#[must_use]
pub fn top_products(products: &[Product]) -> Vec<Product> {
    products
        .iter()
        .filter(|p| p.status == bude_peyek_core::ProductStatus::Active)
        .take(PANEL_SIZE)
        .cloned()
        .collect()
}

/// The most recent orders (the cache is already newest-first).
#[must_use]
pub fn recent_orders(orders: &[Order]) -> Vec<Order> {
    orders.iter().take(PANEL_SIZE).cloned().collect()
}

#[cfg(test)]
mod tests {
    use bude_peyek_core::{OrderId, OrderStatus, ProductId, ProductStatus};

    use super::*;

    fn product(id: i64, stock: Option<i64>, status: ProductStatus) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Peyek {id}"),
            description: None,
            price: Rupiah::new(15_000),
            stock,
            status,
            badge: None,
            icon: None,
            image_url: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn order(id: i64, total: Option<i64>) -> Order {
        Order {
            id: OrderId::new(id),
            customer_name: "Siti".to_string(),
            phone: "081234567890".to_string(),
            email: None,
            address: "Jl. Melati 5".to_string(),
            product_id: None,
            product_name: None,
            quantity: 1,
            total: total.map(Rupiah::new),
            status: OrderStatus::Pending,
            notes: None,
            created_at: None,
        }
    }

    #[test]
    fn test_low_stock_excludes_zero_and_untracked() {
        let products = vec![
            product(1, Some(5), ProductStatus::Active),  // low
            product(2, Some(10), ProductStatus::Active), // low (boundary)
            product(3, Some(11), ProductStatus::Active), // fine
            product(4, Some(0), ProductStatus::Inactive), // out of stock, not low
            product(5, None, ProductStatus::Active),     // untracked
        ];
        let metrics = DashboardMetrics::compute(&products, &[]);
        assert_eq!(metrics.low_stock, 2);
        assert_eq!(metrics.out_of_stock, 1);
        assert_eq!(metrics.active_products, 4);
    }

    #[test]
    fn test_revenue_sums_with_missing_as_zero() {
        let orders = vec![
            order(1, Some(45_000)),
            order(2, None),
            order(3, Some(60_000)),
        ];
        let metrics = DashboardMetrics::compute(&[], &orders);
        assert_eq!(metrics.total_orders, 3);
        assert_eq!(metrics.total_revenue, Rupiah::new(105_000));
        assert_eq!(metrics.total_revenue_display, "Rp 105.000");
    }

    #[test]
    fn test_panels_truncate_to_five() {
        let products: Vec<Product> = (1..=8)
            .map(|i| product(i, Some(5), ProductStatus::Active))
            .collect();
        let orders: Vec<Order> = (1..=7).map(|i| order(i, Some(1_000))).collect();

        assert_eq!(top_products(&products).len(), 5);
        assert_eq!(recent_orders(&orders).len(), 5);
    }

    #[test]
    fn test_top_products_skips_inactive() {
        let products = vec![
            product(1, Some(5), ProductStatus::Inactive),
            product(2, Some(5), ProductStatus::Active),
        ];
        let top = top_products(&products);
        assert_eq!(top.len(), 1);
        assert_eq!(top.first().map(|p| p.id), Some(ProductId::new(2)));
    }
}
