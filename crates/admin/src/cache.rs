//! In-memory catalog and order cache.
//!
//! The panel keeps disposable copies of both remote collections. There is
//! no incremental patching and no local-only state: after every mutation
//! the affected collection is refetched wholesale, and a fresh navigation
//! refetches as well. Two concurrent admin sessions can still race on the
//! backend - last writer wins - but within one process reads always see a
//! complete snapshot.

use tokio::sync::RwLock;
use tracing::instrument;

use bude_peyek_core::ProductId;

use crate::models::{Order, Product};
use crate::supabase::{ORDERS_TABLE, PRODUCTS_TABLE, RemoteError, SupabaseClient};

/// Cached copies of the `products` and `orders` collections.
#[derive(Debug, Default)]
pub struct StoreCache {
    products: RwLock<Vec<Product>>,
    orders: RwLock<Vec<Order>>,
}

impl StoreCache {
    /// Empty cache; call the refresh methods to populate it.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Refetch the whole product list (ordered by id ascending).
    ///
    /// # Errors
    ///
    /// Returns the gateway error; the previous snapshot stays in place.
    #[instrument(skip_all)]
    pub async fn refresh_products(&self, client: &SupabaseClient) -> Result<(), RemoteError> {
        let products = client.list::<Product>(PRODUCTS_TABLE, "id", true).await?;
        tracing::debug!(count = products.len(), "product cache refreshed");
        *self.products.write().await = products;
        Ok(())
    }

    /// Refetch the whole order list (newest first).
    ///
    /// # Errors
    ///
    /// Returns the gateway error; the previous snapshot stays in place.
    #[instrument(skip_all)]
    pub async fn refresh_orders(&self, client: &SupabaseClient) -> Result<(), RemoteError> {
        let orders = client
            .list::<Order>(ORDERS_TABLE, "created_at", false)
            .await?;
        tracing::debug!(count = orders.len(), "order cache refreshed");
        *self.orders.write().await = orders;
        Ok(())
    }

    /// Refetch both collections.
    ///
    /// # Errors
    ///
    /// Returns the first gateway error encountered.
    pub async fn refresh_all(&self, client: &SupabaseClient) -> Result<(), RemoteError> {
        self.refresh_products(client).await?;
        self.refresh_orders(client).await
    }

    /// Snapshot of the cached products.
    pub async fn products(&self) -> Vec<Product> {
        self.products.read().await.clone()
    }

    /// Snapshot of the cached orders.
    pub async fn orders(&self) -> Vec<Order> {
        self.orders.read().await.clone()
    }

    /// Find a cached product by id.
    pub async fn product_by_id(&self, id: ProductId) -> Option<Product> {
        self.products
            .read()
            .await
            .iter()
            .find(|p| p.id == id)
            .cloned()
    }

    /// Find a cached order by id.
    pub async fn order_by_id(&self, id: bude_peyek_core::OrderId) -> Option<Order> {
        self.orders.read().await.iter().find(|o| o.id == id).cloned()
    }

    /// Resolve an order's weak product reference: by id when present,
    /// falling back to an exact name match.
    pub async fn resolve_product(
        &self,
        product_id: Option<ProductId>,
        product_name: Option<&str>,
    ) -> Option<Product> {
        let products = self.products.read().await;

        if let Some(id) = product_id {
            if let Some(product) = products.iter().find(|p| p.id == id) {
                return Some(product.clone());
            }
        }

        product_name.and_then(|name| products.iter().find(|p| p.name == name).cloned())
    }

    /// Replace both snapshots directly (test support).
    #[cfg(test)]
    pub async fn replace(&self, products: Vec<Product>, orders: Vec<Order>) {
        *self.products.write().await = products;
        *self.orders.write().await = orders;
    }
}
