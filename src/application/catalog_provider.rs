// Catalog provider trait - shared product/order cache owned outside the views
use crate::domain::catalog::{Order, Product};
use async_trait::async_trait;

#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Reload the product/stock cache
    async fn refresh_stock(&self) -> anyhow::Result<()>;

    /// Reload the order cache
    async fn refresh_orders(&self) -> anyhow::Result<()>;

    /// Currently cached products, in provider order
    fn products(&self) -> Vec<Product>;

    /// Currently cached orders, in provider order
    fn orders(&self) -> Vec<Order>;
}
