// Dashboard domain model
use super::catalog::{Order, Product};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_orders: u64,
    pub total_spent: f64,
}

/// Sum of order totals over the currently cached orders.
pub fn total_spent(orders: &[Order]) -> f64 {
    orders.iter().map(|o| o.total).sum()
}

/// Rendered state of the dashboard view.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Dashboard {
    pub search: String,
    pub stats: DashboardStats,
    pub total_spent_display: String,
    pub active_orders: usize,
    pub products: Vec<Product>,
    pub recent_orders: Vec<Order>,
}

impl Dashboard {
    pub fn new(
        search: String,
        stats: DashboardStats,
        products: Vec<Product>,
        orders: Vec<Order>,
    ) -> Self {
        Self {
            search,
            stats,
            total_spent_display: format!("${:.2}", stats.total_spent),
            active_orders: orders.len(),
            products,
            recent_orders: orders,
        }
    }
}
