// Navigation menu domain model
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavLink {
    pub title: String,
    pub href: String,
}

impl NavLink {
    pub fn new(title: &str, href: &str) -> Self {
        Self {
            title: title.to_string(),
            href: href.to_string(),
        }
    }
}

/// Manufacturer menu, in display order.
pub fn manufacturer_links() -> Vec<NavLink> {
    vec![
        NavLink::new("Dashboard", "/manufacturer"),
        NavLink::new("Accounting", "/manufacturer/accounting"),
        NavLink::new("StockCount", "/manufacturer/stockCount"),
        NavLink::new("Profile", "/manufacturer/profile"),
        NavLink::new("Configuration", "/manufacturer/configuration"),
    ]
}
