// Catalog domain models (products and orders)
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub image: String,
    pub price: f64,
    #[serde(default)]
    pub stock: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub date: String,
    pub total: f64,
    pub status: String,
}

/// Products whose name contains `search` case-insensitively, in their
/// input order. An empty search matches everything.
pub fn filter_products(products: &[Product], search: &str) -> Vec<Product> {
    if search.is_empty() {
        return products.to_vec();
    }

    let needle = search.to_lowercase();
    products
        .iter()
        .filter(|p| p.name.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

#[cfg(test)]
pub(crate) fn product(id: &str, name: &str) -> Product {
    Product {
        id: id.to_string(),
        name: name.to_string(),
        image: format!("/images/{}.png", id),
        price: 9.99,
        stock: 10,
    }
}

#[cfg(test)]
pub(crate) fn order(id: &str, total: f64) -> Order {
    Order {
        id: id.to_string(),
        date: "2024-03-01".to_string(),
        total,
        status: "Processing".to_string(),
    }
}
