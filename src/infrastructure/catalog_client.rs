// HTTP catalog provider - caches the backend's product and order listings
use crate::application::catalog_provider::CatalogProvider;
use crate::application::credential_store::{CredentialStore, ACCESS_TOKEN_KEY};
use crate::domain::catalog::{Order, Product};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

pub struct HttpCatalogProvider {
    client: reqwest::Client,
    stock_url: String,
    orders_url: String,
    credentials: Arc<dyn CredentialStore>,
    products: RwLock<Vec<Product>>,
    orders: RwLock<Vec<Order>>,
}

impl HttpCatalogProvider {
    pub fn new(
        stock_url: String,
        orders_url: String,
        timeout: Duration,
        credentials: Arc<dyn CredentialStore>,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build catalog client")?;

        Ok(Self {
            client,
            stock_url,
            orders_url,
            credentials,
            products: RwLock::new(Vec::new()),
            orders: RwLock::new(Vec::new()),
        })
    }

    async fn fetch_list<T: DeserializeOwned>(&self, url: &str) -> Result<Vec<T>> {
        let mut request = self.client.get(url).header("Accept", "application/json");
        if let Some(token) = self.credentials.get(ACCESS_TOKEN_KEY) {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", url))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Catalog request to {} failed with status {}: {}", url, status, body);
        }

        response
            .json::<Vec<T>>()
            .await
            .with_context(|| format!("Failed to parse response from {}", url))
    }
}

fn replace<T>(cache: &RwLock<Vec<T>>, items: Vec<T>) {
    *cache.write().unwrap_or_else(PoisonError::into_inner) = items;
}

fn read<T: Clone>(cache: &RwLock<Vec<T>>) -> Vec<T> {
    cache.read().unwrap_or_else(PoisonError::into_inner).clone()
}

#[async_trait]
impl CatalogProvider for HttpCatalogProvider {
    async fn refresh_stock(&self) -> Result<()> {
        let products: Vec<Product> = self.fetch_list(&self.stock_url).await?;
        tracing::debug!(count = products.len(), "refreshed product cache");
        replace(&self.products, products);
        Ok(())
    }

    async fn refresh_orders(&self) -> Result<()> {
        let orders: Vec<Order> = self.fetch_list(&self.orders_url).await?;
        tracing::debug!(count = orders.len(), "refreshed order cache");
        replace(&self.orders, orders);
        Ok(())
    }

    fn products(&self) -> Vec<Product> {
        read(&self.products)
    }

    fn orders(&self) -> Vec<Order> {
        read(&self.orders)
    }
}
