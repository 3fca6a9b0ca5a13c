// Order count endpoint client
use crate::application::order_count::{CountError, OrderCountSource};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpCountClient {
    client: reqwest::Client,
    url: String,
}

#[derive(Debug, Deserialize)]
struct CountResponse {
    orders_placed: u64,
}

impl HttpCountClient {
    pub fn new(url: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build count endpoint client")?;
        Ok(Self { client, url })
    }
}

#[async_trait]
impl OrderCountSource for HttpCountClient {
    async fn orders_placed(&self, token: &str) -> Result<u64, CountError> {
        let response = self
            .client
            .get(&self.url)
            .header("Authorization", format!("Bearer {}", token))
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(|e| CountError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(CountError::Status(response.status().as_u16()));
        }

        let body = response
            .json::<CountResponse>()
            .await
            .map_err(|e| CountError::Decode(e.to_string()))?;

        Ok(body.orders_placed)
    }
}
