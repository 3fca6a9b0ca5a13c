// Order count source trait - authenticated count endpoint
use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CountError {
    #[error("authentication token not found, please log in again")]
    MissingToken,
    #[error("count request could not be sent: {0}")]
    Transport(String),
    #[error("count request failed with status {0}")]
    Status(u16),
    #[error("count response could not be decoded: {0}")]
    Decode(String),
}

#[async_trait]
pub trait OrderCountSource: Send + Sync {
    /// Number of orders placed, as reported by the backend
    async fn orders_placed(&self, token: &str) -> Result<u64, CountError>;
}
