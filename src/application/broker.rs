// Broker traits - subscription side of a publish/subscribe relay
use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq)]
pub enum BrokerEvent {
    /// The broker acknowledged the connection
    Connected,
    Message { topic: String, payload: Vec<u8> },
    Error(String),
    /// The broker closed the connection
    Closed,
}

#[async_trait]
pub trait BrokerConnector: Send + Sync {
    async fn connect(&self) -> anyhow::Result<Box<dyn BrokerSession>>;
}

#[async_trait]
pub trait BrokerSession: Send {
    async fn subscribe(&mut self, topic: &str) -> anyhow::Result<()>;

    /// Next event from the connection; `None` once the session is over
    async fn next_event(&mut self) -> Option<BrokerEvent>;

    async fn close(&mut self);
}
