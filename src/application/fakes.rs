// In-memory substitutes for the external collaborators, used by tests
use crate::application::broker::{BrokerConnector, BrokerEvent, BrokerSession};
use crate::application::catalog_provider::CatalogProvider;
use crate::application::order_count::{CountError, OrderCountSource};
use crate::domain::catalog::{Order, Product};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// Catalog whose refreshes copy the "upstream" collections into the cache.
pub struct FakeCatalog {
    upstream: Mutex<(Vec<Product>, Vec<Order>)>,
    cache: Mutex<(Vec<Product>, Vec<Order>)>,
    failing: AtomicBool,
}

impl FakeCatalog {
    pub fn new(products: Vec<Product>, orders: Vec<Order>) -> Self {
        Self {
            upstream: Mutex::new((products.clone(), orders.clone())),
            cache: Mutex::new((products, orders)),
            failing: AtomicBool::new(false),
        }
    }

    pub fn set_products(&self, products: Vec<Product>) {
        self.upstream.lock().unwrap().0 = products;
    }

    pub fn set_orders(&self, orders: Vec<Order>) {
        self.upstream.lock().unwrap().1 = orders;
    }

    pub fn fail_refreshes(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl CatalogProvider for FakeCatalog {
    async fn refresh_stock(&self) -> anyhow::Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            anyhow::bail!("stock endpoint unavailable");
        }
        let products = self.upstream.lock().unwrap().0.clone();
        self.cache.lock().unwrap().0 = products;
        Ok(())
    }

    async fn refresh_orders(&self) -> anyhow::Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            anyhow::bail!("orders endpoint unavailable");
        }
        let orders = self.upstream.lock().unwrap().1.clone();
        self.cache.lock().unwrap().1 = orders;
        Ok(())
    }

    fn products(&self) -> Vec<Product> {
        self.cache.lock().unwrap().0.clone()
    }

    fn orders(&self) -> Vec<Order> {
        self.cache.lock().unwrap().1.clone()
    }
}

/// Count source returning a canned result and recording the tokens it saw.
pub struct FakeCountSource {
    result: Mutex<Result<u64, CountError>>,
    tokens: Mutex<Vec<String>>,
}

impl FakeCountSource {
    pub fn new(result: Result<u64, CountError>) -> Self {
        Self {
            result: Mutex::new(result),
            tokens: Mutex::new(Vec::new()),
        }
    }

    pub fn respond_with(&self, result: Result<u64, CountError>) {
        *self.result.lock().unwrap() = result;
    }

    pub fn tokens(&self) -> Vec<String> {
        self.tokens.lock().unwrap().clone()
    }
}

#[async_trait]
impl OrderCountSource for FakeCountSource {
    async fn orders_placed(&self, token: &str) -> Result<u64, CountError> {
        self.tokens.lock().unwrap().push(token.to_string());
        self.result.lock().unwrap().clone()
    }
}

/// Broker whose sessions are fed from channels held by the test.
#[derive(Clone, Default)]
pub struct FakeBroker {
    sessions: Arc<Mutex<VecDeque<mpsc::UnboundedReceiver<BrokerEvent>>>>,
    log: Arc<Mutex<Vec<String>>>,
}

impl FakeBroker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a session for the next `connect` call and return its feed.
    pub fn session(&self) -> mpsc::UnboundedSender<BrokerEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.sessions.lock().unwrap().push_back(rx);
        tx
    }

    /// Calls seen by the broker, in order (`connect`, `subscribe:<topic>`, `close`).
    pub fn log(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    fn record(&self, entry: String) {
        self.log.lock().unwrap().push(entry);
    }
}

#[async_trait]
impl BrokerConnector for FakeBroker {
    async fn connect(&self) -> anyhow::Result<Box<dyn BrokerSession>> {
        self.record("connect".to_string());
        let events = self.sessions.lock().unwrap().pop_front();
        match events {
            Some(events) => Ok(Box::new(FakeSession {
                events,
                broker: self.clone(),
            })),
            None => anyhow::bail!("connection refused"),
        }
    }
}

struct FakeSession {
    events: mpsc::UnboundedReceiver<BrokerEvent>,
    broker: FakeBroker,
}

#[async_trait]
impl BrokerSession for FakeSession {
    async fn subscribe(&mut self, topic: &str) -> anyhow::Result<()> {
        self.broker.record(format!("subscribe:{}", topic));
        Ok(())
    }

    async fn next_event(&mut self) -> Option<BrokerEvent> {
        self.events.recv().await
    }

    async fn close(&mut self) {
        self.broker.record("close".to_string());
        self.events.close();
    }
}
