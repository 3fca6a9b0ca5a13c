// Alert feed service - Live box damage alerts from the anomalies topic
use crate::application::broker::{BrokerConnector, BrokerEvent, BrokerSession};
use crate::application::view_state::ViewState;
use crate::domain::anomaly::AnomalyMessage;
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{oneshot, watch, Mutex};
use tokio::task::JoinHandle;

pub const ANOMALY_TOPIC: &str = "manufacturing/anomalies";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedState {
    Disconnected,
    Connecting,
    Subscribed,
}

/// Writes one subscription's results into the feed's view state. Once
/// closed, nothing it receives reaches the view any more.
#[derive(Clone)]
pub struct AlertSink {
    alert: ViewState<Option<String>>,
    state: ViewState<FeedState>,
    closed: Arc<AtomicBool>,
}

impl AlertSink {
    fn new(alert: ViewState<Option<String>>, state: ViewState<FeedState>) -> Self {
        Self {
            alert,
            state,
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn apply_payload(&self, payload: &[u8]) {
        if self.is_closed() {
            tracing::debug!("dropping anomaly message received after close");
            return;
        }

        match AnomalyMessage::parse(payload) {
            Ok(message) => match message.alert() {
                Some(damage) => {
                    tracing::info!(damage, "box damage reported");
                    self.alert.set(Some(damage.to_string()));
                }
                None => tracing::debug!("ignoring anomaly message without damage"),
            },
            Err(e) => tracing::error!(error = %e, "error parsing anomaly message"),
        }
    }

    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn set_state(&self, state: FeedState) {
        self.state.set(state);
    }
}

/// Handle to a running subscription. Closing it (or dropping it) releases
/// the broker connection.
pub struct AlertSubscription {
    sink: AlertSink,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl AlertSubscription {
    /// Request teardown and wait for the connection to be released.
    pub async fn close(mut self) {
        self.signal_close();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::error!(error = %e, "alert subscription task failed");
            }
        }
    }

    fn signal_close(&mut self) {
        self.sink.close();
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

impl Drop for AlertSubscription {
    fn drop(&mut self) {
        self.signal_close();
    }
}

#[derive(Clone)]
pub struct AlertFeedService {
    connector: Arc<dyn BrokerConnector>,
    topic: String,
    alert: ViewState<Option<String>>,
    state: ViewState<FeedState>,
    active: Arc<Mutex<Option<AlertSubscription>>>,
}

impl AlertFeedService {
    pub fn new(connector: Arc<dyn BrokerConnector>, topic: String) -> Self {
        Self {
            connector,
            topic,
            alert: ViewState::new(None),
            state: ViewState::new(FeedState::Disconnected),
            active: Arc::new(Mutex::new(None)),
        }
    }

    /// Open a new subscription, closing the current one first.
    pub async fn activate(&self) {
        let mut active = self.active.lock().await;
        if let Some(previous) = active.take() {
            previous.close().await;
        }
        *active = Some(self.spawn_subscription());
    }

    pub async fn deactivate(&self) {
        let mut active = self.active.lock().await;
        if let Some(subscription) = active.take() {
            subscription.close().await;
            tracing::info!(topic = %self.topic, "alert feed deactivated");
        }
    }

    pub fn latest_alert(&self) -> Option<String> {
        self.alert.get()
    }

    pub fn state(&self) -> FeedState {
        self.state.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.alert.subscribe()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<FeedState> {
        self.state.subscribe()
    }

    fn spawn_subscription(&self) -> AlertSubscription {
        let sink = AlertSink::new(self.alert.clone(), self.state.clone());
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let task = tokio::spawn(run_subscription(
            self.connector.clone(),
            self.topic.clone(),
            sink.clone(),
            shutdown_rx,
        ));

        AlertSubscription {
            sink,
            shutdown: Some(shutdown_tx),
            task: Some(task),
        }
    }
}

async fn run_subscription(
    connector: Arc<dyn BrokerConnector>,
    topic: String,
    sink: AlertSink,
    mut shutdown: oneshot::Receiver<()>,
) {
    sink.set_state(FeedState::Connecting);

    let connected = tokio::select! {
        _ = &mut shutdown => None,
        result = connector.connect() => match result {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::error!(error = %e, "broker connection error");
                None
            }
        },
    };
    let Some(mut session) = connected else {
        sink.set_state(FeedState::Disconnected);
        return;
    };

    drive_session(&mut session, &topic, &sink, &mut shutdown).await;

    sink.close();
    session.close().await;
    sink.set_state(FeedState::Disconnected);
    tracing::info!(topic = %topic, "broker connection closed");
}

async fn drive_session(
    session: &mut Box<dyn BrokerSession>,
    topic: &str,
    sink: &AlertSink,
    shutdown: &mut oneshot::Receiver<()>,
) {
    let mut subscribed = false;

    loop {
        let event = tokio::select! {
            _ = &mut *shutdown => return,
            event = session.next_event() => event,
        };

        match event {
            Some(BrokerEvent::Connected) => {
                tracing::info!("connected to broker");
                match session.subscribe(topic).await {
                    Ok(()) => {
                        subscribed = true;
                        sink.set_state(FeedState::Subscribed);
                        tracing::info!(topic, "subscribed to anomalies topic");
                    }
                    Err(e) => {
                        tracing::error!(error = %e, topic, "subscribe failed");
                        if !subscribed {
                            return;
                        }
                    }
                }
            }
            Some(BrokerEvent::Message { topic: from, payload }) => {
                if from == topic {
                    sink.apply_payload(&payload);
                } else {
                    tracing::debug!(topic = %from, "ignoring message from unexpected topic");
                }
            }
            Some(BrokerEvent::Error(e)) => {
                tracing::error!(error = %e, "broker connection error");
                // before the first subscription an error ends this instance
                if !subscribed {
                    return;
                }
            }
            Some(BrokerEvent::Closed) | None => return,
        }
    }
}
