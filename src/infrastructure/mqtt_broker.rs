// MQTT broker adapter on top of rumqttc
use crate::application::broker::{BrokerConnector, BrokerEvent, BrokerSession};
use crate::infrastructure::config::BrokerSettings;
use anyhow::Result;
use async_trait::async_trait;
use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Outgoing, Packet, QoS};
use std::time::Duration;

const REQUEST_CHANNEL_CAPACITY: usize = 10;
const DISCONNECT_TIMEOUT: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct MqttConnector {
    host: String,
    port: u16,
    client_id: String,
    keep_alive: Duration,
    reconnect_delay: Duration,
}

impl MqttConnector {
    pub fn new(settings: &BrokerSettings) -> Self {
        Self {
            host: settings.host.clone(),
            port: settings.port,
            // ids must be unique per broker or connections evict each other
            client_id: format!("{}-{}", settings.client_id, std::process::id()),
            keep_alive: settings.keep_alive(),
            reconnect_delay: settings.reconnect_delay(),
        }
    }
}

#[async_trait]
impl BrokerConnector for MqttConnector {
    async fn connect(&self) -> Result<Box<dyn BrokerSession>> {
        let mut options = MqttOptions::new(self.client_id.clone(), self.host.clone(), self.port);
        options.set_keep_alive(self.keep_alive);

        let (client, eventloop) = AsyncClient::new(options, REQUEST_CHANNEL_CAPACITY);
        tracing::info!(host = %self.host, port = self.port, "connecting to MQTT broker");

        Ok(Box::new(MqttSession {
            client,
            eventloop,
            reconnect_delay: self.reconnect_delay,
            pause_before_poll: false,
            closed: false,
        }))
    }
}

/// The connection itself is opened lazily by the first poll of the event
/// loop; a poll after an error makes rumqttc reconnect.
pub struct MqttSession {
    client: AsyncClient,
    eventloop: EventLoop,
    reconnect_delay: Duration,
    pause_before_poll: bool,
    closed: bool,
}

#[async_trait]
impl BrokerSession for MqttSession {
    async fn subscribe(&mut self, topic: &str) -> Result<()> {
        self.client.subscribe(topic, QoS::AtMostOnce).await?;
        Ok(())
    }

    async fn next_event(&mut self) -> Option<BrokerEvent> {
        if self.closed {
            return None;
        }
        if self.pause_before_poll {
            self.pause_before_poll = false;
            tokio::time::sleep(self.reconnect_delay).await;
        }

        loop {
            match self.eventloop.poll().await {
                Ok(Event::Incoming(Packet::ConnAck(_))) => return Some(BrokerEvent::Connected),
                Ok(Event::Incoming(Packet::Publish(publish))) => {
                    return Some(BrokerEvent::Message {
                        topic: publish.topic,
                        payload: publish.payload.to_vec(),
                    });
                }
                Ok(Event::Incoming(Packet::SubAck(ack))) => {
                    tracing::debug!(pkid = ack.pkid, "subscription acknowledged");
                }
                Ok(Event::Incoming(Packet::Disconnect)) => return Some(BrokerEvent::Closed),
                Ok(_) => {}
                Err(e) => {
                    self.pause_before_poll = true;
                    return Some(BrokerEvent::Error(e.to_string()));
                }
            }
        }
    }

    async fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        if let Err(e) = self.client.disconnect().await {
            tracing::debug!(error = %e, "disconnect request not delivered");
            return;
        }

        // drive the event loop until the DISCONNECT packet has gone out
        let flushed = tokio::time::timeout(DISCONNECT_TIMEOUT, async {
            loop {
                match self.eventloop.poll().await {
                    Ok(Event::Outgoing(Outgoing::Disconnect)) | Err(_) => break,
                    Ok(_) => {}
                }
            }
        })
        .await;

        if flushed.is_err() {
            tracing::debug!("timed out waiting for broker disconnect");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_broker_reports_error() {
        let settings = BrokerSettings {
            host: "127.0.0.1".to_string(),
            port: 9,
            reconnect_delay_ms: 10,
            ..BrokerSettings::default()
        };
        let connector = MqttConnector::new(&settings);

        let mut session = connector.connect().await.unwrap();
        let event = tokio::time::timeout(Duration::from_secs(5), session.next_event())
            .await
            .unwrap();
        assert!(matches!(event, Some(BrokerEvent::Error(_))));

        session.close().await;
        assert_eq!(session.next_event().await, None);
    }
}
