//! Relay state-change notifications
//!
//! After a relay is switched the service can announce the change on a message
//! bus. The bus is reached through an HTTP ingress that accepts
//! `POST /publish` with a JSON [`Message`] and answers `204 No Content`.

use async_trait::async_trait;
use hlk_core::Switch;
use reqwest::{header, Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Topic relay changes are published on
pub const RELAY_TOPIC: &str = "home/sensors/relay";

/// Measurement name used in the payload
pub const RELAY_MEASUREMENT: &str = "relay";

/// Delivery guarantee requested from the bus (exactly once)
pub const RELAY_QOS: u8 = 2;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors raised while publishing a notification
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("cannot fetch URL {url:?}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected http POST status: {0}")]
    UnexpectedStatus(StatusCode),
}

/// A message for the bus ingress
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub topic: String,
    pub qos: u8,
    pub retained: bool,
    pub payload: String,
}

impl Message {
    pub fn new(topic: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            qos: RELAY_QOS,
            retained: false,
            payload: payload.into(),
        }
    }

    /// Message announcing that relay `id` was switched.
    ///
    /// The payload uses line protocol, e.g. `relay,id=3 value=true`.
    pub fn relay_changed(id: i64, switch: Switch) -> Self {
        Self::new(
            RELAY_TOPIC,
            format!("{},id={} value={}", RELAY_MEASUREMENT, id, switch.is_on()),
        )
    }
}

/// Destination for relay change notifications
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn publish(&self, message: &Message) -> Result<(), NotifyError>;
}

/// Notifier posting to an HTTP bus ingress
#[derive(Clone)]
pub struct HttpNotifier {
    client: Client,
    url: String,
}

impl HttpNotifier {
    /// Create a notifier posting to `url` (the full `/publish` endpoint)
    pub fn new(url: impl Into<String>) -> Result<Self, NotifyError> {
        Self::with_timeout(url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self, NotifyError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(NotifyError::Client)?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Notifier for HttpNotifier {
    async fn publish(&self, message: &Message) -> Result<(), NotifyError> {
        debug!(url = %self.url, topic = %message.topic, payload = %message.payload, "Publishing notification");

        // `json` keeps a content type that is already set.
        let response = self
            .client
            .post(&self.url)
            .header(header::CONTENT_TYPE, "application/json; charset=utf-8")
            .json(message)
            .send()
            .await
            .map_err(|source| NotifyError::Transport {
                url: self.url.clone(),
                source,
            })?;

        match response.status() {
            StatusCode::NO_CONTENT => Ok(()),
            status => Err(NotifyError::UnexpectedStatus(status)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relay_changed_payload() {
        let on = Message::relay_changed(3, Switch::On);
        assert_eq!(on.topic, "home/sensors/relay");
        assert_eq!(on.qos, 2);
        assert!(!on.retained);
        assert_eq!(on.payload, "relay,id=3 value=true");

        let off = Message::relay_changed(0, Switch::Off);
        assert_eq!(off.payload, "relay,id=0 value=false");
    }

    #[test]
    fn test_message_json_shape() {
        let json = serde_json::to_value(Message::relay_changed(1, Switch::On)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "topic": "home/sensors/relay",
                "qos": 2,
                "retained": false,
                "payload": "relay,id=1 value=true",
            })
        );
    }

    #[test]
    fn test_status_error_message() {
        let err = NotifyError::UnexpectedStatus(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.to_string(),
            "unexpected http POST status: 500 Internal Server Error"
        );
    }
}
